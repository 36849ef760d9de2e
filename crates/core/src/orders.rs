//! Orders
//!
//! Order status is owned by the server. The client observes it and may only
//! request the transitions exposed as [`OrderAction`]s.

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ids::{BranchId, FoodId, UserId},
    money::{AmountError, major_from_minor},
    snapshot::PricedSnapshot,
};

/// Server-side order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum OrderStatus {
    /// Placed, waiting for the seller.
    Pending,
    /// Placed with online payment, waiting for the payment.
    PendingPayment,
    /// Waiting for a courier.
    PendingShipping,
    /// Paid online; waiting for the seller alongside `Pending`.
    Paid,
    /// Accepted by the seller.
    Preparing,
    /// Out for delivery.
    Shipping,
    /// Delivered.
    Completed,
    /// Cancelled by buyer or seller.
    Cancelled,
    /// A status this client does not know about.
    Unknown,
}

impl OrderStatus {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::PendingPayment => "PENDING_PAYMENT",
            Self::PendingShipping => "PENDING_SHIPPING",
            Self::Paid => "PAID",
            Self::Preparing => "PREPARING",
            Self::Shipping => "SHIPPING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Awaiting confirmation",
            Self::PendingPayment => "Awaiting payment",
            Self::PendingShipping => "Awaiting delivery",
            Self::Paid => "Paid",
            Self::Preparing => "Preparing",
            Self::Shipping => "Out for delivery",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether the seller still has to accept or reject the order.
    pub fn awaits_seller(self) -> bool {
        matches!(self, Self::Pending | Self::Paid)
    }

    /// Whether the order counts towards branch revenue.
    pub fn counts_as_revenue(self) -> bool {
        matches!(self, Self::Completed | Self::Paid)
    }

    /// Whether the server may move an order from `self` to `next`.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (
                Self::Pending,
                Self::Preparing | Self::Cancelled | Self::Paid
            ) | (Self::PendingPayment, Self::Paid | Self::Cancelled)
                | (Self::Paid, Self::Preparing | Self::Cancelled)
                | (Self::PendingShipping, Self::Shipping | Self::Cancelled)
                | (Self::Preparing, Self::Shipping)
                | (Self::Shipping, Self::Completed)
        )
    }

    /// Resolve the status an action would request.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the action is not available from this status.
    pub fn apply(self, action: OrderAction) -> Result<OrderStatus, TransitionError> {
        let allowed = match action {
            OrderAction::Cancel => matches!(self, Self::Pending | Self::PendingPayment),
            OrderAction::Accept | OrderAction::Reject => self.awaits_seller(),
            OrderAction::Ship => matches!(self, Self::Preparing | Self::PendingShipping),
            OrderAction::Complete => self == Self::Shipping,
        };

        let target = action.target();

        if allowed && self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(TransitionError { from: self, action })
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PENDING" => Self::Pending,
            "PENDING_PAYMENT" => Self::PendingPayment,
            "PENDING_SHIPPING" => Self::PendingShipping,
            "PAID" => Self::Paid,
            "PREPARING" => Self::Preparing,
            "SHIPPING" => Self::Shipping,
            "COMPLETED" => Self::Completed,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }
}

impl From<OrderStatus> for &'static str {
    fn from(status: OrderStatus) -> Self {
        status.as_str()
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Transitions a client may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Buyer cancels an order that nobody has acted on yet.
    Cancel,
    /// Seller accepts.
    Accept,
    /// Seller rejects.
    Reject,
    /// Seller hands the order to delivery.
    Ship,
    /// Seller marks the order delivered.
    Complete,
}

impl OrderAction {
    /// The status this action requests.
    pub fn target(self) -> OrderStatus {
        match self {
            Self::Cancel | Self::Reject => OrderStatus::Cancelled,
            Self::Accept => OrderStatus::Preparing,
            Self::Ship => OrderStatus::Shipping,
            Self::Complete => OrderStatus::Completed,
        }
    }
}

/// An action that is not available from the order's current status.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {action:?} an order that is {from}")]
pub struct TransitionError {
    /// Status the order is in.
    pub from: OrderStatus,
    /// Requested action.
    pub action: OrderAction,
}

/// How the buyer pays; fixed when the order is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    #[serde(rename = "COD")]
    Cod,
    /// Online bank/card payment, settled on the payment page.
    #[serde(rename = "BANKING")]
    Banking,
}

/// Delivery contact details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryDetails {
    /// Recipient name.
    pub name: String,
    /// Recipient phone.
    pub phone: String,
    /// Delivery address.
    pub address: String,
    /// Free-form note for the seller.
    pub note: String,
}

/// Required delivery fields that were left blank.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("missing delivery details: {}", .0.join(", "))]
pub struct MissingDeliveryDetails(pub Vec<&'static str>);

impl DeliveryDetails {
    /// Check that name, phone and address are all filled in.
    ///
    /// # Errors
    ///
    /// Returns the list of blank required fields.
    pub fn validate(&self) -> Result<(), MissingDeliveryDetails> {
        let missing: Vec<&'static str> = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("address", &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingDeliveryDetails(missing))
        }
    }
}

/// Which order-creation payload shape to send.
///
/// `Minimal` carries only food ids and quantities and lets the server price the
/// order. `Enriched` also embeds the price, name and image captured in the
/// snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderPayloadVersion {
    /// Food ids and quantities only.
    Minimal,
    /// Ids, quantities, snapshot price, name and image.
    #[default]
    Enriched,
}

/// Order-creation request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    /// Buyer, when signed in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Branch the order is placed with.
    pub branch_id: BranchId,
    /// Ordered lines.
    pub items: Vec<NewOrderLine>,
    /// Applied coupon code.
    pub coupon_code: Option<String>,
    /// Recipient name.
    pub customer_name: String,
    /// Recipient phone.
    pub customer_phone: String,
    /// Delivery address.
    pub delivery_address: String,
    /// Note for the seller.
    pub note: String,
    /// Payment method.
    pub payment_method: PaymentMethod,
}

/// One line of an order-creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrderLine {
    /// Food ordered.
    pub food_id: FoodId,
    /// Units ordered.
    pub quantity: u32,
    /// Unit price captured at submission time.
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    /// Food name captured at submission time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_name: Option<String>,
    /// Image captured at submission time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewOrder {
    /// Build the request from a frozen snapshot and the collected checkout form.
    ///
    /// # Errors
    ///
    /// Returns an [`AmountError`] if the snapshot's currency is unknown.
    pub fn from_snapshot(
        snapshot: &PricedSnapshot,
        delivery: &DeliveryDetails,
        payment_method: PaymentMethod,
        user_id: Option<UserId>,
        version: OrderPayloadVersion,
    ) -> Result<Self, AmountError> {
        let currency = snapshot.currency()?;

        let items = snapshot
            .items()
            .iter()
            .map(|line| match version {
                OrderPayloadVersion::Minimal => NewOrderLine {
                    food_id: line.food_id,
                    quantity: line.quantity,
                    price: None,
                    food_name: None,
                    image_url: None,
                },
                OrderPayloadVersion::Enriched => NewOrderLine {
                    food_id: line.food_id,
                    quantity: line.quantity,
                    price: Some(major_from_minor(line.price, currency)),
                    food_name: Some(line.name.clone()),
                    image_url: line.image_url.clone(),
                },
            })
            .collect();

        Ok(Self {
            user_id,
            branch_id: snapshot.branch_id(),
            items,
            coupon_code: snapshot.coupon().map(|coupon| coupon.code().to_string()),
            customer_name: delivery.name.trim().to_string(),
            customer_phone: delivery.phone.trim().to_string(),
            delivery_address: delivery.address.trim().to_string(),
            note: delivery.note.clone(),
            payment_method,
        })
    }
}
