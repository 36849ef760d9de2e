//! Checkout Page

use larder::{money::major_from_minor, prelude::*};
use tracing::{debug, error, info, warn};

use crate::{
    api::models::{NewAddress, SavedAddress},
    context::AppContext,
};

use super::{Notices, Route};

/// Collects delivery details and places the order for a frozen cart.
#[derive(Debug)]
pub struct CheckoutPage {
    ctx: AppContext,
    snapshot: PricedSnapshot,
    branch_name: String,
    saved_addresses: Vec<SavedAddress>,
    notices: Notices,

    /// Delivery form.
    pub delivery: DeliveryDetails,

    /// Chosen payment method.
    pub payment_method: PaymentMethod,
}

impl CheckoutPage {
    /// Open checkout for a snapshot handed over by the cart.
    ///
    /// Without a snapshot, or with an empty one, the user is sent back to the
    /// shop. The branch name and the address book are loaded best-effort.
    pub async fn mount(ctx: AppContext, handoff: Option<PricedSnapshot>) -> Result<Self, Route> {
        let Some(snapshot) = handoff.filter(|snapshot| !snapshot.is_empty()) else {
            return Err(Route::Shop);
        };

        let branch = snapshot.branch_id();
        let branch_name = match ctx.catalog.get_branch(branch).await {
            Ok(detail) => detail.name,
            Err(error) => {
                debug!(%error, %branch, "branch lookup failed");
                format!("Branch #{branch}")
            }
        };

        let saved_addresses = if ctx.session.is_some() {
            ctx.accounts.list_addresses().await.unwrap_or_else(|error| {
                warn!(%error, "failed to load saved addresses");
                Vec::new()
            })
        } else {
            Vec::new()
        };

        Ok(Self {
            ctx,
            snapshot,
            branch_name,
            saved_addresses,
            notices: Notices::default(),
            delivery: DeliveryDetails::default(),
            payment_method: PaymentMethod::default(),
        })
    }

    /// Fill the delivery form from a saved address. Unknown ids are ignored.
    pub fn select_saved_address(&mut self, id: AddressId) {
        let Some(address) = self
            .saved_addresses
            .iter()
            .find(|address| address.id == id)
        else {
            return;
        };

        self.delivery.name.clone_from(&address.name);
        self.delivery.phone.clone_from(&address.phone);
        self.delivery.address.clone_from(&address.address);
    }

    /// Store the current delivery form in the signed-in user's address book.
    pub async fn save_delivery_address(&mut self, title: &str) {
        if self.ctx.session.is_none() {
            self.notices.warning("Sign in to save addresses");
            return;
        }

        if self.delivery.validate().is_err() {
            self.notices
                .warning("Please fill in name, phone and address");
            return;
        }

        let address = NewAddress {
            title: title.trim().to_string(),
            name: self.delivery.name.clone(),
            phone: self.delivery.phone.clone(),
            address: self.delivery.address.clone(),
        };

        match self.ctx.accounts.save_address(address).await {
            Ok(saved) => {
                info!(address_id = %saved.id, "saved delivery address");
                self.saved_addresses.push(saved);
                self.notices.success("Address saved");
            }
            Err(error) => {
                warn!(%error, "failed to save address");
                self.notices.error("Could not save the address");
            }
        }
    }

    /// Place the order.
    ///
    /// Blank name, phone or address stops here without touching the network.
    /// Cash orders go to the order history; online payments go to the payment
    /// page with the order id and the total to pay.
    pub async fn submit_order(&mut self) -> Option<Route> {
        if let Err(missing) = self.delivery.validate() {
            debug!(%missing, "checkout form incomplete");
            self.notices
                .warning("Please fill in name, phone and address");
            return None;
        }

        let order = match NewOrder::from_snapshot(
            &self.snapshot,
            &self.delivery,
            self.payment_method,
            self.ctx.session.as_ref().and_then(|session| session.user_id()),
            self.ctx.settings.payload_version,
        ) {
            Ok(order) => order,
            Err(error) => {
                error!(%error, "failed to build order");
                self.notices.error("Your order could not be prepared");
                return None;
            }
        };

        let created = match self.ctx.orders.create_order(order).await {
            Ok(created) => created,
            Err(error) => {
                error!(%error, "failed to place order");
                self.notices.error(format!(
                    "Could not place your order: {}",
                    error.detail_or("please try again later")
                ));
                return None;
            }
        };

        info!(order_id = %created.order_id, method = ?self.payment_method, "placed order");

        if let Err(error) = self.ctx.carts.clear_cart().await {
            warn!(%error, "failed to clear cart after checkout");
        }

        match self.payment_method {
            PaymentMethod::Cod => {
                self.notices.success("Order placed");
                Some(Route::OrderHistory)
            }
            PaymentMethod::Banking => {
                let total_price = created.total_price.or_else(|| {
                    self.snapshot
                        .currency()
                        .ok()
                        .map(|currency| major_from_minor(self.snapshot.final_price(), currency))
                });

                self.notices.info("Order placed, continue to payment");

                Some(Route::Payment(PaymentHandoff {
                    order_id: created.order_id,
                    total_price,
                }))
            }
        }
    }

    pub fn snapshot(&self) -> &PricedSnapshot {
        &self.snapshot
    }

    pub fn branch_name(&self) -> &str {
        &self.branch_name
    }

    pub fn saved_addresses(&self) -> &[SavedAddress] {
        &self.saved_addresses
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }
}
