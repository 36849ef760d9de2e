//! Wire models for the backend API.

use jiff::{Timestamp, civil::DateTime, tz::TimeZone};
use larder::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A cart line as stored by the server, before catalog enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCartLine {
    pub food_id: FoodId,
    pub quantity: u32,
    pub branch_id: BranchId,
}

/// Body for adding a food to the server cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewCartLine {
    pub food_id: FoodId,
    pub branch_id: BranchId,
    pub quantity: u32,
}

/// Body for changing a line's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuantityUpdate {
    pub food_id: FoodId,
    pub quantity: u32,
}

/// Catalog detail for a food.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FoodDetail {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Branch display data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchDetail {
    pub name: String,
}

/// Response to order creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedOrder {
    pub order_id: OrderId,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_price: Option<Decimal>,
}

/// Which orders to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    /// Orders placed by a buyer.
    User(UserId),
    /// Orders received by a branch.
    Branch(BranchId),
}

impl OrderFilter {
    pub(crate) fn query(self) -> (&'static str, u64) {
        match self {
            Self::User(user) => ("user_id", user.get()),
            Self::Branch(branch) => ("branch_id", branch.get()),
        }
    }
}

/// An order as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderRecord {
    #[serde(alias = "order_id")]
    pub id: OrderId,
    pub status: OrderStatus,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub branch_id: Option<BranchId>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderRecordLine>,
}

/// One line of a reported order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderRecordLine {
    pub food_id: FoodId,
    pub quantity: u32,
    #[serde(default, alias = "name")]
    pub food_name: Option<String>,
}

impl OrderRecord {
    /// Creation time, when the server sent one it could be parsed from.
    pub fn created_at(&self) -> Option<DateTime> {
        server_time(self.created_at.as_deref()?)
    }
}

/// Accepts both offset timestamps and naive UTC date-times.
fn server_time(raw: &str) -> Option<DateTime> {
    raw.parse::<Timestamp>()
        .map(|timestamp| timestamp.to_zoned(TimeZone::UTC).datetime())
        .or_else(|_| raw.parse::<DateTime>())
        .ok()
}

/// A dish in search results, summarised over the branches selling it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FoodSummary {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub min_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub branch_count: u32,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub avg_rating: Option<Decimal>,
    #[serde(default)]
    pub review_count: u32,
}

/// One branch's offer of a dish.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FoodOption {
    pub food_id: FoodId,
    pub branch_id: BranchId,
    #[serde(default)]
    pub branch_name: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub final_price: Option<Decimal>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A coupon as listed for the branch that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchCoupon {
    pub id: CouponId,
    pub code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,
    #[serde(default, alias = "valid_to")]
    pub end_date: Option<String>,
}

impl BranchCoupon {
    /// Expiry, when the server sent one it could be parsed from.
    pub fn expires_at(&self) -> Option<DateTime> {
        server_time(self.end_date.as_deref()?)
    }
}

/// Body for issuing a coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCoupon {
    pub code: String,
    pub discount_percent: u8,
    pub branch_id: BranchId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

/// Body for a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SavedAddress {
    pub id: AddressId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// Body for saving a delivery address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewAddress {
    pub title: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// A saved payment instrument. The card number arrives masked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SavedInstrument {
    pub id: InstrumentId,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub card_holder: String,
    #[serde(default)]
    pub expiry_date: String,
}

/// Body for saving a payment instrument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewInstrument {
    pub bank_name: String,
    pub card_number: String,
    pub card_holder: String,
    pub expiry_date: String,
}

impl NewInstrument {
    /// Card number and holder are both filled in.
    pub fn is_filled(&self) -> bool {
        !self.card_number.trim().is_empty() && !self.card_holder.trim().is_empty()
    }
}

/// Login credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub branch_id: Option<BranchId>,
    #[serde(default, alias = "id")]
    pub user_id: Option<UserId>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn order_record_accepts_server_shape() -> TestResult {
        let order: OrderRecord = serde_json::from_str(
            r#"{
                "id": 12,
                "status": "PAID",
                "total_price": 65000.0,
                "branch_id": 3,
                "customer_name": "An",
                "created_at": "2025-03-01T10:15:30.123456",
                "items": [{"food_id": 1, "quantity": 2, "food_name": "Bun cha"}]
            }"#,
        )?;

        assert_eq!(order.id, OrderId::new(12));
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.total_price, Some(Decimal::from(65_000)));
        assert_eq!(order.items.len(), 1);
        assert!(order.created_at().is_some());

        Ok(())
    }

    #[test]
    fn order_timestamps_with_offsets_parse() -> TestResult {
        let order: OrderRecord = serde_json::from_str(
            r#"{"id": 1, "status": "PENDING", "created_at": "2025-03-01T10:15:30Z"}"#,
        )?;

        assert_eq!(order.created_at(), Some("2025-03-01T10:15:30".parse::<DateTime>()?));

        Ok(())
    }

    #[test]
    fn cart_line_without_branch_is_rejected() {
        let result = serde_json::from_str::<Vec<RawCartLine>>(
            r#"[{"food_id": 1, "quantity": 2, "branch_id": 7}, {"food_id": 2, "quantity": 1}]"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn food_option_reads_branch_offer() -> TestResult {
        let options: Vec<FoodOption> = serde_json::from_str(
            r#"[{"food_id": 4, "branch_id": 7, "branch_name": "Pho Hanoi", "final_price": 45000.0}]"#,
        )?;

        assert_eq!(options.first().map(|option| option.food_id), Some(FoodId::new(4)));
        assert_eq!(
            options.first().and_then(|option| option.final_price),
            Some(Decimal::from(45_000))
        );

        Ok(())
    }

    #[test]
    fn branch_coupon_accepts_legacy_expiry_field() -> TestResult {
        let coupon: BranchCoupon = serde_json::from_str(
            r#"{"id": 3, "code": "TET", "discount_percent": 15, "valid_to": "2026-02-01T00:00:00Z"}"#,
        )?;

        assert_eq!(coupon.expires_at(), Some("2026-02-01T00:00:00".parse::<DateTime>()?));

        Ok(())
    }

    #[test]
    fn new_coupon_sends_iso_dates() -> TestResult {
        let body = serde_json::to_value(NewCoupon {
            code: "TET".to_string(),
            discount_percent: 15,
            branch_id: BranchId::new(7),
            start_date: "2026-01-20T00:00:00Z".parse()?,
            end_date: "2026-02-01T00:00:00Z".parse()?,
        })?;

        assert_eq!(
            body,
            serde_json::json!({
                "code": "TET",
                "discount_percent": 15,
                "branch_id": 7,
                "start_date": "2026-01-20T00:00:00Z",
                "end_date": "2026-02-01T00:00:00Z"
            })
        );

        Ok(())
    }

    #[test]
    fn created_order_without_total() -> TestResult {
        let created: CreatedOrder = serde_json::from_str(r#"{"order_id": 9}"#)?;

        assert_eq!(created.order_id, OrderId::new(9));
        assert_eq!(created.total_price, None);

        Ok(())
    }

    #[test]
    fn login_response_reads_id_as_user() -> TestResult {
        let response: LoginResponse = serde_json::from_str(
            r#"{"access_token": "abc", "role": "seller", "branch_id": 4, "id": 2}"#,
        )?;

        assert_eq!(response.user_id, Some(UserId::new(2)));
        assert_eq!(response.branch_id, Some(BranchId::new(4)));

        Ok(())
    }

    #[test]
    fn payment_request_sends_amount_as_number() -> TestResult {
        let body = serde_json::to_value(PaymentRequest {
            order_id: OrderId::new(5),
            amount: Decimal::from(65_000),
        })?;

        assert_eq!(body, serde_json::json!({"order_id": 5, "amount": 65000.0}));

        Ok(())
    }

    #[test]
    fn instrument_needs_number_and_holder() {
        let mut instrument = NewInstrument {
            card_number: "4111 1111 1111 1111".to_string(),
            ..NewInstrument::default()
        };

        assert!(!instrument.is_filled());

        instrument.card_holder = "NGUYEN AN".to_string();

        assert!(instrument.is_filled());
    }
}
