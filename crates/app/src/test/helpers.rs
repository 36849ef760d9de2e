//! Test Helpers

use std::{sync::Arc, time::Duration};

use larder::prelude::*;
use rust_decimal::Decimal;
use rusty_money::iso;

use crate::{
    api::{
        MockAccountsApi, MockCartApi, MockCatalogApi, MockCouponsApi, MockOrdersApi,
        MockPaymentsApi,
        models::{FoodDetail, LoginResponse, OrderRecord, RawCartLine},
    },
    config::PipelineSettings,
    context::AppContext,
    session::Session,
};

pub(crate) const BRANCH: BranchId = BranchId::new(7);

/// One mock per backend concern. Calls without a matching expectation panic.
#[derive(Default)]
pub(crate) struct Mocks {
    pub carts: MockCartApi,
    pub catalog: MockCatalogApi,
    pub coupons: MockCouponsApi,
    pub orders: MockOrdersApi,
    pub payments: MockPaymentsApi,
    pub accounts: MockAccountsApi,
}

impl Mocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn into_context(self, session: Option<Session>) -> AppContext {
        AppContext {
            carts: Arc::new(self.carts),
            catalog: Arc::new(self.catalog),
            coupons: Arc::new(self.coupons),
            orders: Arc::new(self.orders),
            payments: Arc::new(self.payments),
            accounts: Arc::new(self.accounts),
            session,
            settings: settings(),
        }
    }
}

pub(crate) fn settings() -> PipelineSettings {
    PipelineSettings {
        currency: iso::VND,
        payment_latency: Duration::ZERO,
        enrichment_concurrency: 4,
        refresh_debounce: Duration::from_millis(50),
        history_poll: Duration::from_secs(5),
        payload_version: OrderPayloadVersion::Enriched,
    }
}

fn session(role: &str, user: u64, branch: Option<BranchId>) -> Session {
    Session::from_login(LoginResponse {
        access_token: format!("token-{user}"),
        role: role.to_string(),
        branch_id: branch,
        user_id: Some(UserId::new(user)),
    })
    .expect("fixture session is valid")
}

pub(crate) fn buyer_session() -> Session {
    session("buyer", 8, None)
}

pub(crate) fn seller_session() -> Session {
    session("seller", 2, Some(BRANCH))
}

pub(crate) fn raw_line(food: u64, quantity: u32) -> RawCartLine {
    RawCartLine {
        food_id: FoodId::new(food),
        quantity,
        branch_id: BRANCH,
    }
}

pub(crate) fn food(name: &str, price: i64) -> FoodDetail {
    FoodDetail {
        name: name.to_string(),
        price: Decimal::from(price),
        image_url: Some(format!("/static/{}.png", name.to_lowercase().replace(' ', "-"))),
    }
}

pub(crate) fn priced_line(food: u64, price: u64, quantity: u32) -> CartLine {
    CartLine {
        food_id: FoodId::new(food),
        quantity,
        branch_id: BRANCH,
        price,
        name: format!("Food {food}"),
        image_url: None,
    }
}

/// The worked example: 2 × 50 000 + 1 × 30 000, optionally with a coupon.
pub(crate) fn snapshot(coupon: Option<&Coupon>) -> PricedSnapshot {
    let cart = Cart::with_lines(
        [priced_line(1, 50_000, 2), priced_line(2, 30_000, 1)],
        iso::VND,
    )
    .expect("fixture cart is valid");

    PricedSnapshot::freeze(&cart, coupon).expect("fixture cart prices")
}

pub(crate) fn order(id: u64, status: OrderStatus, total: Option<i64>, created_at: &str) -> OrderRecord {
    OrderRecord {
        id: OrderId::new(id),
        status,
        total_price: total.map(Decimal::from),
        branch_id: Some(BRANCH),
        customer_name: Some("An".to_string()),
        customer_phone: Some("0900000000".to_string()),
        note: None,
        payment_method: Some(PaymentMethod::Cod),
        created_at: Some(created_at.to_string()),
        items: Vec::new(),
    }
}
