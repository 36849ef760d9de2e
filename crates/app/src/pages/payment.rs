//! Payment Page

use larder::prelude::*;
use tracing::{debug, error, info, warn};

use crate::{
    api::models::{NewInstrument, PaymentRequest, SavedInstrument},
    context::AppContext,
};

use super::{Notices, Route};

/// Which instrument pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentSelection {
    /// A saved instrument.
    Saved(InstrumentId),
    /// Details typed into the form.
    New,
}

/// Settles an online payment for a placed order.
#[derive(Debug)]
pub struct PaymentPage {
    ctx: AppContext,
    order_id: OrderId,
    amount: Option<PaymentAmount>,
    instruments: Vec<SavedInstrument>,
    selection: InstrumentSelection,
    notices: Notices,

    /// Details for a new instrument.
    pub new_instrument: NewInstrument,
}

impl PaymentPage {
    /// Open the payment page for a handoff from checkout.
    ///
    /// Without a handoff the user is sent back to the shop. When the carried
    /// total is missing or unusable the order is fetched to recover it.
    pub async fn mount(ctx: AppContext, handoff: Option<PaymentHandoff>) -> Result<Self, Route> {
        let Some(handoff) = handoff else {
            return Err(Route::Shop);
        };

        let amount = PaymentAmount::from_major(handoff.total_price, ctx.settings.currency)
            .inspect_err(|error| debug!(%error, order_id = %handoff.order_id, "carried total unusable"))
            .ok();

        let mut page = Self {
            ctx,
            order_id: handoff.order_id,
            amount,
            instruments: Vec::new(),
            selection: InstrumentSelection::New,
            notices: Notices::default(),
            new_instrument: NewInstrument::default(),
        };

        page.load_saved_instruments().await;

        if page.amount.is_none() {
            page.resolve_amount().await;
        }

        Ok(page)
    }

    /// Fetch the order and take its total as the amount to pay.
    pub async fn resolve_amount(&mut self) {
        let order = match self.ctx.orders.get_order(self.order_id).await {
            Ok(order) => order,
            Err(error) => {
                error!(%error, order_id = %self.order_id, "failed to load order");
                self.notices.error("Could not load the order");
                return;
            }
        };

        match PaymentAmount::from_major(order.total_price, self.ctx.settings.currency) {
            Ok(amount) => {
                debug!(order_id = %self.order_id, minor = amount.minor(), "resolved payment amount");
                self.amount = Some(amount);
            }
            Err(error) => {
                warn!(%error, order_id = %self.order_id, "order has no payable total");
                self.notices.error("The order total is not available");
            }
        }
    }

    /// Load saved instruments and preselect the first one.
    ///
    /// A failure is treated as having none.
    pub async fn load_saved_instruments(&mut self) {
        self.instruments = self
            .ctx
            .payments
            .list_instruments()
            .await
            .unwrap_or_else(|error| {
                debug!(%error, "no saved instruments");
                Vec::new()
            });

        self.selection = self
            .instruments
            .first()
            .map_or(InstrumentSelection::New, |instrument| {
                InstrumentSelection::Saved(instrument.id)
            });
    }

    /// Choose the paying instrument. Unknown saved ids are ignored.
    pub fn select_instrument(&mut self, selection: InstrumentSelection) {
        if let InstrumentSelection::Saved(id) = selection {
            if !self.instruments.iter().any(|instrument| instrument.id == id) {
                return;
            }
        }

        self.selection = selection;
    }

    /// Pay for the order.
    ///
    /// Refuses while the amount is unresolved and retries resolving it.
    pub async fn confirm_payment(&mut self) -> Option<Route> {
        let Some(amount) = self.amount else {
            self.notices
                .warning("The amount is still loading, please wait");
            self.resolve_amount().await;
            return None;
        };

        if self.selection == InstrumentSelection::New && self.new_instrument.is_filled() {
            match self
                .ctx
                .payments
                .save_instrument(self.new_instrument.clone())
                .await
            {
                Ok(saved) => debug!(instrument_id = %saved.id, "saved instrument"),
                Err(error) => debug!(%error, "failed to save instrument"),
            }
        }

        tokio::time::sleep(self.ctx.settings.payment_latency).await;

        let payment = PaymentRequest {
            order_id: self.order_id,
            amount: amount.major(self.ctx.settings.currency),
        };

        if let Err(error) = self.ctx.payments.submit_payment(payment).await {
            error!(%error, order_id = %self.order_id, "payment failed");
            self.notices.error(format!(
                "Payment failed: {}",
                error.detail_or("please try again")
            ));
            return None;
        }

        info!(order_id = %self.order_id, minor = amount.minor(), "payment settled");

        if let Err(error) = self.ctx.carts.clear_cart().await {
            warn!(%error, "failed to clear cart after payment");
        }

        self.notices.success("Payment successful");

        Some(Route::OrderHistory)
    }

    /// The amount to pay, or the unresolved marker.
    pub fn amount_display(&self) -> String {
        let money = self
            .amount
            .and_then(|amount| amount.money(self.ctx.settings.currency).ok());

        format_amount(money.as_ref())
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn amount(&self) -> Option<PaymentAmount> {
        self.amount
    }

    pub fn instruments(&self) -> &[SavedInstrument] {
        &self.instruments
    }

    pub fn selection(&self) -> InstrumentSelection {
        self.selection
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use reqwest::StatusCode;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        api::ApiError,
        pages::NoticeLevel,
        test::helpers::{Mocks, order},
    };

    use super::*;

    fn handoff(total: Option<i64>) -> Option<PaymentHandoff> {
        Some(PaymentHandoff {
            order_id: OrderId::new(5),
            total_price: total.map(Decimal::from),
        })
    }

    fn no_instruments(mocks: &mut Mocks) {
        mocks
            .payments
            .expect_list_instruments()
            .returning(|| Ok(Vec::new()));
    }

    fn card(id: u64) -> SavedInstrument {
        SavedInstrument {
            id: InstrumentId::new(id),
            bank_name: "VCB".to_string(),
            card_number: "**** 1111".to_string(),
            card_holder: "NGUYEN AN".to_string(),
            expiry_date: "12/29".to_string(),
        }
    }

    #[tokio::test]
    async fn missing_handoff_redirects_to_shop() {
        let mocks = Mocks::new();

        let result = PaymentPage::mount(mocks.into_context(None), None).await;

        assert_eq!(result.err(), Some(Route::Shop));
    }

    #[tokio::test]
    async fn missing_total_is_fetched_from_order() -> TestResult {
        let mut mocks = Mocks::new();

        no_instruments(&mut mocks);
        mocks
            .orders
            .expect_get_order()
            .once()
            .with(eq(OrderId::new(5)))
            .returning(|_| Ok(order(5, OrderStatus::PendingPayment, Some(65_000), "2025-03-01T10:00:00")));

        let page = PaymentPage::mount(mocks.into_context(None), handoff(None))
            .await
            .map_err(|route| format!("redirected to {route:?}"))?;

        assert_eq!(page.amount().map(PaymentAmount::minor), Some(65_000));
        assert!(!page.amount_display().contains("NaN"));

        Ok(())
    }

    #[tokio::test]
    async fn unresolved_amount_blocks_payment() -> TestResult {
        let mut mocks = Mocks::new();

        no_instruments(&mut mocks);
        // Once on mount, once more when the user tries to pay.
        mocks.orders.expect_get_order().times(2).returning(|_| {
            Err(ApiError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                detail: None,
            })
        });
        mocks.payments.expect_submit_payment().never();
        mocks.payments.expect_save_instrument().never();

        let mut page = PaymentPage::mount(mocks.into_context(None), handoff(None))
            .await
            .map_err(|route| format!("redirected to {route:?}"))?;

        assert_eq!(page.amount_display(), UNRESOLVED_AMOUNT);

        assert_eq!(page.confirm_payment().await, None);
        assert!(
            page.notices()
                .iter()
                .any(|notice| notice.level == NoticeLevel::Warning)
        );
        assert_eq!(page.amount(), None);

        Ok(())
    }

    #[tokio::test]
    async fn zero_total_is_not_payable() -> TestResult {
        let mut mocks = Mocks::new();

        no_instruments(&mut mocks);
        mocks
            .orders
            .expect_get_order()
            .once()
            .returning(|_| Ok(order(5, OrderStatus::PendingPayment, Some(0), "2025-03-01T10:00:00")));

        let page = PaymentPage::mount(mocks.into_context(None), handoff(Some(0)))
            .await
            .map_err(|route| format!("redirected to {route:?}"))?;

        assert_eq!(page.amount(), None);
        assert_eq!(page.amount_display(), UNRESOLVED_AMOUNT);

        Ok(())
    }

    #[tokio::test]
    async fn carried_total_skips_fetch_and_pays() -> TestResult {
        let mut mocks = Mocks::new();

        mocks
            .payments
            .expect_list_instruments()
            .once()
            .returning(|| Ok(vec![card(1), card(2)]));
        mocks.orders.expect_get_order().never();
        mocks.payments.expect_save_instrument().never();
        mocks
            .payments
            .expect_submit_payment()
            .once()
            .withf(|payment| {
                payment.order_id == OrderId::new(5) && payment.amount == Decimal::from(65_000)
            })
            .returning(|_| Ok(()));
        mocks.carts.expect_clear_cart().once().returning(|| Ok(()));

        let mut page = PaymentPage::mount(mocks.into_context(None), handoff(Some(65_000)))
            .await
            .map_err(|route| format!("redirected to {route:?}"))?;

        assert_eq!(
            page.selection(),
            InstrumentSelection::Saved(InstrumentId::new(1))
        );

        assert_eq!(page.confirm_payment().await, Some(Route::OrderHistory));

        Ok(())
    }

    #[tokio::test]
    async fn new_instrument_is_saved_best_effort() -> TestResult {
        let mut mocks = Mocks::new();

        mocks.payments.expect_list_instruments().returning(|| {
            Err(ApiError::Status {
                status: StatusCode::UNAUTHORIZED,
                detail: None,
            })
        });
        mocks
            .payments
            .expect_save_instrument()
            .once()
            .withf(|instrument| instrument.card_holder == "NGUYEN AN")
            .returning(|_| {
                Err(ApiError::Status {
                    status: StatusCode::BAD_REQUEST,
                    detail: None,
                })
            });
        mocks
            .payments
            .expect_submit_payment()
            .once()
            .returning(|_| Ok(()));
        mocks.carts.expect_clear_cart().once().returning(|| Ok(()));

        let mut page = PaymentPage::mount(mocks.into_context(None), handoff(Some(65_000)))
            .await
            .map_err(|route| format!("redirected to {route:?}"))?;

        assert_eq!(page.selection(), InstrumentSelection::New);

        page.new_instrument = NewInstrument {
            bank_name: "VCB".to_string(),
            card_number: "4111111111111111".to_string(),
            card_holder: "NGUYEN AN".to_string(),
            expiry_date: "12/29".to_string(),
        };

        assert_eq!(page.confirm_payment().await, Some(Route::OrderHistory));

        Ok(())
    }

    #[tokio::test]
    async fn failed_payment_stays_for_retry() -> TestResult {
        let mut mocks = Mocks::new();

        no_instruments(&mut mocks);
        mocks.payments.expect_submit_payment().once().returning(|_| {
            Err(ApiError::Status {
                status: StatusCode::PAYMENT_REQUIRED,
                detail: Some("Card declined".to_string()),
            })
        });
        mocks.carts.expect_clear_cart().never();

        let mut page = PaymentPage::mount(mocks.into_context(None), handoff(Some(65_000)))
            .await
            .map_err(|route| format!("redirected to {route:?}"))?;

        assert_eq!(page.confirm_payment().await, None);
        assert_eq!(
            page.notices().last().map(|notice| notice.message.as_str()),
            Some("Payment failed: Card declined")
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_saved_instrument_is_ignored() -> TestResult {
        let mut mocks = Mocks::new();

        mocks
            .payments
            .expect_list_instruments()
            .returning(|| Ok(vec![card(1)]));

        let mut page = PaymentPage::mount(mocks.into_context(None), handoff(Some(10)))
            .await
            .map_err(|route| format!("redirected to {route:?}"))?;

        page.select_instrument(InstrumentSelection::Saved(InstrumentId::new(9)));

        assert_eq!(
            page.selection(),
            InstrumentSelection::Saved(InstrumentId::new(1))
        );

        page.select_instrument(InstrumentSelection::New);

        assert_eq!(page.selection(), InstrumentSelection::New);

        Ok(())
    }
}
