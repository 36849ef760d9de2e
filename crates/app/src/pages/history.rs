//! Order History Page

use std::{future::Future, pin::pin, time::Duration};

use larder::prelude::*;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

use crate::{
    api::models::{OrderFilter, OrderRecord},
    context::AppContext,
};

use super::{Notices, Prompt, Route};

/// The signed-in buyer's orders.
#[derive(Debug)]
pub struct OrderHistoryPage {
    ctx: AppContext,
    user_id: UserId,
    orders: Vec<OrderRecord>,
    notices: Notices,
}

impl OrderHistoryPage {
    /// Open the history for the signed-in buyer, or ask to sign in.
    pub fn mount(ctx: AppContext) -> Result<Self, Route> {
        let Some(user_id) = ctx.session.as_ref().and_then(|session| session.user_id()) else {
            return Err(Route::Login);
        };

        Ok(Self {
            ctx,
            user_id,
            orders: Vec::new(),
            notices: Notices::default(),
        })
    }

    /// Reload the orders. Background refreshes fail silently.
    ///
    /// Returns whether the orders changed.
    pub async fn refresh(&mut self, background: bool) -> bool {
        match self
            .ctx
            .orders
            .list_orders(OrderFilter::User(self.user_id))
            .await
        {
            Ok(orders) => {
                let changed = orders != self.orders;

                self.orders = orders;

                changed
            }
            Err(error) if background => {
                debug!(%error, "background order refresh failed");
                false
            }
            Err(error) => {
                error!(%error, "failed to load orders");
                self.notices.error("Could not load your orders");
                false
            }
        }
    }

    /// Refresh in the background every `period` until `stop` resolves.
    ///
    /// `on_update` is called after each refresh that changed the orders.
    pub async fn watch<F>(
        &mut self,
        period: Duration,
        stop: impl Future<Output = ()>,
        mut on_update: F,
    ) where
        F: FnMut(&mut Self),
    {
        let mut ticks = interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick completes at once; the caller has just loaded.
        ticks.tick().await;

        let mut stop = pin!(stop);

        loop {
            tokio::select! {
                () = &mut stop => break,
                _ = ticks.tick() => {
                    if self.refresh(true).await {
                        on_update(self);
                    }
                }
            }
        }
    }

    /// Cancel an order nobody has acted on yet, after confirmation.
    pub async fn cancel(&mut self, order_id: OrderId, prompt: &dyn Prompt) {
        let Some(status) = self
            .orders
            .iter()
            .find(|order| order.id == order_id)
            .map(|order| order.status)
        else {
            self.notices.warning(format!("Order #{order_id} not found"));
            return;
        };

        let target = match status.apply(OrderAction::Cancel) {
            Ok(target) => target,
            Err(error) => {
                debug!(%error, "cancel refused");
                self.notices.warning(format!(
                    "Order #{order_id} is {} and can no longer be cancelled",
                    status.label().to_lowercase()
                ));
                return;
            }
        };

        if !prompt.confirm("Cancel this order?") {
            return;
        }

        match self.ctx.orders.set_order_status(order_id, target).await {
            Ok(()) => {
                info!(%order_id, "buyer cancelled order");
                self.notices.success("Order cancelled");
                self.refresh(false).await;
            }
            Err(error) => {
                error!(%error, %order_id, "failed to cancel order");
                self.notices.error(format!(
                    "Could not cancel the order: {}",
                    error.detail_or("please try again")
                ));
            }
        }
    }

    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
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
    use mockall::{Sequence, predicate::eq};
    use reqwest::StatusCode;
    use testresult::TestResult;

    use crate::{
        api::ApiError,
        pages::{MockPrompt, NoticeLevel},
        test::helpers::{Mocks, buyer_session, order},
    };

    use super::*;

    fn confirming() -> MockPrompt {
        let mut prompt = MockPrompt::new();

        prompt.expect_confirm().returning(|_| true);

        prompt
    }

    #[test]
    fn signed_out_buyer_is_sent_to_login() {
        let result = OrderHistoryPage::mount(Mocks::new().into_context(None));

        assert_eq!(result.err(), Some(Route::Login));
    }

    #[tokio::test]
    async fn lists_orders_for_signed_in_user() -> TestResult {
        let mut mocks = Mocks::new();

        mocks
            .orders
            .expect_list_orders()
            .once()
            .with(eq(OrderFilter::User(UserId::new(8))))
            .returning(|_| Ok(vec![order(1, OrderStatus::Pending, Some(50_000), "2025-03-01T10:00:00")]));

        let mut page = OrderHistoryPage::mount(mocks.into_context(Some(buyer_session())))
            .map_err(|route| format!("redirected to {route:?}"))?;

        page.refresh(false).await;

        assert_eq!(page.orders().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn background_failure_is_silent() -> TestResult {
        let mut mocks = Mocks::new();

        mocks.orders.expect_list_orders().returning(|_| {
            Err(ApiError::Status {
                status: StatusCode::BAD_GATEWAY,
                detail: None,
            })
        });

        let mut page = OrderHistoryPage::mount(mocks.into_context(Some(buyer_session())))
            .map_err(|route| format!("redirected to {route:?}"))?;

        page.refresh(true).await;

        assert!(page.notices().is_empty());

        page.refresh(false).await;

        assert_eq!(
            page.notices().last().map(|notice| notice.level),
            Some(NoticeLevel::Error)
        );

        Ok(())
    }

    #[tokio::test]
    async fn pending_order_can_be_cancelled() -> TestResult {
        let mut mocks = Mocks::new();

        mocks
            .orders
            .expect_list_orders()
            .times(2)
            .returning(|_| Ok(vec![order(3, OrderStatus::Pending, Some(50_000), "2025-03-01T10:00:00")]));
        mocks
            .orders
            .expect_set_order_status()
            .once()
            .with(eq(OrderId::new(3)), eq(OrderStatus::Cancelled))
            .returning(|_, _| Ok(()));

        let mut page = OrderHistoryPage::mount(mocks.into_context(Some(buyer_session())))
            .map_err(|route| format!("redirected to {route:?}"))?;

        page.refresh(false).await;
        page.cancel(OrderId::new(3), &confirming()).await;

        assert_eq!(
            page.notices().last().map(|notice| notice.level),
            Some(NoticeLevel::Success)
        );

        Ok(())
    }

    #[tokio::test]
    async fn preparing_order_cannot_be_cancelled() -> TestResult {
        let mut mocks = Mocks::new();

        mocks
            .orders
            .expect_list_orders()
            .returning(|_| Ok(vec![order(3, OrderStatus::Preparing, Some(50_000), "2025-03-01T10:00:00")]));
        mocks.orders.expect_set_order_status().never();

        let mut prompt = MockPrompt::new();

        prompt.expect_confirm().never();

        let mut page = OrderHistoryPage::mount(mocks.into_context(Some(buyer_session())))
            .map_err(|route| format!("redirected to {route:?}"))?;

        page.refresh(false).await;
        page.cancel(OrderId::new(3), &prompt).await;

        assert_eq!(
            page.notices().last().map(|notice| notice.level),
            Some(NoticeLevel::Warning)
        );

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn watch_polls_until_stopped() -> TestResult {
        let mut mocks = Mocks::new();
        let mut seq = Sequence::new();

        mocks
            .orders
            .expect_list_orders()
            .once()
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![order(3, OrderStatus::Pending, Some(50_000), "2025-03-01T10:00:00")]));
        mocks
            .orders
            .expect_list_orders()
            .once()
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(ApiError::Status {
                    status: StatusCode::BAD_GATEWAY,
                    detail: None,
                })
            });
        mocks
            .orders
            .expect_list_orders()
            .once()
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![order(3, OrderStatus::Preparing, Some(50_000), "2025-03-01T10:00:00")]));

        let mut page = OrderHistoryPage::mount(mocks.into_context(Some(buyer_session())))
            .map_err(|route| format!("redirected to {route:?}"))?;
        let mut updates = 0;

        page.watch(
            Duration::from_secs(5),
            tokio::time::sleep(Duration::from_secs(16)),
            |_| updates += 1,
        )
        .await;

        assert_eq!(updates, 2);
        assert!(page.notices().is_empty());
        assert_eq!(
            page.orders().first().map(|order| order.status),
            Some(OrderStatus::Preparing)
        );

        Ok(())
    }
}
