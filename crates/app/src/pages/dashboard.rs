//! Seller Dashboard

use std::sync::Arc;

use futures::Stream;
use jiff::Timestamp;
use larder::{money::minor_from_major, prelude::*};
use rusty_money::iso::Currency;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{
    api::{
        ApiError,
        models::{BranchCoupon, NewCoupon, OrderFilter, OrderRecord},
    },
    context::AppContext,
    notifications::{RefreshSequencer, RefreshTicket, debounce},
    session::Role,
};

use super::{Notices, Prompt, Route};

/// Headline numbers for a branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Revenue from completed and paid orders, in minor units.
    pub revenue: u64,
    /// Number of orders.
    pub orders: usize,
    /// Orders waiting for the seller.
    pub pending: usize,
}

impl DashboardStats {
    /// Compute the stats for a set of orders. Orders without a usable total add no revenue.
    pub fn from_orders(orders: &[OrderRecord], currency: &Currency) -> Self {
        let revenue = orders
            .iter()
            .filter(|order| order.status.counts_as_revenue())
            .filter_map(|order| order.total_price)
            .filter_map(|total| minor_from_major(total, currency).ok())
            .fold(0_u64, u64::saturating_add);

        Self {
            revenue,
            orders: orders.len(),
            pending: orders
                .iter()
                .filter(|order| order.status.awaits_seller())
                .count(),
        }
    }
}

/// A seller's view of their branch's orders.
#[derive(Debug)]
pub struct DashboardPage {
    ctx: AppContext,
    branch_id: BranchId,
    orders: Vec<OrderRecord>,
    coupons: Vec<BranchCoupon>,
    sequencer: Arc<RefreshSequencer>,
    notices: Notices,
}

impl DashboardPage {
    /// Open the dashboard for the signed-in seller's branch, or ask to sign in.
    pub fn mount(ctx: AppContext) -> Result<Self, Route> {
        let Some(branch_id) = ctx
            .session
            .as_ref()
            .filter(|session| session.role() == Role::Seller)
            .and_then(|session| session.branch_id())
        else {
            return Err(Route::Login);
        };

        Ok(Self {
            ctx,
            branch_id,
            orders: Vec::new(),
            coupons: Vec::new(),
            sequencer: Arc::new(RefreshSequencer::new()),
            notices: Notices::default(),
        })
    }

    /// Reload the branch's orders.
    pub async fn refresh(&mut self) {
        let ticket = self.sequencer.issue();
        let result = self
            .ctx
            .orders
            .list_orders(OrderFilter::Branch(self.branch_id))
            .await;

        self.apply(ticket, result);
    }

    /// Apply a refresh result unless a newer one has already been applied.
    ///
    /// Returns whether the orders changed.
    pub fn apply(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<OrderRecord>, ApiError>,
    ) -> bool {
        let mut orders = match result {
            Ok(orders) => orders,
            Err(error) => {
                error!(%error, branch = %self.branch_id, "failed to load branch orders");
                self.notices.error("Could not load orders");
                return false;
            }
        };

        if !self.sequencer.accept(ticket) {
            debug!(?ticket, "discarding stale refresh");
            return false;
        }

        orders.sort_by_key(|order| std::cmp::Reverse(order.created_at()));
        self.orders = orders;

        true
    }

    /// Move an order along, if the action is available from its current status.
    pub async fn act(&mut self, order_id: OrderId, action: OrderAction) {
        let Some(status) = self
            .orders
            .iter()
            .find(|order| order.id == order_id)
            .map(|order| order.status)
        else {
            self.notices.warning(format!("Order #{order_id} not found"));
            return;
        };

        let target = match status.apply(action) {
            Ok(target) => target,
            Err(error) => {
                debug!(%error, "action refused");
                self.notices.warning(format!(
                    "Order #{order_id} is {} and cannot be changed that way",
                    status.label().to_lowercase()
                ));
                return;
            }
        };

        match self.ctx.orders.set_order_status(order_id, target).await {
            Ok(()) => {
                info!(%order_id, from = %status, to = %target, "updated order status");
                self.notices
                    .success(format!("Order #{order_id} is now {}", target.label().to_lowercase()));
                self.refresh().await;
            }
            Err(error) => {
                error!(%error, %order_id, "failed to update order status");
                self.notices.error(format!(
                    "Could not update the order: {}",
                    error.detail_or("please try again")
                ));
            }
        }
    }

    /// Refresh on push messages until the message stream ends.
    ///
    /// Bursts are debounced into single refreshes. Refreshes run concurrently
    /// and `on_update` is called each time a response is applied; responses
    /// older than one already applied are dropped.
    pub async fn watch<S, F>(&mut self, messages: S, mut on_update: F)
    where
        S: Stream<Item = String> + Send + 'static,
        F: FnMut(&mut Self),
    {
        let (request_tx, mut request_rx) = mpsc::channel(8);
        let (result_tx, mut result_rx) = mpsc::channel(8);

        let listener = tokio::spawn(debounce(
            messages,
            self.ctx.settings.refresh_debounce,
            request_tx,
        ));

        loop {
            tokio::select! {
                request = request_rx.recv() => {
                    let Some(request) = request else {
                        break;
                    };

                    for message in request.messages {
                        self.notices.info(message);
                    }

                    let ticket = self.sequencer.issue();
                    let orders = Arc::clone(&self.ctx.orders);
                    let filter = OrderFilter::Branch(self.branch_id);
                    let result_tx = result_tx.clone();

                    tokio::spawn(async move {
                        let result = orders.list_orders(filter).await;

                        if result_tx.send((ticket, result)).await.is_err() {
                            debug!(?ticket, "dashboard closed before refresh finished");
                        }
                    });
                }
                Some((ticket, result)) = result_rx.recv() => {
                    if self.apply(ticket, result) {
                        on_update(self);
                    }
                }
            }
        }

        drop(result_tx);

        while let Some((ticket, result)) = result_rx.recv().await {
            if self.apply(ticket, result) {
                on_update(self);
            }
        }

        if let Err(error) = listener.await {
            debug!(%error, "push listener stopped abnormally");
        }
    }

    /// Reload the branch's coupons. A failed load shows none.
    pub async fn refresh_coupons(&mut self) {
        self.coupons = match self.ctx.coupons.list_coupons(self.branch_id).await {
            Ok(coupons) => coupons,
            Err(error) => {
                debug!(%error, branch = %self.branch_id, "failed to load coupons");
                Vec::new()
            }
        };
    }

    /// Issue a coupon for the branch.
    ///
    /// The code is trimmed and upper-cased and the discount must be between 1
    /// and 100 percent. The coupon starts now unless `valid_from` is given and
    /// ends when it starts unless `valid_to` is given.
    pub async fn create_coupon(
        &mut self,
        code: &str,
        discount_percent: u8,
        valid_from: Option<Timestamp>,
        valid_to: Option<Timestamp>,
    ) {
        let Some(code) = normalize_code(code) else {
            self.notices.warning("Enter a coupon code");
            return;
        };

        if !(1..=100).contains(&discount_percent) {
            self.notices
                .warning("The discount must be between 1 and 100 percent");
            return;
        }

        let start_date = valid_from.unwrap_or_else(Timestamp::now);
        let end_date = valid_to.unwrap_or(start_date);

        if end_date < start_date {
            self.notices.warning("A coupon cannot end before it starts");
            return;
        }

        let coupon = NewCoupon {
            code: code.clone(),
            discount_percent,
            branch_id: self.branch_id,
            start_date,
            end_date,
        };

        match self.ctx.coupons.create_coupon(coupon).await {
            Ok(()) => {
                info!(%code, discount_percent, branch = %self.branch_id, "created coupon");
                self.notices.success(format!("Coupon {code} created"));
                self.refresh_coupons().await;
            }
            Err(error) => {
                error!(%error, %code, "failed to create coupon");
                self.notices.error(format!(
                    "Could not create the coupon: {}",
                    error.detail_or("please try again")
                ));
            }
        }
    }

    /// Withdraw one of the branch's coupons, after confirmation.
    pub async fn delete_coupon(&mut self, coupon_id: CouponId, prompt: &dyn Prompt) {
        if !self.coupons.iter().any(|coupon| coupon.id == coupon_id) {
            self.notices.warning(format!("Coupon #{coupon_id} not found"));
            return;
        }

        if !prompt.confirm("Delete this coupon?") {
            return;
        }

        match self.ctx.coupons.delete_coupon(coupon_id).await {
            Ok(()) => {
                info!(%coupon_id, "deleted coupon");
                self.notices.success("Coupon deleted");
                self.refresh_coupons().await;
            }
            Err(error) => {
                error!(%error, %coupon_id, "failed to delete coupon");
                self.notices.error(format!(
                    "Could not delete the coupon: {}",
                    error.detail_or("please try again")
                ));
            }
        }
    }

    /// Stats for the loaded orders.
    pub fn stats(&self) -> DashboardStats {
        DashboardStats::from_orders(&self.orders, self.ctx.settings.currency)
    }

    pub fn currency(&self) -> &'static Currency {
        self.ctx.settings.currency
    }

    pub fn branch_id(&self) -> BranchId {
        self.branch_id
    }

    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    pub fn coupons(&self) -> &[BranchCoupon] {
        &self.coupons
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }
}
