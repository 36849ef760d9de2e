//! Pages
//!
//! Each page controller owns its state exclusively and reports outcomes as
//! [`Notice`]s plus an optional [`Route`] to move to. Nothing here panics or
//! returns a fatal error: every failure leaves a state the user can retry from.

use larder::prelude::{PaymentHandoff, PricedSnapshot};
use mockall::automock;

mod cart;
mod checkout;
mod dashboard;
mod history;
mod payment;
mod shop;

pub use cart::{AddOutcome, CartPage};
pub use checkout::CheckoutPage;
pub use dashboard::{DashboardPage, DashboardStats};
pub use history::OrderHistoryPage;
pub use payment::{InstrumentSelection, PaymentPage};
pub use shop::ShopPage;

/// Where to go next, with whatever the next page needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Back to browsing.
    Shop,
    /// Sign in first.
    Login,
    /// Checkout with a frozen cart.
    Checkout(PricedSnapshot),
    /// Pay for an order.
    Payment(PaymentHandoff),
    /// The buyer's orders.
    OrderHistory,
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Notices raised by a page, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notices(Vec<Notice>);

impl Notices {
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.0.push(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    /// Take every pending notice.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&Notice> {
        self.0.last()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Asks the user to confirm a destructive action.
#[automock]
pub trait Prompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_notices() {
        let mut notices = Notices::default();

        notices.warning("Your cart is empty");
        notices.error("Could not update quantity");

        assert_eq!(notices.last().map(|notice| notice.level), Some(NoticeLevel::Error));

        let drained = notices.drain();

        assert_eq!(drained.len(), 2);
        assert!(notices.is_empty());
    }
}
