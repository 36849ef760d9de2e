//! Larder
//!
//! Cart pricing, coupon discounts, checkout snapshots and order state for the
//! Larder food-ordering client. Everything here is pure; I/O lives in
//! `larder-app`.

pub mod cart;
pub mod coupons;
pub mod discounts;
pub mod ids;
pub mod lines;
pub mod money;
pub mod orders;
pub mod payments;
pub mod prelude;
pub mod pricing;
pub mod snapshot;
