//! Backend API
//!
//! One trait per backend concern, each implemented by [`HttpApi`] and mocked
//! in page tests.

mod accounts;
mod carts;
mod catalog;
mod client;
mod coupons;
mod errors;
pub mod models;
mod orders;
mod payments;

pub use accounts::*;
pub use carts::*;
pub use catalog::*;
pub use client::HttpApi;
pub use coupons::*;
pub use errors::ApiError;
pub use orders::*;
pub use payments::*;
