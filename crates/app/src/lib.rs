//! Larder client: backend API access, sessions and the page controllers that
//! drive cart, checkout, payment and order management.

pub mod api;
pub mod config;
pub mod context;
pub mod notifications;
pub mod observability;
pub mod pages;
pub mod session;

#[cfg(test)]
mod test;
