//! Shared fixtures for page and notification tests.

pub(crate) mod helpers;
