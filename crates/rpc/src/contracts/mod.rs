//! Per-domain procedure contracts and typed client stubs.

pub mod product;
pub mod user;
