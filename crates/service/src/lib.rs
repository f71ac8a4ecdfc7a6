//! Backend domain services.
//! - `user` and `product` each carry domain types, a repository trait with
//!   sea-orm and in-memory implementations, the service, and RPC handlers.
//! - `credentials` holds the deterministic credential hasher.
//! - `test_support` (feature `test-support`) has fixtures for tests.

pub mod credentials;
pub mod errors;
pub mod product;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod user;
