//! Relational entities owned by the backend services, plus connection and
//! schema helpers. Each entity module exposes the sea-orm definitions and
//! the small set of persistence functions its repository delegates to.

pub mod db;
pub mod errors;
pub mod product;
pub mod user;
