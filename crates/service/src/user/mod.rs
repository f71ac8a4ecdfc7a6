//! User backend: domain types, repository, service and RPC bindings.

pub mod domain;
pub mod repo;
pub mod repository;
pub mod handlers;
pub mod service;

pub use service::UserService;
