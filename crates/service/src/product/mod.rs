pub mod domain;
pub mod handlers;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::ProductService;
