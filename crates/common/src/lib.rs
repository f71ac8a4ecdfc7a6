//! Pieces shared by every edge and backend process: logging setup and the
//! JSON error body returned by all HTTP surfaces.

pub mod types;
pub mod utils;
