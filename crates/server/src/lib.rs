pub mod compose;
pub mod errors;
pub mod extract;
pub mod process;
pub mod routes;
pub mod startup;

pub use compose::ServiceKind;
pub use startup::{Bootstrap, Phase};
