//! Common type definitions

pub mod language;
pub mod response;

pub use language::Language;
pub use response::{ErrorResponse, MessageResponse};
