//! chatgate-upstream
//!
//! The single outbound call to the text-completion provider: request body
//! construction, a timeout-bounded POST, and classification of every way the
//! call can end.

pub mod client;
pub mod error;
pub mod request;
