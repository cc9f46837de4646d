//! chatgate-core
//!
//! Wire contract shared by the completion proxy and its clients: request and
//! reply types, the UI block protocol, and the pure functions that turn
//! untrusted JSON into those types. No I/O lives here.

pub mod envelope;
pub mod error;
pub mod limits;
pub mod models;
pub mod prompt;
pub mod sanitize;
