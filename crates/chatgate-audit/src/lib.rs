//! chatgate-audit
//!
//! Request governance for the completion proxy: structured audit events,
//! redaction of user text, and the per-caller rate limiter.

pub mod events;
pub mod rate_limit;
pub mod redact;
