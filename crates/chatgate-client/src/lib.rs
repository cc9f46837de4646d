//! chatgate-client
//!
//! Caller-side completion: picks proxy, direct, or mock mode from settings
//! and turns whatever comes back into a sanitized [`StructuredReply`].
//!
//! [`StructuredReply`]: chatgate_core::models::reply::StructuredReply

pub mod error;
pub mod mock;
pub mod mode;
pub mod proxy;
pub mod service;
