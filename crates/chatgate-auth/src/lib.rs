//! chatgate-auth
//!
//! Turns a bearer token into a caller identity. The proxy only needs to know
//! that a caller is authenticated and what its stable id is.

pub mod error;
pub mod jwt;
pub mod provider;
pub mod remote;
