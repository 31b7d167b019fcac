//! Authentication primitives.
//!
//! - [`jwt`]: JWT access-token generation and validation. Tokens are issued
//!   by the account service; this server only verifies them.

pub mod jwt;
