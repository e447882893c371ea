//! Identity resolution. Tokens are issued by the auth provider; this side only verifies them.

pub mod claims;
pub mod services;
