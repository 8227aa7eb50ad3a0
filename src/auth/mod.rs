//! Credential cookies and claim decoding.

pub mod claims;
pub mod cookie;

pub use claims::{ClaimSet, DecodeError, Role};
pub use cookie::{ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME, clear_cookie, get_cookie};
