//! Bearer token handling.
//!
//! Identity is issued by an external provider; this service only verifies
//! tokens and resolves the caller's profile.

pub mod jwt;
