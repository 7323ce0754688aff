//! Identity verifier implementations.

pub mod jwt;

pub use jwt::{JwtIdentityVerifier, default_token_ttl};
