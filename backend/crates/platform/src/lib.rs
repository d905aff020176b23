//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, Base64 variants)
//! - Password hashing (Argon2id)
//! - Bearer token signing (HS256)
//! - Client address resolution
//! - Rate limiting infrastructure and its axum middleware

pub mod client;
pub mod crypto;
pub mod password;
pub mod rate_limit;
pub mod token;
