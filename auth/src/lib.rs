//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure:
//! - Password hashing (Argon2id) with a fixed work factor
//! - Signed, time-bounded identity tokens (HS256 JWT)
//! - Authentication coordination
//!
//! Services define their own access rules and adapt these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use std::time::Duration;
//! use auth::TokenAuthority;
//!
//! let authority =
//!     TokenAuthority::new(b"secret_key_at_least_32_bytes_long!", Duration::from_secs(3600));
//! let issued = authority.issue("507f1f77bcf86cd799439011", "a@b.com").unwrap();
//! let claims = authority.verify(&issued.token).unwrap();
//! assert_eq!(claims.subject(), "507f1f77bcf86cd799439011");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use std::time::Duration;
//! use auth::{Authenticator, PasswordHasher, TokenAuthority};
//!
//! let auth = Authenticator::new(
//!     PasswordHasher::new(),
//!     TokenAuthority::new(b"secret_key_at_least_32_bytes_long!", Duration::from_secs(3600)),
//! );
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("password123", &hash, "user123", "a@b.com").unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.subject(), "user123");
//! ```

pub mod authenticator;
pub mod clock;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenAuthority;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
