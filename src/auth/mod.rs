//! Authentication module for the user list server
//!
//! Registration and login live in [`CredentialService`]; bearer tokens are
//! signed by [`TokenManager`] and checked on protected routes by the
//! [`Identity`] extractor.

pub mod handlers;
pub mod identity;
mod service;
pub mod token;

pub use identity::{Identity, IdentityGate};
pub use service::{CredentialService, Credentials, LoginOutcome, Registration};
pub use token::{Claims, TokenConfig, TokenManager};
