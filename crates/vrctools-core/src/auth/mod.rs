//! Authentication module for credentials and persisted sessions.
//!
//! This module provides:
//! - `Credentials` and the `CredentialSupplier` seam the client calls when
//!   it has no usable cached session
//! - `TerminalPrompt`: the interactive supplier, with masked password entry
//! - `TokenStore`: file-backed key-value cache for session cookies
//! - `Session`: the signed-in identity for the rest of the run

pub mod credentials;
pub mod prompt;
pub mod session;
pub mod store;

pub use credentials::{prompt_credentials, CredentialError, CredentialSupplier, Credentials, LinePrompt};
pub use prompt::TerminalPrompt;
pub use session::Session;
pub use store::TokenStore;
