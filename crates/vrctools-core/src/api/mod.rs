//! REST API client module for the VRChat web API.
//!
//! This module provides the `VrcClient` for signing in and managing the
//! signed-in user's avatars.
//!
//! The API authenticates with an `auth` session cookie, obtained by sending
//! HTTP Basic credentials to `/auth/user` and, for accounts with two-factor
//! enabled, a `twoFactorAuth` cookie from the verify endpoint. Both cookies
//! are kept in the `TokenStore` so later runs skip the prompt.

pub mod client;
pub mod error;

pub use client::VrcClient;
pub use error::ApiError;
