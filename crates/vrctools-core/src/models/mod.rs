//! Data models for VRChat API entities.
//!
//! - `CurrentUser`: the authenticated account, plus the login responses
//!   (`AuthUserResponse`, `TwoFactorChallenge`, `TwoFactorMethod`)
//! - `Avatar`: an uploaded avatar, its `ReleaseStatus`, the printed
//!   `AvatarSummary` projection and the `AvatarQuery` search parameters

pub mod avatar;
pub mod user;

pub use avatar::{Avatar, AvatarQuery, AvatarSummary, ReleaseStatus};
pub use user::{AuthUserResponse, CurrentUser, TwoFactorChallenge, TwoFactorMethod, TwoFactorVerified};
