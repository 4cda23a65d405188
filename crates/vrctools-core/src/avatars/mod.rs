//! Avatar operations for the signed-in user.
//!
//! - `fetch_all_avatars`: offset pagination over the user's avatars
//! - `show_current` / `list_all`: read-only views
//! - `delete_interactive`: per-avatar confirm-and-delete loop
//!
//! All of them run against the `AvatarApi` trait so they can be driven by a
//! fake in tests, and write through a `Console` rather than straight to
//! stdio.

pub mod console;
pub mod delete;
pub mod list;
pub mod pagination;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Avatar, AvatarQuery};

pub use console::Console;
pub use delete::delete_interactive;
pub use list::{list_all, show_current};
pub use pagination::{fetch_all_avatars, PAGE_SIZE};

/// Remote avatar endpoints.
#[async_trait]
pub trait AvatarApi: Send + Sync {
    /// The avatar `user_id` currently has equipped
    async fn get_own_avatar(&self, user_id: &str) -> Result<Avatar>;

    /// One page of avatars matching `query`
    async fn search_avatars(&self, query: &AvatarQuery) -> Result<Vec<Avatar>>;

    async fn delete_avatar(&self, avatar_id: &str) -> Result<()>;
}
