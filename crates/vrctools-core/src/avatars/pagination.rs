use anyhow::Result;
use tracing::debug;

use crate::models::{Avatar, AvatarQuery};

use super::AvatarApi;

/// Avatars requested per page
pub const PAGE_SIZE: usize = 100;

/// Fetch every avatar the signed-in user owns, public and private, in the
/// order the pages come back.
///
/// Stops on an empty page or on a page shorter than `page_size`. Any failed
/// request aborts the whole fetch.
pub async fn fetch_all_avatars<A: AvatarApi + ?Sized>(api: &A, page_size: usize) -> Result<Vec<Avatar>> {
    let mut all_avatars = Vec::new();
    let mut offset = 0;

    loop {
        let page = api.search_avatars(&AvatarQuery::own(page_size, offset)).await?;
        debug!(offset, count = page.len(), "Fetched avatar page");

        if page.is_empty() {
            break;
        }

        let last_page = page.len() < page_size;
        all_avatars.extend(page);
        if last_page {
            break;
        }

        offset += page_size;
    }

    Ok(all_avatars)
}
