use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::{fetch_all_avatars, AvatarApi, Console, PAGE_SIZE};

const ACTION_PROMPT: &str = "\nAction (D to delete, Enter to skip): ";

/// Walk through every avatar and delete the ones the user answers "D" for.
///
/// A failed delete is reported and the loop moves on. Once input runs out
/// the remaining avatars are skipped. Returns the number deleted.
pub async fn delete_interactive<A, R, W, E>(api: &A, console: &mut Console<R, W, E>) -> Result<usize>
where
    A: AvatarApi + ?Sized,
    R: BufRead,
    W: Write,
    E: Write,
{
    writeln!(console.out, "Getting all avatars...")?;
    let avatars = fetch_all_avatars(api, PAGE_SIZE)
        .await
        .context("Failed to fetch avatars")?;

    let total = avatars.len();
    writeln!(console.out, "Found {} avatars.", total)?;
    writeln!(console.out, "Press \"D\" to delete, or Enter to skip.\n")?;

    let mut deleted_count = 0;

    for (i, avatar) in avatars.iter().enumerate() {
        writeln!(console.out, "\n[{}/{}]", i + 1, total)?;
        writeln!(console.out, "ID: {}", avatar.id)?;
        writeln!(console.out, "Name: {}", avatar.name)?;
        writeln!(console.out, "Author: {}", avatar.author_name)?;
        writeln!(console.out, "Version: {}", avatar.version)?;
        writeln!(console.out, "Release Status: {}", avatar.release_status)?;

        let answer = console.ask(ACTION_PROMPT)?.unwrap_or_default();
        if !answer.trim().eq_ignore_ascii_case("d") {
            writeln!(console.out, "Skipped")?;
            continue;
        }

        writeln!(console.out, "Deleting avatar...")?;
        match api.delete_avatar(&avatar.id).await {
            Ok(()) => {
                info!(avatar_id = %avatar.id, "Avatar deleted");
                writeln!(console.out, "✓ Avatar deleted successfully")?;
                deleted_count += 1;
            }
            Err(e) => {
                warn!(avatar_id = %avatar.id, error = %e, "Failed to delete avatar");
                writeln!(console.err, "✗ Failed to delete avatar: {:#}", e)?;
            }
        }
    }

    writeln!(console.out, "\nDeletion complete. Deleted {} avatar(s).", deleted_count)?;
    Ok(deleted_count)
}
