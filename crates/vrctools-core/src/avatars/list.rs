use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::auth::Session;
use crate::models::Avatar;

use super::{fetch_all_avatars, AvatarApi, Console, PAGE_SIZE};

fn print_summary<W: Write>(out: &mut W, avatar: &Avatar) -> Result<()> {
    let rendered = serde_json::to_string_pretty(&avatar.summary())
        .context("Failed to render avatar")?;
    writeln!(out, "{}", rendered)?;
    Ok(())
}

/// Print the avatar the signed-in user is wearing
pub async fn show_current<A, R, W, E>(api: &A, session: &Session, console: &mut Console<R, W, E>) -> Result<()>
where
    A: AvatarApi + ?Sized,
    R: BufRead,
    W: Write,
    E: Write,
{
    writeln!(console.out, "Getting current avatar...")?;
    let avatar = api
        .get_own_avatar(session.user_id())
        .await
        .context("Failed to fetch current avatar")?;
    print_summary(&mut console.out, &avatar)
}

/// Print every avatar the signed-in user owns, returning how many there were
pub async fn list_all<A, R, W, E>(api: &A, console: &mut Console<R, W, E>) -> Result<usize>
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

    writeln!(console.out, "Found {} avatars.", avatars.len())?;
    for avatar in &avatars {
        print_summary(&mut console.out, avatar)?;
    }
    Ok(avatars.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatars::testing::{avatar, FakeApi};
    use crate::models::CurrentUser;

    fn session() -> Session {
        Session::new(CurrentUser {
            id: "usr_1".to_string(),
            display_name: "Tupper".to_string(),
            username: None,
            current_avatar: None,
        })
    }

    fn console() -> Console<&'static [u8], Vec<u8>, Vec<u8>> {
        Console::new(&b""[..], Vec::new(), Vec::new())
    }

    #[tokio::test]
    async fn test_show_current_prints_summary() {
        let api = FakeApi {
            current: Some(avatar("avtr_current")),
            ..Default::default()
        };
        let mut console = console();

        show_current(&api, &session(), &mut console).await.expect("show");
        let out = String::from_utf8(console.out).expect("utf8");
        assert!(out.starts_with("Getting current avatar...\n"));
        assert!(out.contains(r#""id": "avtr_current""#));
        assert!(out.contains(r#""thumbnailImageUrl": "https://img.example/avtr_current""#));
        assert!(!out.contains("releaseStatus"));
        assert!(api.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_prints_every_avatar() {
        let api = FakeApi::with_pages(vec![vec![avatar("a"), avatar("b")]]);
        let mut console = console();

        let count = list_all(&api, &mut console).await.expect("list");
        let out = String::from_utf8(console.out).expect("utf8");

        assert_eq!(count, 2);
        assert!(out.contains("Found 2 avatars."));
        assert!(out.contains(r#""id": "a""#));
        assert!(out.contains(r#""id": "b""#));
        assert!(api.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_show_current_failure_propagates() {
        let api = FakeApi::default();
        let mut console = console();

        let err = show_current(&api, &session(), &mut console).await.unwrap_err();
        assert!(err.to_string().contains("Failed to fetch current avatar"));
    }
}
