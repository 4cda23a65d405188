//! Argument parsing and command dispatch.
//!
//! The argument list is flat: the first word picks the command, the second
//! its action. Anything unrecognised is not an error; the run simply ends
//! after sign-in.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::debug;
use vrctools_core::auth::Session;
use vrctools_core::avatars::{self, AvatarApi, Console};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarAction {
    /// Show the equipped avatar
    Current,
    /// Step through all avatars asking which to delete
    Delete,
    /// List all avatars (default)
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Avatars(AvatarAction),
}

impl Command {
    /// Parse arguments with the program name already stripped
    pub fn parse(args: &[String]) -> Option<Self> {
        match args.first().map(String::as_str) {
            Some("avatars") => {
                let action = match args.get(1).map(String::as_str) {
                    Some("current") => AvatarAction::Current,
                    Some("delete") => AvatarAction::Delete,
                    _ => AvatarAction::List,
                };
                Some(Command::Avatars(action))
            }
            _ => None,
        }
    }
}

pub async fn dispatch<A, R, W, E>(
    command: Option<Command>,
    api: &A,
    session: &Session,
    console: &mut Console<R, W, E>,
) -> Result<()>
where
    A: AvatarApi + ?Sized,
    R: BufRead,
    W: Write,
    E: Write,
{
    let Some(command) = command else {
        debug!("No command given");
        return Ok(());
    };
    debug!(?command, "Dispatching");

    match command {
        Command::Avatars(AvatarAction::Current) => avatars::show_current(api, session, console).await,
        Command::Avatars(AvatarAction::Delete) => avatars::delete_interactive(api, console).await.map(|_| ()),
        Command::Avatars(AvatarAction::List) => avatars::list_all(api, console).await.map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use vrctools_core::models::{Avatar, AvatarQuery, CurrentUser, ReleaseStatus};

    use super::*;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn avatar(id: &str) -> Avatar {
        Avatar {
            id: id.to_string(),
            name: id.to_uppercase(),
            author_name: "tupper".to_string(),
            author_id: None,
            thumbnail_image_url: String::new(),
            version: 2,
            release_status: ReleaseStatus::Public,
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn session() -> Session {
        Session::new(CurrentUser {
            id: "usr_1".to_string(),
            display_name: "Tupper".to_string(),
            username: Some("tupper".to_string()),
            current_avatar: Some("avtr_a".to_string()),
        })
    }

    /// Records every call made through the API
    #[derive(Default)]
    struct RecordingApi {
        avatars: Vec<Avatar>,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingApi {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AvatarApi for RecordingApi {
        async fn get_own_avatar(&self, user_id: &str) -> Result<Avatar> {
            self.calls.lock().unwrap().push(format!("own:{}", user_id));
            Ok(avatar("avtr_a"))
        }

        async fn search_avatars(&self, query: &AvatarQuery) -> Result<Vec<Avatar>> {
            self.calls.lock().unwrap().push(format!("search:{}", query.offset));
            let page = self.avatars.iter().skip(query.offset).take(query.n).cloned().collect();
            Ok(page)
        }

        async fn delete_avatar(&self, avatar_id: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("delete:{}", avatar_id));
            Ok(())
        }
    }

    fn console(input: &str) -> Console<&[u8], Vec<u8>, Vec<u8>> {
        Console::new(input.as_bytes(), Vec::new(), Vec::new())
    }

    #[test]
    fn test_parse_avatar_actions() {
        assert_eq!(
            Command::parse(&args(&["avatars", "current"])),
            Some(Command::Avatars(AvatarAction::Current))
        );
        assert_eq!(
            Command::parse(&args(&["avatars", "delete"])),
            Some(Command::Avatars(AvatarAction::Delete))
        );
        assert_eq!(
            Command::parse(&args(&["avatars"])),
            Some(Command::Avatars(AvatarAction::List))
        );
        assert_eq!(
            Command::parse(&args(&["avatars", "bogus"])),
            Some(Command::Avatars(AvatarAction::List))
        );
    }

    #[test]
    fn test_parse_unknown_or_missing_command() {
        assert_eq!(Command::parse(&args(&[])), None);
        assert_eq!(Command::parse(&args(&["foo"])), None);
        assert_eq!(Command::parse(&args(&["AVATARS"])), None);
    }

    #[tokio::test]
    async fn test_unknown_command_has_no_side_effects() {
        let api = RecordingApi {
            avatars: vec![avatar("a")],
            ..Default::default()
        };
        let mut console = console("d\n");

        dispatch(Command::parse(&args(&["foo"])), &api, &session(), &mut console)
            .await
            .expect("dispatch");

        assert!(api.calls().is_empty());
        assert!(console.out.is_empty());
    }

    #[tokio::test]
    async fn test_current_uses_session_user() {
        let api = RecordingApi::default();
        let mut console = console("");

        dispatch(
            Some(Command::Avatars(AvatarAction::Current)),
            &api,
            &session(),
            &mut console,
        )
        .await
        .expect("dispatch");

        assert_eq!(api.calls(), vec!["own:usr_1".to_string()]);
    }

    #[tokio::test]
    async fn test_list_never_deletes() {
        let api = RecordingApi {
            avatars: vec![avatar("a"), avatar("b")],
            ..Default::default()
        };
        let mut console = console("d\nd\n");

        dispatch(Some(Command::Avatars(AvatarAction::List)), &api, &session(), &mut console)
            .await
            .expect("dispatch");

        assert_eq!(api.calls(), vec!["search:0".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_dispatch() {
        let api = RecordingApi {
            avatars: vec![avatar("a"), avatar("b")],
            ..Default::default()
        };
        let mut console = console("\nD\n");

        dispatch(Some(Command::Avatars(AvatarAction::Delete)), &api, &session(), &mut console)
            .await
            .expect("dispatch");

        assert_eq!(
            api.calls(),
            vec!["search:0".to_string(), "delete:b".to_string()]
        );
    }
}
