//! Session bootstrap: open the token store, build the client, sign in, and
//! turn failures into the messages the user sees.

use std::io::Write;

use anyhow::Result;
use tracing::{debug, info};
use vrctools_core::api::{ApiError, VrcClient};
use vrctools_core::auth::{CredentialError, Session, TerminalPrompt, TokenStore};
use vrctools_core::config::Config;

/// Process exit status for every reported failure
pub const FAILURE_STATUS: u8 = 1;

/// Build the client with the interactive prompt as its credential supplier
pub fn connect(config: &Config) -> Result<VrcClient> {
    let store = TokenStore::open(&config.data_file)?;
    VrcClient::new(config, store, Box::new(TerminalPrompt::new()))
}

/// Restore or establish the session and fetch the signed-in identity
pub async fn sign_in(client: &mut VrcClient) -> Result<Session> {
    let user = client.get_current_user().await?;
    info!(user_id = %user.id, "Signed in");
    Ok(Session::new(user))
}

/// Where in the run a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authentication,
    Command,
}

impl Stage {
    fn prefix(&self) -> &'static str {
        match self {
            Stage::Authentication => "Authentication failed",
            Stage::Command => "Command failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    MissingCredentials(String),
    InvalidCredentials,
    TwoFactorRequired,
    Unreachable,
    Other(String),
}

impl Failure {
    /// Classify an error. Checks run in priority order and the first match wins.
    pub fn classify(err: &anyhow::Error) -> Self {
        let message = format!("{:#}", err);

        if let Some(e) = err.downcast_ref::<CredentialError>() {
            if matches!(e, CredentialError::MissingUsername | CredentialError::MissingPassword) {
                return Failure::MissingCredentials(e.to_string());
            }
        }
        if message.contains("Username is required") || message.contains("Password is required") {
            return Failure::MissingCredentials(message);
        }

        let api_error = err.chain().find_map(|cause| cause.downcast_ref::<ApiError>());
        let status = api_error.and_then(ApiError::status_code);

        if status == Some(401) || message.contains("Invalid credentials") {
            return Failure::InvalidCredentials;
        }
        if status == Some(403) {
            return Failure::TwoFactorRequired;
        }
        if api_error.is_some_and(ApiError::is_connectivity)
            || message.contains("ENOTFOUND")
            || message.contains("network")
        {
            return Failure::Unreachable;
        }

        Failure::Other(message)
    }

    /// Lines to print, the first one carrying the stage prefix
    pub fn lines(&self, stage: Stage) -> Vec<String> {
        let prefix = stage.prefix();
        match (self, stage) {
            (Failure::MissingCredentials(message), _) | (Failure::Other(message), _) => {
                vec![format!("{}: {}", prefix, message)]
            }
            (Failure::InvalidCredentials, Stage::Authentication) => vec![
                format!("{}: Invalid username or password", prefix),
                "Please check your credentials and try again.".to_string(),
            ],
            (Failure::InvalidCredentials, Stage::Command) => vec![
                format!("{}: Session is no longer valid", prefix),
                "Run the command again to log in.".to_string(),
            ],
            (Failure::TwoFactorRequired, Stage::Authentication) => vec![
                format!("{}: Two-factor authentication required", prefix),
                "Please provide a valid 2FA code.".to_string(),
            ],
            (Failure::TwoFactorRequired, Stage::Command) => vec![
                format!("{}: Access denied", prefix),
            ],
            (Failure::Unreachable, _) => vec![
                format!("{}: Unable to connect to VRChat servers", prefix),
                "Please check your internet connection and try again.".to_string(),
            ],
        }
    }
}

/// Write the classified failure and return the exit status to use
pub fn write_failure<W: Write>(out: &mut W, err: &anyhow::Error, stage: Stage) -> u8 {
    debug!(error = ?err, ?stage, "Reporting failure");
    let failure = Failure::classify(err);

    let mut lines = failure.lines(stage).into_iter();
    if let Some(first) = lines.next() {
        let _ = writeln!(out, "\n❌ {}", first);
    }
    for line in lines {
        let _ = writeln!(out, "{}", line);
    }
    FAILURE_STATUS
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn classify(err: impl Into<anyhow::Error>) -> Failure {
        Failure::classify(&err.into())
    }

    #[test]
    fn test_missing_credentials_first() {
        assert_eq!(
            classify(CredentialError::MissingUsername),
            Failure::MissingCredentials("Username is required and cannot be empty".to_string())
        );
        assert_eq!(
            classify(CredentialError::MissingPassword),
            Failure::MissingCredentials("Password is required and cannot be empty".to_string())
        );
    }

    #[test]
    fn test_unauthorized_is_invalid_credentials() {
        let err = anyhow::Error::from(ApiError::Unauthorized("Invalid Username/Email or Password".to_string()))
            .context("Failed to fetch current user");
        assert_eq!(Failure::classify(&err), Failure::InvalidCredentials);
    }

    #[test]
    fn test_invalid_credentials_message() {
        assert_eq!(
            classify(anyhow::anyhow!("Invalid credentials supplied")),
            Failure::InvalidCredentials
        );
    }

    #[test]
    fn test_forbidden_is_two_factor() {
        assert_eq!(classify(ApiError::TwoFactorRequired), Failure::TwoFactorRequired);
        assert_eq!(
            classify(ApiError::AccessDenied("nope".to_string())),
            Failure::TwoFactorRequired
        );
    }

    #[test]
    fn test_enotfound_is_unreachable() {
        let err: Result<()> = Err(anyhow::anyhow!("getaddrinfo ENOTFOUND api.vrchat.cloud"))
            .context("Failed to send authentication request");
        assert_eq!(Failure::classify(&err.unwrap_err()), Failure::Unreachable);
    }

    #[test]
    fn test_other_keeps_message() {
        assert_eq!(
            classify(ApiError::ServerError("maintenance".to_string())),
            Failure::Other("Server error: maintenance".to_string())
        );
    }

    #[test]
    fn test_write_failure_exits_with_status_one() {
        let cases: Vec<(anyhow::Error, &str)> = vec![
            (ApiError::Unauthorized(String::new()).into(), "Invalid username or password"),
            (ApiError::TwoFactorRequired.into(), "Two-factor authentication required"),
            (anyhow::anyhow!("connect ENOTFOUND"), "Unable to connect to VRChat servers"),
            (CredentialError::MissingUsername.into(), "Username is required"),
            (anyhow::anyhow!("something odd"), "something odd"),
        ];

        for (err, expected) in cases {
            let mut out = Vec::new();
            let status = write_failure(&mut out, &err, Stage::Authentication);
            let text = String::from_utf8(out).expect("utf8");

            assert_eq!(status, 1);
            assert!(text.starts_with("\n❌ Authentication failed: "), "{}", text);
            assert!(text.contains(expected), "{}", text);
        }
    }

    #[test]
    fn test_command_stage_wording() {
        let lines = Failure::InvalidCredentials.lines(Stage::Command);
        assert_eq!(lines[0], "Command failed: Session is no longer valid");
    }
}
