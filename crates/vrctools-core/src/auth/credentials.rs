use std::io;

use thiserror::Error;

/// Line shown before the first credential prompt
const AUTH_BANNER: &str = "We need to authenticate with VRChat.";

const USERNAME_PROMPT: &str = "Username: ";
const PASSWORD_PROMPT: &str = "Password: ";
const TWO_FACTOR_PROMPT: &str = "2FA Code (leave blank if not applicable): ";

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Username is required and cannot be empty")]
    MissingUsername,

    #[error("Password is required and cannot be empty")]
    MissingPassword,

    #[error("Failed to read from terminal: {0}")]
    Terminal(#[from] io::Error),
}

/// Login details collected once per run and dropped after the login call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// Empty when the account has no second factor
    pub two_factor_code: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("two_factor_code", &"<redacted>")
            .finish()
    }
}

/// Source of credentials, asked only when no cached session is valid.
pub trait CredentialSupplier: Send + Sync {
    fn credentials(&mut self) -> Result<Credentials, CredentialError>;
}

/// Terminal operations the credential prompt needs.
pub trait LinePrompt {
    /// Print a line of text
    fn say(&mut self, text: &str) -> io::Result<()>;

    /// Show `prompt` and read one line of input
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Show `prompt` and read one line without echoing it
    fn read_masked(&mut self, prompt: &str) -> io::Result<String>;
}

/// Ask for username, password and optional two-factor code.
///
/// Fails on an empty username before the password is asked for, and on an
/// empty password before the two-factor code is asked for. All returned
/// fields are trimmed.
pub fn prompt_credentials<P: LinePrompt + ?Sized>(prompt: &mut P) -> Result<Credentials, CredentialError> {
    prompt.say(AUTH_BANNER)?;

    let username = prompt.read_line(USERNAME_PROMPT)?;
    let username = username.trim();
    if username.is_empty() {
        return Err(CredentialError::MissingUsername);
    }

    let password = prompt.read_masked(PASSWORD_PROMPT)?;
    let password = password.trim();
    if password.is_empty() {
        return Err(CredentialError::MissingPassword);
    }

    let two_factor_code = prompt.read_line(TWO_FACTOR_PROMPT)?;

    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
        two_factor_code: two_factor_code.trim().to_string(),
    })
}
