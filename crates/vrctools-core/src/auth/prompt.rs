//! Interactive credential prompt on the controlling terminal.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::debug;

use super::credentials::{prompt_credentials, CredentialError, CredentialSupplier, Credentials, LinePrompt};

/// Exit status used when the user presses Ctrl+C during masked entry
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Prompts on stdin/stdout. The password is read with echo disabled.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }
}

/// Keeps the terminal in raw mode for its lifetime
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            debug!(error = %e, "Failed to restore terminal mode");
        }
    }
}

/// What a single keystroke does to the secret being typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Submit,
    Interrupt,
}

/// Ctrl held on its own. Windows reports AltGr as Ctrl+Alt, and those
/// keystrokes still produce printable characters.
fn is_control_chord(modifiers: KeyModifiers) -> bool {
    modifiers.contains(KeyModifiers::CONTROL) && !modifiers.contains(KeyModifiers::ALT)
}

fn apply_key(secret: &mut String, key: KeyEvent) -> KeyOutcome {
    if key.kind == KeyEventKind::Release {
        return KeyOutcome::Continue;
    }

    match key.code {
        KeyCode::Char('c') if is_control_chord(key.modifiers) => return KeyOutcome::Interrupt,
        KeyCode::Enter => return KeyOutcome::Submit,
        KeyCode::Backspace => {
            secret.pop();
        }
        KeyCode::Char(c) if !is_control_chord(key.modifiers) => secret.push(c),
        _ => {}
    }
    KeyOutcome::Continue
}

/// Read keystrokes until Enter. Returns `None` if the user pressed Ctrl+C.
fn read_secret_keys() -> io::Result<Option<String>> {
    let _raw = RawModeGuard::enable()?;
    let mut secret = String::new();

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match apply_key(&mut secret, key) {
            KeyOutcome::Continue => {}
            KeyOutcome::Submit => return Ok(Some(secret)),
            KeyOutcome::Interrupt => return Ok(None),
        }
    }
}

impl LinePrompt for TerminalPrompt {
    fn say(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        writeln!(stdout, "{}", text)?;
        stdout.flush()
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }

    fn read_masked(&mut self, prompt: &str) -> io::Result<String> {
        // Piped input has no echo to hide
        if !io::stdin().is_terminal() {
            return self.read_line(prompt);
        }

        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let secret = read_secret_keys()?;
        writeln!(stdout)?;

        match secret {
            Some(secret) => Ok(secret),
            None => {
                debug!("Password entry interrupted");
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        }
    }
}

impl CredentialSupplier for TerminalPrompt {
    fn credentials(&mut self) -> Result<Credentials, CredentialError> {
        prompt_credentials(self)
    }
}
