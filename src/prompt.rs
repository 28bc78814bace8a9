use std::io::{self, Write};

/// Confirmation gate for destructive actions.
///
/// CLI implements with an interactive stdin prompt; `--yes` and tests use
/// the non-interactive implementations.
pub trait ConfirmAction {
    fn confirm(&self, prompt: &str) -> io::Result<bool>;
}

/// Interactive y/n prompt on stdin, with an optional default for empty input.
pub struct StdinConfirm {
    pub default: Option<bool>,
}

impl ConfirmAction for StdinConfirm {
    fn confirm(&self, prompt: &str) -> io::Result<bool> {
        prompt_confirm(prompt, self.default)
    }
}

/// Answers yes without prompting (`--yes`).
pub struct AlwaysConfirm;

impl ConfirmAction for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> io::Result<bool> {
        Ok(true)
    }
}

/// Answers no without prompting.
pub struct NeverConfirm;

impl ConfirmAction for NeverConfirm {
    fn confirm(&self, _prompt: &str) -> io::Result<bool> {
        Ok(false)
    }
}

pub fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        io::stdin().read_line(&mut input)?;

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
