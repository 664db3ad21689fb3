//! Input handling helpers for passwords and text arguments.

use std::io::{self, IsTerminal, Read};

use dialoguer::Password;
use zencrypt_core::crypto::validate_password;
use zeroize::Zeroizing;

use crate::constants::PASSWORD_ENV;
use crate::errors::CliError;

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .map(Zeroizing::new)
}

/// Prompt for a password, or read it from ZENCRYPT_PASSWORD.
pub fn prompt_password(prompt: &str) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = password_from_env() {
        return Ok(value);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::auth_failed_with_hint(
            "No password provided and no TTY available.",
            format!("Hint: Set {}.", PASSWORD_ENV),
        )
        .into());
    }
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Prompt for a password twice, or read it from ZENCRYPT_PASSWORD.
pub fn prompt_password_confirmed(prompt: &str) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = password_from_env() {
        return Ok(value);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::invalid_input(format!(
            "No password provided and no TTY available. Set {}.",
            PASSWORD_ENV
        ))
        .into());
    }
    Password::new()
        .with_prompt(prompt)
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Prompt for a new account password that meets the minimum-length rule.
///
/// An unacceptable password from ZENCRYPT_PASSWORD is an error; an
/// unacceptable prompted password is asked for again.
pub fn prompt_new_password(prompt: &str) -> anyhow::Result<Zeroizing<String>> {
    let from_env = password_from_env().is_some();
    loop {
        let password = prompt_password_confirmed(prompt)?;
        match validate_password(&password) {
            Ok(()) => return Ok(password),
            Err(err) if from_env => return Err(CliError::invalid_input(err.to_string()).into()),
            Err(err) => eprintln!("{}", err),
        }
    }
}

/// Use the argument if given, otherwise read all of stdin.
///
/// A single trailing newline from stdin is dropped.
pub fn text_or_stdin(value: Option<String>, what: &str) -> anyhow::Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    if io::stdin().is_terminal() {
        return Err(CliError::invalid_input(format!(
            "No {} given. Pass it as an argument or pipe it on stdin.",
            what
        ))
        .into());
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    Ok(strip_trailing_newline(buffer))
}

fn strip_trailing_newline(mut value: String) -> String {
    if value.ends_with('\n') {
        value.pop();
        if value.ends_with('\r') {
            value.pop();
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_trailing_newline() {
        assert_eq!(strip_trailing_newline("abc\n".to_string()), "abc");
        assert_eq!(strip_trailing_newline("abc\r\n".to_string()), "abc");
        assert_eq!(strip_trailing_newline("abc\n\n".to_string()), "abc\n");
        assert_eq!(strip_trailing_newline("abc".to_string()), "abc");
    }

    #[test]
    fn test_argument_takes_precedence() {
        assert_eq!(
            text_or_stdin(Some("given".to_string()), "text").unwrap(),
            "given"
        );
    }
}
