//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes. Core errors that reach `main`
//! untyped are classified by [`exit_code_for`].

use std::fmt;

use zencrypt_core::ZencryptError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (user, key, file)
    NotFound { message: String, hint: String },

    /// Authentication failed (wrong password)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// Token or ciphertext rejected
    DecryptionFailed { message: String, hint: String },

    /// `verify` found a mismatch
    HashMismatch,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } | CliError::DecryptionFailed { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::HashMismatch => write!(f, "Digest does not match"),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and optional hint.
    pub fn auth_failed(message: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: None,
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Create a DecryptionFailed error with message and hint.
    pub fn decryption_failed(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::DecryptionFailed {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::DecryptionFailed { .. } => exit_codes::DECRYPTION_FAILED,
            CliError::HashMismatch => exit_codes::HASH_MISMATCH,
        }
    }
}

/// Turn a core error into a user-facing CLI error where one fits.
pub fn from_core(err: ZencryptError) -> anyhow::Error {
    let cli_error = match &err {
        ZencryptError::InvalidToken => CliError::decryption_failed(
            "Invalid token: it was modified, has expired, or was made with a different key.",
            "Hint: Check that --keyfile or --user points at the key used to encrypt.",
        ),
        ZencryptError::AuthenticationFailed => CliError::auth_failed_with_hint(
            "Authentication failed: wrong password or corrupted file.",
            "Hint: Use the password given when the file was encrypted.",
        ),
        ZencryptError::DecryptionFailed => CliError::decryption_failed(
            "Decryption failed: wrong private key or malformed ciphertext.",
            "Hint: Decrypt with the private key matching the public key used to encrypt.",
        ),
        ZencryptError::InvalidCredentials => CliError::auth_failed("Invalid username or password."),
        ZencryptError::UserNotFound(name) => CliError::not_found(
            format!("User not found: {}", name),
            "Hint: Run `zencrypt user register <NAME>` first.",
        ),
        ZencryptError::NoActiveKey(kind) => CliError::not_found(
            format!("No active {} key for this user.", kind),
            if *kind == "PGP" {
                "Hint: Run `zencrypt --user <NAME> pgp generate`."
            } else {
                "Hint: Run `zencrypt --user <NAME> key rotate`."
            },
        ),
        ZencryptError::MessageTooLong { .. }
        | ZencryptError::InvalidInput(_)
        | ZencryptError::InvalidKey(_)
        | ZencryptError::UserExists(_) => CliError::invalid_input(err.to_string()),
        ZencryptError::Io { source } if source.kind() == std::io::ErrorKind::NotFound => {
            CliError::not_found(err.to_string(), "Hint: Check the path and try again.")
        }
        _ => return err.into(),
    };
    cli_error.into()
}

/// Exit code for an error that reached `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_error) = err.downcast_ref::<CliError>() {
        return cli_error.exit_code();
    }
    exit_codes::FAILURE
}
