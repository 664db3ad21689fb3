//! Constants used throughout the CLI.

/// Environment variable that supplies a password without prompting.
pub const PASSWORD_ENV: &str = "ZENCRYPT_PASSWORD";

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const FAILURE: i32 = 1;

    /// Resource not found (user, key, input file).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong password, wrong file password).
    pub const AUTH_FAILED: i32 = 5;

    /// Token or ciphertext could not be decrypted.
    pub const DECRYPTION_FAILED: i32 = 6;

    /// `verify` found a digest mismatch.
    pub const HASH_MISMATCH: i32 = 7;
}
