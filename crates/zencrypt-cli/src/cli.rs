use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use clap_complete::Shell;

use zencrypt_core::VERSION;

/// Zencrypt - hashing, symmetric encryption, file encryption and RSA messaging
#[derive(Parser)]
#[command(name = "zencrypt")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = "ZENCRYPT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to the symmetric key file
    #[arg(long, global = true, env = "ZENCRYPT_KEYFILE", value_name = "PATH")]
    pub keyfile: Option<PathBuf>,

    /// Path to the user store database
    #[arg(long, global = true, env = "ZENCRYPT_STORE", value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Act as this store user (per-user keys and history)
    #[arg(short, long, global = true, env = "ZENCRYPT_USER", value_name = "NAME")]
    pub user: Option<String>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the SHA-256 digest of text and an optional salt
    Hash(HashArgs),

    /// Check text against an expected digest
    Verify(VerifyArgs),

    /// Encrypt text into a Fernet token
    Encrypt(EncryptArgs),

    /// Decrypt a Fernet token
    Decrypt(DecryptArgs),

    /// Password-based file encryption
    File(FileArgs),

    /// RSA public-key messaging
    Pgp(PgpArgs),

    /// Manage store users
    User(UserArgs),

    /// Manage symmetric keys
    Key(KeyArgs),

    /// Show the user's hash or encryption history
    History(HistoryArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `hash` command
#[derive(Args)]
pub struct HashArgs {
    /// Text to hash
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Salt appended to the text before hashing
    #[arg(long, default_value = "")]
    pub salt: String,
}

/// Arguments for the `verify` command
#[derive(Args)]
pub struct VerifyArgs {
    /// Text to check
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Expected hex digest
    #[arg(value_name = "DIGEST")]
    pub digest: String,

    /// Salt used when the digest was made
    #[arg(long, default_value = "")]
    pub salt: String,
}

/// Arguments for the `encrypt` command
#[derive(Args)]
pub struct EncryptArgs {
    /// Text to encrypt (reads stdin if omitted)
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,
}

/// Arguments for the `decrypt` command
#[derive(Args)]
pub struct DecryptArgs {
    /// Token to decrypt (reads stdin if omitted)
    #[arg(value_name = "TOKEN")]
    pub token: Option<String>,

    /// Reject tokens older than this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub ttl: Option<u64>,
}

/// Arguments for the `file` command group
#[derive(Args)]
pub struct FileArgs {
    #[command(subcommand)]
    pub command: FileSubcommand,
}

#[derive(Subcommand)]
pub enum FileSubcommand {
    /// Encrypt a file with a password
    Encrypt(FileIoArgs),

    /// Decrypt a file with a password
    Decrypt(FileIoArgs),
}

#[derive(Args)]
pub struct FileIoArgs {
    /// Input file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (written atomically)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

/// Arguments for the `pgp` command group
#[derive(Args)]
pub struct PgpArgs {
    #[command(subcommand)]
    pub command: PgpSubcommand,
}

#[derive(Subcommand)]
pub enum PgpSubcommand {
    /// Generate a new RSA key pair
    Generate(PgpGenerateArgs),

    /// Encrypt a message to a public key
    Encrypt(PgpEncryptArgs),

    /// Decrypt a message with a private key
    Decrypt(PgpDecryptArgs),

    /// Write the user's active public key to a file
    Export(PathArgs),

    /// Validate a public key file and show its fingerprint
    Import(PathArgs),

    /// List the user's PGP key pairs
    List(ListArgs),
}

#[derive(Args)]
pub struct PgpGenerateArgs {
    /// Directory for private.pem and public.pem (ignored with --user)
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["public_key", "recipient"])))]
pub struct PgpEncryptArgs {
    /// Message to encrypt
    #[arg(value_name = "MESSAGE")]
    pub message: String,

    /// Recipient public key PEM file
    #[arg(long, value_name = "PATH")]
    pub public_key: Option<PathBuf>,

    /// Store user whose active public key to use
    #[arg(long, value_name = "NAME")]
    pub recipient: Option<String>,
}

#[derive(Args)]
pub struct PgpDecryptArgs {
    /// Base64 ciphertext
    #[arg(value_name = "CIPHERTEXT")]
    pub ciphertext: String,

    /// Private key PEM file (defaults to the user's active key)
    #[arg(long, value_name = "PATH")]
    pub private_key: Option<PathBuf>,
}

/// Arguments for the `user` command group
#[derive(Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// Register a new user with a fresh key
    Register(UserRegisterArgs),
}

#[derive(Args)]
pub struct UserRegisterArgs {
    /// Username
    #[arg(value_name = "NAME")]
    pub username: String,
}

/// Arguments for the `key` command group
#[derive(Args)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeySubcommand,
}

#[derive(Subcommand)]
pub enum KeySubcommand {
    /// Print the active key
    Show,

    /// Write the active key to a file
    Export(PathArgs),

    /// Replace the active key with one read from a file
    Import(PathArgs),

    /// Replace the active key with a freshly generated one
    Rotate,

    /// List the user's keys
    List(ListArgs),
}

#[derive(Args)]
pub struct PathArgs {
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `history` command
#[derive(Args)]
pub struct HistoryArgs {
    /// Show encrypted texts instead of hashes
    #[arg(long)]
    pub encrypted: bool,

    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pgp_encrypt_requires_target() {
        let result = Cli::try_parse_from(["zencrypt", "pgp", "encrypt", "hi"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from([
            "zencrypt",
            "pgp",
            "encrypt",
            "hi",
            "--public-key",
            "a.pem",
            "--recipient",
            "bob",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::try_parse_from(["zencrypt", "-vv", "hash", "x"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Hash(_)));
    }
}
