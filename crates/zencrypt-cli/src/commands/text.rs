use zencrypt_core::{Fernet, KeyStore, ZencryptError};

use crate::app::{AppContext, UserSession};
use crate::cli::{DecryptArgs, EncryptArgs};
use crate::errors::from_core;
use crate::helpers::text_or_stdin;

/// The key file cipher, or the user's active key when `--user` is set.
fn cipher(ctx: &AppContext) -> anyhow::Result<(Fernet, Option<UserSession>)> {
    match ctx.login_if_user()? {
        Some(user) => Ok((user.cipher()?, Some(user))),
        None => Ok((ctx.keyfile_cipher()?, None)),
    }
}

pub fn handle_encrypt(ctx: &AppContext, args: &EncryptArgs) -> anyhow::Result<()> {
    let text = text_or_stdin(args.text.clone(), "text")?;
    let (fernet, user) = cipher(ctx)?;

    let token = fernet.encrypt_text(&text).map_err(from_core)?;
    println!("{}", token);

    if let Some(mut user) = user {
        if let Err(err) = user.store.record_encrypted_text(&user.session, &token) {
            tracing::warn!(error = %err, "failed to record encrypted text");
            eprintln!("Warning: token not saved to history: {}", err);
        }
    }
    Ok(())
}

pub fn handle_decrypt(ctx: &AppContext, args: &DecryptArgs) -> anyhow::Result<()> {
    let token = text_or_stdin(args.token.clone(), "token")?;
    let (fernet, _user) = cipher(ctx)?;

    let plaintext = match args.ttl {
        Some(ttl) => fernet
            .decrypt_with_ttl(&token, ttl)
            .and_then(|bytes| String::from_utf8(bytes).map_err(|_| ZencryptError::InvalidToken)),
        None => fernet.decrypt_text(&token),
    }
    .map_err(from_core)?;

    println!("{}", plaintext);
    Ok(())
}
