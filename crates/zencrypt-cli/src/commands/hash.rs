use zencrypt_core::hash;
use zencrypt_core::storage::NewHashRecord;
use zencrypt_core::KeyStore;

use crate::app::AppContext;
use crate::cli::{HashArgs, VerifyArgs};
use crate::errors::CliError;
use crate::ui::{badge, Badge};

pub fn handle_hash(ctx: &AppContext, args: &HashArgs) -> anyhow::Result<()> {
    let mut user = ctx.login_if_user()?;

    let digest = hash::digest(&args.text, &args.salt);
    println!("{}", digest);

    if let Some(user) = user.as_mut() {
        let record = NewHashRecord::new(args.text.as_str(), &args.salt, digest.as_str());
        if let Err(err) = user.store.record_hash(&user.session, &record) {
            tracing::warn!(error = %err, "failed to record hash");
            eprintln!("Warning: digest not saved to history: {}", err);
        }
    }
    Ok(())
}

pub fn handle_verify(ctx: &AppContext, args: &VerifyArgs) -> anyhow::Result<()> {
    if !hash::verify(&args.text, &args.salt, &args.digest) {
        return Err(CliError::HashMismatch.into());
    }

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        println!("{}", badge(&ui_ctx, Badge::Ok, "Digest matches"));
    }
    Ok(())
}
