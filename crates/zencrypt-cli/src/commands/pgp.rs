use std::path::Path;

use zencrypt_core::{KeyStore, PgpKeyPair, PgpPublicKey};

use crate::app::AppContext;
use crate::cli::{ListArgs, PathArgs, PgpDecryptArgs, PgpEncryptArgs, PgpGenerateArgs};
use crate::errors::{from_core, CliError};
use crate::output::{pgp_key_rows, short_id, PGP_KEY_COLUMNS};
use crate::ui::progress::Spinner;
use crate::ui::{print_json, receipt, simple_table};

fn generate_pair(ctx: &AppContext) -> anyhow::Result<PgpKeyPair> {
    let spinner = Spinner::start(&ctx.ui_context(false), "Generating RSA key pair");
    let pair = PgpKeyPair::generate().map_err(from_core);
    spinner.finish();
    pair
}

pub fn handle_generate(ctx: &AppContext, args: &PgpGenerateArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);

    // Log in before the slow part so a bad password fails fast.
    if let Some(mut user) = ctx.login_if_user()? {
        let pair = generate_pair(ctx)?;
        let info = user
            .store
            .store_pgp_key(&user.session, &pair)
            .map_err(from_core)?;
        if !ctx.quiet() {
            println!(
                "{}",
                receipt(
                    &ui_ctx,
                    "Generated PGP key pair",
                    &[
                        ("User", user.username()),
                        ("Key", &short_id(&info.id)),
                        ("Fingerprint", &info.fingerprint),
                    ],
                )
            );
        }
        return Ok(());
    }

    let out_dir = args.out_dir.as_deref().unwrap_or(Path::new("."));
    let pair = generate_pair(ctx)?;
    let (private_path, public_path) = pair.write_pem_files(out_dir).map_err(from_core)?;
    let fingerprint = pair.public_key().fingerprint().map_err(from_core)?;

    if !ctx.quiet() {
        println!(
            "{}",
            receipt(
                &ui_ctx,
                "Generated PGP key pair",
                &[
                    ("Private key", &private_path.display().to_string()),
                    ("Public key", &public_path.display().to_string()),
                    ("Fingerprint", &fingerprint),
                ],
            )
        );
    }
    Ok(())
}

pub fn handle_encrypt(ctx: &AppContext, args: &PgpEncryptArgs) -> anyhow::Result<()> {
    let public_key = match (&args.public_key, &args.recipient) {
        (Some(path), _) => PgpPublicKey::read_pem(path).map_err(from_core)?,
        (None, Some(recipient)) => ctx
            .open_existing_store()?
            .public_key_for(recipient)
            .map_err(from_core)?,
        (None, None) => {
            return Err(CliError::invalid_input("Pass --public-key or --recipient.").into())
        }
    };

    let ciphertext = public_key.encrypt(&args.message).map_err(from_core)?;
    println!("{}", ciphertext);
    Ok(())
}

pub fn handle_decrypt(ctx: &AppContext, args: &PgpDecryptArgs) -> anyhow::Result<()> {
    let pair = match &args.private_key {
        Some(path) => PgpKeyPair::read_private_pem(path).map_err(from_core)?,
        None => {
            if ctx.user().is_none() {
                return Err(CliError::invalid_input(
                    "Pass --private-key, or --user to use the stored key pair.",
                )
                .into());
            }
            let user = ctx.login()?;
            user.store
                .active_pgp_key(&user.session)
                .map_err(from_core)?
        }
    };

    let message = pair.decrypt(&args.ciphertext).map_err(from_core)?;
    println!("{}", message);
    Ok(())
}

pub fn handle_export(ctx: &AppContext, args: &PathArgs) -> anyhow::Result<()> {
    let user = ctx.login()?;
    let pair = user
        .store
        .active_pgp_key(&user.session)
        .map_err(from_core)?;
    pair.public_key().write_pem(&args.path).map_err(from_core)?;

    if !ctx.quiet() {
        let fingerprint = pair.public_key().fingerprint().map_err(from_core)?;
        println!(
            "{}",
            receipt(
                &ctx.ui_context(false),
                "Exported public key",
                &[
                    ("Output", &args.path.display().to_string()),
                    ("Fingerprint", &fingerprint),
                ],
            )
        );
    }
    Ok(())
}

pub fn handle_import(ctx: &AppContext, args: &PathArgs) -> anyhow::Result<()> {
    let public_key = PgpPublicKey::read_pem(&args.path).map_err(from_core)?;
    let fingerprint = public_key.fingerprint().map_err(from_core)?;

    if ctx.quiet() {
        return Ok(());
    }
    println!(
        "{}",
        receipt(
            &ctx.ui_context(false),
            "Valid public key",
            &[
                ("Path", &args.path.display().to_string()),
                ("Fingerprint", &fingerprint),
                ("Max message", &format!("{} bytes", public_key.max_message_len())),
            ],
        )
    );
    Ok(())
}

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let user = ctx.login()?;
    let keys = user.store.list_pgp_keys(&user.session).map_err(from_core)?;

    let ui_ctx = ctx.ui_context(args.json);
    if ui_ctx.mode.is_json() {
        return print_json(&keys);
    }
    if keys.is_empty() {
        if !ctx.quiet() {
            println!("No PGP keys for {}.", user.username());
        }
        return Ok(());
    }
    println!(
        "{}",
        simple_table(&ui_ctx, &PGP_KEY_COLUMNS, &pgp_key_rows(&keys))
    );
    Ok(())
}
