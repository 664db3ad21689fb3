use zencrypt_core::crypto::{decrypt_file, encrypt_file};

use crate::app::AppContext;
use crate::cli::FileIoArgs;
use crate::errors::{from_core, CliError};
use crate::helpers::{prompt_password, prompt_password_confirmed};
use crate::ui::progress::Spinner;
use crate::ui::receipt;

fn ensure_distinct_paths(args: &FileIoArgs) -> anyhow::Result<()> {
    if args.input == args.output {
        return Err(CliError::invalid_input("Input and output must be different files.").into());
    }
    Ok(())
}

pub fn handle_encrypt(ctx: &AppContext, args: &FileIoArgs) -> anyhow::Result<()> {
    ensure_distinct_paths(args)?;
    let password = prompt_password_confirmed("File password")?;

    let ui_ctx = ctx.ui_context(false);
    let spinner = Spinner::start(&ui_ctx, "Encrypting");
    let written = encrypt_file(&args.input, &args.output, password.as_bytes()).map_err(from_core);
    spinner.finish();
    let written = written?;

    if !ctx.quiet() {
        println!(
            "{}",
            receipt(
                &ui_ctx,
                "Encrypted file",
                &[
                    ("Output", &args.output.display().to_string()),
                    ("Bytes", &written.to_string()),
                ],
            )
        );
    }
    Ok(())
}

pub fn handle_decrypt(ctx: &AppContext, args: &FileIoArgs) -> anyhow::Result<()> {
    ensure_distinct_paths(args)?;
    let password = prompt_password("File password")?;

    let ui_ctx = ctx.ui_context(false);
    let spinner = Spinner::start(&ui_ctx, "Decrypting");
    let written = decrypt_file(&args.input, &args.output, password.as_bytes()).map_err(from_core);
    spinner.finish();
    let written = written?;

    if !ctx.quiet() {
        println!(
            "{}",
            receipt(
                &ui_ctx,
                "Decrypted file",
                &[
                    ("Output", &args.output.display().to_string()),
                    ("Bytes", &written.to_string()),
                ],
            )
        );
    }
    Ok(())
}
