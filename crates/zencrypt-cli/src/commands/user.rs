use zencrypt_core::KeyStore;

use crate::app::AppContext;
use crate::cli::UserRegisterArgs;
use crate::errors::from_core;
use crate::helpers::prompt_new_password;
use crate::ui::receipt;

pub fn handle_register(ctx: &AppContext, args: &UserRegisterArgs) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let password = prompt_new_password(&format!("Password for {}", args.username))?;

    let user = store
        .register_user(&args.username, &password)
        .map_err(from_core)?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        println!(
            "{}",
            receipt(
                &ui_ctx,
                "Registered user",
                &[
                    ("Username", &user.username),
                    ("Created", &user.created_at.to_rfc3339()),
                ],
            )
        );
    }
    Ok(())
}
