use zencrypt_core::{keyfile, FernetKey, KeyStore};

use crate::app::AppContext;
use crate::cli::{ListArgs, PathArgs};
use crate::errors::from_core;
use crate::output::{key_rows, short_id, KEY_COLUMNS};
use crate::ui::{badge, print_json, receipt, simple_table, Badge};

fn warn_old_tokens(ctx: &AppContext) {
    if !ctx.quiet() {
        eprintln!(
            "{}",
            badge(
                &ctx.ui_context(false),
                Badge::Warn,
                "Tokens made with the previous key can no longer be decrypted with this one.",
            )
        );
    }
}

pub fn handle_show(ctx: &AppContext) -> anyhow::Result<()> {
    let key = match ctx.login_if_user()? {
        Some(user) => user.store.active_key(&user.session).map_err(from_core)?,
        None => keyfile::read(&ctx.keyfile_path()?).map_err(from_core)?,
    };
    println!("{}", key.to_base64());
    Ok(())
}

pub fn handle_export(ctx: &AppContext, args: &PathArgs) -> anyhow::Result<()> {
    let key = match ctx.login_if_user()? {
        Some(user) => user.store.active_key(&user.session).map_err(from_core)?,
        None => keyfile::read(&ctx.keyfile_path()?).map_err(from_core)?,
    };
    keyfile::write(&args.path, &key).map_err(from_core)?;

    if !ctx.quiet() {
        println!(
            "{}",
            receipt(
                &ctx.ui_context(false),
                "Exported key",
                &[("Output", &args.path.display().to_string())],
            )
        );
    }
    Ok(())
}

pub fn handle_import(ctx: &AppContext, args: &PathArgs) -> anyhow::Result<()> {
    let key = keyfile::read(&args.path).map_err(from_core)?;

    let (target, key_id) = match ctx.login_if_user()? {
        Some(mut user) => {
            let id = user
                .store
                .import_key(&user.session, &key)
                .map_err(from_core)?;
            (format!("user {}", user.username()), Some(short_id(&id)))
        }
        None => {
            let path = ctx.keyfile_path()?;
            keyfile::write(&path, &key).map_err(from_core)?;
            (path.display().to_string(), None)
        }
    };

    if !ctx.quiet() {
        let mut items = vec![("Target", target.as_str())];
        if let Some(id) = key_id.as_deref() {
            items.push(("Key", id));
        }
        println!(
            "{}",
            receipt(&ctx.ui_context(false), "Imported key", &items)
        );
    }
    warn_old_tokens(ctx);
    Ok(())
}

pub fn handle_rotate(ctx: &AppContext) -> anyhow::Result<()> {
    let target = match ctx.login_if_user()? {
        Some(mut user) => {
            user.store.rotate_key(&user.session).map_err(from_core)?;
            format!("user {}", user.username())
        }
        None => {
            let path = ctx.keyfile_path()?;
            keyfile::write(&path, &FernetKey::generate()).map_err(from_core)?;
            path.display().to_string()
        }
    };

    if !ctx.quiet() {
        println!(
            "{}",
            receipt(
                &ctx.ui_context(false),
                "Rotated key",
                &[("Target", &target)],
            )
        );
    }
    warn_old_tokens(ctx);
    Ok(())
}

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let user = ctx.login()?;
    let keys = user.store.list_keys(&user.session).map_err(from_core)?;

    let ui_ctx = ctx.ui_context(args.json);
    if ui_ctx.mode.is_json() {
        return print_json(&keys);
    }
    println!(
        "{}",
        simple_table(&ui_ctx, &KEY_COLUMNS, &key_rows(&keys))
    );
    Ok(())
}
