use zencrypt_core::KeyStore;

use crate::app::AppContext;
use crate::cli::HistoryArgs;
use crate::errors::from_core;
use crate::output::{encrypted_text_rows, hash_rows, ENCRYPTED_TEXT_COLUMNS, HASH_COLUMNS};
use crate::ui::{print_json, simple_table, Column, UiContext};

pub fn handle_history(ctx: &AppContext, args: &HistoryArgs) -> anyhow::Result<()> {
    let user = ctx.login()?;
    let ui_ctx = ctx.ui_context(args.json);

    if args.encrypted {
        let records = user
            .store
            .list_encrypted_texts(&user.session, args.limit)
            .map_err(from_core)?;
        if ui_ctx.mode.is_json() {
            return print_json(&records);
        }
        print_rows(
            ctx,
            &ui_ctx,
            &ENCRYPTED_TEXT_COLUMNS,
            &encrypted_text_rows(&records),
            "No encrypted texts yet.",
        );
    } else {
        let records = user
            .store
            .list_hashes(&user.session, args.limit)
            .map_err(from_core)?;
        if ui_ctx.mode.is_json() {
            return print_json(&records);
        }
        print_rows(
            ctx,
            &ui_ctx,
            &HASH_COLUMNS,
            &hash_rows(&records),
            "No hashes yet.",
        );
    }
    Ok(())
}

fn print_rows(
    ctx: &AppContext,
    ui_ctx: &UiContext,
    columns: &[Column],
    rows: &[Vec<String>],
    empty: &str,
) {
    if rows.is_empty() {
        if !ctx.quiet() {
            println!("{}", empty);
        }
        return;
    }
    println!("{}", simple_table(ui_ctx, columns, rows));
}
