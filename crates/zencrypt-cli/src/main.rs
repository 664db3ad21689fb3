//! Zencrypt CLI - hashing, text and file encryption, and RSA messaging
//!
//! This is the command-line interface for Zencrypt. It resolves key and
//! store locations, prompts for passwords, and hands the actual work to
//! `zencrypt-core`.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;
mod ui;

use clap::Parser;

use crate::app::AppContext;
use crate::cli::{
    Cli, Commands, FileSubcommand, KeySubcommand, PgpSubcommand, UserSubcommand,
};
use crate::commands::{file, hash, history, key, misc, pgp, text, user};
use crate::errors::exit_code_for;
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    let config_level = ctx
        .config()
        .ok()
        .and_then(|config| config.logging.level.clone());
    logging::init(cli.verbose, cli.quiet, config_level.as_deref());

    if let Err(e) = run(&ctx, &cli) {
        tracing::debug!(error = ?e, "command failed");
        let ui_ctx = ctx.ui_context(false);
        let error_msg = format!("{}", e);
        let (message, hint) = split_hint(&error_msg);
        print_error(&ui_ctx, message, hint);
        std::process::exit(exit_code_for(&e));
    }
}

/// Split a trailing "Hint: ..." line off an error message.
fn split_hint(error: &str) -> (&str, Option<&str>) {
    match error.find("\nHint:") {
        Some(idx) => (&error[..idx], Some(&error[idx + 1..])),
        None => (error, None),
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Hash(args) => hash::handle_hash(ctx, args),
        Commands::Verify(args) => hash::handle_verify(ctx, args),
        Commands::Encrypt(args) => text::handle_encrypt(ctx, args),
        Commands::Decrypt(args) => text::handle_decrypt(ctx, args),
        Commands::File(args) => match &args.command {
            FileSubcommand::Encrypt(io_args) => file::handle_encrypt(ctx, io_args),
            FileSubcommand::Decrypt(io_args) => file::handle_decrypt(ctx, io_args),
        },
        Commands::Pgp(args) => match &args.command {
            PgpSubcommand::Generate(generate_args) => pgp::handle_generate(ctx, generate_args),
            PgpSubcommand::Encrypt(encrypt_args) => pgp::handle_encrypt(ctx, encrypt_args),
            PgpSubcommand::Decrypt(decrypt_args) => pgp::handle_decrypt(ctx, decrypt_args),
            PgpSubcommand::Export(path_args) => pgp::handle_export(ctx, path_args),
            PgpSubcommand::Import(path_args) => pgp::handle_import(ctx, path_args),
            PgpSubcommand::List(list_args) => pgp::handle_list(ctx, list_args),
        },
        Commands::User(args) => match &args.command {
            UserSubcommand::Register(register_args) => user::handle_register(ctx, register_args),
        },
        Commands::Key(args) => match &args.command {
            KeySubcommand::Show => key::handle_show(ctx),
            KeySubcommand::Export(path_args) => key::handle_export(ctx, path_args),
            KeySubcommand::Import(path_args) => key::handle_import(ctx, path_args),
            KeySubcommand::Rotate => key::handle_rotate(ctx),
            KeySubcommand::List(list_args) => key::handle_list(ctx, list_args),
        },
        Commands::History(args) => history::handle_history(ctx, args),
        Commands::Completions(args) => misc::handle_completions(args),
    }
}
