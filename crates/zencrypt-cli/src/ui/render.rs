//! Text rendering for receipts, tables and errors.
//!
//! Pretty output is for people at a terminal. Plain output is line oriented
//! (`key=value`, space-separated rows) so scripts can parse it.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;

use super::context::UiContext;
use super::theme::{colors, styled, Badge};

/// A badge, followed by `message` when it is not empty.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let symbol = styled(kind.display(ctx.unicode), kind.style(), ctx.color);
    match message {
        "" => symbol,
        _ => format!("{} {}", symbol, message),
    }
}

/// `Label: value` when pretty, `label=value` otherwise.
fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if !ctx.mode.is_pretty() {
        let plain_key = key.to_lowercase().replace(' ', "_");
        return format!("{}={}", plain_key, value);
    }
    let label = styled(&format!("{}:", key), colors::DIM, ctx.color);
    format!("{} {}", label, value)
}

/// Summary printed after a command changes something.
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, &str)]) -> String {
    let (head, indent) = if ctx.mode.is_pretty() {
        (badge(ctx, Badge::Ok, title), "  ")
    } else {
        ("status=ok".to_string(), "")
    };

    std::iter::once(head)
        .chain(
            items
                .iter()
                .map(|(key, value)| format!("{}{}", indent, kv(ctx, key, value))),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

/// Table column header.
#[derive(Debug, Clone)]
pub struct Column {
    pub header: &'static str,
}

impl Column {
    pub const fn new(header: &'static str) -> Self {
        Self { header }
    }
}

/// Borderless table when pretty; header-less space-separated rows otherwise.
pub fn simple_table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return rows
            .iter()
            .map(|row| row.join(" "))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(columns.iter().map(|column| {
            let cell = Cell::new(column.header);
            if ctx.color {
                cell.add_attribute(Attribute::Dim)
            } else {
                cell
            }
        }));
    for column in table.column_iter_mut() {
        column.set_padding((0, 2));
    }
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

/// Pretty-printed JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Error text with an optional `Hint: ...` line.
pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let mut out = if ctx.mode.is_pretty() {
        badge(ctx, Badge::Err, message)
    } else {
        format!("error={}", message)
    };
    if let Some(hint) = error_hint {
        out.push('\n');
        if ctx.mode.is_pretty() {
            out.push_str(hint);
        } else {
            out.push_str("hint=");
            out.push_str(hint.trim_start_matches("Hint: "));
        }
    }
    out
}

/// Write [`error_message`] to stderr.
pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::OutputMode;

    fn ctx(mode: OutputMode) -> UiContext {
        UiContext {
            is_tty: mode == OutputMode::Pretty,
            color: false,
            unicode: false,
            mode,
        }
    }

    #[test]
    fn test_kv_modes() {
        assert_eq!(kv(&ctx(OutputMode::Plain), "Key Id", "abc"), "key_id=abc");
        assert_eq!(kv(&ctx(OutputMode::Pretty), "Key Id", "abc"), "Key Id: abc");
    }

    #[test]
    fn test_receipt_plain() {
        let out = receipt(&ctx(OutputMode::Plain), "Done", &[("Output", "a.enc")]);
        assert_eq!(out, "status=ok\noutput=a.enc");
    }

    #[test]
    fn test_receipt_pretty() {
        let out = receipt(&ctx(OutputMode::Pretty), "Done", &[("Output", "a.enc")]);
        assert_eq!(out, "[OK] Done\n  Output: a.enc");
    }

    #[test]
    fn test_simple_table_plain_has_no_header() {
        let out = simple_table(
            &ctx(OutputMode::Plain),
            &[Column::new("ID"), Column::new("ACTIVE")],
            &[vec!["1".to_string(), "yes".to_string()]],
        );
        assert_eq!(out, "1 yes");
    }

    #[test]
    fn test_simple_table_pretty_has_header() {
        let out = simple_table(
            &ctx(OutputMode::Pretty),
            &[Column::new("ID"), Column::new("ACTIVE")],
            &[vec!["1".to_string(), "yes".to_string()]],
        );
        assert!(out.contains("ID"));
        assert!(out.contains("yes"));
    }

    #[test]
    fn test_error_message_plain_strips_hint_prefix() {
        let out = error_message(&ctx(OutputMode::Plain), "Bad", Some("Hint: try again"));
        assert_eq!(out, "error=Bad\nhint=try again");
    }

    #[test]
    fn test_error_message_pretty() {
        assert_eq!(error_message(&ctx(OutputMode::Pretty), "Bad", None), "[ERR] Bad");
    }
}
