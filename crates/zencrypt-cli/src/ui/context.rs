//! Terminal detection and output mode selection.

use std::io::IsTerminal;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// `--json`: serialized records only
    Json,
    /// `key=value` lines and space-separated rows for scripts
    #[default]
    Plain,
    /// Badges, dim labels and aligned tables for a terminal
    Pretty,
}

impl OutputMode {
    /// `--json` wins; otherwise pretty only on a capable terminal.
    pub fn resolve(json_flag: bool, is_tty: bool, term_is_dumb: bool) -> Self {
        match (json_flag, is_tty && !term_is_dumb) {
            (true, _) => Self::Json,
            (false, true) => Self::Pretty,
            (false, false) => Self::Plain,
        }
    }

    pub fn is_json(&self) -> bool {
        *self == Self::Json
    }

    pub fn is_pretty(&self) -> bool {
        *self == Self::Pretty
    }
}

/// What the current stdout can display.
#[derive(Debug, Clone)]
pub struct UiContext {
    pub is_tty: bool,
    pub color: bool,
    pub unicode: bool,
    pub mode: OutputMode,
}

impl UiContext {
    /// Detect from the process environment. `NO_COLOR` and `TERM=dumb`
    /// disable color; `TERM=dumb` also disables unicode symbols.
    pub fn from_env(json_flag: bool) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let term_is_dumb = std::env::var("TERM").is_ok_and(|term| term == "dumb");
        let no_color = std::env::var_os("NO_COLOR").is_some();

        Self {
            is_tty,
            color: is_tty && !no_color && !term_is_dumb,
            unicode: !term_is_dumb,
            mode: OutputMode::resolve(json_flag, is_tty, term_is_dumb),
        }
    }

    /// Spinners only run in pretty mode on a terminal.
    pub fn allows_animation(&self) -> bool {
        self.is_tty && self.mode.is_pretty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_modes() {
        assert_eq!(OutputMode::resolve(true, true, false), OutputMode::Json);
        assert_eq!(OutputMode::resolve(true, false, true), OutputMode::Json);
        assert_eq!(OutputMode::resolve(false, true, false), OutputMode::Pretty);
        assert_eq!(OutputMode::resolve(false, true, true), OutputMode::Plain);
        assert_eq!(OutputMode::resolve(false, false, false), OutputMode::Plain);
    }

    #[test]
    fn test_json_flag_disables_animation() {
        let ctx = UiContext::from_env(true);
        assert!(ctx.mode.is_json());
        assert!(!ctx.allows_animation());
    }
}
