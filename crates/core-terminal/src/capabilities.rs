//! Terminal capability probing.
//!
//! Detection runs once per session from the environment: `TERM=dumb` (or an
//! unset `TERM`) disables color, as does a non-empty `NO_COLOR`. The renderer
//! consults `supports_color` before emitting SGR sequences for the prompt,
//! suggestions and menu categories; reverse video for the menu selection is
//! always used since it is needed to see the selection at all.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    pub supports_color: bool,
}

impl TerminalCapabilities {
    pub fn detect() -> Self {
        let term = std::env::var("TERM").ok();
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::from_env(term.as_deref(), no_color)
    }

    pub fn from_env(term: Option<&str>, no_color: bool) -> Self {
        let dumb = matches!(term, None | Some("") | Some("dumb"));
        Self {
            supports_color: !dumb && !no_color,
        }
    }

    pub fn plain() -> Self {
        Self {
            supports_color: false,
        }
    }
}

impl Default for TerminalCapabilities {
    fn default() -> Self {
        Self {
            supports_color: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xterm_supports_color() {
        assert!(TerminalCapabilities::from_env(Some("xterm-256color"), false).supports_color);
    }

    #[test]
    fn dumb_or_no_color_disables() {
        assert!(!TerminalCapabilities::from_env(Some("dumb"), false).supports_color);
        assert!(!TerminalCapabilities::from_env(None, false).supports_color);
        assert!(!TerminalCapabilities::from_env(Some("xterm"), true).supports_color);
    }
}
