//! Configuration loading and parsing.
//!
//! Parses `dsh.toml` (or an override path provided by the binary). Every
//! section and field is optional; unknown fields are ignored, and a file that
//! fails to parse yields defaults with a warning so a typo never keeps the
//! shell from starting.
//!
//! ```toml
//! [history]
//! max_size = 1000
//! path = "~/.dsh_history"
//! share = false
//!
//! [completion]
//! max_rows = 10
//!
//! [prompt]
//! text = "dsh> "
//! color = "green"
//!
//! [suggestion]
//! enabled = true
//! ```
//!
//! The menu row cap is clamped against the terminal height when a menu is
//! opened (`Config::effective_menu_rows`).

use anyhow::Result;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "dsh.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_max_size")]
    pub max_size: usize,
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Reload the history file at the start of every line.
    #[serde(default)]
    pub share: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: Self::default_max_size(),
            path: None,
            share: false,
        }
    }
}

impl HistoryConfig {
    const fn default_max_size() -> usize {
        core_history::DEFAULT_MAX_SIZE
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    #[serde(default = "CompletionConfig::default_max_rows")]
    pub max_rows: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            max_rows: Self::default_max_rows(),
        }
    }
}

impl CompletionConfig {
    const fn default_max_rows() -> usize {
        10
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    #[serde(default = "PromptConfig::default_text")]
    pub text: String,
    #[serde(default = "PromptConfig::default_color")]
    pub color: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            text: Self::default_text(),
            color: Self::default_color(),
        }
    }
}

impl PromptConfig {
    fn default_text() -> String {
        "dsh> ".to_string()
    }
    fn default_color() -> String {
        "green".to_string()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SuggestionConfig {
    #[serde(default = "SuggestionConfig::default_enabled")]
    pub enabled: bool,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
        }
    }
}

impl SuggestionConfig {
    const fn default_enabled() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub suggestion: SuggestionConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub source: Option<PathBuf>,
}

/// Best-effort config path: `./dsh.toml` first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("dsh").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
                source: Some(path),
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

/// `$HOME`, falling back to the platform home directory.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

impl Config {
    /// History file location for the process environment.
    pub fn history_path(&self) -> PathBuf {
        self.history_path_in(home_dir().as_deref())
    }

    /// History file location given a home directory: the configured path
    /// (`~/` expanded), else `<home>/.dsh_history`, else `./.dsh_history`.
    pub fn history_path_in(&self, home: Option<&Path>) -> PathBuf {
        match (&self.file.history.path, home) {
            (Some(p), Some(home)) => match p.strip_prefix("~") {
                Ok(rest) => home.join(rest),
                Err(_) => p.clone(),
            },
            (Some(p), None) => p.clone(),
            (None, Some(home)) => core_history::default_path(home),
            (None, None) => PathBuf::from(core_history::HISTORY_FILE_NAME),
        }
    }

    /// Menu row cap limited to the rows left below the input line (at least 1).
    pub fn effective_menu_rows(&self, terminal_rows: u16) -> usize {
        let raw = self.file.completion.max_rows;
        let available = (terminal_rows.saturating_sub(1) as usize).max(1);
        let clamped = raw.clamp(1, available);
        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                terminal_rows,
                "completion_max_rows_clamped"
            );
        }
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    /// Log sink shared between the subscriber and the test body.
    #[derive(Clone, Default)]
    struct SharedLog(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedLog {
        fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture<F: FnOnce()>(f: F) -> String {
        let log = SharedLog::default();
        let sink = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_ansi(false)
            .without_time()
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = log.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("no-such-dsh-config.toml"))).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert_eq!(cfg.file.history.max_size, 1000);
        assert_eq!(cfg.file.completion.max_rows, 10);
        assert_eq!(cfg.file.prompt.text, "dsh> ");
        assert_eq!(cfg.file.prompt.color, "green");
        assert!(cfg.file.suggestion.enabled);
        assert!(!cfg.file.history.share);
        assert!(cfg.source.is_none());
    }

    #[test]
    fn parses_all_sections() {
        let tmp = write_config(
            "[history]\nmax_size = 50\npath = \"/tmp/h\"\nshare = true\n\
             [completion]\nmax_rows = 4\n\
             [prompt]\ntext = \"$ \"\ncolor = \"blue\"\n\
             [suggestion]\nenabled = false\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.history.max_size, 50);
        assert_eq!(cfg.file.history.path, Some(PathBuf::from("/tmp/h")));
        assert!(cfg.file.history.share);
        assert_eq!(cfg.file.completion.max_rows, 4);
        assert_eq!(cfg.file.prompt.text, "$ ");
        assert_eq!(cfg.file.prompt.color, "blue");
        assert!(!cfg.file.suggestion.enabled);
        assert_eq!(cfg.source.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let tmp = write_config("[prompt]\ntext = \"> \"\nunknown = 1\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.prompt.text, "> ");
        assert_eq!(cfg.file.prompt.color, "green");
        assert_eq!(cfg.file.history, HistoryConfig::default());
    }

    #[test]
    fn parse_error_falls_back_to_defaults_and_warns() {
        let tmp = write_config("[history\nmax_size = ");
        let mut cfg = None;
        let logs = capture(|| {
            cfg = Some(load_from(Some(tmp.path().to_path_buf())).unwrap());
        });
        assert_eq!(cfg.unwrap().file, ConfigFile::default());
        assert!(logs.contains("WARN config:"));
        assert!(logs.contains("config_parse_failed"));
    }

    #[test]
    fn history_path_resolution() {
        let home = Path::new("/home/ada");
        let mut cfg = Config::default();
        assert_eq!(
            cfg.history_path_in(Some(home)),
            PathBuf::from("/home/ada/.dsh_history")
        );
        assert_eq!(cfg.history_path_in(None), PathBuf::from(".dsh_history"));

        cfg.file.history.path = Some(PathBuf::from("~/logs/hist"));
        assert_eq!(
            cfg.history_path_in(Some(home)),
            PathBuf::from("/home/ada/logs/hist")
        );
        cfg.file.history.path = Some(PathBuf::from("/var/tmp/hist"));
        assert_eq!(
            cfg.history_path_in(Some(home)),
            PathBuf::from("/var/tmp/hist")
        );
    }

    #[test]
    fn menu_rows_unclamped_on_tall_terminal() {
        let cfg = Config::default();
        assert_eq!(cfg.effective_menu_rows(40), 10);
    }

    #[test]
    fn menu_rows_clamp_logging_uses_config_target() {
        let cfg = Config::default();
        let mut rows = 0;
        let logs = capture(|| rows = cfg.effective_menu_rows(6));
        assert_eq!(rows, 5);
        assert!(logs.contains("INFO config:"));
        assert!(logs.contains("completion_max_rows_clamped"));
    }

    #[test]
    fn menu_rows_never_zero() {
        let mut cfg = Config::default();
        assert_eq!(cfg.effective_menu_rows(1), 1);
        cfg.file.completion.max_rows = 0;
        assert_eq!(cfg.effective_menu_rows(40), 1);
    }
}
