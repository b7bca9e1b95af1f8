//! Tab completion: classifies the token under the cursor and lists candidates.
//!
//! * One word, no trailing whitespace → command name: builtins plus every
//!   executable found on the search path. Builtins win on name clashes.
//! * Anything else → path fragment of the last token (empty after trailing
//!   whitespace): entries of the fragment's directory filtered by the filename
//!   prefix; subdirectories get a trailing `/`.
//!
//! The result carries the coalesced suffix: the unique candidate's remainder,
//! or the remainder of the candidates' longest common prefix. Unreadable
//! directories contribute nothing; completion never fails.

mod tilde;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

pub const BUILTINS: &[&str] = &["cd", "exit", "help", "pwd", "todo"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionKind {
    Builtin,
    Command,
    File,
    Directory,
}

impl CompletionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CompletionKind::Builtin => "builtin",
            CompletionKind::Command => "command",
            CompletionKind::File => "file",
            CompletionKind::Directory => "directory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    /// Replacement for the whole token (directory part included).
    pub text: String,
    /// Short form shown in the menu.
    pub display: String,
    pub kind: CompletionKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub items: Vec<CompletionItem>,
    /// Text to insert at the cursor if the caller takes the obvious completion.
    pub suffix: String,
    /// Char offset where the completed token starts.
    pub token_start: usize,
}

impl Completion {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_unique(&self) -> bool {
        self.items.len() == 1
    }
}

#[derive(Debug, Clone)]
pub struct Completer {
    builtins: Vec<String>,
    search_path: Vec<PathBuf>,
    home: Option<PathBuf>,
    cwd: Option<PathBuf>,
}

impl Completer {
    pub fn new(search_path: Vec<PathBuf>, home: Option<PathBuf>) -> Self {
        Self {
            builtins: BUILTINS.iter().map(|s| s.to_string()).collect(),
            search_path,
            home,
            cwd: None,
        }
    }

    /// `PATH` and `HOME` from the process environment.
    pub fn from_env() -> Self {
        let search_path = std::env::var_os("PATH")
            .map(|p| std::env::split_paths(&p).collect())
            .unwrap_or_default();
        let home = std::env::var_os("HOME").map(PathBuf::from);
        Self::new(search_path, home)
    }

    /// Resolve relative fragments against `dir` instead of the process cwd.
    pub fn with_cwd<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn with_builtins<I, S>(mut self, builtins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builtins = builtins.into_iter().map(Into::into).collect();
        self
    }

    /// Complete the text before `cursor` (a char offset into `input`).
    pub fn complete(&self, input: &str, cursor: usize) -> Completion {
        let before: String = input.chars().take(cursor).collect();
        if before.is_empty() {
            return Completion::default();
        }
        let ends_ws = before.ends_with(char::is_whitespace);
        let words: Vec<&str> = before.split_whitespace().collect();
        let fragment = if ends_ws {
            ""
        } else {
            words.last().copied().unwrap_or("")
        };
        let token_start = before.chars().count() - fragment.chars().count();

        // A first word with a slash (`./run`, `bin/x`) names a path, not a command.
        let mut items = if words.len() == 1 && !ends_ws && !fragment.contains('/') {
            self.complete_command(fragment)
        } else {
            self.complete_path(fragment)
        };
        items.sort_by(|a, b| a.text.cmp(&b.text));
        let suffix = coalesce(fragment, &items);
        debug!(
            target: "complete",
            candidates = items.len(),
            suffix_len = suffix.chars().count(),
            token_start,
            "completion"
        );
        Completion {
            items,
            suffix,
            token_start,
        }
    }

    fn complete_command(&self, prefix: &str) -> Vec<CompletionItem> {
        let mut found: BTreeMap<String, CompletionKind> = BTreeMap::new();
        for b in self.builtins.iter().filter(|b| b.starts_with(prefix)) {
            found.insert(b.clone(), CompletionKind::Builtin);
        }
        for dir in &self.search_path {
            let entries = match fs::read_dir(dir) {
                Ok(e) => e,
                Err(e) => {
                    trace!(target: "complete", dir = %dir.display(), ?e, "path_dir_unreadable");
                    continue;
                }
            };
            for entry in entries.flatten() {
                let Ok(name) = entry.file_name().into_string() else {
                    continue;
                };
                if !name.starts_with(prefix) || found.contains_key(&name) {
                    continue;
                }
                if is_executable(&entry.path()) {
                    found.insert(name, CompletionKind::Command);
                }
            }
        }
        found
            .into_iter()
            .map(|(name, kind)| CompletionItem {
                display: name.clone(),
                text: name,
                kind,
            })
            .collect()
    }

    fn complete_path(&self, fragment: &str) -> Vec<CompletionItem> {
        let (dir_part, file_prefix) = match fragment.rfind('/') {
            Some(i) => (&fragment[..=i], &fragment[i + 1..]),
            None => ("", fragment),
        };
        let Some(dir) = self.listing_dir(dir_part) else {
            debug!(target: "complete", "tilde_unresolved");
            return Vec::new();
        };
        let entries = match fs::read_dir(&dir) {
            Ok(e) => e,
            Err(e) => {
                debug!(target: "complete", dir = %dir.display(), ?e, "dir_unreadable");
                return Vec::new();
            }
        };
        let show_hidden = file_prefix.starts_with('.');
        let mut items = Vec::new();
        for entry in entries.flatten() {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !name.starts_with(file_prefix) || (name.starts_with('.') && !show_hidden) {
                continue;
            }
            let is_dir = fs::metadata(entry.path()).is_ok_and(|m| m.is_dir());
            let (display, kind) = if is_dir {
                (format!("{name}/"), CompletionKind::Directory)
            } else {
                (name, CompletionKind::File)
            };
            items.push(CompletionItem {
                text: format!("{dir_part}{display}"),
                display,
                kind,
            });
        }
        items
    }

    fn listing_dir(&self, dir_part: &str) -> Option<PathBuf> {
        let expanded = if dir_part.is_empty() {
            PathBuf::from(".")
        } else {
            tilde::expand(dir_part, self.home.as_deref())?
        };
        match &self.cwd {
            Some(cwd) if expanded.is_relative() => Some(cwd.join(expanded)),
            _ => Some(expanded),
        }
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.is_file())
}

/// Remainder of `candidate` beyond `typed`, empty if it does not extend it.
fn remainder(candidate: &str, typed: &str) -> String {
    candidate
        .strip_prefix(typed)
        .map(str::to_string)
        .unwrap_or_default()
}

fn common_prefix<'a>(items: &'a [CompletionItem]) -> &'a str {
    let Some(first) = items.first() else {
        return "";
    };
    let mut end = first.text.len();
    for item in &items[1..] {
        end = first
            .text
            .char_indices()
            .zip(item.text.chars())
            .take_while(|((_, a), b)| a == b)
            .map(|((i, a), _)| i + a.len_utf8())
            .last()
            .unwrap_or(0)
            .min(end);
    }
    &first.text[..end]
}

fn coalesce(fragment: &str, items: &[CompletionItem]) -> String {
    match items {
        [] => String::new(),
        [only] => remainder(&only.text, fragment),
        many => remainder(common_prefix(many), fragment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str) -> CompletionItem {
        CompletionItem {
            text: text.to_string(),
            display: text.to_string(),
            kind: CompletionKind::File,
        }
    }

    #[test]
    fn common_prefix_law() {
        let items = [item("apple.txt"), item("application.log")];
        assert_eq!(common_prefix(&items), "appl");
        assert_eq!(coalesce("app", &items), "l");
    }

    #[test]
    fn common_prefix_equal_to_input_yields_empty_suffix() {
        let items = [item("make"), item("makepkg")];
        assert_eq!(coalesce("make", &items), "");
    }

    #[test]
    fn common_prefix_multibyte() {
        let items = [item("café-a"), item("café-b"), item("cafés")];
        assert_eq!(common_prefix(&items), "café");
    }

    #[test]
    fn single_candidate_remainder() {
        assert_eq!(coalesce("ec", &[item("echo")]), "ho");
    }

    #[test]
    fn empty_input_yields_nothing() {
        let c = Completer::new(Vec::new(), None);
        assert!(c.complete("", 0).is_empty());
    }

    #[test]
    fn builtins_match_without_search_path() {
        let c = Completer::new(Vec::new(), None);
        let out = c.complete("ex", 2);
        assert!(out.is_unique());
        assert_eq!(out.items[0].kind, CompletionKind::Builtin);
        assert_eq!(out.suffix, "it");
        assert_eq!(out.token_start, 0);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(CompletionKind::Builtin.as_str(), "builtin");
        assert_eq!(CompletionKind::Command.as_str(), "command");
        assert_eq!(CompletionKind::File.as_str(), "file");
        assert_eq!(CompletionKind::Directory.as_str(), "directory");
    }
}
