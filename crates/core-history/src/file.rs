//! On-disk history log.
//!
//! Format: UTF-8 text, one record per accepted command:
//!
//! ```text
//! # 2024-05-01 12:30:00
//! ls -la
//! ```
//!
//! Lines starting with `#` are metadata and never replayed. The log is
//! append-only: each session event appends exactly one record and existing
//! records are never rewritten. There is no locking; a record goes out in a
//! single `write_all` on a file opened in append mode, so concurrent sessions
//! interleave at record granularity and the last writer wins.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_record(line: &str, timestamp: &str) -> String {
    format!("# {timestamp}\n{line}\n")
}

/// Append one record, creating parent directories on demand.
pub fn append_record(path: &Path, line: &str) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(format_record(line, &timestamp).as_bytes())
}

/// Command lines in file order (oldest first), comments and blanks skipped.
pub fn load_entries(path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_entries(&content))
}

pub fn parse_entries(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_layout() {
        assert_eq!(
            format_record("ls -la", "2024-05-01 12:30:00"),
            "# 2024-05-01 12:30:00\nls -la\n"
        );
    }

    #[test]
    fn parse_skips_comments_and_blanks() {
        let content = "# 2024-05-01 12:30:00\nls\n\n# 2024-05-01 12:31:00\n  cd /tmp  \n#x\n";
        assert_eq!(parse_entries(content), vec!["ls", "cd /tmp"]);
    }

    #[test]
    fn append_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("hist");
        append_record(&path, "echo hi").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let stamp = lines.next().unwrap();
        assert!(stamp.starts_with("# "));
        // "# YYYY-MM-DD HH:MM:SS"
        assert_eq!(stamp.len(), 21);
        assert_eq!(lines.next(), Some("echo hi"));
        assert_eq!(lines.next(), None);
    }
}
