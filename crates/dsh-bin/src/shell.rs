//! What the demo shell does with an accepted line. Execution proper lives
//! outside the editor, so anything that is not `exit` or `history` is echoed.

use core_history::History;
use std::io::{self, Write};

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

pub fn handle_line<W: Write>(line: &str, history: &History, out: &mut W) -> io::Result<Outcome> {
    let line = line.trim();
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };
    match cmd {
        "" => {}
        "exit" => return Ok(Outcome::Exit),
        "history" => list_history(history, rest, out)?,
        _ => writeln!(out, "{line}")?,
    }
    Ok(Outcome::Continue)
}

/// Without a query every entry is listed oldest first with its index;
/// with one, up to ten matches newest first.
fn list_history<W: Write>(history: &History, query: &str, out: &mut W) -> io::Result<()> {
    if query.is_empty() {
        for (i, entry) in history.items().iter().enumerate() {
            writeln!(out, "{:>5}  {entry}", i + 1)?;
        }
    } else {
        for entry in history.search(query) {
            writeln!(out, "{entry}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(line: &str, history: &History) -> (Outcome, String) {
        let mut out = Vec::new();
        let outcome = handle_line(line, history, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    fn sample() -> History {
        let mut h = History::new(100);
        for line in ["ls -la", "git status", "cargo build", "git log"] {
            h.add(line);
        }
        h
    }

    #[test]
    fn exit_stops_the_loop() {
        assert_eq!(run("  exit ", &History::default()).0, Outcome::Exit);
    }

    #[test]
    fn other_lines_are_echoed() {
        assert_eq!(
            run("echo hi there", &History::default()),
            (Outcome::Continue, "echo hi there\n".to_string())
        );
        assert_eq!(run("   ", &History::default()).1, "");
    }

    #[test]
    fn history_lists_everything_oldest_first() {
        let (_, out) = run("history", &sample());
        assert_eq!(
            out,
            "    1  ls -la\n    2  git status\n    3  cargo build\n    4  git log\n"
        );
    }

    #[test]
    fn history_query_searches_newest_first() {
        let (_, out) = run("history GIT", &sample());
        assert_eq!(out, "git log\ngit status\n");
    }
}
