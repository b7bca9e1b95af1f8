//! Completion against real directory fixtures.

use core_complete::{Completer, CompletionKind};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"").unwrap();
}

#[cfg(unix)]
fn touch_exec(dir: &Path, name: &str) {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    fs::write(&path, b"#!/bin/sh\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn texts(c: &core_complete::Completion) -> Vec<&str> {
    c.items.iter().map(|i| i.text.as_str()).collect()
}

#[cfg(unix)]
#[test]
fn unique_command_from_search_path() {
    let bin = tempfile::tempdir().unwrap();
    touch_exec(bin.path(), "echo");
    touch(bin.path(), "ecology.txt");
    let c = Completer::new(vec![bin.path().to_path_buf()], None);
    let out = c.complete("ec", 2);
    assert_eq!(texts(&out), vec!["echo"]);
    assert_eq!(out.items[0].kind, CompletionKind::Command);
    assert_eq!(out.suffix, "ho");
}

#[cfg(unix)]
#[test]
fn builtin_wins_over_executable_of_same_name() {
    let bin = tempfile::tempdir().unwrap();
    touch_exec(bin.path(), "cd");
    touch_exec(bin.path(), "cdrecord");
    let c = Completer::new(vec![bin.path().to_path_buf()], None);
    let out = c.complete("cd", 2);
    assert_eq!(texts(&out), vec!["cd", "cdrecord"]);
    assert_eq!(out.items[0].kind, CompletionKind::Builtin);
    assert_eq!(out.items[1].kind, CompletionKind::Command);
    assert_eq!(out.suffix, "");
}

#[cfg(unix)]
#[test]
fn duplicates_across_path_dirs_collapse() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    touch_exec(a.path(), "grep");
    touch_exec(b.path(), "grep");
    touch_exec(b.path(), "groff");
    let c = Completer::new(vec![a.path().to_path_buf(), b.path().to_path_buf()], None);
    let out = c.complete("gr", 2);
    assert_eq!(texts(&out), vec!["grep", "groff"]);
}

#[test]
fn missing_search_path_dir_is_skipped() {
    let c = Completer::new(vec!["/definitely/not/here".into()], None);
    let out = c.complete("pw", 2);
    assert_eq!(texts(&out), vec!["pwd"]);
}

#[test]
fn file_arguments_share_common_prefix() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "apple.txt");
    touch(dir.path(), "application.log");
    touch(dir.path(), "banana");
    let c = Completer::new(Vec::new(), None).with_cwd(dir.path());
    let out = c.complete("cat app", 7);
    assert_eq!(texts(&out), vec!["apple.txt", "application.log"]);
    assert_eq!(out.suffix, "l");
    assert_eq!(out.token_start, 4);
    assert!(out.items.iter().all(|i| i.kind == CompletionKind::File));
}

#[test]
fn directories_get_trailing_slash() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    let c = Completer::new(Vec::new(), None).with_cwd(dir.path());
    let out = c.complete("ls sr", 5);
    assert_eq!(texts(&out), vec!["src/"]);
    assert_eq!(out.items[0].kind, CompletionKind::Directory);
    assert_eq!(out.suffix, "c/");
}

#[test]
fn nested_fragment_keeps_directory_part() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    touch(&dir.path().join("src"), "main.rs");
    let c = Completer::new(Vec::new(), None).with_cwd(dir.path());
    let out = c.complete("vim src/ma", 10);
    assert_eq!(texts(&out), vec!["src/main.rs"]);
    assert_eq!(out.items[0].display, "main.rs");
    assert_eq!(out.suffix, "in.rs");
    assert_eq!(out.token_start, 4);
}

#[cfg(unix)]
#[test]
fn first_word_with_slash_completes_as_path() {
    let bin = tempfile::tempdir().unwrap();
    touch_exec(bin.path(), "run-tests");
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("scripts")).unwrap();
    touch_exec(&dir.path().join("scripts"), "run.sh");
    let c = Completer::new(vec![bin.path().to_path_buf()], None).with_cwd(dir.path());

    let out = c.complete("scripts/r", 9);
    assert_eq!(texts(&out), vec!["scripts/run.sh"]);
    assert_eq!(out.items[0].kind, CompletionKind::File);
    assert_eq!(out.token_start, 0);

    // Without the slash the same word is a command name.
    let out = c.complete("r", 1);
    assert_eq!(texts(&out), vec!["run-tests"]);
    assert_eq!(out.items[0].kind, CompletionKind::Command);
}

#[test]
fn hidden_entries_need_a_dot_prefix() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), ".env");
    touch(dir.path(), "env.sh");
    let c = Completer::new(Vec::new(), None).with_cwd(dir.path());
    assert_eq!(texts(&c.complete("cat ", 4)), vec!["env.sh"]);
    assert_eq!(texts(&c.complete("cat .e", 6)), vec![".env"]);
}

#[test]
fn trailing_whitespace_lists_directory() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "b");
    touch(dir.path(), "a");
    let c = Completer::new(Vec::new(), None).with_cwd(dir.path());
    let out = c.complete("ls ", 3);
    assert_eq!(texts(&out), vec!["a", "b"]);
    assert_eq!(out.token_start, 3);
    assert_eq!(out.suffix, "");
}

#[test]
fn unreadable_directory_yields_nothing() {
    let c = Completer::new(Vec::new(), None);
    let out = c.complete("cat /definitely/not/here/x", 26);
    assert!(out.is_empty());
    assert_eq!(out.suffix, "");
}

#[test]
fn tilde_expands_to_home() {
    let home = tempfile::tempdir().unwrap();
    fs::create_dir(home.path().join("docs")).unwrap();
    let c = Completer::new(Vec::new(), Some(home.path().to_path_buf()));
    let out = c.complete("cd ~/do", 7);
    assert_eq!(texts(&out), vec!["~/docs/"]);
    assert_eq!(out.suffix, "cs/");
}

#[test]
fn tilde_without_home_yields_nothing() {
    let c = Completer::new(Vec::new(), None);
    assert!(c.complete("cd ~/do", 7).is_empty());
}

#[test]
fn cursor_in_middle_completes_text_before_it() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "notes.md");
    let c = Completer::new(Vec::new(), None).with_cwd(dir.path());
    let out = c.complete("cat no | wc", 6);
    assert_eq!(texts(&out), vec!["notes.md"]);
    assert_eq!(out.suffix, "tes.md");
}
