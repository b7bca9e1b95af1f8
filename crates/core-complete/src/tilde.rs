//! `~` and `~user` expansion for directory listing.

use std::path::{Path, PathBuf};

/// Expand a leading `~` or `~user` in `dir`. `None` when the home directory
/// cannot be resolved (missing `HOME`, unknown user).
pub fn expand(dir: &str, home: Option<&Path>) -> Option<PathBuf> {
    let Some(rest) = dir.strip_prefix('~') else {
        return Some(PathBuf::from(dir));
    };
    let (user, tail) = match rest.find('/') {
        Some(i) => (&rest[..i], rest[i + 1..].trim_start_matches('/')),
        None => (rest, ""),
    };
    let base = if user.is_empty() {
        home?.to_path_buf()
    } else {
        user_home(user)?
    };
    Some(if tail.is_empty() { base } else { base.join(tail) })
}

#[cfg(unix)]
fn user_home(user: &str) -> Option<PathBuf> {
    let passwd = std::fs::read_to_string("/etc/passwd").ok()?;
    home_from_passwd(&passwd, user)
}

#[cfg(not(unix))]
fn user_home(_user: &str) -> Option<PathBuf> {
    None
}

/// Home directory field (6th) of `user`'s passwd entry.
#[cfg_attr(not(unix), allow(dead_code))]
fn home_from_passwd(passwd: &str, user: &str) -> Option<PathBuf> {
    passwd
        .lines()
        .filter(|l| !l.starts_with('#'))
        .map(|l| l.split(':').collect::<Vec<_>>())
        .find(|fields| fields.first() == Some(&user))
        .and_then(|fields| fields.get(5).map(|h| PathBuf::from(*h)))
        .filter(|p| !p.as_os_str().is_empty())
}
