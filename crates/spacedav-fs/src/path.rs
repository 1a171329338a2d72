//! Lexical virtual-path normalization.
//!
//! Purely computational: nothing here touches the filesystem, so symlink
//! tricks cannot influence the result (the real tree is only reached after
//! namespace substitution).

use std::path::PathBuf;

use thiserror::Error;

/// The path used `..` to climb above the namespace root.
#[derive(Debug, Error)]
#[error("path traverses above the namespace root: {0}")]
pub struct PathEscape(pub String);

/// Normalize a client-supplied virtual path into clean segments.
///
/// Leading and redundant separators are trimmed, `.` and empty segments are
/// dropped, and `..` is resolved lexically. An empty result is valid and
/// means the namespace listing root.
///
/// # Errors
///
/// Returns [`PathEscape`] if `..` would climb above the first segment's
/// namespace root.
pub fn clean_virtual_path(raw: &str) -> Result<Vec<String>, PathEscape> {
    let mut segments: Vec<String> = Vec::new();
    for part in raw.split('/') {
        match part {
            "" | "." => {},
            ".." => {
                if segments.pop().is_none() {
                    return Err(PathEscape(raw.to_owned()));
                }
            },
            seg => segments.push(seg.to_owned()),
        }
    }
    Ok(segments)
}

/// Join cleaned segments under a real prefix.
#[must_use]
pub fn join_real(prefix: &str, segments: &[String]) -> PathBuf {
    let mut path = PathBuf::from(prefix);
    for seg in segments {
        path.push(seg);
    }
    path
}
