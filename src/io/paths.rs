//! Safe filenames and default save locations.
use std::path::{Path, PathBuf};

use chrono::Local;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// Turns arbitrary text into a filename fragment.
///
/// Characters outside `[A-Za-z0-9_.-]` become `_`; runs of `_` collapse,
/// `_` runs directly before a `.` are dropped, runs of `.` collapse, and
/// leading/trailing `_`/`.` are stripped. May return an empty string.
#[must_use]
pub fn sanitize_filename(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.trim().chars() {
        let c = if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
            c
        } else {
            '_'
        };
        match c {
            '_' if out.ends_with('_') => {}
            '.' => {
                while out.ends_with('_') {
                    out.pop();
                }
                if !out.ends_with('.') {
                    out.push('.');
                }
            }
            _ => out.push(c),
        }
    }
    out.trim_matches(|c| c == '_' || c == '.').to_owned()
}

/// The user's Downloads directory when it exists, else the temp directory.
///
/// Never creates directories.
#[must_use]
pub fn default_save_dir() -> PathBuf {
    default_save_dir_from(home_dir().as_deref())
}

/// [`default_save_dir`] against an explicit home directory.
#[must_use]
pub fn default_save_dir_from(home: Option<&Path>) -> PathBuf {
    if let Some(home) = home {
        let downloads = home.join("Downloads");
        if downloads.is_dir() {
            return downloads;
        }
    }
    std::env::temp_dir()
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Local time formatted as `YYYY-MM-DD_HHMMSS`.
#[must_use]
pub fn timestamp_for_filename() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// File name for `title`: the sanitized title, or
/// `<basename>_<timestamp>` when the title sanitizes to nothing.
#[must_use]
pub fn default_file_stem(title: &str, basename: &str) -> String {
    let stem = sanitize_filename(title);
    if stem.is_empty() {
        format!("{basename}_{}", timestamp_for_filename())
    } else {
        stem
    }
}

/// Full default save path for `title` with `extension` (no leading dot).
#[must_use]
pub fn default_file_name(title: &str, extension: &str, basename: &str) -> PathBuf {
    default_save_dir().join(format!("{}.{extension}", default_file_stem(title, basename)))
}

/// Appends `.extension` unless `filename` already ends with it (case-insensitive).
#[must_use]
pub fn ensure_extension(filename: &str, extension: &str) -> String {
    let dotted = format!(".{}", extension.to_ascii_lowercase());
    if filename.to_ascii_lowercase().ends_with(&dotted) {
        filename.to_owned()
    } else {
        format!("{filename}{dotted}")
    }
}

/// Extension after the last dot, or `""` for none, a leading dot, or a trailing dot.
#[must_use]
pub fn extension_of(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(i) if i > 0 && i + 1 < filename.len() => &filename[i + 1..],
        _ => "",
    }
}
