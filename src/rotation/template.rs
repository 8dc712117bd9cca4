//! Time-token file name templates
//!
//! Recognized tokens:
//!
//! | Token | Field | Width |
//! |---|---|---|
//! | `%Y` | year | 4 |
//! | `%m` | month | 2 |
//! | `%d` | day | 2 |
//! | `%H` | hour | 2 |
//! | `%M` | minute | 2 |
//! | `%S` | second | 2 |
//!
//! Anything else is copied verbatim.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use chrono::{Datelike, Timelike};

/// Template used when none is configured
pub const DEFAULT_TEMPLATE: &str = "http-%Y%m%d.log";

/// Immutable log file name template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
    raw: String,
}

impl FilenameTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if at least one time token appears in the template
    pub fn has_time_tokens(&self) -> bool {
        ["%Y", "%m", "%d", "%H", "%M", "%S"]
            .iter()
            .any(|token| self.raw.contains(token))
    }

    /// Substitutes every token with the matching field of `now` and cleans
    /// the resulting path.
    ///
    /// Pure: the same instant always yields the same path.
    pub fn resolve<T: Datelike + Timelike>(&self, now: &T) -> PathBuf {
        let name = self
            .raw
            .replace("%Y", &format!("{:04}", now.year()))
            .replace("%m", &format!("{:02}", now.month()))
            .replace("%d", &format!("{:02}", now.day()))
            .replace("%H", &format!("{:02}", now.hour()))
            .replace("%M", &format!("{:02}", now.minute()))
            .replace("%S", &format!("{:02}", now.second()));
        clean_path(&name)
    }
}

impl Default for FilenameTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl fmt::Display for FilenameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Lexically cleans a resolved name without touching the filesystem.
///
/// - `.` components and repeated or trailing separators are dropped
/// - `..` removes the preceding normal component
/// - `..` directly after the root is dropped
/// - leading `..` of a relative path is kept
///
/// An empty result becomes `.`.
fn clean_path(name: &str) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in Path::new(name).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    let cleaned: PathBuf = parts.iter().collect();
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}
