//! Console group path the device is moved into after install.

use std::fmt;

/// Root every group path hangs off unless configured otherwise.
pub const DEFAULT_ROOT_GROUP: &str = "Default Group";

/// Full group path: `Root/Group` or `Root/Parent/Group`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPath(String);

impl GroupPath {
    /// Compose the path from optional CLI values.
    ///
    /// Empty or whitespace-only names count as unset. Returns `None` when no
    /// group name is given; a parent on its own is ignored.
    #[must_use]
    pub fn compose(root: &str, group: Option<&str>, parent: Option<&str>) -> Option<Self> {
        let group = non_blank(group)?;
        let path = match non_blank(parent) {
            Some(parent) => format!("{root}/{parent}/{group}"),
            None => format!("{root}/{group}"),
        };
        Some(Self(path))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `Some(trimmed)` if `value` has any non-whitespace content.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
