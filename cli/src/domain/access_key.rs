//! Organization access key passed opaquely to the agent installer.
//!
//! Pure validation: no I/O. The only rule is the loose GUID shape:
//! 8-4-4-4-12 hex blocks, dashes optional, optionally wrapped in `{}` or `()`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::AccessKeyError;

pub static ACCESS_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern: cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[{(]?[0-9A-Fa-f]{8}-?(?:[0-9A-Fa-f]{4}-?){3}[0-9A-Fa-f]{12}[)}]?$")
        .expect("valid regex")
});

/// A validated access key. `Display` masks everything after the first block
/// so the key can be logged safely; use [`AccessKey::expose`] for the
/// installer command line.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessKey(String);

impl AccessKey {
    /// Validate `raw` against the GUID shape.
    ///
    /// # Errors
    ///
    /// Returns [`AccessKeyError::Malformed`] if the shape does not match.
    pub fn parse(raw: &str) -> Result<Self, AccessKeyError> {
        let trimmed = raw.trim();
        if ACCESS_KEY_RE.is_match(trimmed) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(AccessKeyError::Malformed)
        }
    }

    /// The key exactly as supplied (minus surrounding whitespace).
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// The key with every hex digit after the first eight replaced by `*`.
    #[must_use]
    pub fn masked(&self) -> String {
        let mut seen = 0usize;
        self.0
            .chars()
            .map(|c| {
                if c.is_ascii_hexdigit() {
                    seen += 1;
                    if seen > 8 { '*' } else { c }
                } else {
                    c
                }
            })
            .collect()
    }
}

impl FromStr for AccessKey {
    type Err = AccessKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessKey({})", self.masked())
    }
}
