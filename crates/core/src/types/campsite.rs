//! Campsite identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// An opaque campsite identifier in canonical string form.
///
/// Campsite ids arrive in different representations (a bare id string in a
/// URL path, the id field of a referenced campsite document in a request
/// body). Equality checks between mixed representations are a classic source
/// of duplicate entries, so this type normalizes on construction: every
/// `CampsiteId` holds the trimmed, ASCII-lowercased form of its input.
/// Comparing two `CampsiteId`s is therefore always a canonical-form
/// comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
#[serde(into = "String")]
pub struct CampsiteId(String);

impl CampsiteId {
    /// Create a campsite id, normalizing the input to canonical form.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_lowercase())
    }

    /// Get the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CampsiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CampsiteId {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for CampsiteId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<CampsiteId> for String {
    fn from(id: CampsiteId) -> Self {
        id.0
    }
}
