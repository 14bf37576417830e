use std::fmt::Display;

use derive_deref::Deref;
use serde::{Deserialize, Serialize};

/// Opaque playlist identifier understood by the server. Never blank, and never `.` or `..`,
/// which cannot be sent as a path segment.
#[derive(Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Clone, Deref)]
pub struct PlaylistID(String);

impl PlaylistID {
    pub fn new(id: &str) -> Option<Self> {
        if id.trim().is_empty() || id == "." || id == ".." {
            None
        } else {
            Some(Self(id.to_string()))
        }
    }
}

impl Display for PlaylistID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
