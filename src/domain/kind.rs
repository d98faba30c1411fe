use std::fmt;

/// Path of the bulk snapshot holding every flag and segment.
pub const ALL_DATA_PATH: &str = "/sdk/latest-all";

/// Kinds of entity that can be looked up one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Features,
    Segments,
}

impl DataKind {
    /// Prefix the entity key is appended to.
    pub fn request_path(&self) -> &'static str {
        match self {
            DataKind::Features => "/sdk/latest-flags/",
            DataKind::Segments => "/sdk/latest-segments/",
        }
    }

    pub fn path_for(&self, key: &str) -> String {
        format!("{}{}", self.request_path(), key)
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKind::Features => write!(f, "features"),
            DataKind::Segments => write!(f, "segments"),
        }
    }
}
