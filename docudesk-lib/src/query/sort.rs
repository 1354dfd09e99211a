//! Sort direction and sort configuration.

use serde::Deserialize;
use serde::Serialize;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    #[default]
    Desc,
}

impl SortDirection {
    /// The wire value, `asc` or `desc`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Parses `asc` / `desc`, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Arrow shown next to a sorted column header.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The active sort of a list. `None` key or direction means unsorted.
///
/// # Example
///
/// ```
/// use docudesk_lib::query::{SortConfig, SortDirection};
///
/// let sort = SortConfig::new("name", SortDirection::Asc);
/// assert_eq!(sort.toggled("name").direction, Some(SortDirection::Desc));
/// assert_eq!(sort.toggled("created_at").direction, Some(SortDirection::Asc));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig<K> {
    pub key: Option<K>,
    pub direction: Option<SortDirection>,
}

impl<K> Default for SortConfig<K> {
    fn default() -> Self {
        Self::unsorted()
    }
}

impl<K> SortConfig<K> {
    /// No sort.
    pub fn unsorted() -> Self {
        Self {
            key: None,
            direction: None,
        }
    }

    /// Sort by `key` in `direction`.
    pub fn new(key: K, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction: Some(direction),
        }
    }

    /// Returns `true` if no sort is active.
    pub fn is_unsorted(&self) -> bool {
        self.key.is_none() || self.direction.is_none()
    }
}

impl<K: PartialEq> SortConfig<K> {
    /// The sort that results from clicking the header of `key`.
    ///
    /// Clicking the active ascending column flips it to descending; any
    /// other click sorts that column ascending.
    pub fn toggled(&self, key: K) -> Self {
        let direction = match (&self.key, self.direction) {
            (Some(current), Some(SortDirection::Asc)) if *current == key => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        Self::new(key, direction)
    }

    /// Arrow to show on the header of `key`, if it is the active sort.
    pub fn glyph_for(&self, key: &K) -> Option<&'static str> {
        match (&self.key, self.direction) {
            (Some(current), Some(direction)) if current == key => Some(direction.glyph()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!(SortDirection::parse("ASC"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("sideways"), None);
    }

    #[test]
    fn toggling_descending_column_goes_ascending() {
        let sort = SortConfig::new("name", SortDirection::Desc);
        assert_eq!(sort.toggled("name"), SortConfig::new("name", SortDirection::Asc));
    }

    #[test]
    fn glyph_only_on_active_column() {
        let sort = SortConfig::new("name", SortDirection::Desc);
        assert_eq!(sort.glyph_for(&"name"), Some("↓"));
        assert_eq!(sort.glyph_for(&"status"), None);
        assert_eq!(SortConfig::<&str>::unsorted().glyph_for(&"name"), None);
    }
}
