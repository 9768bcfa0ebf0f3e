use std::str::FromStr;

use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortBy {
    #[default]
    Name,
    Size,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Which entry kinds survive a listing or search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FilterType {
    #[default]
    All,
    /// Videos plus directories, so navigation stays possible.
    Video,
    Directory,
    /// Every non-video file.
    Other,
}

impl FilterType {
    pub fn admits(self, is_directory: bool, is_video: bool) -> bool {
        match self {
            FilterType::All => true,
            FilterType::Video => is_directory || is_video,
            FilterType::Directory => is_directory,
            FilterType::Other => !is_directory && !is_video,
        }
    }
}

impl FromStr for SortBy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortBy::Name),
            "size" => Ok(SortBy::Size),
            "date" => Ok(SortBy::Date),
            _ => Err(ModelError::InvalidValue {
                field: "sortBy",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ModelError::InvalidValue {
                field: "sortOrder",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for FilterType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterType::All),
            "video" => Ok(FilterType::Video),
            "directory" => Ok(FilterType::Directory),
            "other" => Ok(FilterType::Other),
            _ => Err(ModelError::InvalidValue {
                field: "filterType",
                value: s.to_string(),
            }),
        }
    }
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::Size => "size",
            SortBy::Date => "date",
        }
    }
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FilterType {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterType::All => "all",
            FilterType::Video => "video",
            FilterType::Directory => "directory",
            FilterType::Other => "other",
        }
    }
}

/// Parameters of one directory listing. Immutable per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct BrowseQuery {
    pub path: String,
    #[cfg_attr(feature = "serde", serde(rename = "search"))]
    pub search_term: String,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub filter_type: FilterType,
}

impl BrowseQuery {
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn sorted(mut self, by: SortBy, order: SortOrder) -> Self {
        self.sort_by = by;
        self.sort_order = order;
        self
    }

    pub fn filtered(mut self, filter: FilterType) -> Self {
        self.filter_type = filter;
        self
    }
}

/// Parameters of a whole-tree search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchQuery {
    pub q: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub filter_type: FilterType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_filter_keeps_directories_for_navigation() {
        assert!(FilterType::Video.admits(true, false));
        assert!(FilterType::Video.admits(false, true));
        assert!(!FilterType::Video.admits(false, false));
    }

    #[test]
    fn other_filter_keeps_only_non_video_files() {
        assert!(FilterType::Other.admits(false, false));
        assert!(!FilterType::Other.admits(false, true));
        assert!(!FilterType::Other.admits(true, false));
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("DESC".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert_eq!(" date ".parse::<SortBy>(), Ok(SortBy::Date));
        assert_eq!("Directory".parse::<FilterType>(), Ok(FilterType::Directory));
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn browse_query_uses_wire_names() {
        let query: BrowseQuery = serde_json::from_str(
            r#"{"path":"movies","search":"clip","sortBy":"size","sortOrder":"desc","filterType":"video"}"#,
        )
        .unwrap();
        assert_eq!(query.search_term, "clip");
        assert_eq!(query.sort_by, SortBy::Size);
        assert_eq!(query.sort_order, SortOrder::Desc);
        assert_eq!(query.filter_type, FilterType::Video);
    }
}
