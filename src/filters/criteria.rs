/// What the user wants to delete
///
/// Replaced wholesale whenever the user edits the query or toggles a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring to look for; empty matches everything
    pub query: String,
    /// Include one-to-one conversations
    pub include_direct: bool,
    /// Include server channels, threads and group DMs
    pub include_groups: bool,
}

impl FilterCriteria {
    pub fn new(query: impl Into<String>, include_direct: bool, include_groups: bool) -> Self {
        Self { query: query.into(), include_direct, include_groups }
    }

    /// Criteria matching every message in both collections
    pub fn all() -> Self {
        Self::new("", true, true)
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn is_match_all(&self) -> bool {
        self.query.is_empty() && self.include_direct && self.include_groups
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::all()
    }
}
