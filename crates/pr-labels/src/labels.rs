//! Insertion-ordered set of label identifiers.

use indexmap::IndexMap;
use serde::Serialize;

/// Identifiers seen so far, in first-insertion order.
///
/// Serializes as a JSON object mapping each identifier to `true`, which is the
/// shape of the `labels-object` output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelSet {
    entries: IndexMap<String, bool>,
}

impl LabelSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identifier. Re-inserting an existing identifier keeps its
    /// original position.
    pub fn insert(&mut self, identifier: impl Into<String>) {
        self.entries.insert(identifier.into(), true);
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Space-joined identifiers with a leading and trailing space, so every
    /// identifier can be matched as ` name ` in a workflow expression.
    ///
    /// An empty set yields exactly two spaces.
    #[must_use]
    pub fn to_delimited_string(&self) -> String {
        let joined = self.identifiers().collect::<Vec<_>>().join(" ");
        format!(" {joined} ")
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for identifier in iter {
            set.insert(identifier);
        }
        set
    }
}
