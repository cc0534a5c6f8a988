//! Positional category tables for the categorical feature columns.

/// An ordered list of known labels. The position of a label is its encoded
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTable {
    name: &'static str,
    labels: &'static [&'static str],
}

pub const MPAA_RATINGS: CategoryTable = CategoryTable::new(
    "MPAA",
    &["G", "PG", "PG-13", "R", "NC-17", "Not Rated"],
);

pub const DISTRIBUTORS: CategoryTable = CategoryTable::new(
    "distributor",
    &[
        "Warner Bros.",
        "Universal",
        "Paramount Pictures",
        "Walt Disney Studios",
        "20th Century Fox",
        "Sony Pictures",
        "Lionsgate",
        "MGM",
        "Others",
    ],
);

impl CategoryTable {
    pub const fn new(name: &'static str, labels: &'static [&'static str]) -> Self {
        CategoryTable { name, labels }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of `label` in the table, if it is a known label.
    pub fn lookup(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|known| *known == label)
    }

    /// Encoded value for `label`.
    ///
    /// Unknown labels encode to 0, which is also the index of the first
    /// real entry. The trained model was fit with this conflation, so it
    /// must not be changed without retraining.
    pub fn encode(&self, label: &str) -> usize {
        self.lookup(label).unwrap_or(0)
    }
}
