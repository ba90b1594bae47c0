use tracing::{debug, instrument};

use crate::model::{Location, RecordId};

/// Lower-cased search term, built once per filter pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchTerm(String);

impl SearchTerm {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.to_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Street, city, province or country contains the term, ignoring case.
    /// A missing field never matches, but does not stop the others from matching.
    #[must_use]
    pub fn matches(&self, location: &Location) -> bool {
        if self.is_empty() {
            return true;
        }

        [
            &location.street,
            &location.city,
            &location.province,
            &location.country,
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(self.as_str()))
    }
}

#[must_use]
pub fn matches(term: &str, location: &Location) -> bool {
    SearchTerm::new(term).matches(location)
}

/// Ids of every record in `dataset` matching `term`, in dataset order.
#[instrument(level = "debug", skip(dataset), fields(records = dataset.len()))]
pub fn filter_dataset(dataset: &[Location], term: &str) -> Vec<RecordId> {
    let term = SearchTerm::new(term);
    let ids: Vec<RecordId> = dataset
        .iter()
        .enumerate()
        .filter(|(_, location)| term.matches(location))
        .map(|(index, _)| RecordId::new(index))
        .collect();

    debug!(matched = ids.len(), "filter applied");
    ids
}
