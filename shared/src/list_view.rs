use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Location, RecordId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailPanel {
    pub image_url: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
}

impl DetailPanel {
    fn from_location(location: &Location, placeholder_image: &str) -> Self {
        Self {
            image_url: location.image_or(placeholder_image).to_string(),
            street: location.street().to_string(),
            city: location.city().to_string(),
            province: location.province().to_string(),
            postal_code: location.postal_code().to_string(),
            country: location.country().to_string(),
        }
    }

    /// Labelled address lines in display order.
    #[must_use]
    pub fn lines(&self) -> [(&'static str, &str); 5] {
        [
            ("Street", self.street.as_str()),
            ("City", self.city.as_str()),
            ("Province", self.province.as_str()),
            ("Postal code", self.postal_code.as_str()),
            ("Country", self.country.as_str()),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: RecordId,
    pub label: String,
    pub detail: DetailPanel,
}

/// Result of one accordion step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Expanded(RecordId),
    Switched { from: RecordId, to: RecordId },
    Collapsed(RecordId),
}

impl Activation {
    /// Entry left expanded after this step, if any.
    #[must_use]
    pub const fn active(self) -> Option<RecordId> {
        match self {
            Self::Expanded(id) | Self::Switched { to: id, .. } => Some(id),
            Self::Collapsed(_) => None,
        }
    }
}

/// Sidebar list. Expansion is derived from `active` alone, so at most one
/// entry can ever be open.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListPanel {
    entries: Vec<ListEntry>,
    active: Option<RecordId>,
}

impl ListPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the list and appends one collapsed entry per mappable record.
    pub fn render<'a, I>(&mut self, records: I, placeholder_image: &str)
    where
        I: IntoIterator<Item = (RecordId, &'a Location)>,
    {
        self.entries.clear();
        self.active = None;

        for (id, location) in records {
            if !location.is_mappable() || self.entry(id).is_some() {
                continue;
            }
            self.entries.push(ListEntry {
                id,
                label: location.display_name(),
                detail: DetailPanel::from_location(location, placeholder_image),
            });
        }

        debug!(entries = self.entries.len(), "list entries rebuilt");
    }

    /// Accordion toggle. `None` when `id` has no entry in the current list.
    pub fn activate(&mut self, id: RecordId) -> Option<Activation> {
        self.entry(id)?;

        let step = match self.active {
            None => Activation::Expanded(id),
            Some(current) if current == id => Activation::Collapsed(id),
            Some(current) => Activation::Switched {
                from: current,
                to: id,
            },
        };
        self.active = step.active();
        Some(step)
    }

    #[must_use]
    pub fn entry(&self, id: RecordId) -> Option<&ListEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    #[must_use]
    pub const fn active(&self) -> Option<RecordId> {
        self.active
    }

    #[must_use]
    pub fn is_expanded(&self, id: RecordId) -> bool {
        self.active == Some(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
