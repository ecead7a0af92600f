use moov_db::models::VenueRow;

/// In-memory copy of the venue table used by search.
#[derive(Debug, Default)]
pub struct VenueCatalog {
    venues: Vec<VenueRow>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome<'a> {
    /// No venue data was loaded at startup.
    NoData,
    /// Possibly empty list of matches, in catalog order.
    Matches(Vec<&'a VenueRow>),
}

impl VenueCatalog {
    pub fn new(venues: Vec<VenueRow>) -> Self {
        Self { venues }
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    /// Venues whose name or type contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> SearchOutcome<'_> {
        if self.venues.is_empty() {
            return SearchOutcome::NoData;
        }

        let query = query.trim().to_lowercase();
        SearchOutcome::Matches(
            self.venues
                .iter()
                .filter(|v| {
                    v.name.to_lowercase().contains(&query) || v.kind.to_lowercase().contains(&query)
                })
                .collect(),
        )
    }
}
