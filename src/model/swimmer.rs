/// Record types produced by the profile extractor
///
/// Field names on the wire follow the established dataset layout
/// (`swimmer_id`, `competition_name`, `event_name`, ...), so files written by
/// this crate stay interchangeable with earlier exports.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single swimmer profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwimmerRecord {
    /// Catalog identifier the profile was fetched under
    #[serde(rename = "swimmer_id")]
    pub id: u64,

    /// Display name from the page heading; never empty
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    /// Birth year; absent when the page text was not a number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lpin_license: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub federation_license: Option<String>,

    /// Competition history in page order; every entry has at least one event
    #[serde(default)]
    pub competitions: Vec<Competition>,

    /// When the record was extracted
    pub last_updated: DateTime<Utc>,
}

/// A competition entry from the profile history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    #[serde(rename = "competition_name")]
    pub name: String,

    /// Stored verbatim, e.g. `12 March 2023`
    pub start_date: String,

    /// Stored verbatim, e.g. `15 March 2023`
    pub end_date: String,

    pub events: Vec<Event>,
}

/// A single swum event within a competition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "event_name")]
    pub name: String,
    pub time: String,
    pub place: String,
}

/// Everything the extractor reads from a page, before the fetcher stamps the
/// identifier and extraction time onto it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileBody {
    pub name: String,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    pub club: Option<String>,
    pub lpin_license: Option<String>,
    pub federation_license: Option<String>,
    pub competitions: Vec<Competition>,
}

impl SwimmerRecord {
    /// Builds a record from an extracted body
    ///
    /// # Arguments
    ///
    /// * `id` - The identifier the page was fetched under
    /// * `body` - The extracted profile content
    /// * `last_updated` - Extraction timestamp
    pub fn from_body(id: u64, body: ProfileBody, last_updated: DateTime<Utc>) -> Self {
        Self {
            id,
            name: body.name,
            gender: body.gender,
            birth_year: body.birth_year,
            club: body.club,
            lpin_license: body.lpin_license,
            federation_license: body.federation_license,
            competitions: body.competitions,
            last_updated,
        }
    }

    /// Returns the total number of events across all competitions
    pub fn event_count(&self) -> usize {
        self.competitions.iter().map(|c| c.events.len()).sum()
    }
}
