//! Profile extractor
//!
//! Turns a profile page into a [`ProfileBody`]. Extraction is tolerant: each
//! field is read by a small function returning a [`FieldOutcome`], and the
//! caller decides what a skipped or invalid field means.
//!
//! # Field Policy
//!
//! | Field | Policy | On mismatch |
//! |-------|--------|-------------|
//! | Name (`h1`) | Required for a record | No record at all |
//! | Gender, birth year, club, licenses | Optional scalar | Field left absent |
//! | Competition title | Structural gate | Whole competition block skipped |
//! | Event row | Row-level skip | Row dropped, block kept |
//!
//! A competition that ends up with no accepted event rows is dropped.

use crate::model::{Competition, Event, ProfileBody};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// Label prefix in front of the elapsed time
const TIME_LABEL: &str = "Timp realizat:";

/// Label prefix in front of the placement
const PLACE_LABEL: &str = "Locul obtinut:";

/// Result of reading a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome<T> {
    /// The field was present and well formed
    Found(T),

    /// The field was not there, or the fragment did not have the expected shape
    Skipped,

    /// The field was there but its value could not be coerced
    Invalid,
}

impl<T> FieldOutcome<T> {
    /// Converts into an `Option`, treating both `Skipped` and `Invalid` as absent
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Skipped | Self::Invalid => None,
        }
    }

    /// Returns true if the field was found
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Identity attributes recognised in the key/value list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKey {
    Gender,
    BirthYear,
    Club,
    LpinLicense,
    FederationLicense,
}

/// Lower-case key substrings, checked in order; the first match wins
const ATTRIBUTE_MARKERS: &[(&str, AttributeKey)] = &[
    ("sexul", AttributeKey::Gender),
    ("anul nasterii", AttributeKey::BirthYear),
    ("legitimat la clubul", AttributeKey::Club),
    ("numar legitimatie lpin", AttributeKey::LpinLicense),
    ("numar legitimatie federatie", AttributeKey::FederationLicense),
];

/// Name, start date and end date parsed from a competition title line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionTitle {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

/// CSS selectors for the profile page layout
struct ProfileSelectors {
    heading: Selector,
    attribute_item: Selector,
    span: Selector,
    history: Selector,
    history_results: Selector,
    competition_box: Selector,
    competition_title: Selector,
    event_row: Selector,
    event_column: Selector,
}

fn selectors() -> &'static ProfileSelectors {
    static SELECTORS: OnceLock<ProfileSelectors> = OnceLock::new();

    SELECTORS.get_or_init(|| ProfileSelectors {
        heading: css("h1"),
        attribute_item: css("ul#sportiv-date li.group"),
        span: css("span"),
        history: css("div#istoric.open.group"),
        history_results: css("div.istoric-rezultate"),
        competition_box: css("div.box"),
        competition_title: css("div.box_titlu"),
        event_row: css("li.grid.grid-pad"),
        event_column: css("div.col-6-12, div.col-3-12"),
    })
}

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("static profile CSS selector is valid")
}

fn title_pattern() -> &'static Regex {
    static TITLE_PATTERN: OnceLock<Regex> = OnceLock::new();

    TITLE_PATTERN.get_or_init(|| {
        Regex::new(
            r"^(.*?)\s+(\d{1,2}\s+[A-Za-z]+\s+\d{4})\s*-\s*(\d{1,2}\s+[A-Za-z]+\s+\d{4})",
        )
        .expect("static competition title pattern is valid")
    })
}

/// Extracts a profile from raw page HTML
///
/// # Arguments
///
/// * `html` - The page body
///
/// # Returns
///
/// * `Some(ProfileBody)` - The page holds a profile
/// * `None` - The page has no primary heading, so no profile exists for it
///
/// # Example
///
/// ```
/// use swimmer_crawler::crawler::extract_profile;
///
/// let html = r#"<html><body><h1> Ana Ionescu </h1></body></html>"#;
/// let body = extract_profile(html).unwrap();
/// assert_eq!(body.name, "Ana Ionescu");
/// assert!(body.competitions.is_empty());
/// ```
pub fn extract_profile(html: &str) -> Option<ProfileBody> {
    let document = Html::parse_document(html);
    extract_from_document(&document)
}

/// Extracts a profile from an already parsed document
pub fn extract_from_document(document: &Html) -> Option<ProfileBody> {
    let name = extract_name(document).found()?;

    let mut body = ProfileBody {
        name,
        ..ProfileBody::default()
    };

    extract_attributes(document, &mut body);
    body.competitions = extract_competitions(document);

    Some(body)
}

/// Reads the primary heading
fn extract_name(document: &Html) -> FieldOutcome<String> {
    match document.select(&selectors().heading).next() {
        Some(heading) => {
            let name = element_text(heading);
            if name.is_empty() {
                FieldOutcome::Skipped
            } else {
                FieldOutcome::Found(name)
            }
        }
        None => FieldOutcome::Skipped,
    }
}

/// Reads the allow-listed identity attributes into `body`
///
/// Entries must hold exactly two spans (key, value); anything else and any
/// unrecognised key is ignored.
fn extract_attributes(document: &Html, body: &mut ProfileBody) {
    let selectors = selectors();

    for item in document.select(&selectors.attribute_item) {
        let spans: Vec<ElementRef> = item.select(&selectors.span).collect();
        if spans.len() != 2 {
            continue;
        }

        let key = element_text(spans[0]).to_lowercase();
        let value = element_text(spans[1]);

        let Some(attribute) = classify_attribute(&key) else {
            continue;
        };

        match attribute {
            AttributeKey::Gender => body.gender = Some(value),
            AttributeKey::BirthYear => body.birth_year = parse_birth_year(&value).found(),
            AttributeKey::Club => body.club = Some(value),
            AttributeKey::LpinLicense => body.lpin_license = Some(value),
            AttributeKey::FederationLicense => body.federation_license = Some(value),
        }
    }
}

/// Matches a lower-cased attribute key against the known markers
pub fn classify_attribute(key: &str) -> Option<AttributeKey> {
    ATTRIBUTE_MARKERS
        .iter()
        .find(|(marker, _)| key.contains(marker))
        .map(|(_, attribute)| *attribute)
}

/// Coerces birth year text to an integer
///
/// Returns `Invalid` rather than a default when the text is not a number.
pub fn parse_birth_year(value: &str) -> FieldOutcome<i32> {
    match value.trim().parse::<i32>() {
        Ok(year) => FieldOutcome::Found(year),
        Err(_) => FieldOutcome::Invalid,
    }
}

/// Splits a competition title line into name and date range
///
/// The expected shape is `<name> <d month yyyy> - <d month yyyy>`. Titles of
/// any other shape (section headers and the like) are `Skipped`.
///
/// # Example
///
/// ```
/// use swimmer_crawler::crawler::{parse_competition_title, FieldOutcome};
///
/// let title = parse_competition_title("Spring Cup 12 March 2023 - 15 March 2023");
/// let FieldOutcome::Found(title) = title else { panic!("title should match") };
/// assert_eq!(title.name, "Spring Cup");
/// assert_eq!(title.start_date, "12 March 2023");
/// assert_eq!(title.end_date, "15 March 2023");
/// ```
pub fn parse_competition_title(title: &str) -> FieldOutcome<CompetitionTitle> {
    let Some(captures) = title_pattern().captures(title) else {
        return FieldOutcome::Skipped;
    };

    FieldOutcome::Found(CompetitionTitle {
        name: captures[1].trim().to_string(),
        start_date: captures[2].trim().to_string(),
        end_date: captures[3].trim().to_string(),
    })
}

/// Reads every well-formed competition from the history region
fn extract_competitions(document: &Html) -> Vec<Competition> {
    let selectors = selectors();

    let Some(history) = document.select(&selectors.history).next() else {
        return Vec::new();
    };
    let Some(results) = history.select(&selectors.history_results).next() else {
        return Vec::new();
    };

    results
        .select(&selectors.competition_box)
        .filter_map(extract_competition)
        .collect()
}

/// Reads one competition block; `None` if the title does not match or no
/// event row was accepted
fn extract_competition(block: ElementRef) -> Option<Competition> {
    let selectors = selectors();

    let title = block.select(&selectors.competition_title).next()?;
    let title = parse_competition_title(&element_text(title)).found()?;

    let events: Vec<Event> = block
        .select(&selectors.event_row)
        .filter_map(|row| extract_event(row).found())
        .collect();

    if events.is_empty() {
        return None;
    }

    Some(Competition {
        name: title.name,
        start_date: title.start_date,
        end_date: title.end_date,
        events,
    })
}

/// Reads one event row; rows without exactly three columns are `Skipped`
fn extract_event(row: ElementRef) -> FieldOutcome<Event> {
    let columns: Vec<ElementRef> = row.select(&selectors().event_column).collect();
    if columns.len() != 3 {
        return FieldOutcome::Skipped;
    }

    FieldOutcome::Found(Event {
        name: element_text(columns[0]),
        time: strip_label(&raw_text(columns[1]), TIME_LABEL),
        place: strip_label(&raw_text(columns[2]), PLACE_LABEL),
    })
}

/// Removes a label from fragment text and trims the remainder
fn strip_label(text: &str, label: &str) -> String {
    text.replace(label, "").trim().to_string()
}

fn raw_text(element: ElementRef) -> String {
    element.text().collect()
}

fn element_text(element: ElementRef) -> String {
    raw_text(element).trim().to_string()
}
