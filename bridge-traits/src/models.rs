//! Data shapes exchanged with the host collaborators.
//!
//! These are produced by the scraper and the note layer and only ever read by
//! the core: once fetched, a [`Book`] or [`Highlight`] is immutable and owned
//! by whichever list currently holds it.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BridgeError;

/// A remote readable item (a Kindle book).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Stable identifier assigned by the remote platform
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_annotated_date: Option<NaiveDate>,
}

impl Book {
    pub fn new(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            asin: None,
            url: None,
            image_url: None,
            last_annotated_date: None,
        }
    }

    pub fn with_asin(mut self, asin: impl Into<String>) -> Self {
        self.asin = Some(asin.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_last_annotated_date(mut self, date: NaiveDate) -> Self {
        self.last_annotated_date = Some(date);
        self
    }
}

/// One excerpted passage belonging to a [`Book`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Reader's own note attached to the passage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<NaiveDateTime>,
}

impl Highlight {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            location: None,
            page: None,
            note: None,
            color: None,
            created_date: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_created_date(mut self, date: NaiveDateTime) -> Self {
        self.created_date = Some(date);
        self
    }
}

/// A local note previously produced from a remote [`Book`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindleFile {
    /// Vault-relative path of the note
    pub path: String,
    pub book: Book,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights_count: Option<u32>,
}

impl KindleFile {
    pub fn new(path: impl Into<String>, book: Book) -> Self {
        Self {
            path: path.into(),
            book,
            highlights_count: None,
        }
    }
}

/// Kind of change found when reconciling a note against remote highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Added,
    Updated,
    Removed,
}

/// One content change since the last sync of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    pub kind: DiffKind,
    pub highlight: Highlight,
}

impl Diff {
    pub fn added(highlight: Highlight) -> Self {
        Self {
            kind: DiffKind::Added,
            highlight,
        }
    }
}

/// Where highlights are synced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    #[default]
    Amazon,
    MyClippings,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::Amazon => "amazon",
            SyncMode::MyClippings => "my-clippings",
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncMode {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "amazon" => Ok(SyncMode::Amazon),
            "my-clippings" => Ok(SyncMode::MyClippings),
            _ => Err(BridgeError::Parse(format!("unknown sync mode: {}", s))),
        }
    }
}

/// Amazon storefront the account belongs to.
///
/// Highlight timestamps scraped from the notebook page are shifted by the
/// storefront's fixed offset before being rendered. Daylight saving is not
/// applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmazonRegion {
    #[default]
    Global,
    India,
    Japan,
    Spain,
    Germany,
    Italy,
    #[serde(rename = "UK")]
    Uk,
    France,
}

impl AmazonRegion {
    pub const ALL: [AmazonRegion; 8] = [
        AmazonRegion::Global,
        AmazonRegion::India,
        AmazonRegion::Japan,
        AmazonRegion::Spain,
        AmazonRegion::Germany,
        AmazonRegion::Italy,
        AmazonRegion::Uk,
        AmazonRegion::France,
    ];

    pub fn hostname(&self) -> &'static str {
        match self {
            AmazonRegion::Global => "amazon.com",
            AmazonRegion::India => "amazon.in",
            AmazonRegion::Japan => "amazon.co.jp",
            AmazonRegion::Spain => "amazon.es",
            AmazonRegion::Germany => "amazon.de",
            AmazonRegion::Italy => "amazon.it",
            AmazonRegion::Uk => "amazon.co.uk",
            AmazonRegion::France => "amazon.fr",
        }
    }

    /// Fixed UTC offset in minutes.
    pub fn utc_offset_minutes(&self) -> i64 {
        match self {
            AmazonRegion::Global | AmazonRegion::Uk => 0,
            AmazonRegion::India => 330,
            AmazonRegion::Japan => 540,
            AmazonRegion::Spain
            | AmazonRegion::Germany
            | AmazonRegion::Italy
            | AmazonRegion::France => 60,
        }
    }

    pub fn utc_offset(&self) -> Duration {
        Duration::minutes(self.utc_offset_minutes())
    }

    /// Detect the region from a storefront hostname, falling back to global.
    pub fn from_hostname(hostname: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .filter(|region| *region != AmazonRegion::Global)
            .find(|region| hostname.contains(region.hostname()))
            .unwrap_or(AmazonRegion::Global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_serializes_camel_case() {
        let book = Book::new("B1", "Dune", "Frank Herbert")
            .with_asin("B00B7NPRY8")
            .with_last_annotated_date(NaiveDate::from_ymd_opt(2023, 5, 4).unwrap());

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["id"], "B1");
        assert_eq!(json["lastAnnotatedDate"], "2023-05-04");
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_sync_mode_parsing() {
        assert_eq!("amazon".parse::<SyncMode>().unwrap(), SyncMode::Amazon);
        assert_eq!(
            "My-Clippings".parse::<SyncMode>().unwrap(),
            SyncMode::MyClippings
        );
        assert!("kobo".parse::<SyncMode>().is_err());
        assert_eq!(SyncMode::default().to_string(), "amazon");
    }

    #[test]
    fn test_region_from_hostname() {
        assert_eq!(
            AmazonRegion::from_hostname("read.amazon.co.jp"),
            AmazonRegion::Japan
        );
        assert_eq!(
            AmazonRegion::from_hostname("read.amazon.co.uk"),
            AmazonRegion::Uk
        );
        assert_eq!(
            AmazonRegion::from_hostname("read.amazon.com"),
            AmazonRegion::Global
        );
        assert_eq!(AmazonRegion::from_hostname("example.org"), AmazonRegion::Global);
    }

    #[test]
    fn test_region_offsets() {
        assert_eq!(AmazonRegion::India.utc_offset(), Duration::minutes(330));
        assert_eq!(AmazonRegion::Japan.utc_offset_minutes(), 540);
        assert_eq!(AmazonRegion::Germany.utc_offset_minutes(), 60);
        assert_eq!(AmazonRegion::Uk.utc_offset_minutes(), 0);
    }
}
