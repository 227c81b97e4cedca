//! Records persisted by DocVault.

use chrono::{DateTime, Utc};
use docvault_types::{ContentHash, NonEmptyText, Version};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store-assigned identifier of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(i64);

impl DocumentId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Metadata of one managed file.
///
/// The file content itself is never part of this record; see
/// [`crate::documents::Retrieved`] for the read path that pairs a document with its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub id: DocumentId,
    /// `<storage-root>/<original filename>`
    pub path: String,
    pub title: String,
    pub version: Version,
    /// Empty until an identity system exists.
    pub author: String,
    pub hash: ContentHash,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// The mutable fields of this record, as they would be written back.
    pub fn fields(&self) -> NewDocument {
        NewDocument {
            path: self.path.clone(),
            title: self.title.clone(),
            version: self.version,
            author: self.author.clone(),
            hash: self.hash.clone(),
        }
    }
}

/// Everything a store needs to insert a document or overwrite an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub path: String,
    pub title: String,
    pub version: Version,
    pub author: String,
    pub hash: ContentHash,
}

/// Metadata-only document creation (no file upload).
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentDraft {
    pub title: NonEmptyText,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub version: Option<Version>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub hash: Option<ContentHash>,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentPatch {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub title: Option<NonEmptyText>,
    #[serde(default)]
    pub version: Option<Version>,
    #[serde(default)]
    pub author: Option<String>,
}

impl DocumentPatch {
    pub fn is_empty(&self) -> bool {
        self.path.is_none()
            && self.title.is_none()
            && self.version.is_none()
            && self.author.is_none()
    }
}

/// Store-assigned identifier of a [`Booking`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(i64);

impl BookingId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookingId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: String,
}

/// The instrument a booking is for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub serial_no: String,
    #[serde(default)]
    pub instrument_model: String,
    #[serde(default)]
    pub manufacturer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    pub id: BookingId,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub customer: Customer,
    pub job: Job,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn fields(&self) -> BookingDraft {
        BookingDraft {
            summary: self.summary.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            start_date_time: self.start_date_time,
            end_date_time: self.end_date_time,
            customer: self.customer.clone(),
            job: self.job.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookingDraft {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    #[serde(default)]
    pub customer: Customer,
    #[serde(default)]
    pub job: Job,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingPatch {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub job: Option<Job>,
}
