//! Request and response bodies of the DocVault HTTP API.
//!
//! These are deliberately flat (numbers, strings, timestamps) so the OpenAPI schema stays
//! readable; conversion into the validated core types happens here.

use chrono::{DateTime, Utc};
use docvault_core::{
    Action, Booking, BookingDraft, BookingPatch, ContentHash, Customer, Document, DocumentDraft,
    DocumentPatch, Job, NonEmptyText, Retrieved, Uploaded, Version,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

impl MessageRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DocumentRes {
    pub id: i64,
    pub path: String,
    pub title: String,
    /// Whole-unit version, e.g. `2.0`.
    #[schema(example = 1.0)]
    pub version: f64,
    pub author: String,
    /// Lowercase hex SHA-256 of the content.
    pub hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentRes {
    fn from(document: Document) -> Self {
        Self {
            id: document.id.get(),
            path: document.path,
            title: document.title,
            version: document.version.as_f64(),
            author: document.author,
            hash: document.hash.as_str().to_string(),
            created_at: document.created_at,
            updated_at: document.updated_at,
        }
    }
}

/// A document with its file content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DocumentDetailRes {
    pub document: DocumentRes,
    /// File content decoded as UTF-8 (lossy); empty when the file could not be read.
    pub body: String,
    /// Why the body is empty, when it could not be read.
    pub body_error: Option<String>,
}

impl From<Retrieved> for DocumentDetailRes {
    fn from(retrieved: Retrieved) -> Self {
        Self {
            body: String::from_utf8_lossy(retrieved.body.bytes()).into_owned(),
            body_error: retrieved.body.error().map(str::to_string),
            document: retrieved.document.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UploadRes {
    pub document: DocumentRes,
    /// `insert` or `update`
    #[schema(example = "insert")]
    pub action: String,
}

impl From<Uploaded> for UploadRes {
    fn from(uploaded: Uploaded) -> Self {
        Self {
            document: uploaded.document.into(),
            action: uploaded.action.as_str().to_string(),
        }
    }
}

impl UploadRes {
    pub fn action(&self) -> Option<Action> {
        match self.action.as_str() {
            "insert" => Some(Action::Insert),
            "update" => Some(Action::Update),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateDocumentReq {
    pub title: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub version: Option<f64>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
}

impl CreateDocumentReq {
    pub fn into_draft(self) -> Result<DocumentDraft, String> {
        Ok(DocumentDraft {
            title: NonEmptyText::new(&self.title).map_err(|e| format!("title: {e}"))?,
            path: self.path,
            version: self.version.map(parse_version).transpose()?,
            author: self.author,
            hash: self
                .hash
                .map(|h| ContentHash::parse(&h).map_err(|e| format!("hash: {e}")))
                .transpose()?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateDocumentReq {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub version: Option<f64>,
    #[serde(default)]
    pub author: Option<String>,
}

impl UpdateDocumentReq {
    pub fn into_patch(self) -> Result<DocumentPatch, String> {
        Ok(DocumentPatch {
            path: self.path,
            title: self
                .title
                .map(|t| NonEmptyText::new(&t).map_err(|e| format!("title: {e}")))
                .transpose()?,
            version: self.version.map(parse_version).transpose()?,
            author: self.author,
        })
    }
}

fn parse_version(value: f64) -> Result<Version, String> {
    Version::from_f64(value).map_err(|e| format!("version: {e}"))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomerDto {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobDto {
    #[serde(default)]
    pub serial_no: String,
    #[serde(default)]
    pub instrument_model: String,
    #[serde(default)]
    pub manufacturer: String,
}

impl From<CustomerDto> for Customer {
    fn from(dto: CustomerDto) -> Self {
        Customer { name: dto.name }
    }
}

impl From<Customer> for CustomerDto {
    fn from(customer: Customer) -> Self {
        CustomerDto {
            name: customer.name,
        }
    }
}

impl From<JobDto> for Job {
    fn from(dto: JobDto) -> Self {
        Job {
            serial_no: dto.serial_no,
            instrument_model: dto.instrument_model,
            manufacturer: dto.manufacturer,
        }
    }
}

impl From<Job> for JobDto {
    fn from(job: Job) -> Self {
        JobDto {
            serial_no: job.serial_no,
            instrument_model: job.instrument_model,
            manufacturer: job.manufacturer,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateBookingReq {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    #[serde(default)]
    pub customer: CustomerDto,
    #[serde(default)]
    pub job: JobDto,
}

impl From<CreateBookingReq> for BookingDraft {
    fn from(req: CreateBookingReq) -> Self {
        BookingDraft {
            summary: req.summary,
            description: req.description,
            location: req.location,
            start_date_time: req.start_date_time,
            end_date_time: req.end_date_time,
            customer: req.customer.into(),
            job: req.job.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateBookingReq {
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
    pub customer: Option<CustomerDto>,
    #[serde(default)]
    pub job: Option<JobDto>,
}

impl From<UpdateBookingReq> for BookingPatch {
    fn from(req: UpdateBookingReq) -> Self {
        BookingPatch {
            summary: req.summary,
            description: req.description,
            location: req.location,
            start_date_time: req.start_date_time,
            end_date_time: req.end_date_time,
            customer: req.customer.map(Into::into),
            job: req.job.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookingRes {
    pub id: i64,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub customer: CustomerDto,
    pub job: JobDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingRes {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.get(),
            summary: booking.summary,
            description: booking.description,
            location: booking.location,
            start_date_time: booking.start_date_time,
            end_date_time: booking.end_date_time,
            customer: booking.customer.into(),
            job: booking.job.into(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}
