//! Instrument bookings.

use crate::error::{BookingError, BookingResult};
use crate::model::{Booking, BookingDraft, BookingId, BookingPatch};
use crate::store::Database;

#[derive(Clone, Debug)]
pub struct BookingService {
    db: Database,
}

impl BookingService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn get(&self, id: BookingId) -> BookingResult<Booking> {
        self.db.get_booking(id)?.ok_or(BookingError::NotFound(id))
    }

    pub fn list(&self) -> BookingResult<Vec<Booking>> {
        Ok(self.db.list_bookings()?)
    }

    pub fn create(&self, draft: BookingDraft) -> BookingResult<Booking> {
        validate(&draft)?;
        let booking = self.db.insert_booking(&draft)?;
        tracing::info!(id = %booking.id, "created booking");
        Ok(booking)
    }

    pub fn update(&self, id: BookingId, patch: BookingPatch) -> BookingResult<Booking> {
        let mut fields = self.get(id)?.fields();

        if let Some(summary) = patch.summary {
            fields.summary = summary;
        }
        if let Some(description) = patch.description {
            fields.description = description;
        }
        if let Some(location) = patch.location {
            fields.location = location;
        }
        if let Some(start) = patch.start_date_time {
            fields.start_date_time = start;
        }
        if let Some(end) = patch.end_date_time {
            fields.end_date_time = end;
        }
        if let Some(customer) = patch.customer {
            fields.customer = customer;
        }
        if let Some(job) = patch.job {
            fields.job = job;
        }
        validate(&fields)?;

        let booking = self
            .db
            .update_booking(id, &fields)?
            .ok_or(BookingError::NotFound(id))?;
        tracing::info!(id = %id, "updated booking");
        Ok(booking)
    }

    pub fn delete(&self, id: BookingId) -> BookingResult<()> {
        if !self.db.delete_booking(id)? {
            return Err(BookingError::NotFound(id));
        }
        tracing::info!(id = %id, "deleted booking");
        Ok(())
    }
}

fn validate(draft: &BookingDraft) -> BookingResult<()> {
    if draft.end_date_time < draft.start_date_time {
        return Err(BookingError::InvalidInput(
            "end_date_time must not be before start_date_time".into(),
        ));
    }
    Ok(())
}
