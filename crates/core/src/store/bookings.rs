use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::Database;
use crate::error::StoreResult;
use crate::model::{Booking, BookingDraft, BookingId, Customer, Job};

const BOOKING_COLUMNS: &str = "id, summary, description, location, start_date_time, end_date_time, \
     customer_name, job_serial_no, job_instrument_model, job_manufacturer, created_at, updated_at";

fn booking_from_row(row: &Row<'_>) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: BookingId::new(row.get(0)?),
        summary: row.get(1)?,
        description: row.get(2)?,
        location: row.get(3)?,
        start_date_time: row.get(4)?,
        end_date_time: row.get(5)?,
        customer: Customer { name: row.get(6)? },
        job: Job {
            serial_no: row.get(7)?,
            instrument_model: row.get(8)?,
            manufacturer: row.get(9)?,
        },
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn select_booking(conn: &Connection, id: BookingId) -> rusqlite::Result<Option<Booking>> {
    conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id.get()],
        booking_from_row,
    )
    .optional()
}

impl Database {
    // ─── Booking operations ───

    pub fn insert_booking(&self, draft: &BookingDraft) -> StoreResult<Booking> {
        let now = Utc::now();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO bookings (summary, description, location, start_date_time, end_date_time,
                     customer_name, job_serial_no, job_instrument_model, job_manufacturer,
                     created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
                params![
                    draft.summary,
                    draft.description,
                    draft.location,
                    draft.start_date_time,
                    draft.end_date_time,
                    draft.customer.name,
                    draft.job.serial_no,
                    draft.job.instrument_model,
                    draft.job.manufacturer,
                    now,
                ],
            )?;
            Ok(Booking {
                id: BookingId::new(conn.last_insert_rowid()),
                summary: draft.summary.clone(),
                description: draft.description.clone(),
                location: draft.location.clone(),
                start_date_time: draft.start_date_time,
                end_date_time: draft.end_date_time,
                customer: draft.customer.clone(),
                job: draft.job.clone(),
                created_at: now,
                updated_at: now,
            })
        })
    }

    pub fn get_booking(&self, id: BookingId) -> StoreResult<Option<Booking>> {
        self.with_conn(|conn| select_booking(conn, id))
    }

    /// All bookings ordered by start time, then id.
    pub fn list_bookings(&self) -> StoreResult<Vec<Booking>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY start_date_time, id"
            ))?;
            let rows = stmt.query_map([], booking_from_row)?;
            let mut bookings = Vec::new();
            for row in rows {
                bookings.push(row?);
            }
            Ok(bookings)
        })
    }

    pub fn update_booking(
        &self,
        id: BookingId,
        draft: &BookingDraft,
    ) -> StoreResult<Option<Booking>> {
        let now = Utc::now();
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE bookings
                 SET summary = ?2, description = ?3, location = ?4, start_date_time = ?5,
                     end_date_time = ?6, customer_name = ?7, job_serial_no = ?8,
                     job_instrument_model = ?9, job_manufacturer = ?10, updated_at = ?11
                 WHERE id = ?1",
                params![
                    id.get(),
                    draft.summary,
                    draft.description,
                    draft.location,
                    draft.start_date_time,
                    draft.end_date_time,
                    draft.customer.name,
                    draft.job.serial_no,
                    draft.job.instrument_model,
                    draft.job.manufacturer,
                    now,
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            select_booking(conn, id)
        })
    }

    pub fn delete_booking(&self, id: BookingId) -> StoreResult<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id.get()])?;
            Ok(removed > 0)
        })
    }
}
