//! Booking endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use api_shared::{BookingRes, CreateBookingReq, MessageRes, UpdateBookingReq};
use docvault_core::BookingId;

use crate::error::{booking_failure, ApiError};
use crate::{run_blocking, AppState};

#[utoipa::path(
    get,
    path = "/api/v1/booking",
    responses(
        (status = 200, description = "All bookings, ordered by start time", body = [BookingRes]),
        (status = 503, description = "Booking store unavailable")
    )
)]
pub(crate) async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingRes>>, ApiError> {
    let bookings = state.bookings.clone();
    match run_blocking(move || bookings.list()).await? {
        Ok(bookings) => Ok(Json(bookings.into_iter().map(Into::into).collect())),
        Err(e) => Err(booking_failure("List bookings", e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/booking",
    request_body = CreateBookingReq,
    responses(
        (status = 201, description = "Booking created", body = BookingRes),
        (status = 400, description = "Bad request"),
        (status = 503, description = "Booking store unavailable")
    )
)]
pub(crate) async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingReq>,
) -> Result<(StatusCode, Json<BookingRes>), ApiError> {
    let bookings = state.bookings.clone();
    match run_blocking(move || bookings.create(req.into())).await? {
        Ok(booking) => Ok((StatusCode::CREATED, Json(booking.into()))),
        Err(e) => Err(booking_failure("Create booking", e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/booking/{id}",
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking", body = BookingRes),
        (status = 404, description = "Booking not found"),
        (status = 503, description = "Booking store unavailable")
    )
)]
pub(crate) async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BookingRes>, ApiError> {
    let bookings = state.bookings.clone();
    match run_blocking(move || bookings.get(BookingId::new(id))).await? {
        Ok(booking) => Ok(Json(booking.into())),
        Err(e) => Err(booking_failure("Get booking", e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/booking/{id}",
    params(("id" = i64, Path, description = "Booking id")),
    request_body = UpdateBookingReq,
    responses(
        (status = 200, description = "Booking updated", body = BookingRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Booking not found"),
        (status = 503, description = "Booking store unavailable")
    )
)]
pub(crate) async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateBookingReq>,
) -> Result<Json<BookingRes>, ApiError> {
    let bookings = state.bookings.clone();
    match run_blocking(move || bookings.update(BookingId::new(id), req.into())).await? {
        Ok(booking) => Ok(Json(booking.into())),
        Err(e) => Err(booking_failure("Update booking", e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/booking/{id}",
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking deleted", body = MessageRes),
        (status = 404, description = "Booking not found"),
        (status = 503, description = "Booking store unavailable")
    )
)]
pub(crate) async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageRes>, ApiError> {
    let bookings = state.bookings.clone();
    match run_blocking(move || bookings.delete(BookingId::new(id))).await? {
        Ok(()) => Ok(Json(MessageRes::new("Successfully deleted booking"))),
        Err(e) => Err(booking_failure("Delete booking", e)),
    }
}
