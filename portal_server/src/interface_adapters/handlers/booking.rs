use crate::domain::{BookingError, ConsultationLength, Officer, compose_booking_link};
use crate::interface_adapters::protocol::{BookingLinkQuery, BookingLinkResponse, ErrorResponse};
use crate::interface_adapters::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

#[tracing::instrument(
    name = "booking_link",
    skip_all,
    fields(duration = query.duration, officer = %query.officer)
)]
pub async fn booking_link(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookingLinkQuery>,
) -> Result<Json<BookingLinkResponse>, (StatusCode, Json<ErrorResponse>)> {
    let length = ConsultationLength::from_minutes(query.duration).map_err(bad_request)?;
    let officer: Officer = query.officer.parse().map_err(bad_request)?;

    let url = compose_booking_link(length, officer, state.clock.now().date_naive());

    Ok(Json(BookingLinkResponse { url }))
}

fn bad_request(err: BookingError) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            message: err.to_string(),
        }),
    )
}
