use serde::{Deserialize, Serialize};

// Query string for the booking link endpoint.
#[derive(Debug, Deserialize)]
pub struct BookingLinkQuery {
    // Consultation length in minutes (30 or 60).
    pub duration: u32,
    // Officer key, e.g. "mou" or "richard".
    pub officer: String,
}

#[derive(Debug, Serialize)]
pub struct BookingLinkResponse {
    pub url: String,
}

// Logout always answers with success once cookies are cleared.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
