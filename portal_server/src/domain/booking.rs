use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

// Public scheduling service; links are only built here, never fetched.
pub const SCHEDULER_BASE_URL: &str = "https://calendly.com";

/// Length of a consultation slot offered in the booking dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConsultationLength {
    ThirtyMinutes,
    SixtyMinutes,
}

/// Staff member a consultation can be booked with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Officer {
    Mou,
    Richard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    UnsupportedDuration(u32),
    UnknownOfficer(String),
}

impl fmt::Display for BookingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingError::UnsupportedDuration(minutes) => {
                write!(f, "unsupported consultation length: {minutes} minutes")
            }
            BookingError::UnknownOfficer(name) => write!(f, "unknown officer: {name}"),
        }
    }
}

impl std::error::Error for BookingError {}

impl ConsultationLength {
    pub fn from_minutes(minutes: u32) -> Result<Self, BookingError> {
        match minutes {
            30 => Ok(ConsultationLength::ThirtyMinutes),
            60 => Ok(ConsultationLength::SixtyMinutes),
            other => Err(BookingError::UnsupportedDuration(other)),
        }
    }

    pub fn minutes(self) -> u32 {
        match self {
            ConsultationLength::ThirtyMinutes => 30,
            ConsultationLength::SixtyMinutes => 60,
        }
    }
}

impl Officer {
    pub const ALL: [Officer; 2] = [Officer::Mou, Officer::Richard];

    // Account slug on the scheduling service.
    pub fn scheduler_slug(self) -> &'static str {
        match self {
            Officer::Mou => "mou-icbmlaw",
            Officer::Richard => "richard-icbmlaw",
        }
    }

    // Event slugs are configured per account, so the same length maps to
    // different slugs for each officer. Keep these in sync with the live
    // scheduler event types.
    pub fn event_slug(self, length: ConsultationLength) -> &'static str {
        match (self, length) {
            (Officer::Mou, ConsultationLength::ThirtyMinutes) => "30min",
            (Officer::Mou, ConsultationLength::SixtyMinutes) => "30-minute-meeting-clone",
            (Officer::Richard, ConsultationLength::ThirtyMinutes) => "30min",
            (Officer::Richard, ConsultationLength::SixtyMinutes) => {
                "30-minutes-consultation-initial-clone"
            }
        }
    }
}

impl FromStr for Officer {
    type Err = BookingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mou" => Ok(Officer::Mou),
            "richard" => Ok(Officer::Richard),
            _ => Err(BookingError::UnknownOfficer(value.to_string())),
        }
    }
}

/// Build the scheduling link for a consultation selection.
///
/// The calendar opens on the month of `today`. The month is not zero padded,
/// matching the links already shared with clients (`month=2026-3`).
pub fn compose_booking_link(length: ConsultationLength, officer: Officer, today: NaiveDate) -> String {
    format!(
        "{SCHEDULER_BASE_URL}/{}/{}?back=0&month={}-{}",
        officer.scheduler_slug(),
        officer.event_slug(length),
        today.year(),
        today.month()
    )
}
