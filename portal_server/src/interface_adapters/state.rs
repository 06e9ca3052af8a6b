use crate::domain::{Clock, CookiePolicy, IdentityProvider};
use crate::use_cases::session_gate::SessionGate;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    // Gate consulted by the middleware for every request.
    pub gate: SessionGate,
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    pub identity: Arc<dyn IdentityProvider>,
    pub clock: Arc<dyn Clock>,
    pub cookies: CookiePolicy,
}

// Authenticated admin identity attached to requests the gate let through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminSubject(pub String);

// System clock adapter.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
