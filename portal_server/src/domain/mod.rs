pub mod booking;
pub mod claims;
pub mod cookies;
pub mod errors;
pub mod gate;
pub mod ports;

// Re-export the domain boundary types and ports.
pub use booking::{BookingError, ConsultationLength, Officer, compose_booking_link};
pub use claims::{Role, SessionClaims, SessionTokens, decode_unverified};
pub use cookies::{CookiePolicy, RequestCookies};
pub use errors::AuthError;
pub use gate::{GateDecision, GateOutcome, RequestContext, RouteCategory, categorize};
pub use ports::{Clock, IdentityProvider, IdentityUser, ProviderResult, UserLookup};
