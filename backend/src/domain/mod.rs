//! Domain primitives, services, and ports.
//!
//! Purpose: keep the user registration rules independent of HTTP and SQL.
//! Inbound adapters talk to the driving ports in [`ports`]; outbound adapters
//! implement the driven [`ports::UserRepository`].
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `NewUser`, `UserRecord`, `PublicUserSummary`: the user lifecycle types.
//! - `UserRegistrationService`: implements registration and listing.
//! - `TraceId`: request correlation identifier.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_registration;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, NewUser, NewUserDraft, PasswordHash, PublicUserSummary, UserField, UserId,
    UserRecord, UserValidationError, ValidationRule,
};
pub use self::user_registration::{
    DEFAULT_STORE_TIMEOUT, USER_LISTING_LIMIT, UserRegistrationService,
};
