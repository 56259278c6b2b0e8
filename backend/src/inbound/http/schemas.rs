//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and never derive `ToSchema`. The
//! wrappers here mirror their wire shape so the generated document matches
//! what handlers actually serialise.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request body could not be decoded.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// A required field is missing or malformed.
    #[schema(rename = "validation_failed")]
    ValidationFailed,
    /// The request conflicts with an existing user.
    #[schema(rename = "conflict")]
    Conflict,
    /// The user store is unreachable or timed out.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "validation_failed")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "email is required")]
    message: String,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::PublicUserSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PublicUserSummary)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PublicUserSummarySchema {
    /// Store-assigned user identifier.
    #[schema(value_type = String, format = Uuid, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    /// Registered email address.
    #[schema(example = "ann@example.com")]
    email: String,
    /// Newsletter subscription flag.
    subscribed: bool,
}
