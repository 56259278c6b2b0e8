//! OpenAPI documentation configuration.
//!
//! Registers every HTTP endpoint and the schema wrappers from
//! [`crate::inbound::http::schemas`], so domain types never depend on utoipa.
//! Served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary.

use utoipa::OpenApi;

use crate::inbound::http::ping::PingResponse;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, PublicUserSummarySchema};
use crate::inbound::http::users::{CreateUserRequest, CreateUserResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Booksyde user API",
        description = "Register users, list recent registrations, and probe service health."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::ping::ping,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        PingResponse,
        CreateUserRequest,
        CreateUserResponse,
        PublicUserSummarySchema,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "User registration and listing"),
        (name = "ping", description = "Reachability check"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
