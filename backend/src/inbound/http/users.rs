//! Users API handlers.
//!
//! ```text
//! POST /user {"first_name":"Ann","last_name":"Lee","email":"ann@example.com",
//!             "passwordhash":"x","subscribed":true,"birth_month":"March",
//!             "birth_year":1990}
//! GET /users
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{Error, NewUser, NewUserDraft, PublicUserSummary, UserValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, PublicUserSummarySchema};
use crate::inbound::http::state::HttpState;

/// Creation request body for `POST /user`.
///
/// Every field is optional at decode time so a missing field reaches
/// validation and is reported as `validation_failed` rather than a decode
/// error.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Ann")]
    pub first_name: Option<String>,
    #[schema(example = "Lee")]
    pub last_name: Option<String>,
    #[schema(example = "ann@example.com")]
    pub email: Option<String>,
    /// Caller-hashed password; stored verbatim and never echoed.
    #[serde(rename = "passwordhash")]
    #[schema(example = "$argon2id$v=19$...")]
    pub password_hash: Option<String>,
    pub subscribed: Option<bool>,
    #[schema(example = "March")]
    pub birth_month: Option<String>,
    #[schema(example = 1990)]
    pub birth_year: Option<i32>,
}

impl From<CreateUserRequest> for NewUserDraft {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            password_hash: value.password_hash,
            subscribed: value.subscribed,
            birth_month: value.birth_month,
            birth_year: value.birth_year,
        }
    }
}

/// Acknowledgement returned by `POST /user`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserResponse {
    #[schema(example = "ID: 3fa85f64-5717-4562-b3fc-2c963f66afa6 |Email: ann@example.com |Subscribed: true")]
    pub message: String,
}

impl From<&PublicUserSummary> for CreateUserResponse {
    fn from(summary: &PublicUserSummary) -> Self {
        Self {
            message: format!(
                "ID: {} |Email: {} |Subscribed: {}",
                summary.id(),
                summary.email(),
                summary.subscribed()
            ),
        }
    }
}

fn map_user_validation_error(err: UserValidationError) -> Error {
    Error::validation_failed(err.to_string()).with_details(json!({
        "field": err.field().as_str(),
        "rule": err.rule().as_str(),
    }))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/user",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = CreateUserResponse),
        (status = 400, description = "Body is not valid JSON", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 422, description = "Missing or malformed field", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/user")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<web::Json<CreateUserResponse>> {
    let draft = NewUserDraft::from(payload.into_inner());
    let user = NewUser::try_from(draft).map_err(|err| {
        debug!(field = %err.field(), rule = err.rule().as_str(), "rejected user payload");
        map_user_validation_error(err)
    })?;
    let record = state.registration.register(user).await?;
    Ok(web::Json(CreateUserResponse::from(&record.summary())))
}

/// List the most recently registered users.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use booksyde::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Newest users first", body = [PublicUserSummarySchema]),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<PublicUserSummary>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users))
}
