//! Liveness ping used by clients and smoke tests.

use actix_web::{HttpResponse, get};
use serde::Serialize;
use utoipa::ToSchema;

/// Body returned by `GET /ping`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PingResponse {
    #[schema(example = "pong")]
    pub message: String,
}

/// Answer `{"message":"pong"}` without touching the user store.
#[utoipa::path(
    get,
    path = "/ping",
    responses((status = 200, description = "Service is reachable", body = PingResponse)),
    tags = ["ping"],
    operation_id = "ping"
)]
#[get("/ping")]
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(PingResponse {
        message: "pong".to_owned(),
    })
}
