//! User registration service library.
//!
//! Layout follows ports and adapters: [`domain`] holds the rules,
//! [`inbound::http`] exposes them over Actix, and [`outbound::persistence`]
//! stores users in PostgreSQL.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
