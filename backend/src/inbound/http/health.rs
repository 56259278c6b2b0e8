//! Liveness and readiness probes driven by the server lifecycle.
//!
//! The server moves through [`Lifecycle::Starting`], [`Lifecycle::Serving`]
//! and [`Lifecycle::Draining`], never backwards. Readiness holds only while
//! serving; liveness fails once draining starts so orchestrators stop routing
//! traffic before in-flight requests finish.

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

/// Server lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Lifecycle {
    Starting = 0,
    Serving = 1,
    Draining = 2,
}

impl Lifecycle {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Starting,
            1 => Self::Serving,
            _ => Self::Draining,
        }
    }
}

/// Lifecycle shared between the server and the probe handlers.
#[derive(Debug)]
pub struct HealthState {
    phase: AtomicU8,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            phase: AtomicU8::new(Lifecycle::Starting as u8),
        }
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Lifecycle {
        Lifecycle::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Enter [`Lifecycle::Serving`] once the socket is bound. No effect after
    /// draining has begun.
    pub fn mark_ready(&self) {
        let _ = self.phase.compare_exchange(
            Lifecycle::Starting as u8,
            Lifecycle::Serving as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Enter [`Lifecycle::Draining`]; both probes report 503 from here on.
    pub fn begin_draining(&self) {
        self.phase.store(Lifecycle::Draining as u8, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.phase() == Lifecycle::Serving
    }

    pub fn is_alive(&self) -> bool {
        self.phase() != Lifecycle::Draining
    }
}

fn uncached(ok: bool) -> HttpResponse {
    let mut builder = if ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    builder
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness probe: 200 while serving, 503 while starting or draining.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Accepting user traffic"),
        (status = 503, description = "Starting up or draining")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    uncached(state.is_ready())
}

/// Liveness probe: 200 until shutdown begins.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Process is alive"),
        (status = 503, description = "Draining before shutdown")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    uncached(state.is_alive())
}
