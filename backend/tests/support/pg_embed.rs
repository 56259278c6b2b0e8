//! Embedded PostgreSQL bootstrap shared by the database-backed suites.
//!
//! Each cluster gets its own install and data directories under the cargo
//! target dir unless `PG_RUNTIME_DIR` and `PG_DATA_DIR` are already set.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use pg_embedded_setup_unpriv::TestCluster;
use uuid::Uuid;

static BOOTSTRAP: OnceLock<Mutex<()>> = OnceLock::new();

fn cluster_dirs() -> Result<(String, String), String> {
    let target = std::env::var_os("CARGO_TARGET_DIR").map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../target"),
        PathBuf::from,
    );
    let base = target
        .join("pg-embed")
        .join(format!("booksyde-{}", Uuid::new_v4()));
    let install = base.join("install");
    let data = base.join("data");
    for dir in [&install, &data] {
        std::fs::create_dir_all(dir)
            .map_err(|err| format!("create {}: {err}", dir.display()))?;
    }
    Ok((
        install.to_string_lossy().into_owned(),
        data.to_string_lossy().into_owned(),
    ))
}

/// Start a fresh cluster. Must be called outside a Tokio runtime.
pub fn test_cluster() -> Result<TestCluster, String> {
    let _bootstrap = BOOTSTRAP
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let preset =
        std::env::var_os("PG_RUNTIME_DIR").is_some() && std::env::var_os("PG_DATA_DIR").is_some();
    let _env = if preset {
        None
    } else {
        let (install, data) = cluster_dirs()?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(install)),
            ("PG_DATA_DIR", Some(data)),
        ]))
    };

    TestCluster::new().map_err(|err| format!("embedded cluster failed to start: {err:?}"))
}
