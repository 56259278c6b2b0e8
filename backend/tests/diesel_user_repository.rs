//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.

use std::collections::HashSet;
use std::time::Duration;

use booksyde::domain::ports::{UserPersistenceError, UserRepository};
use booksyde::domain::{NewUser, NewUserDraft};
use booksyde::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

#[path = "support/pg_embed.rs"]
mod pg_embed;

mod support;

use pg_embed::test_cluster;
use support::{
    format_postgres_error, handle_cluster_setup_failure, migrate_schema, reset_database,
};

const TEST_DB: &str = "diesel_user_repository_test";

struct TestContext {
    runtime: Runtime,
    _cluster: TestCluster,
    repository: DieselUserRepository,
    database_url: String,
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    reset_database(&cluster, TEST_DB)?;
    let database_url = cluster.connection().database_url(TEST_DB);
    migrate_schema(&database_url)?;

    let config = PoolConfig::new(&database_url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        _cluster: cluster,
        repository: DieselUserRepository::new(pool),
        database_url,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn new_user(email: &str) -> NewUser {
    NewUser::try_from(NewUserDraft {
        first_name: Some(" Ann ".to_owned()),
        last_name: Some("Lee".to_owned()),
        email: Some(email.to_owned()),
        password_hash: Some("$argon2id$opaque".to_owned()),
        subscribed: Some(false),
        birth_month: Some("March".to_owned()),
        birth_year: Some(1990),
    })
    .expect("valid user")
}

fn count_users(url: &str) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let row = client
        .query_one("SELECT COUNT(*) FROM users", &[])
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}

fn drop_users_table(url: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute("DROP TABLE IF EXISTS users")
        .map_err(|err| format_postgres_error(&err))
}

#[rstest]
fn create_returns_the_written_row(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: create_returns_the_written_row skipped");
        return;
    };

    let user = new_user("ann@example.com");
    let record = context
        .runtime
        .block_on(context.repository.create(&user))
        .expect("create user");

    assert!(!record.id().as_uuid().is_nil());
    assert_eq!(record.fields(), &user);
    assert_eq!(record.fields().first_name(), "Ann");
    assert_eq!(record.fields().password_hash().expose(), "$argon2id$opaque");
    assert!(!record.subscribed());
    assert_eq!(count_users(&context.database_url), Ok(1));
}

#[rstest]
fn distinct_users_receive_distinct_ids(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: distinct_users_receive_distinct_ids skipped");
        return;
    };

    let ids: HashSet<_> = (0..5)
        .map(|n| {
            context
                .runtime
                .block_on(context.repository.create(&new_user(&format!("u{n}@example.com"))))
                .expect("create user")
                .id()
        })
        .collect();

    assert_eq!(ids.len(), 5);
}

#[rstest]
fn duplicate_email_is_reported_and_writes_nothing(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: duplicate_email_is_reported_and_writes_nothing skipped");
        return;
    };

    let user = new_user("ann@example.com");
    context
        .runtime
        .block_on(context.repository.create(&user))
        .expect("first create");
    let err = context
        .runtime
        .block_on(context.repository.create(&user))
        .expect_err("second create must fail");

    assert_eq!(err, UserPersistenceError::duplicate_email("ann@example.com"));
    assert_eq!(count_users(&context.database_url), Ok(1));
}

#[rstest]
fn list_recent_is_newest_first_and_bounded(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: list_recent_is_newest_first_and_bounded skipped");
        return;
    };

    for email in ["a@example.com", "b@example.com", "c@example.com"] {
        context
            .runtime
            .block_on(context.repository.create(&new_user(email)))
            .expect("create user");
        // Keep `created_at` strictly increasing.
        std::thread::sleep(Duration::from_millis(5));
    }

    let records = context
        .runtime
        .block_on(context.repository.list_recent(2))
        .expect("list users");

    let emails: Vec<&str> = records.iter().map(|r| r.email().as_ref()).collect();
    assert_eq!(emails, ["c@example.com", "b@example.com"]);
}

#[rstest]
fn missing_table_surfaces_query_error(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: missing_table_surfaces_query_error skipped");
        return;
    };

    drop_users_table(&context.database_url).expect("drop users table");

    let err = context
        .runtime
        .block_on(context.repository.list_recent(10))
        .expect_err("listing must fail");
    assert!(matches!(err, UserPersistenceError::Query { .. }));
}
