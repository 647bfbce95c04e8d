/// Throwaway PostgreSQL database for registry tests
///
/// Each `RegistryTestDb` creates its own database on the TEST_DATABASE_URL server, applies the
/// registry migrations and drops the database again when it goes out of scope.
use bovine_registry::modules::batch::BatchRepositoryImpl;
use bovine_registry::modules::bovine::BovineRepositoryImpl;
use bovine_registry::shared::infrastructure::{Database, DbPool};
use bovine_registry::RegistryServices;
use diesel::r2d2::{self, ConnectionManager};
use diesel::sql_types::{BigInt, Text};
use diesel::{sql_query, Connection, PgConnection, QueryableByName, RunQueryDsl};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;

static DB_COUNTER: AtomicU32 = AtomicU32::new(0);

pub const TEST_PAGE_SIZE: u32 = 3;

#[derive(QueryableByName)]
struct RowCount {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

pub struct RegistryTestDb {
    server_url: String,
    name: String,
    database: Arc<Database>,
}

impl RegistryTestDb {
    /// Create and migrate a database named `registry_test_{pid}_{n}`.
    pub fn new() -> Self {
        dotenvy::dotenv().ok();

        let server_url = std::env::var("TEST_DATABASE_URL")
            .expect("TEST_DATABASE_URL must be set for PostgreSQL tests");
        let name = format!(
            "registry_test_{}_{}",
            std::process::id(),
            DB_COUNTER.fetch_add(1, Ordering::SeqCst)
        );

        let mut admin = PgConnection::establish(&server_url)
            .expect("Failed to connect to the test database server");
        sql_query(format!("CREATE DATABASE {}", name))
            .execute(&mut admin)
            .unwrap_or_else(|e| panic!("Failed to create {}: {}", name, e));

        let base = server_url
            .rsplit_once('/')
            .map(|(base, _)| base)
            .unwrap_or_else(|| panic!("Invalid TEST_DATABASE_URL: {}", server_url));
        let pool: DbPool = r2d2::Pool::builder()
            .max_size(4)
            .build(ConnectionManager::<PgConnection>::new(format!("{}/{}", base, name)))
            .expect("Failed to build the test pool");

        let database = Arc::new(Database::from_pool(pool));
        database
            .run_pending_migrations()
            .expect("Failed to migrate the test database");

        Self {
            server_url,
            name,
            database,
        }
    }

    /// Services wired to the diesel repositories of this database.
    pub fn registry(&self) -> RegistryServices {
        RegistryServices::new(
            Arc::new(BovineRepositoryImpl::new(Arc::clone(&self.database))),
            Arc::new(BatchRepositoryImpl::new(Arc::clone(&self.database))),
            TEST_PAGE_SIZE,
        )
    }

    /// Join rows currently stored for the batch, whatever the casing of `batch_name`.
    pub fn membership_rows(&self, batch_name: &str) -> i64 {
        self.count(
            "SELECT COUNT(*) AS count FROM batch_bovines bb \
             JOIN batches b ON b.id = bb.batch_id \
             WHERE LOWER(b.batch_name) = LOWER($1)",
            batch_name,
        )
    }

    /// Join rows pointing at any bovine with this tag.
    pub fn bovine_membership_rows(&self, tag: &str) -> i64 {
        self.count(
            "SELECT COUNT(*) AS count FROM batch_bovines bb \
             JOIN bovines v ON v.id = bb.bovine_id \
             WHERE LOWER(v.tag) = LOWER($1)",
            tag,
        )
    }

    pub fn total_membership_rows(&self) -> i64 {
        let mut conn = self.database.get_connection().expect("test connection");
        sql_query("SELECT COUNT(*) AS count FROM batch_bovines")
            .get_result::<RowCount>(&mut conn)
            .expect("count batch_bovines")
            .count
    }

    fn count(&self, query: &str, bind: &str) -> i64 {
        let mut conn = self.database.get_connection().expect("test connection");
        sql_query(query)
            .bind::<Text, _>(bind)
            .get_result::<RowCount>(&mut conn)
            .expect("count query")
            .count
    }
}

impl Drop for RegistryTestDb {
    /// Drops the database. A panicking test leaves it behind for inspection.
    fn drop(&mut self) {
        if thread::panicking() {
            eprintln!("Keeping test database {} after a failure", self.name);
            return;
        }

        let Ok(mut admin) = PgConnection::establish(&self.server_url) else {
            eprintln!("Could not reconnect to drop {}", self.name);
            return;
        };
        let _ = sql_query(format!(
            "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}'",
            self.name
        ))
        .execute(&mut admin);
        if let Err(e) = sql_query(format!("DROP DATABASE IF EXISTS {}", self.name)).execute(&mut admin) {
            eprintln!("Failed to drop {}: {}", self.name, e);
        }
    }
}
