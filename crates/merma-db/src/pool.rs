//! # Store Connections
//!
//! Opens the SQLite store either read-write (seeding, tests, the register
//! side) or read-only (reports).
//!
//! ## Report Access
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  faltantes                         seed / tests                         │
//! │  DbConfig::from(&settings)         DbConfig::new(path)                  │
//! │     .read_only()                   DbConfig::in_memory()                │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  mode=ro, no create,              create if missing, WAL,               │
//! │  no migrations; refuses a         migrations applied on open            │
//! │  store with pending migrations                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pool >= REPORT_FAN_OUT connections                                     │
//! │    sale-item pages ──► conn A                                           │
//! │    inventory pages ──► conn B   (concurrent under tokio::join!)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An in-memory store lives inside a single connection, so its pool is
//! always one connection and the two report fetches take turns.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::DatabaseSettings;
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::business::BusinessRepository;
use crate::repository::expense::ExpenseRepository;
use crate::repository::inventory::InventoryRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::shift::ShiftRepository;

/// Paginated fetches a shortage report runs at the same time.
pub const REPORT_FAN_OUT: u32 = 2;

// =============================================================================
// Configuration
// =============================================================================

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    File(PathBuf),
    /// Private to the process; gone when the pool closes.
    Memory,
}

/// How to open the store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub storage: Storage,
    /// Upper bound requested by configuration; see [`DbConfig::pool_size`].
    pub max_connections: u32,
    /// How long a query waits for a free connection.
    pub acquire_timeout: Duration,
    pub read_only: bool,
    pub run_migrations: bool,
}

impl DbConfig {
    /// Read-write access to a store file, created and migrated on open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            storage: Storage::File(path.into()),
            max_connections: REPORT_FAN_OUT,
            acquire_timeout: Duration::from_secs(30),
            read_only: false,
            run_migrations: true,
        }
    }

    /// Fresh migrated store for tests.
    pub fn in_memory() -> Self {
        DbConfig {
            storage: Storage::Memory,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            read_only: false,
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Opens the file without write access. The file must already exist
    /// and carry every migration; nothing is created or migrated.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self.run_migrations = false;
        self
    }

    /// Connections the pool will actually hold.
    ///
    /// File stores get at least [`REPORT_FAN_OUT`] so a report's fetches
    /// never queue behind each other; in-memory stores get exactly one.
    pub fn pool_size(&self) -> u32 {
        match self.storage {
            Storage::Memory => 1,
            Storage::File(_) => self.max_connections.max(REPORT_FAN_OUT),
        }
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.storage {
            Storage::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
            Storage::File(path) if self.read_only => SqliteConnectOptions::new()
                .filename(path)
                .read_only(true)
                .create_if_missing(false),
            Storage::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
        };
        Ok(options.foreign_keys(true))
    }

    fn describe(&self) -> String {
        match &self.storage {
            Storage::File(path) => path.display().to_string(),
            Storage::Memory => ":memory:".to_string(),
        }
    }
}

impl From<&DatabaseSettings> for DbConfig {
    fn from(settings: &DatabaseSettings) -> Self {
        DbConfig::new(settings.path.clone())
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.connect_timeout_secs))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Shared handle to the store. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    read_only: bool,
}

impl Database {
    /// Opens the store described by `config`.
    ///
    /// A read-only open fails with [`DbError::NotInitialized`] when the
    /// file is missing migrations, instead of failing later on a missing
    /// table mid-report.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let location = config.describe();
        let size = config.pool_size();
        debug!(store = %location, read_only = config.read_only, size, "Opening store");

        let pool = SqlitePoolOptions::new()
            .max_connections(size)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(format!("{location}: {e}")))?;

        let db = Database {
            pool,
            read_only: config.read_only,
        };

        if config.run_migrations {
            migrations::run_migrations(&db.pool).await?;
        } else if config.read_only {
            let (total, applied) = migrations::migration_status(&db.pool).await?;
            if applied < total {
                return Err(DbError::NotInitialized { applied, total });
            }
        }

        info!(store = %location, read_only = db.read_only, connections = size, "Store ready");
        Ok(db)
    }

    /// For queries no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn businesses(&self) -> BusinessRepository {
        BusinessRepository::new(self.pool.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.pool.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    pub fn expenses(&self) -> ExpenseRepository {
        ExpenseRepository::new(self.pool.clone())
    }

    pub fn shifts(&self) -> ShiftRepository {
        ShiftRepository::new(self.pool.clone())
    }

    /// Waits for in-flight queries, then closes every connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
