//! Per-test database with on-demand fixtures.

use std::future::Future;
use std::panic;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sea_orm::ActiveModelTrait;

use super::{FixtureFactory, FixtureResult};
use crate::config::FixturesConfig;
use crate::constants::DEFAULT_BATCH_SIZE;
use crate::entities::{priority, role, status, task, user};
use crate::repositories::{PriorityRepository, RoleRepository, StatusRepository, TaskRepository, UserRepository};
use crate::storage::schema::{self, Table};
use crate::storage::Session;

/// Tables cleared by [`Harness::teardown`], referencing rows before referenced ones.
pub const TEARDOWN_ORDER: [Table; 5] = [
    Table::Tasks,
    Table::Users,
    Table::Roles,
    Table::Statuses,
    Table::Priorities,
];

/// Owns a session on a fresh database with every table created.
///
/// The fixture methods persist rows on demand. Foreign keys resolve against
/// rows that already exist, so request parents first: a superuser before
/// roles, roles before users, users, priorities and statuses before tasks.
pub struct Harness {
    session: Session,
    batch_size: usize,
    rng: Arc<Mutex<StdRng>>,
}

impl Harness {
    /// Harness on a private in-memory SQLite database.
    pub async fn new() -> Result<Self> {
        let session = Session::in_memory()
            .await
            .context("Failed to open in-memory database")?;
        Self::with_session(session).await
    }

    /// Harness on the database behind `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let session = Session::connect(url)
            .await
            .with_context(|| format!("Failed to connect to {url}"))?;
        Self::with_session(session).await
    }

    pub async fn with_session(session: Session) -> Result<Self> {
        schema::create_all_tables(&session)
            .await
            .context("Failed to create tables")?;
        Ok(Self {
            session,
            batch_size: DEFAULT_BATCH_SIZE,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        })
    }

    /// Number of rows the plural fixtures create.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Generate every fixture from one stream seeded with `seed`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    /// Apply the `[fixtures]` config section: batch size and optional seed.
    pub fn configure(self, config: &FixturesConfig) -> Self {
        let harness = self.batch_size(config.batch_size);
        match config.seed {
            Some(seed) => harness.seed(seed),
            None => harness,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn factory(&self) -> FixtureFactory<'_> {
        FixtureFactory::with_shared_rng(&self.session, Arc::clone(&self.rng))
    }

    pub fn role_repository(&self) -> RoleRepository<'_> {
        RoleRepository::new(&self.session)
    }

    pub fn user_repository(&self) -> UserRepository<'_> {
        UserRepository::new(&self.session)
    }

    pub fn priority_repository(&self) -> PriorityRepository<'_> {
        PriorityRepository::new(&self.session)
    }

    pub fn status_repository(&self) -> StatusRepository<'_> {
        StatusRepository::new(&self.session)
    }

    pub fn task_repository(&self) -> TaskRepository<'_> {
        TaskRepository::new(&self.session)
    }

    pub async fn superuser(&self) -> FixtureResult<user::Model> {
        self.factory().create_superuser().await
    }

    pub async fn role(&self) -> FixtureResult<role::Model> {
        self.factory().create_role(ActiveModelTrait::default()).await
    }

    pub async fn roles(&self) -> FixtureResult<Vec<role::Model>> {
        self.factory().create_roles(self.batch_size).await
    }

    pub async fn user(&self) -> FixtureResult<user::Model> {
        self.factory().create_user(ActiveModelTrait::default()).await
    }

    pub async fn users(&self) -> FixtureResult<Vec<user::Model>> {
        self.factory().create_users(self.batch_size).await
    }

    pub async fn priority(&self) -> FixtureResult<priority::Model> {
        self.factory().create_priority(ActiveModelTrait::default()).await
    }

    pub async fn priorities(&self) -> FixtureResult<Vec<priority::Model>> {
        self.factory().create_priorities(self.batch_size).await
    }

    pub async fn status(&self) -> FixtureResult<status::Model> {
        self.factory().create_status(ActiveModelTrait::default()).await
    }

    pub async fn statuses(&self) -> FixtureResult<Vec<status::Model>> {
        self.factory().create_statuses(self.batch_size).await
    }

    pub async fn task(&self) -> FixtureResult<task::Model> {
        self.factory().create_task(ActiveModelTrait::default()).await
    }

    pub async fn tasks(&self) -> FixtureResult<Vec<task::Model>> {
        self.factory().create_tasks(self.batch_size).await
    }

    /// Delete every row of every table in [`TEARDOWN_ORDER`].
    pub async fn teardown(&self) -> Result<()> {
        for table in TEARDOWN_ORDER {
            let removed = table
                .clear(&self.session)
                .await
                .with_context(|| format!("Failed to clear {table}"))?;
            debug!("Teardown removed {} rows from {}", removed, table);
        }
        info!("Teardown complete");
        Ok(())
    }

    /// Run `test` against this harness, then tear down regardless of outcome.
    ///
    /// A panic in the test body is re-raised after teardown, even when the
    /// teardown itself fails. Otherwise the body's error wins over a teardown
    /// error.
    pub async fn run<F, Fut>(self, test: F) -> Result<()>
    where
        F: FnOnce(Arc<Harness>) -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let harness = Arc::new(self);
        let outcome = tokio::spawn(test(Arc::clone(&harness))).await;
        let teardown = harness.teardown().await;

        match outcome {
            Err(err) if err.is_panic() => {
                if let Err(teardown_err) = &teardown {
                    error!("Teardown after panic failed: {:#}", teardown_err);
                }
                panic::resume_unwind(err.into_panic())
            }
            Err(err) => Err(err).context("Test body was cancelled"),
            Ok(result) => result.and(teardown),
        }
    }
}
