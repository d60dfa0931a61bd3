// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use porter_config::model::StorageConfig;
use porter_core::types::{
    GroupAccess, GroupChat, Individual, IndividualAccess, InsertOutcome, UpdateOutcome,
    UserProfile,
};
use porter_core::{AdapterType, HealthStatus, PluginAdapter, PorterError, StorageAdapter};

use crate::database::Database;
use crate::queries;

/// SQLite-backed identity and greeting store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`]
    /// is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, PorterError> {
        self.db.get().ok_or_else(|| PorterError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PorterError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PorterError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: storage flushed");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), PorterError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| PorterError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), PorterError> {
        self.db()?.close().await
    }

    // --- Identity operations ---

    async fn find_individual(&self, id: i64) -> Result<Option<Individual>, PorterError> {
        queries::individuals::find(self.db()?, id).await
    }

    async fn find_group(&self, id: i64) -> Result<Option<GroupChat>, PorterError> {
        queries::groups::find(self.db()?, id).await
    }

    async fn insert_individual_if_absent(
        &self,
        individual: &Individual,
    ) -> Result<InsertOutcome, PorterError> {
        queries::individuals::insert_if_absent(self.db()?, individual).await
    }

    async fn insert_group_if_absent(
        &self,
        group: &GroupChat,
    ) -> Result<InsertOutcome, PorterError> {
        queries::groups::insert_if_absent(self.db()?, group).await
    }

    async fn count_individuals(&self) -> Result<i64, PorterError> {
        queries::individuals::count(self.db()?).await
    }

    async fn find_owner(&self) -> Result<Option<Individual>, PorterError> {
        queries::individuals::find_owner(self.db()?).await
    }

    async fn claim_owner(&self, profile: &UserProfile) -> Result<bool, PorterError> {
        queries::individuals::claim_owner(self.db()?, profile).await
    }

    async fn set_individual_access(
        &self,
        id: i64,
        level: IndividualAccess,
    ) -> Result<UpdateOutcome, PorterError> {
        queries::individuals::set_access(self.db()?, id, level).await
    }

    async fn set_group_access(
        &self,
        id: i64,
        level: GroupAccess,
    ) -> Result<UpdateOutcome, PorterError> {
        queries::groups::set_access(self.db()?, id, level).await
    }

    // --- Greeting operations ---

    async fn add_greeting(&self, message: &str) -> Result<(), PorterError> {
        queries::greetings::add(self.db()?, message).await
    }

    async fn random_greeting(&self) -> Result<Option<String>, PorterError> {
        queries::greetings::random(self.db()?).await
    }
}
