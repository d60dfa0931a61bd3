// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the identity store and greeting store.

use async_trait::async_trait;

use crate::error::PorterError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    GroupAccess, GroupChat, Individual, IndividualAccess, InsertOutcome, UpdateOutcome,
    UserProfile,
};

/// Adapter for the persistent identity store.
///
/// The conditional operations (`insert_*_if_absent`, `claim_owner`, the
/// guarded `set_*_access`) must be linearizable per key: concurrent calls for
/// the same id yield exactly one winner, and guards are evaluated atomically
/// with their writes.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, pragmas).
    async fn initialize(&self) -> Result<(), PorterError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), PorterError>;

    // --- Identity operations ---

    async fn find_individual(&self, id: i64) -> Result<Option<Individual>, PorterError>;

    async fn find_group(&self, id: i64) -> Result<Option<GroupChat>, PorterError>;

    /// Inserts an individual unless a record with the same id exists.
    /// First-writer-wins: concurrent calls yield exactly one `Inserted`.
    async fn insert_individual_if_absent(
        &self,
        individual: &Individual,
    ) -> Result<InsertOutcome, PorterError>;

    /// Inserts a group unless a record with the same id exists.
    async fn insert_group_if_absent(&self, group: &GroupChat)
        -> Result<InsertOutcome, PorterError>;

    /// Number of stored individuals. Bootstrap detection only; inherently
    /// racy, so never a gate on its own -- pair with [`claim_owner`].
    ///
    /// [`claim_owner`]: StorageAdapter::claim_owner
    async fn count_individuals(&self) -> Result<i64, PorterError>;

    /// Returns the single owner, if one has been bootstrapped.
    async fn find_owner(&self) -> Result<Option<Individual>, PorterError>;

    /// Atomically claims the owner slot for `profile`: inserts it at Owner
    /// level as one conditional statement, only if no owner exists yet.
    /// Returns `true` when this call created the owner.
    async fn claim_owner(&self, profile: &UserProfile) -> Result<bool, PorterError>;

    /// Conditionally updates an individual's access level.
    ///
    /// The owner guard is evaluated in the same atomic step as the write:
    /// a record currently at `Owner` is never altered, and `Owner` is never a
    /// valid target level (owner creation goes through [`claim_owner`] only).
    /// Both cases surface as [`PorterError::InvariantViolation`].
    async fn set_individual_access(
        &self,
        id: i64,
        level: IndividualAccess,
    ) -> Result<UpdateOutcome, PorterError>;

    /// Conditionally updates a group's access level.
    async fn set_group_access(
        &self,
        id: i64,
        level: GroupAccess,
    ) -> Result<UpdateOutcome, PorterError>;

    // --- Greeting operations ---

    /// Stores a greeting line for `/hi`.
    async fn add_greeting(&self, message: &str) -> Result<(), PorterError>;

    /// Returns a uniformly random stored greeting, or `None` when empty.
    async fn random_greeting(&self) -> Result<Option<String>, PorterError>;
}
