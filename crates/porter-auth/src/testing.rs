// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles and fixtures shared by the unit tests in this crate.

use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Mutex;

use porter_config::model::StorageConfig;
use porter_core::{
    AdapterType, ChannelAdapter, GroupAccess, GroupChat, GroupProfile, HealthStatus,
    InboundEvent, InboundMessage, Individual, IndividualAccess, InsertOutcome, PluginAdapter,
    PorterError, PromptChoice, StorageAdapter, UpdateOutcome, UserProfile,
};
use porter_storage::SqliteStorage;

/// A recorded decision prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPrompt {
    pub chat_id: i64,
    pub text: String,
    pub choices: Vec<PromptChoice>,
}

/// Channel double that records every outbound side effect.
#[derive(Default)]
pub struct MockChannel {
    pub sent_texts: Mutex<Vec<(i64, String)>>,
    pub sent_prompts: Mutex<Vec<SentPrompt>>,
    pub callback_answers: Mutex<Vec<(String, String)>>,
    pub left: Mutex<Vec<i64>>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn prompts(&self) -> Vec<SentPrompt> {
        self.sent_prompts.lock().await.clone()
    }

    pub async fn texts(&self) -> Vec<(i64, String)> {
        self.sent_texts.lock().await.clone()
    }

    pub async fn answers(&self) -> Vec<(String, String)> {
        self.callback_answers.lock().await.clone()
    }

    pub async fn left_chats(&self) -> Vec<i64> {
        self.left.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 0, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, PorterError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PorterError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), PorterError> {
        Ok(())
    }

    async fn next_event(&self) -> Result<InboundEvent, PorterError> {
        std::future::pending().await
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), PorterError> {
        self.sent_texts.lock().await.push((chat_id, text.to_string()));
        Ok(())
    }

    async fn send_prompt(
        &self,
        chat_id: i64,
        text: &str,
        choices: &[PromptChoice],
    ) -> Result<(), PorterError> {
        self.sent_prompts.lock().await.push(SentPrompt {
            chat_id,
            text: text.to_string(),
            choices: choices.to_vec(),
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), PorterError> {
        self.callback_answers
            .lock()
            .await
            .push((callback_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn leave_chat(&self, chat_id: i64) -> Result<(), PorterError> {
        self.left.lock().await.push(chat_id);
        Ok(())
    }
}

/// Store double whose every operation fails, for fail-closed tests.
pub struct FailingStore;

fn store_down() -> PorterError {
    PorterError::Storage {
        source: "store offline".into(),
    }
}

#[async_trait]
impl PluginAdapter for FailingStore {
    fn name(&self) -> &str {
        "failing"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 0, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PorterError> {
        Ok(HealthStatus::Unhealthy("store offline".into()))
    }

    async fn shutdown(&self) -> Result<(), PorterError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for FailingStore {
    async fn initialize(&self) -> Result<(), PorterError> {
        Err(store_down())
    }

    async fn close(&self) -> Result<(), PorterError> {
        Err(store_down())
    }

    async fn find_individual(&self, _id: i64) -> Result<Option<Individual>, PorterError> {
        Err(store_down())
    }

    async fn find_group(&self, _id: i64) -> Result<Option<GroupChat>, PorterError> {
        Err(store_down())
    }

    async fn insert_individual_if_absent(
        &self,
        _individual: &Individual,
    ) -> Result<InsertOutcome, PorterError> {
        Err(store_down())
    }

    async fn insert_group_if_absent(
        &self,
        _group: &GroupChat,
    ) -> Result<InsertOutcome, PorterError> {
        Err(store_down())
    }

    async fn count_individuals(&self) -> Result<i64, PorterError> {
        Err(store_down())
    }

    async fn find_owner(&self) -> Result<Option<Individual>, PorterError> {
        Err(store_down())
    }

    async fn claim_owner(&self, _profile: &UserProfile) -> Result<bool, PorterError> {
        Err(store_down())
    }

    async fn set_individual_access(
        &self,
        _id: i64,
        _level: IndividualAccess,
    ) -> Result<UpdateOutcome, PorterError> {
        Err(store_down())
    }

    async fn set_group_access(
        &self,
        _id: i64,
        _level: GroupAccess,
    ) -> Result<UpdateOutcome, PorterError> {
        Err(store_down())
    }

    async fn add_greeting(&self, _message: &str) -> Result<(), PorterError> {
        Err(store_down())
    }

    async fn random_greeting(&self) -> Result<Option<String>, PorterError> {
        Err(store_down())
    }
}

/// Opens a fresh SQLite-backed store in a temporary directory.
pub async fn open_store() -> (Arc<dyn StorageAdapter>, TempDir) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("porter.db");
    let storage = SqliteStorage::new(StorageConfig {
        database_path: path.to_str().unwrap().to_string(),
        wal_mode: true,
    });
    storage.initialize().await.unwrap();
    (Arc::new(storage), dir)
}

pub fn profile(id: i64, first_name: &str) -> UserProfile {
    UserProfile {
        id,
        first_name: first_name.to_string(),
        last_name: None,
        username: None,
    }
}

pub fn direct_message(sender_id: i64, text: &str) -> InboundMessage {
    InboundMessage {
        sender: profile(sender_id, "member"),
        group: None,
        text: Some(text.to_string()),
    }
}

pub fn group_message(sender_id: i64, group_id: i64, text: &str) -> InboundMessage {
    InboundMessage {
        sender: profile(sender_id, "member"),
        group: Some(GroupProfile {
            id: group_id,
            title: Some("book club".to_string()),
        }),
        text: Some(text.to_string()),
    }
}
