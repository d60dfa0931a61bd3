// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `porter serve` command implementation.
//!
//! Wires the SQLite identity store and the Telegram channel to the
//! authorization gate, onboarding coordinator, and approval handler, then
//! runs the event loop until a shutdown signal arrives. Each event is
//! handled in its own task so a slow store call never blocks delivery.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use porter_auth::{ApprovalHandler, AuthorizationGate, GateDecision, OnboardingCoordinator};
use porter_config::model::PorterConfig;
use porter_core::error::PorterError;
use porter_core::{ChannelAdapter, IdentityKind, InboundEvent, StorageAdapter};
use porter_storage::SqliteStorage;
use porter_telegram::TelegramChannel;

use crate::commands;
use crate::shutdown;

/// Everything an event handler task needs, shared behind one `Arc`.
struct Handlers {
    store: Arc<dyn StorageAdapter>,
    channel: Arc<dyn ChannelAdapter>,
    gate: AuthorizationGate,
    coordinator: OnboardingCoordinator,
    approvals: ApprovalHandler,
}

impl Handlers {
    fn new(store: Arc<dyn StorageAdapter>, channel: Arc<dyn ChannelAdapter>) -> Self {
        Self {
            gate: AuthorizationGate::new(Arc::clone(&store), Arc::clone(&channel)),
            coordinator: OnboardingCoordinator::new(Arc::clone(&store), Arc::clone(&channel)),
            approvals: ApprovalHandler::new(Arc::clone(&store), Arc::clone(&channel)),
            store,
            channel,
        }
    }

    async fn handle_event(&self, event: InboundEvent) {
        match event {
            InboundEvent::Message(message) => match self.gate.check_message(&message).await {
                GateDecision::Permit => {
                    commands::dispatch(&message, &self.store, &self.channel).await;
                }
                GateDecision::Unknown(IdentityKind::Individual) => {
                    self.coordinator.handle_unknown_individual(&message.sender).await;
                }
                GateDecision::Unknown(IdentityKind::Group) => {
                    if let Some(group) = &message.group {
                        self.coordinator.handle_unknown_group(&message.sender, group).await;
                    }
                }
                GateDecision::Deny => {
                    debug!(sender_id = message.sender.id, "message denied");
                }
            },
            // Decisions are accepted only from individually authorized
            // senders, in practice the owner.
            InboundEvent::Callback(callback) => {
                match self.gate.check_individual(callback.sender.id).await {
                    GateDecision::Permit => self.approvals.handle_decision(&callback).await,
                    _ => {
                        warn!(
                            sender_id = callback.sender.id,
                            "ignoring decision from unauthorized sender"
                        );
                    }
                }
            }
        }
    }
}

/// Runs the `porter serve` command.
pub async fn run_serve(config: PorterConfig) -> Result<(), PorterError> {
    init_tracing(&config.agent.log_level);

    info!("starting porter serve");

    let storage = {
        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        Arc::new(storage)
    };

    let mut telegram = TelegramChannel::new(&config.telegram).map_err(|e| {
        error!(error = %e, "failed to initialize Telegram channel");
        eprintln!(
            "error: Telegram bot token required. Set telegram.bot_token or PORTER_TELEGRAM_BOT_TOKEN."
        );
        e
    })?;
    telegram.connect().await?;

    let store: Arc<dyn StorageAdapter> = storage;
    let channel: Arc<dyn ChannelAdapter> = Arc::new(telegram);
    let handlers = Arc::new(Handlers::new(Arc::clone(&store), Arc::clone(&channel)));

    let cancel = shutdown::install_signal_handler();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("shutdown requested");
                break;
            }
            event = channel.next_event() => {
                match event {
                    Ok(event) => {
                        let handlers = Arc::clone(&handlers);
                        tokio::spawn(async move {
                            handlers.handle_event(event).await;
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    channel.shutdown().await?;
    store.close().await?;

    info!("porter serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("porter={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
