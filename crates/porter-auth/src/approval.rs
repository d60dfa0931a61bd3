// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Approval callback handler.
//!
//! Applies owner decisions arriving as callback events. The event loop gates
//! callbacks before this handler runs, so the sender is already authorized;
//! the payload itself is still treated as untrusted input.
//!
//! Every outcome, success or failure, is acknowledged to the acting identity
//! with a short human-readable toast.

use std::sync::Arc;

use tracing::{error, info, warn};

use porter_core::{
    CallbackEvent, ChannelAdapter, GroupAccess, IdentityKind, IndividualAccess, PorterError,
    StorageAdapter, UpdateOutcome,
};

use crate::token::DecisionToken;

/// Applies decision tokens to the identity store and acknowledges them.
pub struct ApprovalHandler {
    store: Arc<dyn StorageAdapter>,
    channel: Arc<dyn ChannelAdapter>,
}

impl ApprovalHandler {
    pub fn new(store: Arc<dyn StorageAdapter>, channel: Arc<dyn ChannelAdapter>) -> Self {
        Self { store, channel }
    }

    /// Handles one decision event end to end.
    pub async fn handle_decision(&self, event: &CallbackEvent) {
        let ack = self.apply(event).await;
        if let Err(error) = self.channel.answer_callback(&event.callback_id, &ack).await {
            warn!(%error, callback_id = %event.callback_id, "failed to acknowledge decision");
        }
    }

    async fn apply(&self, event: &CallbackEvent) -> String {
        let Some(payload) = event.payload.as_deref() else {
            warn!(sender_id = event.sender.id, "decision event carried no payload");
            return "That decision is empty.".to_string();
        };
        let token = match DecisionToken::parse(payload) {
            Ok(token) => token,
            Err(error) => {
                warn!(%error, sender_id = event.sender.id, "rejecting malformed decision token");
                return "That decision is malformed.".to_string();
            }
        };
        match token.scope {
            IdentityKind::Individual => self.apply_individual(&token).await,
            IdentityKind::Group => self.apply_group(&token).await,
        }
    }

    async fn apply_individual(&self, token: &DecisionToken) -> String {
        let Some(level) = IndividualAccess::from_code(token.level) else {
            warn!(level = token.level, "decision requested an unknown individual level");
            return "That decision requests an unknown access level.".to_string();
        };
        match self.store.set_individual_access(token.target_id, level).await {
            Ok(UpdateOutcome::Updated) => {
                info!(target_id = token.target_id, %level, "individual access updated");
                format!("Done. They are now {level}.")
            }
            Ok(UpdateOutcome::NoChange) => format!("No change, they were already {level}."),
            Ok(UpdateOutcome::NotFound) => "I have no record of them.".to_string(),
            Err(PorterError::InvariantViolation(message)) => {
                // Surfaced verbatim, never corrected: this is either the
                // owner guard firing or a broken uniqueness invariant.
                error!(target_id = token.target_id, %message, "decision rejected");
                format!("Rejected: {message}")
            }
            Err(error) => {
                error!(%error, target_id = token.target_id, "individual access update failed");
                "Something went wrong, the decision was not applied.".to_string()
            }
        }
    }

    async fn apply_group(&self, token: &DecisionToken) -> String {
        let Some(level) = GroupAccess::from_code(token.level) else {
            warn!(level = token.level, "decision requested an unknown group level");
            return "That decision requests an unknown access level.".to_string();
        };
        match self.store.set_group_access(token.target_id, level).await {
            Ok(UpdateOutcome::Updated) => {
                info!(group_id = token.target_id, %level, "group access updated");
                if level == GroupAccess::Leave {
                    if let Err(error) = self.channel.leave_chat(token.target_id).await {
                        warn!(%error, group_id = token.target_id, "failed to leave group");
                    }
                }
                format!("Done. The group is now {level}.")
            }
            Ok(UpdateOutcome::NoChange) => format!("No change, the group was already {level}."),
            Ok(UpdateOutcome::NotFound) => "I have no record of that group.".to_string(),
            Err(PorterError::InvariantViolation(message)) => {
                error!(group_id = token.target_id, %message, "decision rejected");
                format!("Rejected: {message}")
            }
            Err(error) => {
                error!(%error, group_id = token.target_id, "group access update failed");
                "Something went wrong, the decision was not applied.".to_string()
            }
        }
    }
}
