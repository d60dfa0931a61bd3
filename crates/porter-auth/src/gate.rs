// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization gate.
//!
//! Every inbound message passes through [`AuthorizationGate::check_message`]
//! before any agent logic runs. The gate only reads the identity store and
//! never writes it; recording unknown identities is the onboarding
//! coordinator's job, triggered by the [`GateDecision::Unknown`] outcome.

use std::sync::Arc;

use tracing::{debug, warn};

use porter_core::{
    ChannelAdapter, GroupAccess, IdentityKind, InboundMessage, IndividualAccess, StorageAdapter,
};

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The message may proceed to the agent.
    Permit,
    /// The message is dropped.
    Deny,
    /// No record exists for the named identity kind; onboarding should run.
    ///
    /// For a message in a passively participating group this refers to the
    /// sender, not the group, so individual onboarding runs inside the group.
    Unknown(IdentityKind),
}

/// Read-only authorization check over the identity store.
pub struct AuthorizationGate {
    store: Arc<dyn StorageAdapter>,
    channel: Arc<dyn ChannelAdapter>,
}

impl AuthorizationGate {
    pub fn new(store: Arc<dyn StorageAdapter>, channel: Arc<dyn ChannelAdapter>) -> Self {
        Self { store, channel }
    }

    /// Decides whether an inbound message may proceed.
    ///
    /// Direct messages are judged by the sender's individual record. Group
    /// messages are judged by the group record first; a passively
    /// participating group delegates to the sender's individual record, and a
    /// `Leave` group re-issues the exit instruction on every message.
    ///
    /// Fails closed: any store error denies.
    pub async fn check_message(&self, message: &InboundMessage) -> GateDecision {
        match &message.group {
            None => self.check_individual(message.sender.id).await,
            Some(group) => self.check_group(group.id, message.sender.id).await,
        }
    }

    /// Judges a single individual by their stored access level.
    ///
    /// Also used directly for callback events, where only individually
    /// authorized senders may reach the approval handler.
    pub async fn check_individual(&self, user_id: i64) -> GateDecision {
        let individual = match self.store.find_individual(user_id).await {
            Ok(individual) => individual,
            Err(error) => {
                warn!(%error, user_id, "individual lookup failed, denying");
                return GateDecision::Deny;
            }
        };
        match individual {
            None => GateDecision::Unknown(IdentityKind::Individual),
            Some(record) => match record.access {
                IndividualAccess::Owner | IndividualAccess::Allowed => GateDecision::Permit,
                IndividualAccess::Blocked => {
                    debug!(user_id, "denying blocked individual");
                    GateDecision::Deny
                }
                IndividualAccess::Unprocessed => {
                    debug!(user_id, "denying individual pending a decision");
                    GateDecision::Deny
                }
            },
        }
    }

    async fn check_group(&self, group_id: i64, sender_id: i64) -> GateDecision {
        let group = match self.store.find_group(group_id).await {
            Ok(group) => group,
            Err(error) => {
                warn!(%error, group_id, "group lookup failed, denying");
                return GateDecision::Deny;
            }
        };
        match group {
            None => GateDecision::Unknown(IdentityKind::Group),
            Some(record) => match record.access {
                GroupAccess::ActiveParticipation => GateDecision::Permit,
                GroupAccess::PassiveParticipation => self.check_individual(sender_id).await,
                GroupAccess::Leave => {
                    // Re-issued every time so a failed exit self-heals on the
                    // next message.
                    if let Err(error) = self.channel.leave_chat(group_id).await {
                        warn!(%error, group_id, "failed to leave group marked for exit");
                    }
                    GateDecision::Deny
                }
                GroupAccess::Unprocessed => {
                    debug!(group_id, "denying group pending a decision");
                    GateDecision::Deny
                }
            },
        }
    }
}
