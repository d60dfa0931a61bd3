// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Onboarding coordinator.
//!
//! Runs when the gate reports an unknown identity. The very first individual
//! ever seen becomes the owner; everyone after that is recorded as pending
//! and the owner receives a decision prompt with inline choices. Unknown
//! groups are always recorded as pending, never bootstrapped.
//!
//! The coordinator never raises to the event loop. Every failure degrades to
//! "drop and log" so a misbehaving contact cannot stall message processing.

use std::sync::Arc;

use tracing::{info, warn};

use porter_core::{
    ChannelAdapter, GroupAccess, GroupChat, GroupProfile, Individual, IndividualAccess,
    InsertOutcome, PromptChoice, StorageAdapter, UserProfile,
};

use crate::token::DecisionToken;

/// Records unknown identities and requests owner approval for them.
pub struct OnboardingCoordinator {
    store: Arc<dyn StorageAdapter>,
    channel: Arc<dyn ChannelAdapter>,
}

impl OnboardingCoordinator {
    pub fn new(store: Arc<dyn StorageAdapter>, channel: Arc<dyn ChannelAdapter>) -> Self {
        Self { store, channel }
    }

    /// Onboards an individual the gate has never seen.
    ///
    /// The owner claim runs first as a single conditional insert, so the
    /// count-then-insert race has no window: losers of a concurrent first
    /// contact fall through to the pending path like any later sender.
    pub async fn handle_unknown_individual(&self, sender: &UserProfile) {
        match self.store.claim_owner(sender).await {
            Ok(true) => {
                info!(user_id = sender.id, "first contact, bootstrapped as owner");
                return;
            }
            Ok(false) => {}
            Err(error) => {
                warn!(%error, user_id = sender.id, "owner claim failed, dropping onboarding");
                return;
            }
        }

        let record = Individual {
            id: sender.id,
            first_name: sender.first_name.clone(),
            last_name: sender.last_name.clone(),
            username: sender.username.clone(),
            access: IndividualAccess::Unprocessed,
        };
        match self.store.insert_individual_if_absent(&record).await {
            // A concurrent event for the same sender got here first and owns
            // the prompt.
            Ok(InsertOutcome::AlreadyExists) => return,
            Ok(InsertOutcome::Inserted) => {}
            Err(error) => {
                warn!(%error, user_id = sender.id, "failed to record pending individual");
                return;
            }
        }

        let Some(owner) = self.locate_owner(sender.id).await else {
            return;
        };
        let text = format!("{} is contacting me, are they allowed?", sender.display_name());
        let choices = vec![
            PromptChoice {
                label: "Allow".to_string(),
                token: DecisionToken::individual(sender.id, IndividualAccess::Allowed).encode(),
            },
            PromptChoice {
                label: "Block".to_string(),
                token: DecisionToken::individual(sender.id, IndividualAccess::Blocked).encode(),
            },
        ];
        if let Err(error) = self.channel.send_prompt(owner.id, &text, &choices).await {
            warn!(%error, user_id = sender.id, "failed to deliver approval prompt");
        }
    }

    /// Onboards a group the gate has never seen.
    pub async fn handle_unknown_group(&self, sender: &UserProfile, group: &GroupProfile) {
        let record = GroupChat {
            id: group.id,
            title: group.title.clone(),
            access: GroupAccess::Unprocessed,
        };
        match self.store.insert_group_if_absent(&record).await {
            Ok(InsertOutcome::AlreadyExists) => return,
            Ok(InsertOutcome::Inserted) => {}
            Err(error) => {
                warn!(%error, group_id = group.id, "failed to record pending group");
                return;
            }
        }

        let Some(owner) = self.locate_owner(group.id).await else {
            return;
        };
        let title = group.title.as_deref().unwrap_or("untitled");
        let text = format!(
            "{} added me to the group '{title}', how should I participate?",
            sender.display_name()
        );
        let choices = vec![
            PromptChoice {
                label: "Actively participate".to_string(),
                token: DecisionToken::group(group.id, GroupAccess::ActiveParticipation).encode(),
            },
            PromptChoice {
                label: "Passively participate".to_string(),
                token: DecisionToken::group(group.id, GroupAccess::PassiveParticipation).encode(),
            },
            PromptChoice {
                label: "Leave".to_string(),
                token: DecisionToken::group(group.id, GroupAccess::Leave).encode(),
            },
        ];
        if let Err(error) = self.channel.send_prompt(owner.id, &text, &choices).await {
            warn!(%error, group_id = group.id, "failed to deliver approval prompt");
        }
    }

    /// Finds the owner to prompt, logging and dropping when there is none.
    async fn locate_owner(&self, subject_id: i64) -> Option<Individual> {
        match self.store.find_owner().await {
            Ok(Some(owner)) => Some(owner),
            Ok(None) => {
                warn!(subject_id, "no owner on record, dropping approval request");
                None
            }
            Err(error) => {
                warn!(%error, subject_id, "owner lookup failed, dropping approval request");
                None
            }
        }
    }
}
