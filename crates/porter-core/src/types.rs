// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Porter bot.
//!
//! Access levels are two distinct tagged enums (one per identity kind) with
//! explicit integer codecs for the storage and wire representations. Sharing
//! one integer space between kinds is exactly the kind of implicit state this
//! module exists to rule out.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum AdapterType {
    Channel,
    Storage,
}

/// Whether an identity is an individual or a group conversation.
///
/// The two kinds live in separate store collections; an individual and a
/// group never collide even when the transport hands out overlapping ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentityKind {
    Individual,
    Group,
}

impl IdentityKind {
    /// Wire code used in decision tokens (`0` individual, `1` group).
    pub fn code(self) -> i64 {
        match self {
            IdentityKind::Individual => 0,
            IdentityKind::Group => 1,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(IdentityKind::Individual),
            1 => Some(IdentityKind::Group),
            _ => None,
        }
    }
}

/// Access level of an individual identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum IndividualAccess {
    /// Seen but not yet decided by the owner. Denied until decided.
    #[strum(serialize = "unprocessed")]
    Unprocessed,
    /// The single individual with approval authority. Never demotable.
    #[strum(serialize = "owner")]
    Owner,
    /// Approved by the owner.
    #[strum(serialize = "allowed")]
    Allowed,
    /// Rejected by the owner. Kept as a permanent decision cache.
    #[strum(serialize = "blocked")]
    Blocked,
}

impl IndividualAccess {
    pub fn code(self) -> i64 {
        match self {
            IndividualAccess::Unprocessed => 0,
            IndividualAccess::Owner => 1,
            IndividualAccess::Allowed => 2,
            IndividualAccess::Blocked => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(IndividualAccess::Unprocessed),
            1 => Some(IndividualAccess::Owner),
            2 => Some(IndividualAccess::Allowed),
            3 => Some(IndividualAccess::Blocked),
            _ => None,
        }
    }
}

/// Access level of a group conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum GroupAccess {
    /// Seen but not yet decided by the owner. Denied until decided.
    #[strum(serialize = "unprocessed")]
    Unprocessed,
    /// The bot participates for every member, regardless of who is sending.
    #[strum(serialize = "actively participating")]
    ActiveParticipation,
    /// The bot answers only members who are individually allowed.
    #[strum(serialize = "passively participating")]
    PassiveParticipation,
    /// The bot must exit the conversation. Re-issued on every evaluation.
    #[strum(serialize = "leaving")]
    Leave,
}

impl GroupAccess {
    pub fn code(self) -> i64 {
        match self {
            GroupAccess::Unprocessed => 0,
            GroupAccess::ActiveParticipation => 1,
            GroupAccess::PassiveParticipation => 2,
            GroupAccess::Leave => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(GroupAccess::Unprocessed),
            1 => Some(GroupAccess::ActiveParticipation),
            2 => Some(GroupAccess::PassiveParticipation),
            3 => Some(GroupAccess::Leave),
            _ => None,
        }
    }
}

/// A stored individual identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    /// Transport-assigned user id.
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub access: IndividualAccess,
}

impl Individual {
    /// Best-effort human label: first name, last name, `(@username)`.
    pub fn display_name(&self) -> String {
        display_name(&self.first_name, self.last_name.as_deref(), self.username.as_deref())
    }
}

/// A stored group conversation identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupChat {
    /// Transport-assigned chat id.
    pub id: i64,
    pub title: Option<String>,
    pub access: GroupAccess,
}

// --- Inbound event types ---

/// The sender of an inbound event, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        display_name(&self.first_name, self.last_name.as_deref(), self.username.as_deref())
    }
}

/// The group conversation an inbound message arrived in, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupProfile {
    pub id: i64,
    pub title: Option<String>,
}

/// A text message received from the channel.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub sender: UserProfile,
    /// `None` for direct messages.
    pub group: Option<GroupProfile>,
    pub text: Option<String>,
}

impl InboundMessage {
    /// The chat a reply should go to: the group if present, else the sender.
    pub fn chat_id(&self) -> i64 {
        self.group.as_ref().map(|g| g.id).unwrap_or(self.sender.id)
    }
}

/// An approval decision arriving asynchronously from an inline keyboard.
#[derive(Debug, Clone)]
pub struct CallbackEvent {
    /// Transport id used to acknowledge the callback with a toast.
    pub callback_id: String,
    pub sender: UserProfile,
    /// The raw decision token payload. Parsed defensively downstream.
    pub payload: Option<String>,
}

/// Any event delivered by a channel adapter.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    Message(InboundMessage),
    Callback(CallbackEvent),
}

/// One labeled option of a decision prompt, bound to an opaque token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptChoice {
    pub label: String,
    pub token: String,
}

/// Outcome of a conditional insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

/// Outcome of a conditional single-row update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NoChange,
    NotFound,
}

fn display_name(first: &str, last: Option<&str>, username: Option<&str>) -> String {
    let mut name = first.to_string();
    if let Some(last) = last {
        name.push(' ');
        name.push_str(last);
    }
    if let Some(username) = username {
        name.push_str(&format!(" (@{username})"));
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn individual_access_codes_round_trip() {
        for level in [
            IndividualAccess::Unprocessed,
            IndividualAccess::Owner,
            IndividualAccess::Allowed,
            IndividualAccess::Blocked,
        ] {
            assert_eq!(IndividualAccess::from_code(level.code()), Some(level));
        }
        assert_eq!(IndividualAccess::from_code(4), None);
        assert_eq!(IndividualAccess::from_code(-1), None);
    }

    #[test]
    fn group_access_codes_round_trip() {
        for level in [
            GroupAccess::Unprocessed,
            GroupAccess::ActiveParticipation,
            GroupAccess::PassiveParticipation,
            GroupAccess::Leave,
        ] {
            assert_eq!(GroupAccess::from_code(level.code()), Some(level));
        }
        assert_eq!(GroupAccess::from_code(9), None);
    }

    #[test]
    fn identity_kind_codes_match_wire_format() {
        assert_eq!(IdentityKind::Individual.code(), 0);
        assert_eq!(IdentityKind::Group.code(), 1);
        assert_eq!(IdentityKind::from_code(0), Some(IdentityKind::Individual));
        assert_eq!(IdentityKind::from_code(1), Some(IdentityKind::Group));
        assert_eq!(IdentityKind::from_code(2), None);
    }

    #[test]
    fn display_name_assembles_optional_parts() {
        let full = UserProfile {
            id: 1,
            first_name: "Ada".into(),
            last_name: Some("Lovelace".into()),
            username: Some("ada".into()),
        };
        assert_eq!(full.display_name(), "Ada Lovelace (@ada)");

        let bare = UserProfile {
            id: 2,
            first_name: "Ada".into(),
            last_name: None,
            username: None,
        };
        assert_eq!(bare.display_name(), "Ada");
    }

    #[test]
    fn message_chat_id_prefers_group() {
        let sender = UserProfile {
            id: 42,
            first_name: "Ada".into(),
            last_name: None,
            username: None,
        };
        let dm = InboundMessage {
            sender: sender.clone(),
            group: None,
            text: Some("hi".into()),
        };
        assert_eq!(dm.chat_id(), 42);

        let in_group = InboundMessage {
            sender,
            group: Some(GroupProfile { id: -500, title: None }),
            text: Some("hi".into()),
        };
        assert_eq!(in_group.chat_id(), -500);
    }

    #[test]
    fn access_levels_render_human_labels() {
        assert_eq!(IndividualAccess::Allowed.to_string(), "allowed");
        assert_eq!(GroupAccess::ActiveParticipation.to_string(), "actively participating");
    }
}
