// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Porter bot.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Porter workspace: the identity model
//! (individuals and group chats with kind-specific access levels), the
//! inbound event types, and the channel/storage adapter traits.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PorterError;
pub use traits::{ChannelAdapter, PluginAdapter, StorageAdapter};
pub use types::{
    AdapterType, CallbackEvent, GroupAccess, GroupChat, GroupProfile, HealthStatus,
    IdentityKind, InboundEvent, InboundMessage, Individual, IndividualAccess, InsertOutcome,
    PromptChoice, UpdateOutcome, UserProfile,
};
