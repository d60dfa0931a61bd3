// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `porter-core::types` for use across
//! adapter trait boundaries. This module re-exports them for convenience
//! within the storage crate.

pub use porter_core::types::{
    GroupAccess, GroupChat, Individual, IndividualAccess, InsertOutcome, UpdateOutcome,
    UserProfile,
};
