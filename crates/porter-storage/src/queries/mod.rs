// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the identity and greeting stores.

pub mod greetings;
pub mod groups;
pub mod individuals;
