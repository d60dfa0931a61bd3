// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decision token codec.
//!
//! Every inline approval button carries an opaque token that names the
//! identity scope, the target identifier, and the requested access level.
//! The wire form is three whitespace-separated integers, for example
//! `0 8412 2` for "set individual 8412 to allowed". Tokens arrive back
//! from the owner's client unmodified, so parsing is strict: anything
//! that is not exactly three integers with a known scope is rejected.

use porter_core::{GroupAccess, IdentityKind, IndividualAccess, PorterError};

/// A parsed (or to-be-encoded) approval decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionToken {
    pub scope: IdentityKind,
    pub target_id: i64,
    /// Raw access-level code. Interpreted against `scope` when applied,
    /// so an out-of-range level survives parsing and is rejected later
    /// with a precise message.
    pub level: i64,
}

impl DecisionToken {
    /// Token that sets an individual's access level.
    pub fn individual(target_id: i64, level: IndividualAccess) -> Self {
        Self {
            scope: IdentityKind::Individual,
            target_id,
            level: level.code(),
        }
    }

    /// Token that sets a group's participation level.
    pub fn group(target_id: i64, level: GroupAccess) -> Self {
        Self {
            scope: IdentityKind::Group,
            target_id,
            level: level.code(),
        }
    }

    /// Renders the wire form: `<scope> <target> <level>`.
    pub fn encode(&self) -> String {
        format!("{} {} {}", self.scope.code(), self.target_id, self.level)
    }

    /// Parses the wire form back into a token.
    ///
    /// Callback payloads are attacker-reachable input, so every field is
    /// validated and failures carry enough detail to log.
    pub fn parse(input: &str) -> Result<Self, PorterError> {
        let fields: Vec<&str> = input.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(PorterError::MalformedToken(format!(
                "expected 3 fields, got {}",
                fields.len()
            )));
        }
        let mut numbers = [0i64; 3];
        for (slot, field) in numbers.iter_mut().zip(&fields) {
            *slot = field.parse().map_err(|_| {
                PorterError::MalformedToken(format!("field `{field}` is not an integer"))
            })?;
        }
        let scope = IdentityKind::from_code(numbers[0]).ok_or_else(|| {
            PorterError::MalformedToken(format!("unknown scope code {}", numbers[0]))
        })?;
        Ok(Self {
            scope,
            target_id: numbers[1],
            level: numbers[2],
        })
    }
}
