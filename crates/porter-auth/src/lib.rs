// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization for the Porter bot.
//!
//! Three collaborators share the identity store and the messaging channel:
//! the [`gate::AuthorizationGate`] decides whether an inbound message may
//! proceed, the [`onboarding::OnboardingCoordinator`] records unknown
//! identities and asks the owner about them, and the
//! [`approval::ApprovalHandler`] applies the owner's answers.

pub mod approval;
pub mod gate;
pub mod onboarding;
pub mod token;

#[cfg(test)]
mod testing;

pub use approval::ApprovalHandler;
pub use gate::{AuthorizationGate, GateDecision};
pub use onboarding::OnboardingCoordinator;
pub use token::DecisionToken;
