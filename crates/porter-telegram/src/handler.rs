// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from Telegram updates to channel-agnostic events.
//!
//! Pure conversions only: no authorization happens here. Every message with
//! a sender is forwarded, unknown ones included, because deciding who may
//! talk to the agent is the gate's job, not the transport's.

use teloxide::prelude::*;
use teloxide::types::ChatKind;

use porter_core::types::{CallbackEvent, GroupProfile, InboundMessage, UserProfile};

/// Converts a Telegram user into a [`UserProfile`].
pub fn map_sender(user: &teloxide::types::User) -> UserProfile {
    UserProfile {
        id: user.id.0 as i64,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        username: user.username.clone(),
    }
}

/// Converts a Telegram message into an [`InboundMessage`].
///
/// Returns `None` for messages without a sender (channel posts), which the
/// bot has no identity to authorize.
pub fn map_message(msg: &Message) -> Option<InboundMessage> {
    let sender = map_sender(msg.from.as_ref()?);
    let group = match &msg.chat.kind {
        ChatKind::Private(_) => None,
        ChatKind::Public(_) => Some(GroupProfile {
            id: msg.chat.id.0,
            title: msg.chat.title().map(str::to_string),
        }),
    };
    Some(InboundMessage {
        sender,
        group,
        text: msg.text().map(str::to_string),
    })
}

/// Converts a Telegram callback query into a [`CallbackEvent`].
pub fn map_callback(query: &CallbackQuery) -> CallbackEvent {
    CallbackEvent {
        callback_id: query.id.0.clone(),
        sender: map_sender(&query.from),
        payload: query.data.clone(),
    }
}
