// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command dispatch for authorized messages.
//!
//! Runs only after the gate permits a message. Bare text is ignored;
//! unrecognized commands get a short reply so senders know the bot is alive.

use std::sync::Arc;

use tracing::warn;

use porter_core::{ChannelAdapter, InboundMessage, StorageAdapter};

/// Handles one permitted message.
pub async fn dispatch(
    message: &InboundMessage,
    store: &Arc<dyn StorageAdapter>,
    channel: &Arc<dyn ChannelAdapter>,
) {
    let Some(text) = message.text.as_deref() else {
        return;
    };
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return;
    }

    let (command, argument) = split_command(trimmed);
    let reply = match command {
        "/start" => Some(format!(
            "Hello {}! You are authorized to talk to me.",
            message.sender.first_name
        )),
        "/echo" => {
            if argument.is_empty() {
                Some("Usage: /echo <text>".to_string())
            } else {
                Some(argument.to_string())
            }
        }
        "/hi" => match store.random_greeting().await {
            Ok(Some(greeting)) => Some(greeting),
            Ok(None) => None,
            Err(error) => {
                warn!(%error, "failed to fetch a greeting");
                None
            }
        },
        "/greeting" => {
            if argument.is_empty() {
                Some("Usage: /greeting <text>".to_string())
            } else {
                match store.add_greeting(argument).await {
                    Ok(()) => Some("Greeting saved.".to_string()),
                    Err(error) => {
                        warn!(%error, "failed to save greeting");
                        Some("Something went wrong, the greeting was not saved.".to_string())
                    }
                }
            }
        }
        _ => Some("I do not recognize that command.".to_string()),
    };

    if let Some(reply) = reply {
        if let Err(error) = channel.send_text(message.chat_id(), &reply).await {
            warn!(%error, chat_id = message.chat_id(), "failed to send reply");
        }
    }
}

/// Splits a command line into the command and its argument.
///
/// In groups Telegram suffixes commands with the bot's mention
/// (`/echo@PorterBot hello`); the mention is stripped before matching.
fn split_command(text: &str) -> (&str, &str) {
    let (command, argument) = match text.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (text, ""),
    };
    let command = command.split_once('@').map(|(c, _)| c).unwrap_or(command);
    (command, argument)
}
