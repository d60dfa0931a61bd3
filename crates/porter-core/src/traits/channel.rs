// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for the messaging transport (Telegram).

use async_trait::async_trait;

use crate::error::PorterError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundEvent, PromptChoice};

/// Adapter for the bidirectional messaging transport.
///
/// Delivers inbound messages and callback events, sends text replies and
/// decision prompts, and carries the two side-effect instructions the
/// authorization flow needs: callback acknowledgment and leaving a chat.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), PorterError>;

    /// Receives the next inbound event from the channel.
    async fn next_event(&self) -> Result<InboundEvent, PorterError>;

    /// Sends a plain text message to a chat.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), PorterError>;

    /// Sends a decision prompt: a text with N labeled options, each bound to
    /// an opaque token string that comes back as a callback payload.
    async fn send_prompt(
        &self,
        chat_id: i64,
        text: &str,
        choices: &[PromptChoice],
    ) -> Result<(), PorterError>;

    /// Acknowledges a callback event with a short text toast.
    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), PorterError>;

    /// Instructs the transport to exit a conversation.
    ///
    /// Must be safe to repeat: callers re-issue this on every evaluation of a
    /// `Leave`-level group.
    async fn leave_chat(&self, chat_id: i64) -> Result<(), PorterError>;
}
