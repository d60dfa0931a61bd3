// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Porter bot.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide:
//! long polling for messages and callback queries, plain text replies,
//! inline-keyboard decision prompts, callback acknowledgment, and the
//! leave-chat instruction the authorization flow relies on.

pub mod handler;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQueryId, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Recipient,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use porter_config::model::TelegramConfig;
use porter_core::error::PorterError;
use porter_core::traits::{ChannelAdapter, PluginAdapter};
use porter_core::types::{AdapterType, HealthStatus, InboundEvent, PromptChoice};

/// Telegram channel adapter implementing [`ChannelAdapter`].
///
/// Connects via long polling and forwards every message and callback query
/// into an inbound queue. No filtering happens here; the authorization gate
/// downstream sees everything, which is what lets it onboard strangers.
pub struct TelegramChannel {
    bot: Bot,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, PorterError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            PorterError::Config("telegram.bot_token is required for the Telegram adapter".into())
        })?;

        if token.is_empty() {
            return Err(PorterError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, PorterError> {
        // Check if the bot token is valid by calling getMe.
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), PorterError> {
        debug!("Telegram channel shutting down");
        // Abort the polling task explicitly; dropping a JoinHandle only
        // detaches it. Events already queued stay readable until the
        // receiver is dropped.
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), PorterError> {
        if self.polling_handle.is_some() {
            return Ok(()); // Already connected
        }

        let bot = self.bot.clone();
        let message_tx = self.inbound_tx.clone();
        let callback_tx = self.inbound_tx.clone();

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let handler = dptree::entry()
                .branch(Update::filter_message().endpoint(move |msg: Message| {
                    let tx = message_tx.clone();
                    async move {
                        match handler::map_message(&msg) {
                            Some(inbound) => {
                                if tx.send(InboundEvent::Message(inbound)).await.is_err() {
                                    warn!("inbound channel closed, dropping message");
                                }
                            }
                            None => {
                                debug!(chat_id = msg.chat.id.0, "ignoring sender-less message");
                            }
                        }
                        respond(())
                    }
                }))
                .branch(Update::filter_callback_query().endpoint(
                    move |query: CallbackQuery| {
                        let tx = callback_tx.clone();
                        async move {
                            let event = handler::map_callback(&query);
                            if tx.send(InboundEvent::Callback(event)).await.is_err() {
                                warn!("inbound channel closed, dropping callback");
                            }
                            respond(())
                        }
                    },
                ));

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {}) // Silently ignore other update kinds
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn next_event(&self) -> Result<InboundEvent, PorterError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| PorterError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), PorterError> {
        self.bot
            .send_message(Recipient::Id(ChatId(chat_id)), text)
            .await
            .map_err(|e| PorterError::Channel {
                message: format!("failed to send message: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }

    async fn send_prompt(
        &self,
        chat_id: i64,
        text: &str,
        choices: &[PromptChoice],
    ) -> Result<(), PorterError> {
        // One button per row so long labels stay readable.
        let keyboard = InlineKeyboardMarkup::new(choices.iter().map(|choice| {
            vec![InlineKeyboardButton::callback(
                choice.label.clone(),
                choice.token.clone(),
            )]
        }));

        self.bot
            .send_message(Recipient::Id(ChatId(chat_id)), text)
            .reply_markup(keyboard)
            .await
            .map_err(|e| PorterError::Channel {
                message: format!("failed to send decision prompt: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), PorterError> {
        self.bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()))
            .text(text.to_string())
            .await
            .map_err(|e| PorterError::Channel {
                message: format!("failed to acknowledge callback: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }

    async fn leave_chat(&self, chat_id: i64) -> Result<(), PorterError> {
        self.bot
            .leave_chat(ChatId(chat_id))
            .await
            .map_err(|e| PorterError::Channel {
                message: format!("failed to leave chat: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_requires_bot_token() {
        let config = TelegramConfig { bot_token: None };
        assert!(TelegramChannel::new(&config).is_err());
    }

    #[test]
    fn new_rejects_empty_token() {
        let config = TelegramConfig {
            bot_token: Some(String::new()),
        };
        assert!(TelegramChannel::new(&config).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        let config = TelegramConfig {
            bot_token: Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11".into()),
        };
        assert!(TelegramChannel::new(&config).is_ok());
    }

    #[tokio::test]
    async fn shutdown_before_connect_is_a_no_op() {
        let config = TelegramConfig {
            bot_token: Some("test:token".into()),
        };
        let channel = TelegramChannel::new(&config).unwrap();
        channel.shutdown().await.unwrap();
    }

    #[test]
    fn plugin_adapter_metadata() {
        let config = TelegramConfig {
            bot_token: Some("test:token".into()),
        };
        let channel = TelegramChannel::new(&config).unwrap();
        assert_eq!(channel.name(), "telegram");
        assert_eq!(channel.version(), semver::Version::new(0, 1, 0));
        assert_eq!(channel.adapter_type(), AdapterType::Channel);
    }
}
