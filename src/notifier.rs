/*!
 * Outbound delivery of the formatted digest.
 */

use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::app_config::TelegramConfig;
use crate::errors::ProviderError;
use crate::providers::error_from_response;

/// Destination for the daily message
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), ProviderError>;
}

/// `sendMessage` request body
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub parse_mode: &'a str,
}

/// Telegram Bot API notifier. Without a token, messages go to stdout instead.
#[derive(Debug)]
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.config.bot_token.is_empty()
    }

    pub fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), ProviderError> {
        if !self.is_configured() {
            warn!("Telegram token not set. Printing message instead:");
            println!("{}", text);
            return Ok(());
        }

        let body = SendMessageRequest {
            chat_id: &self.config.chat_id,
            text,
            parse_mode: &self.config.parse_mode,
        };

        let response = self.client.post(self.send_message_url()).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        info!("Message sent successfully.");
        Ok(())
    }
}
