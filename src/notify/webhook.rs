use anyhow::{Result, bail};
use log::warn;
use serde::Serialize;

use super::{MAX_MESSAGE_CHARS, Notifier};
use crate::config::settings::ApiSettings;
use crate::domain::ChannelRef;
use crate::http::RateLimitedClient;

#[derive(Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// Posts messages to chat webhooks; a channel is the webhook URL
pub struct WebhookNotifier {
    client: RateLimitedClient,
}

impl WebhookNotifier {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let client = RateLimitedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
        )?;
        Ok(Self { client })
    }
}

impl Notifier for WebhookNotifier {
    async fn notify(&mut self, channel: &ChannelRef, text: &str) -> Result<()> {
        let content = truncate(text, MAX_MESSAGE_CHARS);
        if content.len() < text.len() {
            warn!("Message cut to {MAX_MESSAGE_CHARS} characters");
        }
        let response = self
            .client
            .post_json(channel.as_str(), &WebhookMessage { content })
            .await?;

        if !response.status().is_success() {
            bail!("Webhook returned status: {}", response.status());
        }
        Ok(())
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
