pub mod summary;
pub mod webhook;

use anyhow::Result;
use log::info;

use crate::domain::ChannelRef;

pub use summary::render_summary;
pub use webhook::WebhookNotifier;

/// Longest message a chat channel accepts, in characters
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Delivers rendered messages to a chat channel
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn notify(&mut self, channel: &ChannelRef, text: &str) -> Result<()>;
}

/// Writes messages to the log instead of delivering them
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn notify(&mut self, channel: &ChannelRef, text: &str) -> Result<()> {
        info!("[{channel}]\n{text}");
        Ok(())
    }
}
