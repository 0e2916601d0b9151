use crate::domain::{ChannelRef, CommunityId};

/// Settings of one community
#[derive(Debug, Clone, PartialEq)]
pub struct Community {
    pub id: CommunityId,
    pub notify_channel: Option<ChannelRef>,
    pub stats_channel: Option<ChannelRef>,
    pub top_n: Option<usize>,
}

impl Community {
    pub fn new(id: impl Into<CommunityId>) -> Self {
        Self {
            id: id.into(),
            notify_channel: None,
            stats_channel: None,
            top_n: None,
        }
    }

    pub fn top_n_or(&self, default: usize) -> usize {
        self.top_n.unwrap_or(default)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedPlayer {
    pub community_id: CommunityId,
    /// Canonical tag, without `#`
    pub tag: String,
    /// Display name as last seen in the game
    pub name: String,
}
