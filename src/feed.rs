//! Feed view state - the livestream snapshot, its replies and the compose box

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::messages::NetworkCommand;
use crate::models::{Author, CastResponse, LivestreamSnapshot, PresentResponse, Reply};
use crate::network::ApiError;

/// Replies in sequence order. New local replies go to the front.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplyList {
    items: Vec<Reply>,
}

impl ReplyList {
    pub fn new(items: Vec<Reply>) -> Self {
        ReplyList { items }
    }

    pub fn prepend(&mut self, reply: Reply) {
        self.items.insert(0, reply);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&Reply> {
        self.items.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reply> {
        self.items.iter()
    }

    /// Newest first, for display; ties keep sequence order
    pub fn sorted_by_recency(&self) -> Vec<&Reply> {
        let mut sorted: Vec<&Reply> = self.items.iter().collect();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted
    }

    /// One author per distinct fid, in first-seen order
    pub fn participants(&self) -> Vec<&Author> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|reply| &reply.author)
            .filter(|author| seen.insert(author.fid))
            .collect()
    }
}

/// What an apply step did to the feed
#[derive(Clone, Debug, PartialEq)]
pub enum FeedUpdate {
    Loaded,
    /// The fetch failed and the view keeps waiting
    LoadFailed(String),
    ReplyAdded,
    ReplyFailed(String),
}

#[derive(Clone, Debug, Default)]
pub struct FeedView {
    snapshot: Option<LivestreamSnapshot>,
    pub replies: ReplyList,
    pub draft: String,
    pub cursor: usize,
    is_submitting: bool,
}

impl FeedView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the livestream; called once per mount
    pub fn mount(&self) -> NetworkCommand {
        NetworkCommand::FetchFeed
    }

    pub fn snapshot(&self) -> Option<&LivestreamSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot.is_none()
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn apply_feed(&mut self, result: Result<PresentResponse, ApiError>) -> FeedUpdate {
        match result {
            Ok(present) => {
                tracing::info!(
                    cast = %present.livestream.cast_hash,
                    replies = present.replies.len(),
                    "Livestream loaded"
                );
                self.snapshot = Some(present.livestream);
                self.replies = ReplyList::new(present.replies);
                FeedUpdate::Loaded
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching data");
                FeedUpdate::LoadFailed(e.to_string())
            }
        }
    }

    /// Start submitting the draft. `None` while loading, when the draft is
    /// blank, or when a cast is already in flight.
    pub fn submit_reply(&mut self) -> Option<NetworkCommand> {
        let text = self.draft.trim();
        if self.is_loading() || text.is_empty() || self.is_submitting {
            return None;
        }
        self.is_submitting = true;
        Some(NetworkCommand::SubmitReply {
            text: text.to_string(),
        })
    }

    pub fn apply_reply(
        &mut self,
        text: &str,
        result: Result<CastResponse, ApiError>,
        now: DateTime<Utc>,
    ) -> FeedUpdate {
        self.is_submitting = false;
        match result {
            Ok(resp) => {
                let reply = Reply::from_cast_response(text, resp, now);
                tracing::info!(hash = %reply.hash, "Cast submitted successfully");
                self.replies.prepend(reply);
                self.draft.clear();
                self.cursor = 0;
                FeedUpdate::ReplyAdded
            }
            Err(e) => {
                tracing::error!(error = %e, "Error submitting cast");
                FeedUpdate::ReplyFailed(e.to_string())
            }
        }
    }

    /// Attachments are not uploaded; choosing one is only logged
    pub fn select_attachment(&self, path: &Path) {
        tracing::info!(path = %path.display(), "File selected");
    }

    // ========================
    // Draft editing
    // ========================

    pub fn insert_char(&mut self, c: char) {
        if self.cursor <= self.draft.len() {
            self.draft.insert(self.cursor, c);
            self.cursor += c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            let prev = self.draft[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.draft.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.draft[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.draft.len() {
            self.cursor = self.draft[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.draft.len());
        }
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.draft.len();
    }
}
