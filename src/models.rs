use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{FALLBACK_DISPLAY_NAME, FALLBACK_PFP_URL, FALLBACK_USERNAME};

/// Approval state of a delegated signer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SignerStatus {
    PendingApproval,
    Approved,
    /// Any status the server reports that we do not act on
    Other(String),
}

impl SignerStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SignerStatus::PendingApproval => "pending_approval",
            SignerStatus::Approved => "approved",
            SignerStatus::Other(s) => s,
        }
    }
}

impl From<String> for SignerStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending_approval" => SignerStatus::PendingApproval,
            "approved" => SignerStatus::Approved,
            _ => SignerStatus::Other(s),
        }
    }
}

impl From<SignerStatus> for String {
    fn from(status: SignerStatus) -> Self {
        status.as_str().to_string()
    }
}

/// The signed-in (or signing-in) user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub signer_uuid: String,
    pub public_key: String,
    pub status: SignerStatus,
    /// Only meaningful while the signer is pending approval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_approval_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fid: Option<u64>,
}

impl Session {
    pub fn is_pending(&self) -> bool {
        self.status == SignerStatus::PendingApproval
    }
}

/// Reply author, a reduced view of a Farcaster user
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub fid: u64,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub username: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub display_name: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub pfp_url: String,
}

/// Livestream host
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Streamer {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub fid: u64,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub username: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub display_name: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub pfp_url: String,
    #[serde(rename = "followerCount", default, deserialize_with = "zero_if_null")]
    pub follower_count: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default, deserialize_with = "empty_if_null")]
    pub id: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub name: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub image_url: String,
}

/// Root cast of the livestream plus its aggregate counters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LivestreamSnapshot {
    #[serde(rename = "castHash", default, deserialize_with = "empty_if_null")]
    pub cast_hash: String,
    pub streamer: Streamer,
    #[serde(rename = "streamUrl", default, deserialize_with = "empty_if_null")]
    pub stream_url: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub text: String,
    #[serde(default = "epoch", deserialize_with = "epoch_if_null")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub likes_count: u64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub recasts_count: u64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub replies_count: u64,
    pub channel: Channel,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub likes_count: u64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub recasts_count: u64,
}

/// A cast replying to the livestream
///
/// The server passes upstream fields through as-is, so any of them may be
/// null. Missing timestamps read as the Unix epoch and sort last.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default, deserialize_with = "empty_if_null")]
    pub hash: String,
    #[serde(default, deserialize_with = "default_if_null")]
    pub author: Author,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub text: String,
    #[serde(default = "epoch", deserialize_with = "epoch_if_null")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "default_if_null")]
    pub reactions: Reactions,
}

impl Reply {
    /// Build the locally shown reply for a cast we just submitted.
    ///
    /// The server is not guaranteed to echo the author or metadata, so every
    /// missing field falls back to an anonymous placeholder.
    pub fn from_cast_response(text: &str, resp: CastResponse, now: DateTime<Utc>) -> Self {
        let author = resp.author.unwrap_or_default();
        Reply {
            hash: resp
                .hash
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| now.timestamp_millis().to_string()),
            author: Author {
                fid: author.fid.unwrap_or(0),
                username: non_empty_or(author.username, FALLBACK_USERNAME),
                display_name: non_empty_or(author.display_name, FALLBACK_DISPLAY_NAME),
                pfp_url: non_empty_or(author.pfp_url, FALLBACK_PFP_URL),
            },
            text: text.to_string(),
            timestamp: resp.timestamp.unwrap_or(now),
            reactions: Reactions::default(),
        }
    }
}

/// Body of `GET /api/present`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresentResponse {
    #[serde(rename = "livestreamData")]
    pub livestream: LivestreamSnapshot,
    #[serde(rename = "repliesToLivestream", default, deserialize_with = "empty_vec_if_null")]
    pub replies: Vec<Reply>,
}

/// Author as echoed by `POST /api/cast`, every field optional
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CastAuthor {
    #[serde(default)]
    pub fid: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub pfp_url: Option<String>,
}

/// Body of `POST /api/cast`; the shape is not guaranteed
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CastResponse {
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub author: Option<CastAuthor>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Body of `POST /api/cast`
#[derive(Clone, Debug, Serialize)]
pub struct CastRequest<'a> {
    pub text: &'a str,
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn zero_if_null<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Ok(Option::<u64>::deserialize(d)?.unwrap_or(0))
}

fn empty_if_null<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn default_if_null<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

fn epoch_if_null<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    Ok(Option::<DateTime<Utc>>::deserialize(d)?.unwrap_or_else(epoch))
}

fn empty_vec_if_null<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Reply>, D::Error> {
    Ok(Option::<Vec<Reply>>::deserialize(d)?.unwrap_or_default())
}

// A garbled timestamp in a cast echo is treated like a missing one.
fn lenient_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok().map(|t| t.with_timezone(&Utc))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 12, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_signer_status_strings() {
        let s: SignerStatus = serde_json::from_str("\"pending_approval\"").unwrap();
        assert_eq!(s, SignerStatus::PendingApproval);
        let s: SignerStatus = serde_json::from_str("\"revoked\"").unwrap();
        assert_eq!(s, SignerStatus::Other("revoked".into()));
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"revoked\"");
    }

    #[test]
    fn test_session_wire_format() {
        let json = r#"{"signer_uuid":"abc","public_key":"0x01","status":"pending_approval","signer_approval_url":"https://client.warpcast.com/deeplinks/signed-key-request?token=x"}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert!(session.is_pending());
        assert_eq!(session.fid, None);

        let back = serde_json::to_value(&session).unwrap();
        assert_eq!(back["status"], "pending_approval");
        assert!(back.get("fid").is_none());
    }

    #[test]
    fn test_present_response_with_nulls() {
        let json = r#"{
            "livestreamData": {
                "castHash": "0xbd78",
                "streamer": {"fid": 16098, "username": "jp", "display_name": "JP", "pfp_url": "https://x/p.png", "followerCount": null},
                "streamUrl": "https://stream",
                "text": "gm",
                "timestamp": "2024-09-12T17:00:00Z",
                "likes_count": 4,
                "recasts_count": null,
                "replies_count": 2,
                "channel": {"id": "vibra", "name": "vibra", "image_url": "https://x/c.png"}
            },
            "repliesToLivestream": null
        }"#;
        let resp: PresentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.livestream.streamer.follower_count, 0);
        assert_eq!(resp.livestream.recasts_count, 0);
        assert!(resp.replies.is_empty());
    }

    #[test]
    fn test_reply_with_null_fields_keeps_the_feed() {
        let json = r#"{
            "livestreamData": {
                "castHash": null,
                "streamer": {"fid": 16098, "username": "jp", "display_name": "JP", "pfp_url": "https://x/p.png", "followerCount": 3},
                "streamUrl": "https://stream",
                "text": "gm",
                "timestamp": null,
                "likes_count": 4,
                "recasts_count": 0,
                "replies_count": 2,
                "channel": {"id": "vibra", "name": "vibra", "image_url": "https://x/c.png"}
            },
            "repliesToLivestream": [
                {"hash": null, "author": null, "text": "no hash", "timestamp": null, "reactions": null},
                {"hash": "0x2", "author": {"fid": 7, "username": "dwr", "display_name": "Dan", "pfp_url": "https://x/d.png"},
                 "text": "ok", "timestamp": "2024-09-12T17:30:00Z", "reactions": {"likes_count": 1, "recasts_count": 0}}
            ]
        }"#;
        let resp: PresentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.livestream.cast_hash, "");
        assert_eq!(resp.livestream.timestamp, DateTime::UNIX_EPOCH);
        assert_eq!(resp.replies.len(), 2);

        let bare = &resp.replies[0];
        assert_eq!(bare.hash, "");
        assert_eq!(bare.timestamp, DateTime::UNIX_EPOCH);
        assert_eq!(bare.author, Author::default());
        assert_eq!(bare.reactions, Reactions::default());
        assert_eq!(resp.replies[1].author.username, "dwr");
    }

    #[test]
    fn test_reply_fallbacks_when_author_missing() {
        let reply = Reply::from_cast_response("hello", CastResponse::default(), now());
        assert_eq!(reply.author.fid, 0);
        assert_eq!(reply.author.username, "anon_user");
        assert_eq!(reply.author.display_name, "Anon");
        assert_eq!(reply.author.pfp_url, FALLBACK_PFP_URL);
        assert_eq!(reply.text, "hello");
        assert_eq!(reply.timestamp, now());
        assert_eq!(reply.hash, now().timestamp_millis().to_string());
        assert_eq!(reply.reactions, Reactions::default());
    }

    #[test]
    fn test_reply_keeps_echoed_fields() {
        let resp: CastResponse = serde_json::from_str(
            r#"{"hash":"0xaa","author":{"fid":7,"username":"dwr"},"timestamp":"2024-09-12T18:05:00Z"}"#,
        )
        .unwrap();
        let reply = Reply::from_cast_response("gm", resp, now());
        assert_eq!(reply.hash, "0xaa");
        assert_eq!(reply.author.fid, 7);
        assert_eq!(reply.author.username, "dwr");
        assert_eq!(reply.author.display_name, "Anon");
        assert_eq!(reply.timestamp, Utc.with_ymd_and_hms(2024, 9, 12, 18, 5, 0).unwrap());
    }

    #[test]
    fn test_cast_response_bad_timestamp_falls_back() {
        let resp: CastResponse = serde_json::from_str(r#"{"timestamp":"yesterday"}"#).unwrap();
        assert_eq!(resp.timestamp, None);
    }
}
