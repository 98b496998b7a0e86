//! Network messages - communication between App and Network layers

use crate::models::{CastResponse, PresentResponse, Session};
use crate::network::ApiError;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkCommand {
    /// Start a signer request
    Login,
    /// Ask whether a pending signer has been approved
    CheckSignerStatus { signer_uuid: String },
    /// Load the livestream and its replies
    FetchFeed,
    /// Post a reply to the livestream
    SubmitReply { text: String },

    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    LoggedIn(Result<Session, ApiError>),
    SignerStatus(Result<Session, ApiError>),
    Feed(Result<PresentResponse, ApiError>),
    /// Carries the submitted text so the reply can be built from it
    ReplySubmitted {
        text: String,
        result: Result<CastResponse, ApiError>,
    },
}

impl NetworkResponse {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            NetworkResponse::LoggedIn(_) => "login",
            NetworkResponse::SignerStatus(_) => "signer-status",
            NetworkResponse::Feed(_) => "feed",
            NetworkResponse::ReplySubmitted { .. } => "cast",
        }
    }

    pub fn is_ok(&self) -> bool {
        match self {
            NetworkResponse::LoggedIn(r) | NetworkResponse::SignerStatus(r) => r.is_ok(),
            NetworkResponse::Feed(r) => r.is_ok(),
            NetworkResponse::ReplySubmitted { result, .. } => result.is_ok(),
        }
    }
}
