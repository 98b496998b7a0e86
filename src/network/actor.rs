//! Network actor - runs API calls in the Tokio async runtime

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::LivestreamApi;

/// Network actor that turns commands into API calls.
///
/// Every command runs as its own task, so calls are not ordered relative
/// to each other and responses arrive in completion order.
pub struct NetworkActor<A: LivestreamApi + 'static> {
    api: Arc<A>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl<A: LivestreamApi + 'static> NetworkActor<A> {
    pub fn new(api: A, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            api: Arc::new(api),
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                        Some(cmd) => self.spawn(cmd),
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }

    fn spawn(&mut self, cmd: NetworkCommand) {
        let api = Arc::clone(&self.api);
        let response_tx = self.response_tx.clone();

        self.active_requests.spawn(async move {
            let response = match cmd {
                NetworkCommand::Login => {
                    tracing::info!("Requesting signer");
                    NetworkResponse::LoggedIn(api.login().await)
                }
                NetworkCommand::CheckSignerStatus { signer_uuid } => {
                    tracing::debug!(%signer_uuid, "Checking signer status");
                    NetworkResponse::SignerStatus(api.signer_status(&signer_uuid).await)
                }
                NetworkCommand::FetchFeed => {
                    tracing::info!("Fetching livestream");
                    NetworkResponse::Feed(api.fetch_present().await)
                }
                NetworkCommand::SubmitReply { text } => {
                    tracing::info!(len = text.len(), "Submitting cast");
                    let result = api.submit_cast(&text).await;
                    NetworkResponse::ReplySubmitted { text, result }
                }
                NetworkCommand::Shutdown => return,
            };
            tracing::info!(kind = response.kind(), ok = response.is_ok(), "Request completed");
            let _ = response_tx.send(response);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CastResponse, PresentResponse, Session, SignerStatus};
    use crate::network::ApiError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LivestreamApi for RecordingApi {
        async fn login(&self) -> Result<Session, ApiError> {
            self.calls.lock().unwrap().push("login".into());
            Ok(Session {
                signer_uuid: "s-1".into(),
                public_key: "0x01".into(),
                status: SignerStatus::PendingApproval,
                signer_approval_url: Some("https://approve".into()),
                fid: None,
            })
        }

        async fn signer_status(&self, signer_uuid: &str) -> Result<Session, ApiError> {
            self.calls.lock().unwrap().push(format!("status:{}", signer_uuid));
            Err(ApiError::Status {
                status: 404,
                body: "unknown signer".into(),
            })
        }

        async fn fetch_present(&self) -> Result<PresentResponse, ApiError> {
            self.calls.lock().unwrap().push("present".into());
            Err(ApiError::Transport("offline".into()))
        }

        async fn submit_cast(&self, text: &str) -> Result<CastResponse, ApiError> {
            self.calls.lock().unwrap().push(format!("cast:{}", text));
            Ok(CastResponse::default())
        }
    }

    #[tokio::test]
    async fn test_commands_map_to_responses() {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(NetworkActor::new(RecordingApi::default(), resp_tx).run(cmd_rx));

        cmd_tx.send(NetworkCommand::SubmitReply { text: "gm".into() }).unwrap();
        match resp_rx.recv().await.unwrap() {
            NetworkResponse::ReplySubmitted { text, result } => {
                assert_eq!(text, "gm");
                assert!(result.is_ok());
            }
            other => panic!("unexpected {:?}", other),
        }

        cmd_tx
            .send(NetworkCommand::CheckSignerStatus { signer_uuid: "s-1".into() })
            .unwrap();
        match resp_rx.recv().await.unwrap() {
            NetworkResponse::SignerStatus(Err(ApiError::Status { status, .. })) => assert_eq!(status, 404),
            other => panic!("unexpected {:?}", other),
        }

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_actor_stops_when_commands_close() {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
        let (resp_tx, _resp_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(NetworkActor::new(RecordingApi::default(), resp_tx).run(cmd_rx));
        drop(cmd_tx);
        handle.await.unwrap();
    }
}
