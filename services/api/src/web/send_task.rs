//! services/api/src/web/send_task.rs
//!
//! This module contains the asynchronous "worker" function that carries one
//! email send from dispatch to completion.

use crate::error::ApiError;
use crate::web::{
    state::{AppState, SessionState, WsSender},
    ws_handler::push_all,
};
use document_library_core::{
    domain::{SendReceipt, SendRequest},
    ports::{MailDispatchService, PortError, PortResult},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runs the dispatch unless the token fires first, in which case the result
/// is `PortError::Cancelled`.
pub async fn dispatch(
    mailer: &dyn MailDispatchService,
    request: &SendRequest,
    cancellation_token: &CancellationToken,
) -> PortResult<SendReceipt> {
    tokio::select! {
        _ = cancellation_token.cancelled() => Err(PortError::Cancelled),
        result = mailer.send(request) => result,
    }
}

/// The background task for a single send.
///
/// Waits for the mail dispatcher, then feeds the receipt back into the
/// session and pushes whatever the session wants the client to see. A
/// receipt that arrives after the viewer was closed is dropped by the session.
pub async fn send_process(
    app_state: Arc<AppState>,
    session_state_lock: Arc<Mutex<SessionState>>,
    ws_sender: WsSender,
    request: SendRequest,
    cancellation_token: CancellationToken,
) -> Result<(), ApiError> {
    info!(ticket = %request.ticket.0, "Send process started.");

    let receipt = match dispatch(app_state.mailer.as_ref(), &request, &cancellation_token).await {
        Ok(receipt) => receipt,
        Err(PortError::Cancelled) => {
            info!(ticket = %request.ticket.0, "Send process cancelled.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    // Snapshots must leave in state-change order: keep the session locked until they are pushed.
    let mut session = session_state_lock.lock().await;
    let reaction = session.complete_send(&receipt);
    push_all(&ws_sender, &reaction.outgoing).await?;
    drop(session);

    info!(ticket = %request.ticket.0, "Send process finished.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SimulatedMailAdapter;
    use document_library_core::domain::SendTicket;
    use std::time::Duration;

    fn request() -> SendRequest {
        SendRequest {
            ticket: SendTicket::new(),
            document_id: "2".to_string(),
            document_title: "Product Roadmap Q2".to_string(),
            recipient: "pm@example.com".to_string(),
            subject: "Product Roadmap Q2 - Document for your review".to_string(),
            body: "Hello".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_completes_when_not_cancelled() {
        let mailer = SimulatedMailAdapter::new(Duration::from_millis(1500));
        let token = CancellationToken::new();
        let request = request();

        let receipt = dispatch(&mailer, &request, &token).await.unwrap();
        assert_eq!(receipt.ticket, request.ticket);
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_stops_when_the_session_ends() {
        let mailer = SimulatedMailAdapter::new(Duration::from_secs(60));
        let token = CancellationToken::new();
        let request = request();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        assert!(matches!(
            dispatch(&mailer, &request, &token).await,
            Err(PortError::Cancelled)
        ));
    }
}
