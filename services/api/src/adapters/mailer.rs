//! services/api/src/adapters/mailer.rs
//!
//! The Send Simulator: an adapter that implements the `MailDispatchService`
//! port without talking to any mail server. Every send waits a fixed delay
//! and then succeeds.

use async_trait::async_trait;
use chrono::Utc;
use document_library_core::domain::{SendReceipt, SendRequest};
use document_library_core::ports::{MailDispatchService, PortResult};
use std::time::Duration;
use tracing::info;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone, Debug)]
pub struct SimulatedMailAdapter {
    delay: Duration,
}

impl SimulatedMailAdapter {
    /// Creates a new `SimulatedMailAdapter` with a fixed send latency.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

//=========================================================================================
// `MailDispatchService` Trait Implementation
//=========================================================================================

#[async_trait]
impl MailDispatchService for SimulatedMailAdapter {
    async fn send(&self, request: &SendRequest) -> PortResult<SendReceipt> {
        info!(
            ticket = %request.ticket.0,
            recipient = %request.recipient,
            "Simulating email dispatch for '{}'",
            request.document_title
        );
        tokio::time::sleep(self.delay).await;
        Ok(SendReceipt::for_request(request, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use document_library_core::domain::SendTicket;
    use tokio::time::Instant;

    fn request() -> SendRequest {
        SendRequest {
            ticket: SendTicket::new(),
            document_id: "1".to_string(),
            document_title: "Annual Financial Report 2024".to_string(),
            recipient: "cfo@example.com".to_string(),
            subject: "Annual Financial Report 2024 - Document for your review".to_string(),
            body: "Hello".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn send_succeeds_after_the_fixed_delay() {
        let adapter = SimulatedMailAdapter::new(Duration::from_millis(1500));
        let request = request();
        let started = Instant::now();

        let receipt = adapter.send(&request).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(1500));
        assert_eq!(receipt.ticket, request.ticket);
        assert_eq!(receipt.recipient, "cfo@example.com");
        assert_eq!(receipt.document_title, "Annual Financial Report 2024");
    }

    #[tokio::test(start_paused = true)]
    async fn send_is_still_pending_before_the_delay() {
        let adapter = SimulatedMailAdapter::new(Duration::from_secs(2));
        let request = request();
        let outcome = tokio::time::timeout(Duration::from_secs(1), adapter.send(&request)).await;
        assert!(outcome.is_err());
    }
}
