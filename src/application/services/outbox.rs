//! Single-writer outbox
//!
//! Every send from every loop goes through one queue drained by one task, so
//! stanzas reach the session whole and one at a time.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::application::errors::BotError;
use crate::domain::entities::OutboundMessage;
use crate::domain::traits::StanzaSink;

enum Envelope {
    Plain(OutboundMessage),
    Raw(String),
}

struct Job {
    envelope: Envelope,
    ack: oneshot::Sender<Result<(), BotError>>,
}

/// Cloneable handle to the writer task
#[derive(Clone)]
pub struct Outbox {
    tx: mpsc::Sender<Job>,
}

impl Outbox {
    /// Start the writer task. It stops once every handle is dropped.
    pub fn spawn(sink: Arc<dyn StanzaSink>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<Job>(capacity.max(1));

        let writer = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let result = match &job.envelope {
                    Envelope::Plain(message) => sink.send_plain(message).await,
                    Envelope::Raw(stanza) => sink.send_raw(stanza).await,
                };
                // The sender may have given up waiting; nothing to report then.
                let _ = job.ack.send(result);
            }
            tracing::debug!("Outbox closed");
        });

        (Self { tx }, writer)
    }

    async fn submit(&self, envelope: Envelope) -> Result<(), BotError> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(Job { envelope, ack })
            .await
            .map_err(|_| BotError::SendFailure("outbox closed".to_string()))?;
        done.await
            .map_err(|_| BotError::SendFailure("outbox writer stopped".to_string()))?
    }
}

#[async_trait]
impl StanzaSink for Outbox {
    async fn send_plain(&self, message: &OutboundMessage) -> Result<(), BotError> {
        self.submit(Envelope::Plain(message.clone())).await
    }

    async fn send_raw(&self, stanza: &str) -> Result<(), BotError> {
        self.submit(Envelope::Raw(stanza.to_string())).await
    }
}
