//! One authenticated conversation: the user, the remote thread, the
//! in-memory transcript, and the file it is mirrored to.
use std::sync::atomic::AtomicBool;

use anyhow::Result;

use super::models::{ChatMessage, Role, Transcript};
use super::normalize::extract_message_text;
use super::store::TranscriptStore;
use crate::core::AppConfig;
use crate::openai::{AssistantService, RunPoller};

/// Context for a logged-in user's session. The transcript is reloaded
/// from storage when the session starts; the remote thread is created
/// fresh and never persisted, so the service sees each session as a
/// new conversation even though the transcript on disk carries over.
pub struct ChatSession {
    username: String,
    thread_id: String,
    assistant_id: String,
    transcript: Transcript,
    store: TranscriptStore,
    service: Box<dyn AssistantService>,
    poller: RunPoller,
}

impl ChatSession {
    /// Start a session for an already-authenticated username: load any
    /// saved transcript and open a fresh remote thread.
    pub async fn start(
        username: &str,
        config: &AppConfig,
        service: Box<dyn AssistantService>,
    ) -> Result<Self> {
        let store = TranscriptStore::new(&config.storage_path);
        let transcript = store.load(username);
        let thread_id = service.create_thread().await?;
        tracing::debug!("Started session for {} on thread {}", username, thread_id);

        Ok(Self {
            username: username.to_string(),
            thread_id,
            assistant_id: config.assistant_id.clone(),
            transcript,
            store,
            service,
            poller: RunPoller::new(config.poll_interval, config.poll_max_attempts),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Run one turn: append and persist the user's message, submit it,
    /// wait for the run to complete, then append and persist the
    /// normalized reply. The user message is persisted before any
    /// network call, so a failed turn never loses what was asked. A
    /// failed save degrades to a warning; the in-memory transcript
    /// stays authoritative for the rest of the session.
    pub async fn send(&mut self, text: &str, cancel: &AtomicBool) -> Result<ChatMessage> {
        self.transcript.push(ChatMessage::new(Role::User, text));
        self.persist();

        let run = self
            .poller
            .submit_turn(
                self.service.as_ref(),
                &self.thread_id,
                &self.assistant_id,
                text,
            )
            .await?;
        let raw = self
            .poller
            .await_completion(self.service.as_ref(), &self.thread_id, &run, cancel)
            .await?;

        let reply = ChatMessage::new(Role::Assistant, &extract_message_text(&raw));
        self.transcript.push(reply.clone());
        self.persist();

        Ok(reply)
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.username, &self.transcript) {
            tracing::warn!("Could not save history for {}: {:#}", self.username, e);
        }
    }
}
