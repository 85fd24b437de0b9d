//! Chat turn pipeline.
//!
//! Each submission appends the user turn immediately, makes exactly one
//! completion call, then reconciles the reply into the conversation. Replies
//! are keyed by the id of the user turn they answer and placed directly after
//! it, so overlapping submissions never interleave out of order.

use std::sync::Mutex;

use tracing::{debug, warn};

use mindspace_types::chat::{COMPLETION_ERROR_TEXT, Turn, TurnId};

use crate::chat::completion::CompletionClient;
use crate::route::AuthenticatedSession;

/// Where the pipeline is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    /// `outstanding` completion calls have not settled yet.
    AwaitingResponse { outstanding: usize },
}

/// A user turn whose reply has not been reconciled yet.
#[derive(Debug)]
#[must_use = "a pending turn must be resolved to get its reply"]
pub struct PendingTurn {
    turn_id: TurnId,
    text: String,
}

impl PendingTurn {
    pub fn turn_id(&self) -> TurnId {
        self.turn_id
    }
}

#[derive(Debug, Default)]
struct Conversation {
    turns: Vec<Turn>,
    outstanding: usize,
}

impl Conversation {
    /// Insert `reply` right after the user turn it answers.
    fn reconcile(&mut self, reply: Turn) {
        let anchor = reply
            .reply_to
            .and_then(|id| self.turns.iter().position(|t| t.id == id));
        match anchor {
            Some(index) => self.turns.insert(index + 1, reply),
            None => self.turns.push(reply),
        }
        self.outstanding = self.outstanding.saturating_sub(1);
    }
}

/// Owns the conversation for one dashboard view.
pub struct ChatPipeline<C: CompletionClient> {
    client: C,
    session: AuthenticatedSession,
    conversation: Mutex<Conversation>,
}

impl<C: CompletionClient> ChatPipeline<C> {
    /// Create a pipeline with an empty conversation.
    pub fn new(client: C, session: AuthenticatedSession) -> Self {
        Self {
            client,
            session,
            conversation: Mutex::new(Conversation::default()),
        }
    }

    pub fn session(&self) -> &AuthenticatedSession {
        &self.session
    }

    /// Submit user text and wait for the reply turn.
    ///
    /// Returns `None` without touching the conversation when `text` is blank.
    /// Otherwise the returned turn is either the assistant reply or the fixed
    /// error text.
    pub async fn submit(&self, text: &str) -> Option<Turn> {
        let pending = self.begin(text)?;
        Some(self.resolve(pending).await)
    }

    /// Append the user turn and enter `AwaitingResponse`, synchronously.
    pub fn begin(&self, text: &str) -> Option<PendingTurn> {
        if text.trim().is_empty() {
            return None;
        }
        let turn = Turn::user(text);
        let turn_id = turn.id;

        let mut conversation = self.lock();
        conversation.turns.push(turn);
        conversation.outstanding += 1;
        debug!(
            turn_id = %turn_id,
            outstanding = conversation.outstanding,
            "User turn appended"
        );

        Some(PendingTurn {
            turn_id,
            text: text.to_string(),
        })
    }

    /// Make the completion call for `pending` and reconcile its reply.
    pub async fn resolve(&self, pending: PendingTurn) -> Turn {
        let result = self
            .client
            .complete(self.session.user_id(), &pending.text)
            .await;

        let reply_text = match result {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    turn_id = %pending.turn_id,
                    user_id = %self.session.user_id(),
                    error = %e,
                    "Error fetching response"
                );
                COMPLETION_ERROR_TEXT.to_string()
            }
        };

        let reply = Turn::assistant(reply_text, pending.turn_id);
        self.lock().reconcile(reply.clone());
        debug!(turn_id = %pending.turn_id, "Reply reconciled");
        reply
    }

    /// Snapshot of the conversation in display order.
    pub fn turns(&self) -> Vec<Turn> {
        self.lock().turns.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().turns.is_empty()
    }

    pub fn state(&self) -> PipelineState {
        match self.lock().outstanding {
            0 => PipelineState::Idle,
            outstanding => PipelineState::AwaitingResponse { outstanding },
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Conversation> {
        self.conversation.lock().unwrap_or_else(|e| e.into_inner())
    }
}
