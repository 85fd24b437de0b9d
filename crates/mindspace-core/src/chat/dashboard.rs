//! Dashboard view-model: greeting, suggested prompts, input buffer and the
//! voice toggle. Every entry point ends in text handed to
//! [`ChatPipeline::submit`](crate::chat::pipeline::ChatPipeline::submit).

use tracing::{debug, warn};

use mindspace_types::identity::{ProfileRecord, UserId};

use crate::repository::profile::ProfileRepository;
use crate::route::AuthenticatedSession;

/// Prompts offered before the first submission.
pub const SUGGESTED_PROMPTS: [&str; 4] = [
    "How can I manage stress?",
    "Tips for better sleep",
    "Dealing with anxiety",
    "Improving self-esteem",
];

pub const GREETING_SUBTITLE: &str = "How can I help you today?";

/// Name used in the greeting when no profile is known.
const FALLBACK_NAME: &str = "User";

/// Load the profile record shown in the greeting.
///
/// Absence and read failures are logged and yield `None`.
pub async fn load_profile<R: ProfileRepository>(
    profiles: &R,
    user_id: &UserId,
) -> Option<ProfileRecord> {
    match profiles.fetch(user_id).await {
        Ok(Some(record)) => Some(record),
        Ok(None) => {
            debug!(user_id = %user_id, "No data available for this user");
            None
        }
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "Error fetching user data");
            None
        }
    }
}

/// Input-side state of the dashboard.
#[derive(Debug)]
pub struct Dashboard {
    display_name: Option<String>,
    input: String,
    listening: bool,
    has_submitted: bool,
}

impl Dashboard {
    pub fn new(session: &AuthenticatedSession) -> Self {
        Self {
            display_name: session
                .identity()
                .map(|i| i.name.clone())
                .filter(|n| !n.is_empty()),
            input: String::new(),
            listening: false,
            has_submitted: false,
        }
    }

    /// Use the stored profile's name when the session did not carry one.
    pub fn apply_profile(&mut self, record: &ProfileRecord) {
        if self.display_name.is_none() && !record.name.is_empty() {
            self.display_name = Some(record.name.clone());
        }
    }

    /// "Hello, {name}".
    pub fn greeting(&self) -> String {
        format!(
            "Hello, {}",
            self.display_name.as_deref().unwrap_or(FALLBACK_NAME)
        )
    }

    /// Whether the greeting header should still be shown.
    pub fn show_greeting(&self) -> bool {
        !self.has_submitted
    }

    /// Suggested prompts, or nothing once the user has started chatting.
    pub fn suggested_prompts(&self, conversation_empty: bool) -> &'static [&'static str] {
        if !self.has_submitted && conversation_empty {
            &SUGGESTED_PROMPTS
        } else {
            &[]
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Take the input for submission, clearing the buffer.
    ///
    /// Returns `None` (and leaves the buffer alone) when it is blank.
    pub fn take_submission(&mut self) -> Option<String> {
        if self.input.trim().is_empty() {
            return None;
        }
        self.has_submitted = true;
        Some(std::mem::take(&mut self.input))
    }

    /// Put suggested prompt `index` (0-based) into the input and take it.
    pub fn select_prompt(&mut self, index: usize) -> Option<String> {
        let prompt = SUGGESTED_PROMPTS.get(index)?;
        self.set_input(*prompt);
        self.take_submission()
    }

    /// Flip voice input on or off. Returns the new state.
    pub fn toggle_listening(&mut self) -> bool {
        self.listening = !self.listening;
        self.listening
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }
}
