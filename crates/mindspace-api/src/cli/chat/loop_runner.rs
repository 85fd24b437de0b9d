//! Dashboard loop.
//!
//! Guard → profile hydration → greeting → input loop. Each submission is
//! appended to the conversation immediately and its completion call runs on
//! a background task, so the user can keep typing while replies arrive.

use std::io::Write;
use std::sync::Arc;

use anyhow::anyhow;
use console::style;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use mindspace_core::chat::completion::CompletionClient;
use mindspace_core::chat::dashboard::{Dashboard, SUGGESTED_PROMPTS};
use mindspace_core::chat::pipeline::{ChatPipeline, PipelineState};
use mindspace_core::route::{Route, authorize};
use mindspace_types::chat::{Sender, Turn};

use crate::cli::session::hydrate_profile;
use crate::cli::spinner;
use crate::state::AppState;

use super::banner::{print_greeting, print_prompts};
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Run the dashboard. Returns the view to go to next, if any.
pub async fn run_chat_loop(state: &mut AppState) -> anyhow::Result<Option<Route>> {
    let Some(session) = authorize(&state.session) else {
        debug!("No session, redirecting to login");
        return Ok(Some(Route::Login));
    };
    let client = state.completion_client()?;

    let loading = spinner("Loading your profile...");
    let profile = hydrate_profile(state).await;
    loading.finish_and_clear();

    let mut dashboard = Dashboard::new(&session);
    if let Some(record) = &profile {
        dashboard.apply_profile(record);
    }

    let pipeline = Arc::new(ChatPipeline::new(client, session));
    let renderer = ChatRenderer::new();
    let mut replies: JoinSet<Turn> = JoinSet::new();

    let (mut input, mut out) = ChatInput::new(prompt(&dashboard, PipelineState::Idle))
        .map_err(|e| anyhow!("Failed to initialize input: {e}"))?;
    print_greeting(&mut out, &dashboard)?;

    let next = loop {
        tokio::select! {
            Some(joined) = replies.join_next(), if !replies.is_empty() => {
                match joined {
                    Ok(reply) => {
                        let question = reply_context(&pipeline.turns(), &reply);
                        renderer.print_reply(&mut out, &reply, question.as_deref())?;
                    }
                    Err(e) => warn!(error = %e, "Reply task failed"),
                }
            }
            event = input.read_line() => match event {
                InputEvent::Eof => break None,
                InputEvent::Interrupted => {
                    writeln!(out, "  {}", style("(Ctrl+D or /exit to leave)").dim())?;
                }
                InputEvent::Message(line) => match commands::parse(&line) {
                    None => {
                        dashboard.set_input(line);
                        if let Some(text) = dashboard.take_submission() {
                            submit(&pipeline, &mut replies, &text);
                        }
                    }
                    Some(ChatCommand::Prompt(n)) => match dashboard.select_prompt(n - 1) {
                        Some(text) => {
                            if let Some(turn) = submit(&pipeline, &mut replies, &text) {
                                renderer.print_turn(&mut out, &turn)?;
                            }
                        }
                        None => writeln!(
                            out,
                            "  {} No suggested prompt {n}. Try /prompts",
                            style("!").yellow().bold()
                        )?,
                    },
                    Some(ChatCommand::Prompts) => print_prompts(&mut out, &SUGGESTED_PROMPTS)?,
                    Some(ChatCommand::Voice) => {
                        let on = dashboard.toggle_listening();
                        debug!(listening = on, "Voice input toggled");
                        let status = if on { "Listening..." } else { "Voice input off" };
                        writeln!(out, "  {}", style(status).dim())?;
                    }
                    Some(ChatCommand::History) => {
                        writeln!(out)?;
                        for turn in pipeline.turns() {
                            renderer.print_turn(&mut out, &turn)?;
                        }
                    }
                    Some(ChatCommand::Help) => commands::print_help(&mut out)?,
                    Some(ChatCommand::Clear) => input.clear(),
                    Some(ChatCommand::Exit) => break None,
                    Some(ChatCommand::Logout) => {
                        state.session.logout();
                        break Some(Route::Login);
                    }
                    Some(ChatCommand::Unknown(cmd)) => writeln!(
                        out,
                        "  {} Unknown command: {cmd}. Type /help for available commands.",
                        style("?").yellow().bold()
                    )?,
                },
            },
        }
        input.update_prompt(&prompt(&dashboard, pipeline.state()));
    };

    if !replies.is_empty() {
        debug!(outstanding = replies.len(), "Leaving dashboard with replies in flight");
        replies.abort_all();
    }
    input.flush();

    match next {
        Some(Route::Login) => println!("\n  {} Signed out.\n", style("✓").green().bold()),
        _ => println!("\n  {}\n", style("Session ended.").dim()),
    }
    Ok(next)
}

/// Append the user turn and resolve its reply on a background task.
fn submit<C: CompletionClient + 'static>(
    pipeline: &Arc<ChatPipeline<C>>,
    replies: &mut JoinSet<Turn>,
    text: &str,
) -> Option<Turn> {
    let pending = pipeline.begin(text)?;
    let turn_id = pending.turn_id();
    let worker = Arc::clone(pipeline);
    replies.spawn(async move { worker.resolve(pending).await });
    pipeline.turns().into_iter().find(|t| t.id == turn_id)
}

/// The question a reply answers, when the user has asked something since.
///
/// Replies print as they complete, so a late one needs a label to be read
/// against the right question.
fn reply_context(turns: &[Turn], reply: &Turn) -> Option<String> {
    let question_id = reply.reply_to?;
    let position = turns.iter().position(|t| t.id == question_id)?;
    let asked_since = turns[position + 1..]
        .iter()
        .any(|t| t.sender == Sender::User);
    asked_since.then(|| turns[position].text.clone())
}

fn prompt(dashboard: &Dashboard, state: PipelineState) -> String {
    let mut prompt = String::from("  ");
    if dashboard.is_listening() {
        prompt.push_str(&format!("{} ", style("● listening").red()));
    }
    if let PipelineState::AwaitingResponse { outstanding } = state {
        prompt.push_str(&format!("{} ", style(format!("({outstanding} thinking)")).dim()));
    }
    prompt.push_str(&format!("{} ", style("You >").green().bold()));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindspace_core::auth::session::SessionStore;
    use mindspace_core::repository::storage::MemoryStorage;
    use mindspace_types::error::CompletionError;
    use mindspace_types::identity::{Identity, UserId};

    struct EchoClient;

    impl CompletionClient for EchoClient {
        async fn complete(&self, _user_id: &UserId, text: &str) -> Result<String, CompletionError> {
            Ok(format!("echo: {text}"))
        }
    }

    fn signed_in_pipeline() -> (Dashboard, Arc<ChatPipeline<EchoClient>>) {
        let mut store = SessionStore::new(MemoryStorage::new());
        store.login(Identity {
            id: UserId::new("1093"),
            name: "Ada".to_string(),
            email: String::new(),
            picture_url: String::new(),
        });
        let session = authorize(&store).unwrap();
        (Dashboard::new(&session), Arc::new(ChatPipeline::new(EchoClient, session)))
    }

    #[test]
    fn test_prompt_shows_listening_marker() {
        let (mut dashboard, _) = signed_in_pipeline();
        assert!(!prompt(&dashboard, PipelineState::Idle).contains("listening"));
        dashboard.toggle_listening();
        assert!(prompt(&dashboard, PipelineState::Idle).contains("listening"));
    }

    #[test]
    fn test_prompt_shows_outstanding_replies() {
        let (dashboard, _) = signed_in_pipeline();
        let text = prompt(&dashboard, PipelineState::AwaitingResponse { outstanding: 2 });
        assert!(text.contains("2 thinking"));
    }

    #[tokio::test]
    async fn test_submit_returns_user_turn_and_reply_arrives() {
        let (_, pipeline) = signed_in_pipeline();
        let mut replies = JoinSet::new();

        let turn = submit(&pipeline, &mut replies, "Dealing with anxiety").unwrap();
        assert_eq!(turn.text, "Dealing with anxiety");

        let reply = replies.join_next().await.unwrap().unwrap();
        assert_eq!(reply.text, "echo: Dealing with anxiety");
        assert_eq!(reply.reply_to, Some(turn.id));
        assert_eq!(pipeline.state(), PipelineState::Idle);
    }

    #[tokio::test]
    async fn test_submit_blank_spawns_nothing() {
        let (_, pipeline) = signed_in_pipeline();
        let mut replies = JoinSet::new();
        assert!(submit(&pipeline, &mut replies, "   ").is_none());
        assert!(replies.is_empty());
        assert!(pipeline.is_empty());
    }

    #[tokio::test]
    async fn test_late_reply_is_labelled_with_its_question() {
        let (_, pipeline) = signed_in_pipeline();
        let mut replies = JoinSet::new();

        submit(&pipeline, &mut replies, "a").unwrap();
        submit(&pipeline, &mut replies, "b").unwrap();
        while replies.join_next().await.is_some() {}

        let turns = pipeline.turns();
        let reply_to = |q: &str| {
            let id = turns.iter().find(|t| t.text == q).unwrap().id;
            turns.iter().find(|t| t.reply_to == Some(id)).unwrap().clone()
        };
        assert_eq!(reply_context(&turns, &reply_to("a")).as_deref(), Some("a"));
        assert_eq!(reply_context(&turns, &reply_to("b")), None);
    }

    #[tokio::test]
    async fn test_in_order_reply_is_unlabelled() {
        let (_, pipeline) = signed_in_pipeline();
        let mut replies = JoinSet::new();

        submit(&pipeline, &mut replies, "only").unwrap();
        let reply = replies.join_next().await.unwrap().unwrap();
        assert_eq!(reply_context(&pipeline.turns(), &reply), None);
    }
}
