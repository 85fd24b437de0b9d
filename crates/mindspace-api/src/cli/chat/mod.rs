//! Interactive dashboard for the terminal.
//!
//! Greeting and suggested prompts, the conversation view, slash commands and
//! the voice toggle. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
