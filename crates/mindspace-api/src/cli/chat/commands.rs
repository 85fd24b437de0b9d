//! Slash commands available on the dashboard.

use std::io::{self, Write};

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Clear,
    Exit,
    /// List the suggested prompts.
    Prompts,
    /// Submit suggested prompt N (1-based).
    Prompt(usize),
    /// Toggle voice input.
    Voice,
    /// Reprint the conversation in display order.
    History,
    Logout,
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.splitn(2, ' ');
    let cmd = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/prompts" => ChatCommand::Prompts,
        "/prompt" | "/p" => match arg.map(str::parse::<usize>) {
            Some(Ok(n)) if n > 0 => ChatCommand::Prompt(n),
            Some(_) => ChatCommand::Unknown("/prompt expects a number from the list".to_string()),
            None => ChatCommand::Prompts,
        },
        "/voice" | "/mic" => ChatCommand::Voice,
        "/history" => ChatCommand::History,
        "/logout" => ChatCommand::Logout,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

pub fn print_help(out: &mut impl Write) -> io::Result<()> {
    let rows = [
        ("/help", "Show this help message"),
        ("/prompts", "List suggested prompts"),
        ("/prompt N", "Send suggested prompt N"),
        ("/voice", "Toggle voice input"),
        ("/history", "Show the conversation so far"),
        ("/clear", "Clear the screen"),
        ("/logout", "Sign out"),
        ("/exit", "Leave the dashboard"),
    ];

    writeln!(out)?;
    writeln!(out, "  {}", style("Available commands:").bold())?;
    writeln!(out)?;
    for (cmd, description) in rows {
        writeln!(out, "  {}  {description}", style(format!("{cmd:<10}")).cyan())?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "  {}",
        style("You can keep typing while a reply is on its way. Ctrl+D to exit").dim()
    )?;
    writeln!(out)
}
