//! Terminal rendering of conversation turns.
//!
//! Assistant replies are markdown and go through `termimad`; user turns are
//! echoed verbatim.

use std::io::{self, Write};

use console::style;
use termimad::MadSkin;
use termimad::crossterm::style::Color;

use mindspace_types::chat::{Sender, Turn};

const WRAP_WIDTH: usize = 100;

pub struct ChatRenderer {
    skin: MadSkin,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Magenta);
        skin.headers[0].set_fg(Color::Magenta);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin }
    }

    /// Render assistant markdown, wrapped to the terminal (or a fixed width
    /// when there is no terminal).
    pub fn render_markdown(&self, markdown: &str) -> String {
        let width = termimad::terminal_size().0 as usize;
        let width = if width == 0 { WRAP_WIDTH } else { width.min(WRAP_WIDTH) };
        self.skin.text(markdown, Some(width.saturating_sub(4))).to_string()
    }

    /// Print one turn.
    pub fn print_turn(&self, out: &mut impl Write, turn: &Turn) -> io::Result<()> {
        self.print_reply(out, turn, None)
    }

    /// Print one turn, tagging the header with the question it answers when
    /// `question` is given.
    pub fn print_reply(
        &self,
        out: &mut impl Write,
        turn: &Turn,
        question: Option<&str>,
    ) -> io::Result<()> {
        let header = match question {
            Some(q) => format!(
                "{} {}",
                style("MindSpace >").magenta().bold(),
                style(format!("(re: \"{}\")", excerpt(q))).dim()
            ),
            None => style("MindSpace >").magenta().bold().to_string(),
        };
        match turn.sender {
            Sender::User => {
                writeln!(out, "  {} {}", style("You >").green().bold(), turn.text)
            }
            Sender::Assistant if turn.is_error() => {
                writeln!(out, "  {header} {}", style(&turn.text).red())?;
                writeln!(out)
            }
            Sender::Assistant => {
                writeln!(out, "  {header}")?;
                for line in self.render_markdown(&turn.text).lines() {
                    writeln!(out, "  {line}")?;
                }
                writeln!(out)
            }
        }
    }
}

fn excerpt(text: &str) -> String {
    const MAX: usize = 40;
    if text.chars().count() <= MAX {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX - 1).collect();
    format!("{}…", cut.trim_end())
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}
