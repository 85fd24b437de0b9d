//! Dashboard header: greeting, subtitle and suggested prompts.

use std::io::{self, Write};

use console::style;

use mindspace_core::chat::dashboard::{Dashboard, GREETING_SUBTITLE};

/// Print the greeting block shown before the first submission.
pub fn print_greeting(out: &mut impl Write, dashboard: &Dashboard) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {}", style(dashboard.greeting()).magenta().bold())?;
    writeln!(out, "  {}", style(GREETING_SUBTITLE).dim())?;
    writeln!(out)?;
    print_prompts(out, dashboard.suggested_prompts(true))?;
    writeln!(
        out,
        "  {}",
        style("Type a message, /prompt N for a suggestion, /help for commands").dim()
    )?;
    writeln!(out, "  {}", style("---").dim())?;
    writeln!(out)
}

/// Numbered list of suggested prompts. Prints nothing for an empty list.
pub fn print_prompts(out: &mut impl Write, prompts: &[&str]) -> io::Result<()> {
    if prompts.is_empty() {
        return Ok(());
    }
    for (i, prompt) in prompts.iter().enumerate() {
        writeln!(out, "  {} {}", style(format!("[{}]", i + 1)).cyan(), prompt)?;
    }
    writeln!(out)
}
