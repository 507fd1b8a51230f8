//! Console I/O with the human operator

use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Input};
use std::io;

/// Line based conversation with the operator
pub trait Operator {
    /// Shows `prompt` and blocks until the operator enters a line
    ///
    /// # Errors
    /// * If the console is closed or unreadable
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Shows informational text
    fn say(&mut self, text: &str);

    /// Shows a problem the operator has to correct
    fn warn(&mut self, text: &str);

    /// Shows a stage heading
    fn heading(&mut self, text: &str) {
        self.say("");
        self.say(text);
    }
}

/// The interactive terminal the tool was started from
pub struct Terminal {
    term: Term,
    theme: ColorfulTheme,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            theme: ColorfulTheme::default(),
        }
    }

    fn write(&self, text: &str) {
        // a failed write to the console leaves nothing better to report to
        if let Err(error) = self.term.write_line(text) {
            tracing::error!(?error, "failed to write to console");
        }
    }
}

impl Operator for Terminal {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text_on(&self.term)
    }

    fn say(&mut self, text: &str) {
        self.write(text);
    }

    fn warn(&mut self, text: &str) {
        self.write(&format!("{} {}", style("!").red().bold(), style(text).yellow()));
    }

    fn heading(&mut self, text: &str) {
        self.write("");
        self.write(&style(text).cyan().bold().to_string());
    }
}
