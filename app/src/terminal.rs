//! Terminal rendering of controller state.

use colored::{ColoredString, Colorize};
use wikibot_config::{ColorMode, PresentationConfig};
use wikibot_conversation::Notification;
use wikibot_core::{Origin, SessionSummary, Turn};

pub struct TerminalPresenter {
    config: PresentationConfig,
}

impl TerminalPresenter {
    #[must_use]
    pub const fn new(config: PresentationConfig) -> Self {
        Self { config }
    }

    fn label(&self, origin: Origin) -> ColoredString {
        match (origin, self.config.color_mode) {
            (Origin::User, ColorMode::Dark) => "You".bright_green().bold(),
            (Origin::User, ColorMode::Light) => "You".green().bold(),
            (Origin::Assistant, ColorMode::Dark) => "Bot".bright_white().bold(),
            (Origin::Assistant, ColorMode::Light) => "Bot".black().bold(),
        }
    }

    fn muted(&self, text: &str) -> ColoredString {
        match self.config.color_mode {
            ColorMode::Dark => text.bright_black(),
            ColorMode::Light => text.dimmed(),
        }
    }

    fn alert(&self, text: &str) -> ColoredString {
        match self.config.color_mode {
            ColorMode::Dark => text.bright_red().bold(),
            ColorMode::Light => text.red().bold(),
        }
    }

    fn prompt_marker(&self, continuing: bool) -> ColoredString {
        if continuing {
            self.muted(". ")
        } else {
            self.accent("> ")
        }
    }

    fn accent(&self, text: &str) -> ColoredString {
        match self.config.color_mode {
            ColorMode::Dark => text.bright_green(),
            ColorMode::Light => text.green(),
        }
    }

    pub fn banner(&self, endpoint: &str) {
        println!("=== wikibot ({endpoint}) ===");
        println!(
            "{}",
            self.muted("Type /help for commands, end a line with \\ to continue it.")
        );
        println!();
    }

    pub fn help(&self) {
        println!("  /new        start a new conversation");
        println!("  /recent     list recent conversations");
        println!("  /open N     show recent conversation N");
        println!("  /quit       leave");
        println!("{}", self.muted("  End a line with \\ to keep typing on the next line."));
    }

    pub fn turn(&self, turn: &Turn) {
        if self.config.show_timestamps {
            println!(
                "{} {}",
                self.label(turn.origin),
                self.muted(&turn.display_time())
            );
        } else {
            println!("{}", self.label(turn.origin));
        }
        println!("{}\n", turn.content);
    }

    pub fn typing(&self) {
        println!("{}", self.muted("Typing..."));
    }

    pub fn new_session(&self, epoch: u64) {
        println!("{}\n", self.muted(&format!("--- New chat #{} ---", epoch + 1)));
    }

    pub fn notification(&self, notification: &Notification) {
        eprintln!("{}: {}", self.alert(&notification.title), notification.description);
    }

    pub fn notice(&self, text: &str) {
        println!("{}", self.muted(text));
    }

    pub fn recent(&self, sessions: &[SessionSummary]) {
        if sessions.is_empty() {
            self.notice("No recent chats.");
            return;
        }
        println!("Recent Chats");
        for (i, summary) in sessions.iter().enumerate() {
            println!(
                "  {}. {} {}",
                i + 1,
                summary.title.bold(),
                self.muted(&summary.display_time())
            );
            println!("     {}", self.muted(&summary.preview));
        }
    }

    pub fn summary(&self, summary: &SessionSummary) {
        println!("{}", summary.title.bold());
        println!("{}", summary.preview);
        println!("{}", self.muted(&summary.display_time()));
    }

    pub fn prompt(&self, continuing: bool) {
        use std::io::Write;

        print!("{}", self.prompt_marker(continuing));
        let _ = std::io::stdout().flush();
    }
}
