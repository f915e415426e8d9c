//! Turning terminal input lines into user intents.

/// What the user asked for with one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Send this text as the next query.
    Submit(String),
    /// The line ended in `\`; keep reading into the same draft.
    Continue,
    NewSession,
    ListRecent,
    /// Show the recent session at this 1-based position.
    OpenRecent(usize),
    Help,
    Quit,
    Unknown(String),
}

/// Accumulates continuation lines into a single draft.
#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Whether a multi-line draft is being collected.
    #[must_use]
    pub const fn is_continuing(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn feed(&mut self, line: &str) -> Intent {
        if let Some(head) = line.strip_suffix('\\') {
            self.buffer.push_str(head);
            self.buffer.push('\n');
            return Intent::Continue;
        }

        if self.buffer.is_empty() {
            if let Some(intent) = parse_command(line.trim()) {
                return intent;
            }
            return Intent::Submit(line.to_string());
        }

        let mut draft = std::mem::take(&mut self.buffer);
        draft.push_str(line);
        Intent::Submit(draft)
    }
}

fn parse_command(line: &str) -> Option<Intent> {
    if matches!(line, "exit" | "quit" | "q") {
        return Some(Intent::Quit);
    }

    let command = line.strip_prefix('/')?;
    let mut parts = command.split_whitespace();
    let intent = match (parts.next().unwrap_or_default(), parts.next()) {
        ("new", None) => Intent::NewSession,
        ("recent", None) => Intent::ListRecent,
        ("open", Some(n)) => n
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map_or_else(|| Intent::Unknown(line.to_string()), Intent::OpenRecent),
        ("help", None) => Intent::Help,
        ("quit" | "exit" | "q", None) => Intent::Quit,
        _ => Intent::Unknown(line.to_string()),
    };
    Some(intent)
}
