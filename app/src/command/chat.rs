//! Conversation command: one-shot query or interactive terminal session.
//!
//! In interactive mode this task is the single owner of the controller.
//! Requests run on spawned tasks and their completions come back over a
//! channel, so `/new` can be handled while a reply is still pending.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};
use wikibot_config::Config;
use wikibot_conversation::{
    Completion, ConversationSessionController, PendingRequest, Resolution, SessionState,
    SubmitRejected,
};
use wikibot_core::{Origin, QueryClient};

use super::{HttpController, build_controller};
use crate::intent::{Intent, LineEditor};
use crate::terminal::TerminalPresenter;

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
    /// Optional endpoint override
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let mut controller = build_controller(&config, input.endpoint);

        if let Some(msg) = input.message {
            return ask_once(&mut controller, msg).await;
        }

        let presenter = TerminalPresenter::new(config.presentation.clone());
        run_interactive(&mut controller, &presenter).await?;

        info!(
            "Chat ended: {} turns in current session, {} recent sessions",
            controller.transcript().len(),
            controller.ledger().len()
        );
        Ok(())
    }
}

async fn ask_once(controller: &mut HttpController, message: String) -> anyhow::Result<()> {
    controller.set_draft(message);

    match controller.submit().await {
        Ok(Resolution::Answered { .. }) => {
            if let Some(turn) = controller.transcript().last() {
                println!("{}", turn.content);
            }
            Ok(())
        }
        Ok(Resolution::Failed(e)) => {
            anyhow::bail!("Failed to get response from the server: {e}")
        }
        Ok(Resolution::Stale) => anyhow::bail!("Reply was discarded"),
        Err(SubmitRejected::EmptySubmission) => anyhow::bail!("Message is empty"),
        Err(e) => Err(e.into()),
    }
}

/// Submit one entered line. While a reply is pending the line is refused
/// and the controller's draft is left untouched.
fn submit_line<C>(
    controller: &mut ConversationSessionController<C>,
    text: String,
) -> Result<PendingRequest, SubmitRejected>
where
    C: QueryClient + Send + Sync,
{
    if let SessionState::Awaiting { request } = controller.state() {
        return Err(SubmitRejected::RequestInFlight(request));
    }
    controller.set_draft(text);
    controller.begin_submit()
}

async fn run_interactive(
    controller: &mut HttpController,
    presenter: &TerminalPresenter,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut editor = LineEditor::new();

    presenter.banner(controller.client().endpoint());
    presenter.prompt(false);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                match editor.feed(&line) {
                    Intent::Submit(text) => {
                        match submit_line(controller, text) {
                            Ok(pending) => {
                                let request = controller.dispatch(pending);
                                let tx = tx.clone();
                                tokio::spawn(async move {
                                    // Receiver only goes away when the session loop exits
                                    let _ = tx.send(request.await);
                                });
                                presenter.typing();
                            }
                            Err(SubmitRejected::EmptySubmission) => {}
                            Err(SubmitRejected::RequestInFlight(id)) => {
                                debug!("Line dropped while request {id} is pending");
                                presenter.notice(
                                    "Still waiting for the previous reply; this line was not sent.",
                                );
                            }
                        }
                    }
                    Intent::Continue => {}
                    Intent::NewSession => {
                        controller.start_new_session();
                        presenter.new_session(controller.session_epoch());
                    }
                    Intent::ListRecent => presenter.recent(&controller.snapshot().recent_sessions),
                    Intent::OpenRecent(n) => match controller.ledger().get(n - 1) {
                        Some(summary) => presenter.summary(summary),
                        None => presenter.notice(&format!("No recent chat #{n}.")),
                    },
                    Intent::Help => presenter.help(),
                    Intent::Quit => break,
                    Intent::Unknown(command) => {
                        presenter.notice(&format!("Unknown command: {command} (try /help)"));
                    }
                }
                presenter.prompt(editor.is_continuing());
            }
            Some(completion) = rx.recv() => {
                match controller.resolve(completion) {
                    Resolution::Answered { .. } => {
                        if let Some(turn) = controller
                            .transcript()
                            .last()
                            .filter(|t| t.origin == Origin::Assistant)
                        {
                            println!();
                            presenter.turn(turn);
                        }
                    }
                    Resolution::Failed(_) => {
                        for notification in controller.drain_notifications() {
                            presenter.notification(&notification);
                        }
                    }
                    Resolution::Stale => continue,
                }
                presenter.prompt(editor.is_continuing());
            }
        }
    }

    println!(
        "\nSession ended. {} recent chats this run.",
        controller.ledger().len()
    );
    Ok(())
}
