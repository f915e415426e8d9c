//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type, so dispatch
//! is resolved at compile time.

use std::sync::Arc;

use tracing::info;
use wikibot_config::Config;
use wikibot_conversation::ConversationSessionController;
use wikibot_providers::HttpQueryClient;

mod chat;
mod info;
mod init;
mod version;

pub use chat::{ChatInput, ChatStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Controller wired to the HTTP transport.
pub type HttpController = ConversationSessionController<Arc<HttpQueryClient>>;

/// Build a controller from `config`, with an optional endpoint override.
fn build_controller(config: &Config, endpoint: Option<String>) -> HttpController {
    let endpoint = endpoint.unwrap_or_else(|| config.endpoint.url.clone());
    info!("Using query endpoint: {endpoint}");

    let client = Arc::new(HttpQueryClient::new(endpoint));
    ConversationSessionController::with_limits(client, config.session.clone())
}

/// Core trait defining the contract for all command strategies.
///
/// # Example
/// ```rust,ignore
/// struct MyStrategy;
///
/// impl CommandStrategy for MyStrategy {
///     type Input = MyInput;
///
///     async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
///         // Command logic here
///         Ok(())
///     }
/// }
/// ```
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}
