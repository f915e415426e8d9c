use wikibot_config::{ColorMode, Config};

/// Strategy for displaying configuration information.
///
/// Outputs the config file location, query endpoint, session limits and
/// presentation settings. Falls back to defaults when no file exists.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config_path = Config::config_path()?;
        let config = Config::load_or_default()?;

        println!("=== wikibot Configuration ===\n");

        println!("Config File:");
        println!("  Path: {}", config_path.display());
        if config_path.exists() {
            println!("  Status: Found");
        } else {
            println!("  Status: Not found (using defaults, run 'wikibot init' to create)");
        }
        println!();

        println!("Endpoint:");
        println!("  URL: {}", config.endpoint.url);
        println!();

        println!("Session Limits:");
        println!("  Title Max Chars: {}", config.session.title_max_chars);
        println!("  Preview Max Chars: {}", config.session.preview_max_chars);
        println!("  Recent Sessions Kept: {}", config.session.ledger_capacity);
        println!();

        println!("Presentation:");
        let mode = match config.presentation.color_mode {
            ColorMode::Dark => "dark",
            ColorMode::Light => "light",
        };
        println!("  Color Mode: {mode}");
        println!("  Show Timestamps: {}", config.presentation.show_timestamps);

        Ok(())
    }
}
