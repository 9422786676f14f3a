use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::context::CliMode;

/// Asks a yes/no question. Script mode answers yes without prompting.
pub fn confirm(mode: CliMode, prompt: &str) -> bool {
    if mode == CliMode::Script {
        return true;
    }
    match Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
    {
        Ok(answer) => answer,
        Err(err) => {
            tracing::warn!(%err, "confirmation prompt failed");
            false
        }
    }
}
