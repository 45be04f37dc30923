//! Print the default configuration

use acton_views::config::ViewEngineConfig;
use anyhow::Result;

/// Prints the default configuration as TOML, ready to save as `acton-views.toml`
pub struct ConfigCommand;

impl ConfigCommand {
    /// Render the default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render() -> Result<String> {
        Ok(toml::to_string_pretty(&ViewEngineConfig::default())?)
    }

    /// Execute the config command
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn execute() -> Result<()> {
        print!("{}", Self::render()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_default_config() {
        let rendered = ConfigCommand::render().unwrap();
        assert!(rendered.contains("view_extension = \".cshtml\""));
        assert!(rendered.contains("/Views/{1}/{0}.cshtml"));
        assert!(rendered.contains("[language_expander]"));
    }
}
