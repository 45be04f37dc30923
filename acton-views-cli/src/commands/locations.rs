//! Print the active location formats

use anyhow::Result;
use console::style;
use std::path::PathBuf;

use super::load_config;

/// Lists the location formats the engine will search
pub struct LocationsCommand {
    area: bool,
    config: Option<PathBuf>,
}

impl LocationsCommand {
    /// Create a new locations command
    #[must_use]
    pub const fn new(area: bool, config: Option<PathBuf>) -> Self {
        Self { area, config }
    }

    /// Collect the formats for the selected list
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn formats(&self) -> Result<Vec<String>> {
        let config = load_config(self.config.as_deref())?;
        Ok(if self.area {
            config.area_view_location_formats
        } else {
            config.view_location_formats
        })
    }

    /// Execute the locations command
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn execute(&self) -> Result<()> {
        let heading = if self.area { "Area view locations" } else { "View locations" };
        println!("{}", style(heading).bold());
        for (i, format) in self.formats()?.iter().enumerate() {
            println!("  {}. {format}", i + 1);
        }
        println!(
            "\n{}",
            style("{0} = view name, {1} = controller, {2} = area").dim()
        );
        Ok(())
    }
}
