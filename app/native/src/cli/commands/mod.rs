//! CLI command definitions using Clap.
//!
//! - `grid` - Layout inspection and drag/resize simulation

use std::io;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::error::DashgridError;
use crate::grid::{GridCell, WidgetSize};
use crate::{config, schema};

pub mod grid;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dashgrid CLI - inspect and exercise a dashboard widget grid.
#[derive(Parser, Debug)]
#[command(name = "dashgrid")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Print the configured layout.
    ///
    /// Shows every widget with its grid cell, span and pixel frame, followed
    /// by a picture of the occupied cells.
    Layout {
        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Drag a widget to a cell and commit.
    ///
    /// The drag is fed through the drag controller as a series of gesture
    /// samples, so live previews and the final commit follow the same path a
    /// host screen would take.
    #[command(
        verbatim_doc_comment,
        after_long_help = r#"Examples:
  dashgrid drag steps 1 1            # Swap steps with water
  dashgrid drag weather 0 2          # Move the medium weather widget down two rows
  dashgrid drag tasks 0 0 --json     # Print the result as JSON"#
    )]
    Drag {
        /// Widget identifier.
        id: String,

        /// Target column.
        x: u32,

        /// Target row.
        y: u32,

        /// Number of gesture samples to simulate.
        #[arg(long, default_value_t = 6)]
        steps: u32,

        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Resize a widget.
    ///
    /// Sizes outside the widget's allowed sizes are rejected.
    Resize {
        /// Widget identifier.
        id: String,

        /// New size.
        #[arg(value_enum)]
        size: WidgetSize,

        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Output Dashgrid configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// configuration file. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(dashgrid completions --shell zsh)"
    ///   dashgrid completions --shell fish > ~/.config/fish/completions/dashgrid.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<std::path::PathBuf> {
        self.config.as_ref().map(std::path::PathBuf::from)
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file given with `--config` does
    /// not exist or the command fails.
    pub fn execute(&self) -> Result<(), DashgridError> {
        if let Some(path) = self.config_path() {
            let path = config::expand_path(&path);
            if !path.exists() {
                return Err(DashgridError::ConfigError(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            config::set_custom_config_path(path);
        }

        match &self.command {
            Commands::Layout { json } => {
                grid::execute_layout(config::get_config(), *json);
                Ok(())
            }
            Commands::Drag { id, x, y, steps, json } => {
                grid::execute_drag(config::get_config(), id, GridCell::new(*x, *y), *steps, *json)
            }
            Commands::Resize { id, size, json } => {
                grid::execute_resize(config::get_config(), id, *size, *json)
            }
            Commands::Schema => {
                println!("{}", schema::generate_schema_json());
                Ok(())
            }
            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "dashgrid", &mut io::stdout());
    }
}
