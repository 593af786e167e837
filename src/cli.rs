//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::params::{CaptureConfig, WorksApiConfig};
use crate::works::CATEGORIES;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Wavescape")]
#[command(about = "Animated wave hero scene with a portfolio works client", long_about = None)]
pub struct Args {
    /// Capture the scene to PNG frames (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Window width (pixels)
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, default_value = "720")]
    pub height: u32,

    /// Works backend address (host:port)
    #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:5000")]
    pub api: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the portfolio works collection
    Works {
        #[command(subcommand)]
        action: WorksAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum WorksAction {
    /// List all works
    List,

    /// Add a new work
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(CATEGORIES))]
        category: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "")]
        link: String,
        #[arg(long)]
        featured: bool,
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Update an existing work
    Update {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(CATEGORIES))]
        category: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "")]
        link: String,
        #[arg(long)]
        featured: bool,
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Delete a work
    Delete { id: String },

    /// Toggle a work's featured flag
    Feature { id: String },
}

impl Args {
    /// Works backend endpoint from the `--api` flag
    pub fn works_config(&self) -> WorksApiConfig {
        WorksApiConfig::from_addr(&self.api)
    }

    /// Create capture configuration if capture mode is enabled
    pub fn capture_config(&self) -> Option<CaptureConfig> {
        self.record.map(|duration| {
            let config = CaptureConfig::new(duration);
            std::fs::create_dir_all(config.frames_dir()).expect("Failed to create frames directory");
            config
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args_run_the_scene() {
        let args = Args::parse_from(["wavescape"]);
        assert!(args.command.is_none());
        assert!(args.record.is_none());
        assert_eq!(args.works_config().port, 5000);
    }

    #[test]
    fn test_works_add_parses() {
        let args = Args::parse_from([
            "wavescape",
            "works",
            "add",
            "--title",
            "Neon rebrand",
            "--category",
            "Branding",
            "--description",
            "Full refresh",
            "--featured",
        ]);
        match args.command {
            Some(Command::Works {
                action: WorksAction::Add {
                    title, featured, ..
                },
            }) => {
                assert_eq!(title, "Neon rebrand");
                assert!(featured);
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let result = Args::try_parse_from([
            "wavescape",
            "works",
            "add",
            "--title",
            "x",
            "--category",
            "Skywriting",
            "--description",
            "y",
        ]);
        assert!(result.is_err());
    }
}
