use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::inject::TemplateEngine;

#[derive(Parser, Debug)]
#[command(
    name = "vite-envsubst",
    about = "Rewrite import.meta.env references for deploy-time environment substitution",
    version,
    after_help = "Variables are read from the ImportMetaEnv interface in the declaration file (src/vite-env.d.ts by default)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Project root holding envsubst.toml, .env and the declaration file
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Only print warnings and errors
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Placeholder syntax for the injected script
    #[arg(long, global = true, value_enum)]
    pub template_engine: Option<TemplateEngine>,

    /// Runtime object holding the `env` namespace
    #[arg(long, global = true)]
    pub global_object: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the declared environment variables
    Scan {
        /// Print as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Print the placeholder script injected into HTML entry points
    Script,
    /// Rewrite import.meta.env references in source files
    Transform {
        /// Files or directories to process
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
        /// Overwrite files in place
        #[arg(long, conflicts_with = "out_dir")]
        write: bool,
        /// Write results under this directory, mirroring paths relative to the root
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
    /// Inject the placeholder script into an HTML entry point
    Html {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Overwrite the file in place
        #[arg(long)]
        write: bool,
    },
    /// Print the resolved configuration
    Config,
}

impl Cli {
    /// Flags take precedence over every config layer.
    pub fn apply_overrides(&self, cfg: &mut AppConfig) {
        if let Some(engine) = self.template_engine {
            cfg.template_engine = engine;
        }
        if let Some(global_object) = &self.global_object {
            cfg.set_field("GLOBAL_OBJECT", global_object);
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
