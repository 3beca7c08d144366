use crate::config::{DEFAULT_DATA_DIR, LlmSettings, ProviderKind};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "taskchat")]
#[command(about = "Keyword-driven task chat with pluggable LLM answers")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Directory holding tasks.json
    #[arg(long, global = true, env = "DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that pick the answer strategy
#[derive(Args, Debug, Clone)]
pub struct LlmArgs {
    /// openai | anthropic | mock
    #[arg(long, value_enum, ignore_case = true, default_value_t = ProviderKind::Mock)]
    pub provider: ProviderKind,
    /// Model name for the provider
    #[arg(long)]
    pub model: Option<String>,
    /// Optional system instruction for the LLM
    #[arg(long)]
    pub system: Option<String>,
    /// Answer from this text file instead of the network
    #[arg(long)]
    pub mock_file: Option<PathBuf>,
}

impl From<LlmArgs> for LlmSettings {
    fn from(args: LlmArgs) -> Self {
        LlmSettings {
            provider: args.provider,
            model: args.model,
            system: args.system,
            mock_file: args.mock_file,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive chat loop
    Chat {
        #[command(flatten)]
        llm: LlmArgs,
        /// Print a banner before the first prompt
        #[arg(long)]
        greet: bool,
    },

    /// Add a task
    Add {
        /// Task name
        task: String,
    },

    /// List tasks
    List,

    /// Remove a task
    Remove {
        /// Task name, matched exactly
        task: String,
    },

    /// Run the plain echo loop
    Echo,

    /// Ask the LLM a single question
    Ask {
        /// Question text
        prompt: String,
        #[command(flatten)]
        llm: LlmArgs,
    },

    /// Show a summary of a placeholder todo item
    Todo {
        /// Fetch this todo id over HTTP
        #[arg(long)]
        id: Option<i64>,
        /// Local JSON file used when HTTP is unavailable
        #[arg(long)]
        mock: Option<PathBuf>,
    },
}
