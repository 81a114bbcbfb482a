use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ytbrief",
    about = "Summarize YouTube videos from their captions",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Gemini model used for summaries
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Preferred caption language
    #[arg(short, long, global = true)]
    pub lang: Option<String>,

    /// Show video and configuration details
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the summarizer page (default)
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Summarize a single video URL and print the result
    Summarize {
        /// YouTube watch URL
        url: String,
    },
}
