use std::path::PathBuf;

use clap::{Parser, Subcommand};

use quillpress::content::Environment;

#[derive(Parser, Debug)]
#[command(
    name = "quillpress",
    version,
    about = "Blog content engine: scheduled publishing and quiz tooling"
)]
pub struct Cli {
    /// Content directory holding blog/, blog/drafts/ and blog/quizzes/
    #[arg(long, env = "CONTENT_DIR", default_value = "content", global = true)]
    pub content_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one scheduling cycle: promote at most one eligible draft
    Publish {
        /// Site base URL used for the cross-post canonical link
        #[arg(long, env = "BASE_URL", default_value = "https://example.com")]
        base_url: String,
    },
    /// List scheduled drafts: ready to publish, upcoming by week, unscheduled
    Scheduled,
    /// Load and validate the quiz attached to a post slug
    Quiz { slug: String },
    /// List posts visible under an environment
    Posts {
        #[arg(long, value_enum, default_value = "production")]
        env: Environment,
    },
}
