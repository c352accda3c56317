use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cascade", about = concat!("cascade v", env!("CARGO_PKG_VERSION"), " - parent tasks follow their children"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: nearest cascade.toml, else built-in defaults)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set a task's status and propagate it to its parent
    Set(SetArgs),
    /// Propagate the edit between two revisions of a file
    Apply(ApplyArgs),
    /// Show the task hierarchy inferred from indentation
    Parents(ParentsArgs),
}

#[derive(Args)]
pub struct SetArgs {
    /// Markdown file
    pub file: String,
    /// Line number of the task (1-based)
    pub line: usize,
    /// New status character (e.g. x, /, or a space)
    pub status: String,
    /// Write the result back to the file instead of printing it
    #[arg(long)]
    pub write: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Revision before the edit
    pub old: String,
    /// Revision after the edit
    pub new: String,
    /// Write the result over NEW instead of printing it
    #[arg(long)]
    pub write: bool,
}

#[derive(Args)]
pub struct ParentsArgs {
    /// Markdown file
    pub file: String,
}
