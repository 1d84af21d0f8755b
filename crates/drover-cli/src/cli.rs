use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "drover",
    about = "Drover — livestock intake, transfers, and movement history",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Walk a scripted intake → transfer → timeline scenario
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind, e.g. 127.0.0.1:7410
    #[arg(long)]
    pub bind: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long)]
    pub config: Option<String>,
}

#[derive(Args)]
pub struct DemoArgs {
    /// Number of calves to admit in the demo herd
    #[arg(long, default_value_t = 6)]
    pub head: usize,
}
