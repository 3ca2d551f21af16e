use anyhow::Result;
use clap::Parser;
use resource_selector::Cli;

fn main() -> Result<()> {
    Cli::parse().run()
}
