use anyhow::Result;
use clap::Parser;
use dialog_display::app::{Cli, init_tracing, run};

fn main() -> Result<()> {
    init_tracing();
    run(Cli::parse())
}
