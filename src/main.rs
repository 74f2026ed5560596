use std::io;

use anyhow::Result;
use tracing::info;

use deliberate_shell::Shell;

fn main() -> Result<()> {
    // stdout carries the shell protocol; logs go to stderr.
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    info!("deliberate starting");

    let mut shell = Shell::new()?;
    shell.run(io::stdin().lock(), &mut io::stdout().lock())?;
    Ok(())
}
