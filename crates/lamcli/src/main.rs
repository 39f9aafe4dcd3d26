//! lamcall CLI
//!
//! Makes one request to a locally running Lambda-style function and
//! prints the result.
//!
//! ```text
//! lamcall -a localhost:3000 -e events/input.json
//! lamcall -a localhost:3000 -d '{"body": "Hello World!"}'
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lamcall::Invoker;

#[derive(Parser)]
#[command(name = "lamcall")]
#[command(about = "Make requests to your local Lambda-style function", version)]
struct Cli {
    /// Address of the locally running function
    #[arg(short = 'a', long, default_value = "localhost:8080")]
    address: String,

    /// Data passed to the function as input, in JSON format
    #[arg(short = 'd', long, default_value = "{}")]
    data: String,

    /// Path to an event JSON file used as input; wins over --data
    #[arg(short = 'e', long)]
    event: Option<PathBuf>,

    /// Deadline in seconds, communicated to the function
    #[arg(long = "deadline", default_value_t = lamcall::DEFAULT_DEADLINE_SECONDS)]
    deadline_seconds: i64,

    /// Give up after this many seconds of connecting or waiting for the
    /// reply (by default the call blocks until the function responds)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("{err:#}");
        process::exit(2);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let payload = match &cli.event {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("error reading event file {}", path.display()))?,
        None => cli.data.into_bytes(),
    };

    let mut invoker = Invoker::new();
    if let Some(seconds) = cli.timeout {
        let timeout = Duration::from_secs(seconds);
        invoker = invoker.connect_timeout(timeout).read_timeout(timeout);
    }

    let output = invoker.invoke(&cli.address, &payload, cli.deadline_seconds)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&output)?;
    stdout.write_all(b"\n")?;
    Ok(())
}
