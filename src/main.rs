//! Lingkar demo - simulasi producer/consumer di atas byte ring buffer
//!
//! Usage:
//!   cargo run --release -- [OPTIONS] [INPUTS]...
//!
//! Options:
//!   --capacity <N>   Jumlah slot buffer (default: 10, usable N - 1)
//!   --overwrite      Buang byte paling lama saat buffer penuh
//!
//! Log verbosity diatur lewat RUST_LOG (default: warn).

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lingkar::demo::{self, DemoConfig};

#[derive(Parser, Debug)]
#[command(name = "lingkar", version, about = "SPSC byte ring buffer demo")]
struct Args {
    /// Jumlah slot buffer (satu slot selalu dikorbankan)
    #[arg(long, default_value_t = DemoConfig::default().capacity)]
    capacity: usize,

    /// Overwrite mode: buang byte paling lama saat penuh
    #[arg(long)]
    overwrite: bool,

    /// String yang di-push lalu dikuras satu per satu
    inputs: Vec<String>,
}

impl From<Args> for DemoConfig {
    fn from(args: Args) -> Self {
        let defaults = DemoConfig::default();
        Self {
            capacity: args.capacity,
            overwrite: args.overwrite,
            inputs: if args.inputs.is_empty() {
                defaults.inputs
            } else {
                args.inputs
            },
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = DemoConfig::from(Args::parse());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    // run() melakukan flush sendiri; kegagalan flush ikut jadi DemoError::Io
    match demo::run(&config, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ {}", err);
            ExitCode::FAILURE
        }
    }
}
