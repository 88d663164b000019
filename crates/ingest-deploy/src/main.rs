use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::fmt::time::FormatTime;

use ingest_deploy::{config, sequencer};

struct Elapsed(Instant);

impl FormatTime for Elapsed {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let d = self.0.elapsed();
        let total_secs = d.as_secs();
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        let millis = d.subsec_millis();
        write!(w, "[{mins:02}:{secs:02}:{millis:03}]")
    }
}

/// Deploy the device-ingest stack onto this host
#[derive(Parser)]
#[command(name = "ingest-deploy", version)]
struct Cli {
    /// YAML file overriding individual deployment defaults
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// After the dry run, write one synthetic record through the real
    /// ingest path
    #[arg(long)]
    smoke: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_timer(Elapsed(Instant::now()))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = match config::load(cli.config.as_deref(), cli.smoke) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ deploy failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    match sequencer::run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ deploy failed: {e}");
            ExitCode::FAILURE
        }
    }
}
