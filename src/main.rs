//! devup - start the local development stack with one command

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use devup::config::{CliOverrides, ConfigLoader, Credentials};
use devup::error::EXIT_FAILURE;
use devup::logging::init_logging;
use devup::{Capabilities, Orchestrator};

#[derive(Parser, Debug)]
#[command(name = "devup", version)]
#[command(about = "Start backend, frontend and tunnel, then verify the stack is healthy")]
#[command(after_help = "\
ENVIRONMENT:
  TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN   verify provider credentials via the backend
  TWILIO_PHONE_NUMBER                     also configure webhooks when a tunnel is up
  RUST_LOG                                override log filtering (logs go to stderr)")]
struct Cli {
    /// Frontend port
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,

    /// Backend port
    #[arg(long = "api-port", value_name = "PORT")]
    api_port: Option<u16>,

    /// Do not start an ngrok tunnel
    #[arg(long = "no-ngrok")]
    no_ngrok: bool,

    /// Port to expose via ngrok
    #[arg(long = "ngrok-port", value_name = "PORT")]
    ngrok_port: Option<u16>,

    /// Seconds to wait for the backend health endpoint
    #[arg(long = "health-timeout", value_name = "SECONDS")]
    health_timeout: Option<f64>,

    /// Stop existing listeners on the ports before starting
    #[arg(long)]
    restart: bool,

    /// Project root
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Launcher config file (default: <root>/devup.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            frontend_port: self.port,
            backend_port: self.api_port,
            tunnel_port: self.ngrok_port,
            health_timeout_secs: self.health_timeout,
            no_tunnel: self.no_ngrok,
            restart: self.restart,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            return ExitCode::from(EXIT_FAILURE as u8);
        }
    };

    let code = runtime.block_on(run(cli));
    ExitCode::from(u8::try_from(code).unwrap_or(EXIT_FAILURE as u8))
}

async fn run(cli: Cli) -> i32 {
    let mut loader = ConfigLoader::new(&cli.root);
    if let Some(path) = &cli.config {
        loader = loader.with_path(path);
    }

    let result = async {
        let config = loader.resolve(&cli.overrides())?;
        let mut orchestrator = Orchestrator::new(
            config,
            Credentials::from_env(),
            Capabilities::native(),
            std::io::stdout(),
        );
        orchestrator.run().await
    }
    .await;

    match result {
        Ok(_) => 0,
        Err(e) => {
            tracing::error!("launcher failed: {}", e);
            println!("ERROR: {}", e);
            e.exit_code()
        }
    }
}
