use anyhow::Result;
use clap::{Parser, Subcommand};

use store_wizard::config::Config;
use store_wizard::{logging, rest};

#[derive(Parser)]
#[command(name = "store-wizard")]
#[command(about = "Guided store setup and launch orchestration service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server (default)
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the OpenAPI document
    Openapi {
        /// Emit YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let logging_handle = logging::init_logging(&config, cli.debug)?;
    if let Some(path) = &logging_handle.log_file_path {
        eprintln!("Logging to {}", path.display());
    }

    match cli.command {
        Some(Commands::Openapi { yaml }) => cmd_openapi(yaml)?,
        Some(Commands::Serve { port }) => cmd_serve(config, port).await?,
        None => cmd_serve(config, None).await?,
    }

    Ok(())
}

async fn cmd_serve(config: Config, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.server.port);
    let host = config.server.host.clone();

    println!("Starting store wizard API...");
    println!("  Listen: {}:{}", host, port);
    println!("  Endpoints:");
    println!("    GET  /api/v1/health                          Health check");
    println!("    POST /api/v1/wizard/session                  Create wizard session");
    println!("    PUT  /api/v1/wizard/session/:id/step/:step   Record step data");
    println!("    POST /api/v1/wizard/launch/deploy            Deploy a store");
    println!("    GET  /api/v1/wizard/launch/status/:id        Poll a deployment");
    println!("    GET  /api/v1/openapi.json                    OpenAPI document");
    println!();

    tracing::info!(
        product = %config.services.product,
        content = %config.services.content,
        theme = %config.services.theme,
        deployment = %config.services.deployment,
        "Collaborator endpoints"
    );

    let state = rest::ApiState::new(config)?;
    rest::serve(state, &host, port).await
}

fn cmd_openapi(yaml: bool) -> Result<()> {
    let doc = if yaml {
        rest::ApiDoc::yaml()?
    } else {
        rest::ApiDoc::json()?
    };
    println!("{}", doc);
    Ok(())
}
