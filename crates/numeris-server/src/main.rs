//! Numeris - number classification service.

use std::path::PathBuf;

use anyhow::Context;
use numeris_config::{ConfigLoader, DEFAULT_ENV_PREFIX};
use numeris_server::{telemetry_config, Server, VERSION};
use numeris_telemetry::init_telemetry;
use tracing::info;

/// Command-line arguments.
struct Args {
    /// Path to configuration file.
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut config = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => match args.next() {
                    Some(path) => config = Some(PathBuf::from(path)),
                    None => {
                        eprintln!("--config requires a path");
                        std::process::exit(2);
                    }
                },
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("numeris {VERSION}");
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(2);
                }
            }
        }

        Self { config }
    }
}

fn print_help() {
    println!(
        r"Numeris - classify integers and attach a fun fact

USAGE:
    numeris [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Path to configuration file (TOML or JSON)
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES:
    Any setting can be overridden as NUMERIS__<SECTION>__<KEY>, e.g.
    NUMERIS__SERVER__HTTP_ADDR              Listen address (default: 0.0.0.0:8080)
    NUMERIS__FACTS__BASE_URL                Numbers API base URL
    NUMERIS__FACTS__TIMEOUT_MS              Fact lookup timeout (default: 3000)
    NUMERIS__CORS__ALLOWED_ORIGINS          Comma-separated origin list
    NUMERIS__TELEMETRY__LOGGING__LEVEL      Log filter (default: info)
    NUMERIS__TELEMETRY__METRICS__ENABLED    Prometheus endpoint (default: false)

    A .env file in the working directory is loaded first.

ENDPOINTS:
    GET /api/classify-number?number=<n>
    GET /health
    GET /ready
"
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new().with_defaults();
    if let Some(path) = &args.config {
        loader = loader
            .with_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    }
    let config = loader
        .with_dotenv()
        .context("failed to load .env")?
        .with_env_prefix(DEFAULT_ENV_PREFIX)
        .load()
        .context("invalid configuration")?;

    let _telemetry = init_telemetry(&telemetry_config(&config))
        .context("failed to initialize telemetry")?;

    info!(
        version = VERSION,
        http_addr = %config.server.http_addr,
        facts_enabled = config.facts.enabled,
        environment = %config.telemetry.environment,
        "starting numeris"
    );

    let server = Server::from_config(&config).context("failed to build server")?;
    server.run().await.context("server error")?;

    Ok(())
}
