//! Topic Gallery server entry point

use anyhow::{bail, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use topic_gallery::{
    config,
    network::HttpClient,
    web::{create_router, AppState},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

enum Command {
    Serve { config: Option<PathBuf> },
    Help,
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = match parse_args(std::env::args().skip(1))? {
        Command::Serve { config } => config,
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Version => {
            println!("topic-gallery {}", topic_gallery::VERSION);
            return Ok(());
        }
    };

    // Load configuration before logging so `general.debug` picks the level
    let settings = config::load(config_path.as_deref())?;

    let default_level = if settings.general.debug { "debug" } else { "info" };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting Topic Gallery v{}", topic_gallery::VERSION);
    info!("Image backend: {}", settings.backend.base_url);

    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    let state = AppState::new(settings.clone(), client)?;
    info!("Registered {} client tools", state.tools.len());

    let app = create_router(state);

    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Command> {
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-c" | "--config" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => bail!("{} requires a file argument", arg),
            },
            other => bail!("unknown argument: {} (see --help)", other),
        }
    }
    Ok(Command::Serve { config })
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
Topic Gallery v{}
Client-tool bridge turning conversational image requests into galleries

USAGE:
    topic-gallery [OPTIONS]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    TOPIC_GALLERY_SETTINGS_PATH  Path to settings.yml
    TOPIC_GALLERY_DEBUG          Enable debug logging (true/false)
    TOPIC_GALLERY_PORT           Server port
    TOPIC_GALLERY_BIND_ADDRESS   Bind address
    TOPIC_GALLERY_BACKEND_URL    Image/people backend base URL
    TOPIC_GALLERY_DEFAULT_TOPIC  Topic used when a call names none
    TOPIC_GALLERY_AGENT_ID       Conversational agent id
    RUST_LOG                     Log filter (overrides the debug flag)
"#,
        topic_gallery::VERSION
    );
}
