use std::env;
use std::path::PathBuf;

#[cfg(feature = "openapi")]
use std::fs;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use anyhow::anyhow;

use voice_detection::{ServerConfig, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing, honouring RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Initialize crypto provider for TLS connections
    // This must be done before any TLS connections are attempted
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default crypto provider"))?;

    // Handle CLI arguments
    let mut config_path: Option<PathBuf> = None;
    let mut args = env::args();
    let _ = args.next();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                config_path = Some(PathBuf::from(path));
            }
            #[cfg(feature = "openapi")]
            "openapi" => {
                let mut format = "yaml".to_string();
                let mut output: Option<PathBuf> = None;

                while let Some(arg) = args.next() {
                    match arg.as_str() {
                        "-f" | "--format" => {
                            format = args
                                .next()
                                .ok_or_else(|| anyhow!("--format requires a value (yaml or json)"))?;
                        }
                        "-o" | "--output" => {
                            let path = args
                                .next()
                                .ok_or_else(|| anyhow!("--output requires a file path"))?;
                            output = Some(PathBuf::from(path));
                        }
                        other => {
                            anyhow::bail!(
                                "Unknown option '{other}'. Use --format (yaml|json) or --output <file>"
                            );
                        }
                    }
                }

                let spec_content = match format.as_str() {
                    "yaml" => voice_detection::docs::openapi::spec_yaml()
                        .map_err(|e| anyhow!("Failed to generate OpenAPI YAML: {e}"))?,
                    "json" => voice_detection::docs::openapi::spec_json()
                        .map_err(|e| anyhow!("Failed to generate OpenAPI JSON: {e}"))?,
                    other => anyhow::bail!("Invalid format '{other}'. Must be 'yaml' or 'json'"),
                };

                if let Some(output_path) = output {
                    fs::write(&output_path, &spec_content).map_err(|e| {
                        anyhow!("Failed to write to {}: {e}", output_path.display())
                    })?;
                    println!("OpenAPI spec written to {}", output_path.display());
                } else {
                    println!("{spec_content}");
                }

                return Ok(());
            }
            other => {
                #[cfg(feature = "openapi")]
                {
                    anyhow::bail!(
                        "Unknown argument '{other}'. Supported: --config <path>, openapi"
                    );
                }
                #[cfg(not(feature = "openapi"))]
                {
                    anyhow::bail!("Unknown argument '{other}'. Supported: --config <path>");
                }
            }
        }
    }

    // Load configuration
    let config = match &config_path {
        Some(path) => ServerConfig::from_file(path),
        None => ServerConfig::from_env(),
    }
    .map_err(|e| anyhow!(e.to_string()))?;

    if !config.has_api_key() {
        tracing::warn!("API_KEY is not set; every detection request will be rejected");
    }

    let address = config.address();

    // Create application state and router
    let app_state = AppState::new(config)?;
    let app = routes::create_app(app_state);

    let listener = TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        // Without a signal handler, keep serving until the process is killed
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
