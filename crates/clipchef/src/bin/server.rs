//! Analysis server binary
//!
//! Run with: cargo run -p clipchef --bin clipchef-server

use clipchef::{config::Config, server::ApiServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clipchef=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                         ClipChef                          ║
║         Cooking videos in, structured recipes out         ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Job store: max {} jobs, {}h retention", config.jobs.max_jobs, config.jobs.expire_hours);
    tracing::info!("  - Artifacts: {}", config.jobs.data_dir.display());
    tracing::info!("  - Whisper service: {}", config.stt.base_url);
    tracing::info!("  - LLM model: {} at {}", config.llm.model, config.llm.base_url);
    match &config.notify.base_url {
        Some(base) => tracing::info!("  - Progress callback: {}", base),
        None => tracing::info!("  - Progress callback: disabled"),
    }

    // Check yt-dlp
    let ytdlp_ok = std::process::Command::new(&config.fetch.binary)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if ytdlp_ok {
        tracing::info!("{} is available", config.fetch.binary);
    } else {
        tracing::warn!("{} not found on PATH; downloads will fail", config.fetch.binary);
        tracing::warn!("Please install it:");
        tracing::warn!("  1. Install: pip install yt-dlp (or: brew install yt-dlp)");
        tracing::warn!("  2. ffmpeg is also required for audio extraction");
    }

    let client = reqwest::Client::new();

    // Check the Whisper service
    tracing::info!("Checking Whisper service at {}...", config.stt.base_url);
    match client.get(format!("{}/health", config.stt.base_url)).send().await {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Whisper service is running");
        }
        _ => {
            tracing::warn!("Whisper service not available at {}", config.stt.base_url);
            tracing::warn!("Transcription will fail until it is up");
        }
    }

    // Check Ollama
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    match client.get(format!("{}/api/tags", config.llm.base_url)).send().await {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Please start Ollama:");
            tracing::warn!("  1. Install: brew install ollama");
            tracing::warn!("  2. Start: ollama serve");
            tracing::warn!("  3. Pull the model: ollama pull {}", config.llm.model);
        }
    }

    // Create and start server
    let server = ApiServer::new(config);

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST   /api/analyze     - Submit a video URL");
    println!("  GET    /api/status/:id  - Poll job progress");
    println!("  GET    /api/result/:id  - Fetch the parsed recipe");
    println!("  DELETE /api/job/:id     - Delete a job and its artifacts");
    println!("  GET    /api/stats       - Job store statistics");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
