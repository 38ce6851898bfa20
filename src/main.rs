/// Decode an already-retrieved launches payload and log a summary
use launchy::config::AppConfig;
use launchy::{decode_launches, decode_launches_lenient, Launch};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("launchy=info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    let text = tokio::fs::read_to_string(&config.payload_path).await?;
    info!("Read payload from {}", config.payload_path.display());

    let payload: Value = serde_json::from_str(&text)?;

    let launches = if config.skip_invalid {
        let (launches, errors) = decode_launches_lenient(&payload);
        for e in &errors {
            warn!("Skipping launch: {}", e);
        }
        launches
    } else {
        decode_launches(&payload)?
    };

    let shown: Vec<&Launch> = launches
        .iter()
        .filter(|l| !config.upcoming_only || l.is_upcoming())
        .collect();

    for launch in &shown {
        info!(
            "#{} {} on {} ({}){}",
            launch.number(),
            launch.name(),
            launch.formatted_launch_date(),
            launch.date_precision(),
            launch
                .large_image_url()
                .map(|u| format!(" image: {}", u))
                .unwrap_or_default()
        );
    }

    info!("{} of {} launches shown", shown.len(), launches.len());
    Ok(())
}
