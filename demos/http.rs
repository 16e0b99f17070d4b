use std::sync::Arc;

use anyhow::Result;
use brunt::{HttpTargetClient, LoadTest, LoadTestRequest};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brunt=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url =
        std::env::var("TARGET_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

    // One client for all workers; building one per request would tank
    // throughput.
    let client = HttpTargetClient::new(base_url);

    // Ctrl-C flips the shutdown signal so the run fails cleanly instead of
    // leaving workers hammering the target.
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(true);
        }
    });

    let request = LoadTestRequest::builder()
        .targets(vec![1, 2, 3, 4, 5])
        .parallelism(20)
        .warmup_secs(5)
        .pause_secs(2)
        .measurement_secs(30)
        .build();

    let report = LoadTest::builder()
        .client(Arc::new(client))
        .shutdown(rx)
        .build()
        .run(request)
        .await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
