use dotenvy::dotenv;
use focus_mirror::infrastructure::storage::setup_store;
use focus_mirror::{MirrorConfig, MirrorService, SOURCE_NAMESPACE, ScratchArena};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Initialize tracing with EnvFilter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "focus_mirror=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting FOCUS report mirror...");

    let config = match MirrorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            println!("{}", serde_json::json!({ "error": e.to_string() }));
            std::process::exit(1);
        }
    };

    info!("Source tenancy bucket: {}", config.tenancy_id);

    let source = setup_store(&config, SOURCE_NAMESPACE, &config.tenancy_id).await;
    let destination = setup_store(&config, &config.dest_namespace, &config.dest_bucket).await;

    let scratch = ScratchArena::for_run(&format!("run-{}", std::process::id()));
    let service = MirrorService::new(source, destination, scratch);

    let report = service.run().await;
    let failed = !report.is_success();
    println!("{}", report.into_response());

    if failed {
        std::process::exit(1);
    }
}
