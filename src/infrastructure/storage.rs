use crate::config::MirrorConfig;
use crate::services::storage::{ObjectStore, S3ObjectStore};
use aws_sdk_s3::config::Region;
use std::sync::Arc;
use tracing::info;

/// Build a bucket-scoped store handle for one namespace via the
/// S3-compatibility API. The namespace is baked into the endpoint host,
/// resolved once here.
pub async fn setup_store(
    config: &MirrorConfig,
    namespace: &str,
    bucket: &str,
) -> Arc<dyn ObjectStore> {
    let endpoint_url = config.endpoint_for(namespace);
    info!("☁️  Object storage: {} (bucket: {})", endpoint_url, bucket);

    let aws_config = aws_config::from_env()
        .endpoint_url(&endpoint_url)
        .region(Region::new(config.region.clone()))
        .credentials_provider(aws_sdk_s3::config::Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "static",
        ))
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(true)
        .build();

    let client = aws_sdk_s3::Client::from_conf(s3_config);
    Arc::new(S3ObjectStore::new(client, bucket.to_string()))
}
