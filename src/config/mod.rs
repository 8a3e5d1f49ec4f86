use crate::error::MirrorError;
use std::env;

/// Namespace holding the vendor-delivered cost and usage reports.
pub const SOURCE_NAMESPACE: &str = "bling";

/// Destination bucket used when `DEST_BUCKET` is not set.
pub const DEFAULT_DEST_BUCKET: &str = "Cost_Usage_Reports";

/// Mirror configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Object Storage namespace of this tenancy (required)
    pub dest_namespace: String,

    /// Destination bucket name (default: "Cost_Usage_Reports")
    pub dest_bucket: String,

    /// Tenant identity; doubles as the source bucket name in the
    /// reporting namespace
    pub tenancy_id: String,

    /// S3-compatibility endpoint template containing a `{namespace}`
    /// placeholder
    pub endpoint_template: String,

    /// Region passed to the client (default: "us-east-1")
    pub region: String,

    /// Static credentials for the S3-compatibility API
    pub access_key: String,
    pub secret_key: String,
}

impl MirrorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, MirrorError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MirrorError> {
        let dest_namespace = required(&lookup, "DEST_NAMESPACE")?;

        let dest_bucket = lookup("DEST_BUCKET")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DEST_BUCKET.to_string());

        let tenancy_id = required(&lookup, "TENANCY_ID")?;
        let endpoint_template = required(&lookup, "OBJECT_STORAGE_ENDPOINT")?;

        let region = lookup("OBJECT_STORAGE_REGION")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "us-east-1".to_string());

        let access_key = required(&lookup, "OBJECT_STORAGE_ACCESS_KEY")?;
        let secret_key = required(&lookup, "OBJECT_STORAGE_SECRET_KEY")?;

        Ok(Self {
            dest_namespace,
            dest_bucket,
            tenancy_id,
            endpoint_template,
            region,
            access_key,
            secret_key,
        })
    }

    /// Resolve the storage endpoint for a namespace.
    pub fn endpoint_for(&self, namespace: &str) -> String {
        self.endpoint_template.replace("{namespace}", namespace)
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, MirrorError> {
    lookup(key).filter(|v| !v.is_empty()).ok_or_else(|| {
        MirrorError::Config(format!(
            "{} is not set. Check the application configuration.",
            key
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_vars() -> HashMap<String, String> {
        vars(&[
            ("DEST_NAMESPACE", "mytenancy"),
            ("TENANCY_ID", "ocid1.tenancy.oc1..abc"),
            (
                "OBJECT_STORAGE_ENDPOINT",
                "https://{namespace}.compat.objectstorage.eu-frankfurt-1.oraclecloud.com",
            ),
            ("OBJECT_STORAGE_ACCESS_KEY", "ak"),
            ("OBJECT_STORAGE_SECRET_KEY", "sk"),
        ])
    }

    #[test]
    fn test_defaults_applied() {
        let env = full_vars();
        let config = MirrorConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.dest_bucket, "Cost_Usage_Reports");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.dest_namespace, "mytenancy");
    }

    #[test]
    fn test_explicit_bucket_and_region() {
        let mut env = full_vars();
        env.insert("DEST_BUCKET".into(), "Reports".into());
        env.insert("OBJECT_STORAGE_REGION".into(), "eu-frankfurt-1".into());
        let config = MirrorConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.dest_bucket, "Reports");
        assert_eq!(config.region, "eu-frankfurt-1");
    }

    #[test]
    fn test_missing_dest_namespace() {
        let mut env = full_vars();
        env.remove("DEST_NAMESPACE");
        let err = MirrorConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, MirrorError::Config(_)));
        assert!(err.to_string().contains("DEST_NAMESPACE"));
    }

    #[test]
    fn test_empty_value_is_missing() {
        let mut env = full_vars();
        env.insert("DEST_NAMESPACE".into(), "".into());
        let err = MirrorConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, MirrorError::Config(_)));
    }

    #[test]
    fn test_endpoint_substitution() {
        let env = full_vars();
        let config = MirrorConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(
            config.endpoint_for("bling"),
            "https://bling.compat.objectstorage.eu-frankfurt-1.oraclecloud.com"
        );
    }
}
