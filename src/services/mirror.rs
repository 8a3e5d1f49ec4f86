use crate::error::MirrorError;
use crate::services::storage::{ObjectDescriptor, ObjectStore};
use crate::services::transform::{self, ArchiveKind, ExpandedArtifact};
use crate::utils::keys::{file_name, report_prefix};
use crate::utils::scratch::ScratchArena;
use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Final outcome of one mirror invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub date: String,
    pub processed_files: Vec<String>,
    pub error: Option<String>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Response body handed back to the invoking environment.
    pub fn into_response(self) -> Value {
        match self.error {
            None => json!({
                "message": "Processed files successfully",
                "date": self.date,
                "count": self.processed_files.len(),
                "files": self.processed_files,
            }),
            Some(error) => json!({
                "error": error,
                "files": self.processed_files,
            }),
        }
    }
}

/// Drives one date-scoped run: list the source prefix, then per object
/// fetch, expand and publish, strictly sequentially.
pub struct MirrorService {
    source: Arc<dyn ObjectStore>,
    destination: Arc<dyn ObjectStore>,
    scratch: ScratchArena,
}

impl MirrorService {
    pub fn new(
        source: Arc<dyn ObjectStore>,
        destination: Arc<dyn ObjectStore>,
        scratch: ScratchArena,
    ) -> Self {
        Self {
            source,
            destination,
            scratch,
        }
    }

    /// Mirror yesterday's reports (UTC).
    pub async fn run(&self) -> RunReport {
        self.run_for_date(Utc::now().date_naive() - Duration::days(1))
            .await
    }

    pub async fn run_for_date(&self, date: NaiveDate) -> RunReport {
        let prefix = report_prefix(date);
        info!("Listing with prefix: {}", prefix);

        if let Err(e) = self.scratch.reset() {
            warn!(
                "Failed to clean {}: {}",
                self.scratch.path().display(),
                e
            );
        }

        let mut processed: Vec<String> = Vec::new();

        let objects = match self.source.list_objects(&prefix).await {
            Ok(objects) => objects,
            Err(e) => {
                error!("Error during processing: {}", e);
                return RunReport {
                    date: date.to_string(),
                    processed_files: processed,
                    error: Some(e.to_string()),
                };
            }
        };
        info!("Found {} file(s) to process", objects.len());

        // Abort-on-first-error policy lives here and nowhere else; the
        // stages below just propagate.
        let mut failure: Option<MirrorError> = None;
        'objects: for object in &objects {
            let (kind, artifacts) = match self.stage_object(object).await {
                Ok(staged) => staged,
                Err(e) => {
                    failure = Some(e);
                    break 'objects;
                }
            };

            for artifact in &artifacts {
                match self
                    .destination
                    .put_file(&artifact.destination_key, &artifact.local_path)
                    .await
                {
                    Ok(()) => {
                        processed.push(artifact.destination_key.clone());
                        info!("{}: {}", upload_label(kind), artifact.destination_key);
                    }
                    Err(e) => {
                        failure = Some(e);
                        break 'objects;
                    }
                }
            }
        }

        match failure {
            None => RunReport {
                date: date.to_string(),
                processed_files: processed,
                error: None,
            },
            Some(e) => {
                error!("Error during processing: {}", e);
                RunReport {
                    date: date.to_string(),
                    processed_files: processed,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Fetch one object into scratch and expand it into uploadable
    /// artifacts.
    async fn stage_object(
        &self,
        object: &ObjectDescriptor,
    ) -> Result<(ArchiveKind, Vec<ExpandedArtifact>), MirrorError> {
        let local_path = self.scratch.path().join(file_name(&object.key));
        self.source.download_to(&object.key, &local_path).await?;
        info!("Downloaded: {}", object.key);

        let kind = transform::classify(&local_path, &object.key)?;
        let artifacts = transform::expand(&local_path, &object.key, kind, self.scratch.path())?;
        Ok((kind, artifacts))
    }
}

fn upload_label(kind: ArchiveKind) -> &'static str {
    match kind {
        ArchiveKind::Zip => "Uploaded (unzipped)",
        ArchiveKind::Gzip => "Uploaded (gunzipped)",
        ArchiveKind::Plain => "Uploaded",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_shape() {
        let report = RunReport {
            date: "2025-04-05".to_string(),
            processed_files: vec!["a.csv".to_string(), "b.csv".to_string()],
            error: None,
        };
        assert!(report.is_success());

        let body = report.into_response();
        assert_eq!(body["message"], "Processed files successfully");
        assert_eq!(body["date"], "2025-04-05");
        assert_eq!(body["count"], 2);
        assert_eq!(body["files"][1], "b.csv");
    }

    #[test]
    fn test_failure_response_shape() {
        let report = RunReport {
            date: "2025-04-05".to_string(),
            processed_files: vec!["a.csv".to_string()],
            error: Some("Upload failed for 'b.csv'".to_string()),
        };
        assert!(!report.is_success());

        let body = report.into_response();
        assert!(body.get("message").is_none());
        assert_eq!(body["error"], "Upload failed for 'b.csv'");
        assert_eq!(body["files"].as_array().unwrap().len(), 1);
    }
}
