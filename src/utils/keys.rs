use chrono::{Datelike, NaiveDate};

/// Listing prefix for one day's worth of reports.
pub fn report_prefix(date: NaiveDate) -> String {
    format!(
        "FOCUS Reports/{}/{:02}/{:02}",
        date.year(),
        date.month(),
        date.day()
    )
}

/// Filename component of an object key.
pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Parent directory of an object key; empty for root-level keys.
pub fn parent_dir(key: &str) -> &str {
    match key.rfind('/') {
        Some(idx) => &key[..idx],
        None => "",
    }
}

/// Destination key for a gunzipped object: the `.gz` suffix stripped once.
pub fn gzip_destination_key(key: &str) -> String {
    key.strip_suffix(".gz").unwrap_or(key).to_string()
}

/// Destination key for one zip entry: the entry's relative path placed next
/// to the archive itself.
pub fn zip_entry_destination_key(zip_key: &str, entry_path: &str) -> String {
    let parent = parent_dir(zip_key);
    if parent.is_empty() {
        entry_path.to_string()
    } else {
        format!("{}/{}", parent, entry_path)
    }
}
