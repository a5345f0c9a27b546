//! datagym-core JSON exports: an array of `{image|filename, labels: [...]}`.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{PipelineError, PipelineResult};

use super::IngestedRecord;

#[derive(Debug, Deserialize)]
struct DatagymItem {
    #[serde(default)]
    image: Option<Value>,
    #[serde(default)]
    filename: Option<Value>,
    #[serde(default)]
    labels: Vec<Value>,
}

/// Labels may be strings or bare JSON values; non-strings use their JSON text.
fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Null and empty strings count as no image.
fn image_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(label_text(other)),
    }
}

pub(super) fn read(export: &Path) -> PipelineResult<Vec<IngestedRecord>> {
    let content = std::fs::read_to_string(export).map_err(|e| PipelineError::io(export, e))?;
    let items: Vec<DatagymItem> =
        serde_json::from_str(&content).map_err(|e| PipelineError::Export {
            path: export.to_path_buf(),
            message: e.to_string(),
        })?;

    let total = items.len();
    let records: Vec<IngestedRecord> = items
        .into_iter()
        .filter_map(|item| {
            let image =
                image_text(item.image.as_ref()).or_else(|| image_text(item.filename.as_ref()))?;
            Some(IngestedRecord::Datagym {
                image,
                labels: item.labels.iter().map(label_text).collect(),
            })
        })
        .collect();

    if records.len() < total {
        tracing::warn!(
            "datagym export {}: skipped {} item(s) without an image",
            export.display(),
            total - records.len()
        );
    }
    Ok(records)
}
