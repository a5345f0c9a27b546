//! VIAME CSV exports.

use std::path::Path;

use serde::Deserialize;

use crate::error::{PipelineError, PipelineResult};

use super::IngestedRecord;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViameRow {
    image: Option<String>,
    filename: Option<String>,
    class: Option<String>,
    attributes: Option<String>,
}

impl ViameRow {
    fn image(&self) -> Option<&str> {
        [&self.image, &self.filename]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
    }

    /// Class and attribute values, split on `,` or `;`.
    fn labels(&self) -> Vec<String> {
        [&self.class, &self.attributes]
            .into_iter()
            .flatten()
            .flat_map(|field| field.split([',', ';']))
            .map(str::to_string)
            .collect()
    }
}

pub(super) fn read(export: &Path) -> PipelineResult<Vec<IngestedRecord>> {
    let export_err = |message: String| PipelineError::Export {
        path: export.to_path_buf(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(export)
        .map_err(|e| export_err(e.to_string()))?;

    let mut records = Vec::new();
    let mut skipped = 0;
    for row in reader.deserialize::<ViameRow>() {
        let row = row.map_err(|e| export_err(e.to_string()))?;
        let Some(image) = row.image() else {
            skipped += 1;
            continue;
        };
        records.push(IngestedRecord::Viame {
            image: image.to_string(),
            labels: row.labels(),
        });
    }

    if skipped > 0 {
        tracing::warn!(
            "VIAME export {}: skipped {} row(s) without an image column",
            export.display(),
            skipped
        );
    }
    Ok(records)
}
