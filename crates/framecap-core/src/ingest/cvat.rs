//! CVAT zip exports.
//!
//! The archive may hold several `captions.json` members (one per task); each
//! is a JSON array of `{"image": ..., "tags": [...]}`. Tags for the same image
//! are unioned across members; images keep the order they first appear in.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PipelineError, PipelineResult};

use super::IngestedRecord;

const CAPTIONS_MEMBER: &str = "captions.json";

#[derive(Debug, Deserialize)]
struct CaptionEntry {
    image: String,
    #[serde(default)]
    tags: Vec<String>,
}

pub(super) fn read(export: &Path) -> PipelineResult<Vec<IngestedRecord>> {
    let export_err = |message: String| PipelineError::Export {
        path: export.to_path_buf(),
        message,
    };

    let file = File::open(export).map_err(|e| PipelineError::io(export, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| export_err(e.to_string()))?;

    let mut tags_by_image: Vec<(String, BTreeSet<String>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut members = 0;

    for idx in 0..archive.len() {
        let mut member = archive
            .by_index(idx)
            .map_err(|e| export_err(e.to_string()))?;
        if !member.name().ends_with(CAPTIONS_MEMBER) {
            continue;
        }
        let name = member.name().to_string();

        let mut content = String::new();
        member
            .read_to_string(&mut content)
            .map_err(|e| export_err(format!("{name}: {e}")))?;
        let entries: Vec<CaptionEntry> =
            serde_json::from_str(&content).map_err(|e| export_err(format!("{name}: {e}")))?;

        for entry in entries {
            let slot = *index.entry(entry.image.clone()).or_insert_with(|| {
                tags_by_image.push((entry.image, BTreeSet::new()));
                tags_by_image.len() - 1
            });
            tags_by_image[slot].1.extend(entry.tags);
        }
        members += 1;
    }

    tracing::debug!(
        "CVAT export {}: {} captions member(s), {} image(s)",
        export.display(),
        members,
        tags_by_image.len()
    );

    Ok(tags_by_image
        .into_iter()
        .map(|(image, tags)| IngestedRecord::Cvat { image, tags })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_zip(path: &Path, members: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, body) in members {
            zip.start_file(*name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_unions_tags_across_members() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("cvat.zip");
        write_zip(
            &export,
            &[
                (
                    "task_1/captions.json",
                    r#"[{"image": "v1/f1.jpg", "tags": ["tree", "sky"]}]"#,
                ),
                ("task_1/annotations.xml", "<annotations/>"),
                (
                    "task_2/captions.json",
                    r#"[{"image": "v1/f1.jpg", "tags": ["sky", "road"]},
                        {"image": "v1/f2.jpg", "tags": ["car"]}]"#,
                ),
            ],
        );

        let records = read(&export).unwrap();
        assert_eq!(records.len(), 2);
        match &records[0] {
            IngestedRecord::Cvat { image, tags } => {
                assert_eq!(image, "v1/f1.jpg");
                let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
                assert_eq!(tags, vec!["road", "sky", "tree"]);
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn test_images_in_first_seen_order() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("cvat.zip");
        write_zip(
            &export,
            &[
                (
                    "task_1/captions.json",
                    r#"[{"image": "v2/f9.jpg", "tags": ["car"]},
                        {"image": "v1/f1.jpg", "tags": ["tree"]}]"#,
                ),
                (
                    "task_2/captions.json",
                    r#"[{"image": "v0/f0.jpg", "tags": ["sky"]},
                        {"image": "v2/f9.jpg", "tags": ["road"]}]"#,
                ),
            ],
        );

        let images: Vec<String> = read(&export)
            .unwrap()
            .iter()
            .map(|r| r.image().to_string())
            .collect();
        assert_eq!(images, vec!["v2/f9.jpg", "v1/f1.jpg", "v0/f0.jpg"]);
    }

    #[test]
    fn test_archive_without_captions_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("cvat.zip");
        write_zip(&export, &[("annotations.xml", "<annotations/>")]);
        assert!(read(&export).unwrap().is_empty());
    }

    #[test]
    fn test_not_a_zip() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("cvat.zip");
        std::fs::write(&export, "definitely not a zip").unwrap();
        assert!(matches!(read(&export), Err(PipelineError::Export { .. })));
    }

    #[test]
    fn test_bad_captions_json_names_member() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("cvat.zip");
        write_zip(&export, &[("captions.json", r#"{"image": "x"}"#)]);
        let err = read(&export).unwrap_err();
        assert!(err.to_string().contains("captions.json"));
    }
}
