//! Musubi dataset emission: copied frames plus a tab-separated caption
//! manifest.

use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use crate::error::{PipelineError, PipelineResult};
use crate::output::read_jsonl;
use crate::pipeline::discovery::FileDiscovery;
use crate::pipeline::{Stage, StageObserver};
use crate::types::{CaptionRecord, StageReport};

/// Directory under the dataset root holding the copied frames.
pub const IMAGES_DIR: &str = "images";
/// Manifest file name under the dataset root.
pub const MANIFEST_FILE: &str = "captions.txt";

/// Manifest key for an image: `images/<parent dir>/<file name>`.
///
/// Both `/` and `\` are accepted as separators in `image`; the key always
/// uses `/`.
pub fn manifest_key(image: &str) -> String {
    let mut parts = image.rsplit(['/', '\\']);
    let file = parts.next().unwrap_or_default();
    match parts.next().filter(|dir| !dir.is_empty()) {
        Some(dir) => format!("{IMAGES_DIR}/{dir}/{file}"),
        None => format!("{IMAGES_DIR}/{file}"),
    }
}

/// Key every caption; a later row for the same key replaces an earlier one.
pub fn build_manifest(rows: &[CaptionRecord]) -> BTreeMap<String, String> {
    rows.iter()
        .map(|row| (manifest_key(&row.image), row.caption.clone()))
        .collect()
}

/// Write `<key>\t<caption>\n` lines in key order.
pub fn write_manifest<W: Write>(
    writer: &mut W,
    manifest: &BTreeMap<String, String>,
) -> std::io::Result<()> {
    for (key, caption) in manifest {
        writeln!(writer, "{key}\t{caption}")?;
    }
    Ok(())
}

/// Copy frames into `<dataset>/images/<dir>/` and write the manifest.
///
/// Frames already present at the destination are left untouched.
pub fn emit_dataset(
    frames: &Path,
    captions: &Path,
    dataset_root: &Path,
    observer: &mut dyn StageObserver,
) -> PipelineResult<StageReport> {
    let start = Instant::now();
    let images_root = dataset_root.join(IMAGES_DIR);
    std::fs::create_dir_all(&images_root).map_err(|e| PipelineError::io(&images_root, e))?;

    let sources = FileDiscovery::frames().discover(frames);
    observer.stage_started(Stage::Emit, sources.len());

    let mut copied = 0;
    for (i, frame) in sources.iter().enumerate() {
        let dst_dir = images_root.join(frame.parent_name());
        let Some(file_name) = frame.path.file_name() else {
            continue;
        };
        let dst = dst_dir.join(file_name);
        if !dst.exists() {
            std::fs::create_dir_all(&dst_dir).map_err(|e| PipelineError::io(&dst_dir, e))?;
            std::fs::copy(&frame.path, &dst).map_err(|e| PipelineError::io(&dst, e))?;
            copied += 1;
        }
        observer.progress(Stage::Emit, i + 1);
    }
    tracing::debug!(
        "[emit] copied {} of {} frame(s)",
        copied,
        sources.len()
    );

    let rows: Vec<CaptionRecord> = read_jsonl(captions)?;
    let manifest = build_manifest(&rows);

    let output = dataset_root.join(MANIFEST_FILE);
    let file = std::fs::File::create(&output).map_err(|e| PipelineError::io(&output, e))?;
    let mut writer = BufWriter::new(file);
    write_manifest(&mut writer, &manifest)
        .and_then(|_| writer.flush())
        .map_err(|e| PipelineError::io(&output, e))?;

    tracing::info!(
        "[emit] dataset ready at {} ({} caption(s))",
        dataset_root.display(),
        manifest.len()
    );
    Ok(StageReport {
        stage: Stage::Emit.to_string(),
        items: manifest.len(),
        output,
        seconds: start.elapsed().as_secs_f64(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::write_jsonl;
    use crate::pipeline::NoopObserver;

    fn caption(image: &str, caption: &str) -> CaptionRecord {
        CaptionRecord {
            image: image.into(),
            caption: caption.into(),
        }
    }

    #[test]
    fn test_manifest_key() {
        assert_eq!(
            manifest_key("/work/frames/v1_clip_0001_norm/frame_000001.jpg"),
            "images/v1_clip_0001_norm/frame_000001.jpg"
        );
        assert_eq!(manifest_key(r"C:\work\frames\v1\f.jpg"), "images/v1/f.jpg");
        assert_eq!(manifest_key("f.jpg"), "images/f.jpg");
    }

    #[test]
    fn test_manifest_sorted_and_last_wins() {
        let manifest = build_manifest(&[
            caption("frames/v2/f1.jpg", "b"),
            caption("frames/v1/f1.jpg", "old"),
            caption("other/v1/f1.jpg", "new"),
        ]);

        let mut out = Vec::new();
        write_manifest(&mut out, &manifest).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "images/v1/f1.jpg\tnew\nimages/v2/f1.jpg\tb\n"
        );
    }

    #[test]
    fn test_emit_copies_frames_once() {
        let dir = tempfile::tempdir().unwrap();
        let frames = dir.path().join("frames");
        std::fs::create_dir_all(frames.join("v1")).unwrap();
        std::fs::write(frames.join("v1/frame_000001.jpg"), b"new").unwrap();

        let dataset = dir.path().join("dataset");
        std::fs::create_dir_all(dataset.join("images/v1")).unwrap();
        std::fs::write(dataset.join("images/v1/frame_000001.jpg"), b"kept").unwrap();

        let captions = dir.path().join("captions_clean.jsonl");
        write_jsonl(
            &captions,
            &[caption(
                &frames.join("v1/frame_000001.jpg").to_string_lossy(),
                "mykw, tree",
            )],
        )
        .unwrap();

        let report = emit_dataset(&frames, &captions, &dataset, &mut NoopObserver).unwrap();
        assert_eq!(report.items, 1);
        assert_eq!(
            std::fs::read(dataset.join("images/v1/frame_000001.jpg")).unwrap(),
            b"kept"
        );
        assert_eq!(
            std::fs::read_to_string(dataset.join("captions.txt")).unwrap(),
            "images/v1/frame_000001.jpg\tmykw, tree\n"
        );
    }
}
