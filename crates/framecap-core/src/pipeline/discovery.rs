//! File discovery for stage inputs.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Source video extensions accepted by the split stage.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "avi", "webm"];

/// Finds files with given extensions at a fixed depth below a root.
///
/// Depth 1 means direct children (`root/*.ext`), depth 2 means one
/// directory level down (`root/*/*.ext`).
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    extensions: Vec<String>,
    depth: usize,
}

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl DiscoveredFile {
    /// File stem as a string (empty if not UTF-8 representable).
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Name of the directory containing the file.
    pub fn parent_name(&self) -> String {
        self.path
            .parent()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl FileDiscovery {
    pub fn new(extensions: &[&str], depth: usize) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
            depth,
        }
    }

    /// Source videos directly inside a directory.
    pub fn videos() -> Self {
        Self::new(VIDEO_EXTENSIONS, 1)
    }

    /// `<root>/<video>/clip_NNNN.mp4`
    pub fn clips() -> Self {
        Self::new(&["mp4"], 2)
    }

    /// `<root>/*_norm.mp4`
    pub fn normalized() -> Self {
        Self::new(&["mp4"], 1)
    }

    /// `<root>/<clip>/frame_NNNNNN.jpg`
    pub fn frames() -> Self {
        Self::new(&["jpg"], 2)
    }

    /// Discover matching files, sorted by path.
    ///
    /// A missing root yields an empty list.
    pub fn discover(&self, root: &Path) -> Vec<DiscoveredFile> {
        let mut files: Vec<DiscoveredFile> = WalkDir::new(root)
            .min_depth(self.depth)
            .max_depth(self.depth)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file() && self.is_supported(entry.path()))
            .filter_map(|entry| {
                let size = entry.metadata().ok()?.len();
                Some(DiscoveredFile {
                    path: entry.into_path(),
                    size,
                })
            })
            .collect();

        // Sort by path for deterministic ordering
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    /// Check if a file has a supported extension (case-insensitive).
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.extensions.iter().any(|e| *e == ext_lower)
            })
            .unwrap_or(false)
    }

    /// Get total size of all discovered files.
    pub fn total_size(files: &[DiscoveredFile]) -> u64 {
        files.iter().map(|f| f.size).sum()
    }
}
