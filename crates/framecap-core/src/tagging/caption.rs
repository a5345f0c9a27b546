//! Caption assembly from a ranked tag list.
//!
//! Input order is priority order: when the cap is reached the lower-ranked
//! tags are the ones dropped.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::ScoredTag;

/// Tags dropped when `strip_nsfb` is set. Matched against the trimmed tag
/// before any casing or underscore transform.
pub const NSFB_TAGS: &[&str] = &["rating_explicit", "nsfw", "censored"];

/// Separator between caption entries, and between prefix and entries.
const SEPARATOR: &str = ", ";

/// Options controlling how tags are rendered into a caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionConfig {
    /// Casefold each tag
    pub lowercase: bool,

    /// Render `_` as a space
    pub replace_underscores: bool,

    /// Drop tags on the NSFB blocklist
    pub strip_nsfb: bool,

    /// Maximum number of tags in the caption
    pub max_tags: usize,

    /// Literal text placed before the tags (the activation keyword)
    pub prefix: String,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            replace_underscores: true,
            strip_nsfb: true,
            max_tags: 64,
            prefix: String::new(),
        }
    }
}

/// Render a ranked tag list as a caption string.
///
/// Scores are ignored; only order matters. Dedup runs on the transformed
/// text, so two tags that differ only by case or `_` vs space collapse into
/// one entry. With a non-empty prefix and no surviving tags the result is
/// `"<prefix>, "`, matching captions produced by earlier runs.
pub fn build_caption(ranked_tags: &[ScoredTag], config: &CaptionConfig) -> String {
    let mut seen: HashSet<String> = HashSet::new();
    let mut accepted: Vec<String> = Vec::new();

    for (raw, _score) in ranked_tags {
        if accepted.len() >= config.max_tags {
            break;
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if config.strip_nsfb && NSFB_TAGS.contains(&trimmed) {
            continue;
        }

        let mut tag = trimmed.to_string();
        if config.lowercase {
            tag = tag.to_lowercase();
        }
        if config.replace_underscores {
            tag = tag.replace('_', " ");
        }

        if seen.insert(tag.clone()) {
            accepted.push(tag);
        }
    }

    let joined = accepted.join(SEPARATOR);
    if config.prefix.is_empty() {
        joined
    } else {
        format!("{}{SEPARATOR}{joined}", config.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[(&str, f64)]) -> Vec<ScoredTag> {
        items.iter().map(|(t, s)| (t.to_string(), *s)).collect()
    }

    fn config(max_tags: usize, prefix: &str) -> CaptionConfig {
        CaptionConfig {
            max_tags,
            prefix: prefix.to_string(),
            ..CaptionConfig::default()
        }
    }

    #[test]
    fn test_blocklist_cap_and_prefix() {
        let ranked = tags(&[("outdoor", 0.95), ("tree", 0.6), ("nsfw", 0.99)]);
        let cfg = CaptionConfig {
            strip_nsfb: true,
            lowercase: true,
            replace_underscores: true,
            max_tags: 2,
            prefix: "mystyle".to_string(),
        };
        assert_eq!(build_caption(&ranked, &cfg), "mystyle, outdoor, tree");
    }

    #[test]
    fn test_empty_without_prefix() {
        assert_eq!(build_caption(&[], &config(64, "")), "");
    }

    #[test]
    fn test_empty_with_prefix_keeps_trailing_separator() {
        assert_eq!(build_caption(&[], &config(64, "kw")), "kw, ");
    }

    #[test]
    fn test_blocked_tag_ahead_of_cap_does_not_use_a_slot() {
        let ranked = tags(&[("nsfw", 0.99), ("outdoor", 0.95), ("tree", 0.6), ("sky", 0.5)]);
        assert_eq!(build_caption(&ranked, &config(2, "")), "outdoor, tree");
    }

    #[test]
    fn test_blocklist_matches_before_transforms() {
        // "NSFW" is not on the list; it is lowercased afterwards and kept
        let ranked = tags(&[("NSFW", 0.9), ("rating explicit", 0.8), (" censored ", 0.7)]);
        assert_eq!(
            build_caption(&ranked, &config(64, "")),
            "nsfw, rating explicit"
        );
    }

    #[test]
    fn test_blocklist_off_keeps_tags() {
        let ranked = tags(&[("rating_explicit", 0.9)]);
        let cfg = CaptionConfig {
            strip_nsfb: false,
            ..config(64, "")
        };
        assert_eq!(build_caption(&ranked, &cfg), "rating explicit");
    }

    #[test]
    fn test_transforms_toggle() {
        let ranked = tags(&[("Blue_Sky", 0.9)]);
        let raw = CaptionConfig {
            lowercase: false,
            replace_underscores: false,
            ..config(64, "")
        };
        assert_eq!(build_caption(&ranked, &raw), "Blue_Sky");
        assert_eq!(build_caption(&ranked, &config(64, "")), "blue sky");
    }

    #[test]
    fn test_dedup_after_transforms() {
        let ranked = tags(&[("blue_sky", 0.9), ("blue sky", 0.8), ("Blue_Sky", 0.7), ("tree", 0.6)]);
        assert_eq!(build_caption(&ranked, &config(2, "")), "blue sky, tree");
    }

    #[test]
    fn test_dedup_is_case_sensitive_without_lowercase() {
        let ranked = tags(&[("Tree", 0.9), ("tree", 0.8)]);
        let cfg = CaptionConfig {
            lowercase: false,
            ..config(64, "")
        };
        assert_eq!(build_caption(&ranked, &cfg), "Tree, tree");
    }

    #[test]
    fn test_blank_tags_skipped() {
        let ranked = tags(&[("  ", 0.9), ("", 0.8), (" tree ", 0.7)]);
        assert_eq!(build_caption(&ranked, &config(64, "")), "tree");
    }

    #[test]
    fn test_zero_cap_accepts_nothing() {
        let ranked = tags(&[("tree", 0.9)]);
        assert_eq!(build_caption(&ranked, &config(0, "")), "");
        assert_eq!(build_caption(&ranked, &config(0, "kw")), "kw, ");
    }

    #[test]
    fn test_caption_is_prefix_of_filtered_sequence() {
        let ranked = tags(&[
            ("a", 0.9),
            ("nsfw", 0.9),
            ("b", 0.8),
            ("A", 0.8),
            ("c", 0.7),
            ("d", 0.6),
            ("e", 0.5),
        ]);
        let full = build_caption(&ranked, &config(64, ""));
        assert_eq!(full, "a, b, c, d, e");
        for cap in 0..=6 {
            let caption = build_caption(&ranked, &config(cap, ""));
            let parts: Vec<&str> = if caption.is_empty() {
                vec![]
            } else {
                caption.split(SEPARATOR).collect()
            };
            assert!(parts.len() <= cap);
            assert!(full.starts_with(&caption));
            let unique: HashSet<&str> = parts.iter().copied().collect();
            assert_eq!(unique.len(), parts.len());
        }
    }

    #[test]
    fn test_deterministic() {
        let ranked = tags(&[("outdoor", 0.95), ("Tree_Line", 0.6), ("sky", 0.5)]);
        let cfg = config(2, "kw");
        let first = build_caption(&ranked, &cfg);
        for _ in 0..10 {
            assert_eq!(build_caption(&ranked, &cfg), first);
        }
    }
}
