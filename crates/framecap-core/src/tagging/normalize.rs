//! Canonical tag keys.

/// Canonicalize a raw tag: trimmed, lowercased, spaces as underscores.
///
/// "Outdoor", "outdoor " and "outdoor" all map to `outdoor`, so sources that
/// spell a tag differently meet on the same key. An empty result means "no
/// tag" and must be discarded by the caller.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_spellings() {
        assert_eq!(normalize("Outdoor"), "outdoor");
        assert_eq!(normalize("outdoor "), "outdoor");
        assert_eq!(normalize("  Blue Sky\t"), "blue_sky");
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_inner_spaces_each_become_underscore() {
        assert_eq!(normalize("a  b"), "a__b");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Outdoor",
            "  Blue Sky ",
            "rating_explicit",
            "ÉCLAIR Rouge",
            "a \t b",
            "",
            "  ",
            "MiXeD_Case Tag",
        ];
        for raw in samples {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }
}
