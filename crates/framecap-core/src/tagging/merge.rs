//! Confidence-aware merging of tag records from several sources.
//!
//! Records are grouped by image. For each canonical tag the highest score
//! seen wins, and every accepted occurrence is counted so tags that several
//! independent sources agree on rank above equally-scored singletons.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::{ScoredTag, TagRecord};

use super::normalize::normalize;

/// Aggregated tags for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedEntry {
    /// Image identifier, verbatim from the records
    pub image: String,

    /// Canonical tag -> best score seen
    pub tags: HashMap<String, f64>,

    /// Canonical tag -> number of accepted occurrences
    pub counts: HashMap<String, u32>,
}

impl MergedEntry {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            tags: HashMap::new(),
            counts: HashMap::new(),
        }
    }

    /// Fold one source's tag pairs into this entry.
    ///
    /// Pairs whose canonical tag is empty or whose score is below
    /// `min_confidence` are discarded and not counted.
    pub fn fold(&mut self, tags: &[ScoredTag], min_confidence: f64) {
        for (raw, score) in tags {
            let tag = normalize(raw);
            if tag.is_empty() || *score < min_confidence {
                continue;
            }
            let best = self.tags.entry(tag.clone()).or_insert(*score);
            if *score > *best {
                *best = *score;
            }
            *self.counts.entry(tag).or_insert(0) += 1;
        }
    }

    /// Occurrence count for a canonical tag (0 if never accepted).
    pub fn count(&self, tag: &str) -> u32 {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    /// Tags ordered by descending score, then descending count, then name.
    pub fn ranked(&self) -> Vec<ScoredTag> {
        let mut ranked: Vec<ScoredTag> = self
            .tags
            .iter()
            .map(|(tag, score)| (tag.clone(), *score))
            .collect();
        ranked.sort_by(|a, b| self.rank_order(a, b));
        ranked
    }

    fn rank_order(&self, a: &ScoredTag, b: &ScoredTag) -> Ordering {
        b.1.total_cmp(&a.1)
            .then_with(|| self.count(&b.0).cmp(&self.count(&a.0)))
            .then_with(|| a.0.cmp(&b.0))
    }

    /// The merged-file record for this image.
    pub fn to_record(&self) -> TagRecord {
        TagRecord::new(self.image.clone(), self.ranked())
    }
}

/// Incremental merger; records may arrive in any order and from any source.
#[derive(Debug, Clone)]
pub struct TagMerger {
    min_confidence: f64,
    entries: Vec<MergedEntry>,
    index: HashMap<String, usize>,
}

impl TagMerger {
    /// Create a merger that drops pairs scoring below `min_confidence`.
    pub fn new(min_confidence: f64) -> Self {
        Self {
            min_confidence,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Fold one record into its image's entry.
    pub fn add(&mut self, record: &TagRecord) {
        let slot = match self.index.get(&record.image) {
            Some(&slot) => slot,
            None => {
                self.entries.push(MergedEntry::new(record.image.clone()));
                self.index
                    .insert(record.image.clone(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[slot].fold(&record.tags, self.min_confidence);
    }

    /// Fold every record from an iterator.
    pub fn extend<'a>(&mut self, records: impl IntoIterator<Item = &'a TagRecord>) {
        for record in records {
            self.add(record);
        }
    }

    /// Number of distinct images seen so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen image order.
    pub fn finish(self) -> Vec<MergedEntry> {
        self.entries
    }
}

/// Merge a batch of records into one entry per image.
pub fn merge(records: &[TagRecord], min_confidence: f64) -> Vec<MergedEntry> {
    let mut merger = TagMerger::new(min_confidence);
    merger.extend(records);
    merger.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(image: &str, tags: &[(&str, f64)]) -> TagRecord {
        TagRecord::new(
            image,
            tags.iter().map(|(t, s)| (t.to_string(), *s)).collect(),
        )
    }

    fn entry_for<'a>(entries: &'a [MergedEntry], image: &str) -> &'a MergedEntry {
        entries.iter().find(|e| e.image == image).unwrap()
    }

    #[test]
    fn test_two_sources_same_image() {
        let records = vec![
            rec("a.jpg", &[("Outdoor", 0.9), ("tree", 0.5)]),
            rec("a.jpg", &[("outdoor", 0.95), ("Tree", 0.6)]),
        ];
        let merged = merge(&records, 0.4);
        assert_eq!(merged.len(), 1);

        let entry = &merged[0];
        assert_eq!(
            entry.ranked(),
            vec![("outdoor".to_string(), 0.95), ("tree".to_string(), 0.6)]
        );
        assert_eq!(entry.count("outdoor"), 2);
        assert_eq!(entry.count("tree"), 2);
    }

    #[test]
    fn test_threshold_drops_and_does_not_count() {
        let merged = merge(&[rec("a.jpg", &[("tree", 0.3), ("sky", 0.4)])], 0.4);
        let entry = &merged[0];
        assert!(!entry.tags.contains_key("tree"));
        assert_eq!(entry.count("tree"), 0);
        // the threshold is inclusive
        assert_eq!(entry.tags.get("sky"), Some(&0.4));
    }

    #[test]
    fn test_empty_canonical_tag_discarded() {
        let merged = merge(&[rec("a.jpg", &[("   ", 0.9), ("", 0.9)])], 0.0);
        assert!(merged[0].tags.is_empty());
        assert!(merged[0].counts.is_empty());
    }

    #[test]
    fn test_zero_score_is_stored_when_threshold_allows() {
        let merged = merge(&[rec("a.jpg", &[("blur", 0.0)])], 0.0);
        assert_eq!(merged[0].tags.get("blur"), Some(&0.0));
        assert_eq!(merged[0].count("blur"), 1);
    }

    #[test]
    fn test_repeats_within_one_record_are_counted() {
        let records = vec![rec("a.jpg", &[("tree", 0.5), ("Tree", 0.7), ("tree ", 0.6)])];
        let merged = merge(&records, 0.0);
        assert_eq!(merged[0].tags.get("tree"), Some(&0.7));
        assert_eq!(merged[0].count("tree"), 3);
    }

    #[test]
    fn test_count_breaks_score_ties() {
        let records = vec![
            rec("a.jpg", &[("alpha", 0.8), ("beta", 0.8)]),
            rec("a.jpg", &[("beta", 0.5)]),
        ];
        let ranked = merge(&records, 0.0)[0].ranked();
        assert_eq!(ranked[0].0, "beta");
        assert_eq!(ranked[1].0, "alpha");
    }

    #[test]
    fn test_name_breaks_full_ties() {
        let records = vec![rec("a.jpg", &[("zebra", 0.8), ("apple", 0.8), ("mango", 0.8)])];
        let ranked = merge(&records, 0.0)[0].ranked();
        let names: Vec<&str> = ranked.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(names, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_images_grouped_verbatim() {
        let records = vec![
            rec("frames/v1/a.jpg", &[("tree", 0.9)]),
            rec("frames/v1/A.jpg", &[("tree", 0.9)]),
            rec("frames/v1/a.jpg", &[("sky", 0.9)]),
        ];
        let merged = merge(&records, 0.0);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].image, "frames/v1/a.jpg");
        assert_eq!(merged[0].tags.len(), 2);
        assert_eq!(merged[1].image, "frames/v1/A.jpg");
    }

    #[test]
    fn test_order_independent() {
        let a = rec("a.jpg", &[("Outdoor", 0.9), ("tree", 0.5), ("sky", 0.7)]);
        let b = rec("a.jpg", &[("outdoor", 0.95), ("Tree", 0.6)]);
        let c = rec("a.jpg", &[("sky", 0.7), ("grass", 0.45), ("tree", 0.2)]);

        let orders = [
            vec![a.clone(), b.clone(), c.clone()],
            vec![c.clone(), a.clone(), b.clone()],
            vec![b.clone(), c.clone(), a.clone()],
            vec![c.clone(), b.clone(), a.clone()],
        ];
        let expected = merge(&orders[0], 0.4);
        for order in &orders[1..] {
            assert_eq!(merge(order, 0.4), expected);
        }

        // folding [A, B] then [C] incrementally matches one batch
        let mut merger = TagMerger::new(0.4);
        merger.extend(&[a, b]);
        merger.add(&c);
        assert_eq!(merger.finish(), expected);
    }

    #[test]
    fn test_best_score_is_max_of_accepted() {
        let records = vec![
            rec("a.jpg", &[("tree", 0.55)]),
            rec("b.jpg", &[("tree", 0.99)]),
            rec("a.jpg", &[("tree", 0.81), ("tree", 0.3)]),
            rec("a.jpg", &[("TREE", 0.62)]),
        ];
        let merged = merge(&records, 0.5);
        let a = entry_for(&merged, "a.jpg");
        assert_eq!(a.tags.get("tree"), Some(&0.81));
        assert_eq!(a.count("tree"), 3);

        let b = entry_for(&merged, "b.jpg");
        assert_eq!(b.tags.get("tree"), Some(&0.99));
        assert_eq!(b.count("tree"), 1);
    }

    #[test]
    fn test_best_score_never_decreases() {
        let mut merger = TagMerger::new(0.0);
        let mut last = 0.0_f64;
        for score in [0.4, 0.9, 0.2, 0.85, 0.95, 0.1] {
            merger.add(&rec("a.jpg", &[("tree", score)]));
            let best = merger.clone().finish()[0].tags["tree"];
            assert!(best >= last);
            last = best;
        }
        assert_eq!(last, 0.95);
    }

    #[test]
    fn test_to_record_uses_ranked_order() {
        let merged = merge(&[rec("a.jpg", &[("Low", 0.5), ("High", 0.9)])], 0.0);
        let record = merged[0].to_record();
        assert_eq!(record.image, "a.jpg");
        assert_eq!(
            record.tags,
            vec![("high".to_string(), 0.9), ("low".to_string(), 0.5)]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(merge(&[], 0.5).is_empty());
        let merged = merge(&[rec("a.jpg", &[])], 0.5);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].ranked().is_empty());
    }

    #[test]
    fn test_parsed_scores_keep_full_precision() {
        use crate::output::parse_jsonl;
        use std::path::Path;

        let input = concat!(
            r#"{"image":"a.jpg","tags":[["tree",0.34999999999]]}"#,
            "\n",
            r#"{"image":"b.jpg","tags":[["b_hi",0.9000000001],["a_lo",0.9]]}"#,
            "\n",
        );
        let records: Vec<TagRecord> =
            parse_jsonl(input.as_bytes(), Path::new("tags_raw/wd14.jsonl")).unwrap();
        let merged = merge(&records, 0.35);

        let a = entry_for(&merged, "a.jpg");
        assert!(a.tags.is_empty());
        assert_eq!(a.count("tree"), 0);

        let ranked = entry_for(&merged, "b.jpg").ranked();
        assert_eq!(
            ranked,
            vec![("b_hi".to_string(), 0.9000000001), ("a_lo".to_string(), 0.9)]
        );
    }
}
