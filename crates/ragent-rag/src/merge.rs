use ragent_types::{Citation, RetrievedDocument};
use std::collections::HashSet;

/// Maximum number of documents kept after merging
pub const MAX_MERGED_RESULTS: usize = 8;

/// Merge ranked candidate lists into one
///
/// Concatenates, sorts by descending score (stable, so earlier lists win
/// ties), keeps the first occurrence of each `document_id` and truncates to
/// `max_results`.
pub fn merge_documents(
    primary: Vec<RetrievedDocument>,
    secondary: Vec<RetrievedDocument>,
    max_results: usize,
) -> Vec<RetrievedDocument> {
    let mut all = primary;
    all.extend(secondary);
    all.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));

    let mut seen = HashSet::new();
    all.into_iter()
        .filter(|doc| seen.insert(doc.document_id.clone()))
        .take(max_results)
        .collect()
}

pub fn citations(documents: &[RetrievedDocument]) -> Vec<Citation> {
    documents.iter().map(Citation::from_document).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, score: f64) -> RetrievedDocument {
        RetrievedDocument::new(id, format!("Doc {}", id), "contenido", score)
    }

    fn ids(docs: &[RetrievedDocument]) -> Vec<&str> {
        docs.iter().map(|d| d.document_id.as_str()).collect()
    }

    #[test]
    fn test_shared_id_keeps_higher_score() {
        let merged = merge_documents(
            vec![doc("a", 0.6), doc("b", 0.9)],
            vec![doc("a", 0.8), doc("c", 0.7)],
            MAX_MERGED_RESULTS,
        );

        assert_eq!(ids(&merged), vec!["b", "a", "c"]);
        assert_eq!(merged[1].relevance_score, 0.8);
    }

    #[test]
    fn test_truncates_and_sorts() {
        let private: Vec<_> = (0..6).map(|i| doc(&format!("p{}", i), 0.5 + i as f64 / 100.0)).collect();
        let public: Vec<_> = (0..6).map(|i| doc(&format!("q{}", i), 0.6 + i as f64 / 100.0)).collect();

        let merged = merge_documents(private, public, MAX_MERGED_RESULTS);

        assert_eq!(merged.len(), MAX_MERGED_RESULTS);
        assert!(merged
            .windows(2)
            .all(|w| w[0].relevance_score >= w[1].relevance_score));
    }

    #[test]
    fn test_idempotent() {
        let once = merge_documents(
            vec![doc("a", 0.9), doc("b", 0.5), doc("c", 0.7)],
            vec![doc("b", 0.95), doc("d", 0.1)],
            MAX_MERGED_RESULTS,
        );
        let twice = merge_documents(once.clone(), Vec::new(), MAX_MERGED_RESULTS);
        assert_eq!(once, twice);

        let self_merged = merge_documents(once.clone(), once.clone(), MAX_MERGED_RESULTS);
        assert_eq!(once, self_merged);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge_documents(Vec::new(), Vec::new(), MAX_MERGED_RESULTS).is_empty());
    }

    #[test]
    fn test_citations_follow_order() {
        let merged = merge_documents(vec![doc("a", 0.2)], vec![doc("b", 0.4)], 8);
        let cites = citations(&merged);
        assert_eq!(cites[0].document_id, "b");
        assert_eq!(cites[1].document_id, "a");
    }
}
