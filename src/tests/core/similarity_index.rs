// Similarity Index Tests
//
// Flat top-k cosine search: result counts, ordering, tie-breaking and the error
// cases.

#[cfg(test)]
mod tests {
    use crate::embeddings::TextEncoder;
    use crate::error::IndexError;
    use crate::index::{FlatIndex, SimilarityIndex};
    use crate::tests::helpers::{BrokenEncoder, HashingEncoder};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn hashing_index() -> FlatIndex {
        FlatIndex::new(Arc::new(HashingEncoder::new(64)))
    }

    #[test]
    fn test_new_index_is_empty() {
        let index = hashing_index();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.dimensions(), 64);
    }

    #[test]
    fn test_search_empty_index_fails() {
        let index = hashing_index();
        assert!(matches!(index.search("anything", 3), Err(IndexError::Empty)));
    }

    #[test]
    fn test_exact_text_query_ranks_its_document_first() {
        let mut index = hashing_index();
        index.insert(0, "Apple uses AI for Siri and Photos").unwrap();
        index.insert(1, "Grocery retail uses AI for inventory").unwrap();

        let hits = index.search("Apple uses AI for Siri and Photos", 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].doc_id, 0);
        assert!(hits[0].score >= 0.99, "score was {}", hits[0].score);
    }

    #[test]
    fn test_search_returns_min_of_k_and_len_sorted_without_duplicates() {
        let mut index = hashing_index();
        let texts = [
            "natural language processing for support tickets",
            "computer vision for shelf monitoring",
            "predictive analytics for demand planning",
            "automated customer service chatbots",
            "recommendation engines for app stores",
        ];
        for (id, text) in texts.iter().enumerate() {
            index.insert(id as u64, text).unwrap();
        }

        for k in [1usize, 3, 5, 8] {
            let hits = index.search("customer service with language models", k).unwrap();
            assert_eq!(hits.len(), k.min(texts.len()));

            for pair in hits.windows(2) {
                assert!(pair[0].score >= pair[1].score, "scores must not increase");
            }

            let unique: HashSet<u64> = hits.iter().map(|h| h.doc_id).collect();
            assert_eq!(unique.len(), hits.len(), "no duplicate document ids");
        }
    }

    #[test]
    fn test_top_k_zero_returns_nothing() {
        let mut index = hashing_index();
        index.insert(0, "something").unwrap();
        assert!(index.search("something", 0).unwrap().is_empty());
    }

    #[test]
    fn test_ties_rank_later_insertion_first() {
        let mut index = hashing_index();
        index.insert(0, "duplicate knowledge").unwrap();
        index.insert(1, "unrelated zebra migration").unwrap();
        index.insert(2, "duplicate knowledge").unwrap();

        let hits = index.search("duplicate knowledge", 2).unwrap();
        assert_eq!(hits[0].score, hits[1].score);
        assert_eq!(hits[0].doc_id, 2, "later insertion wins the tie");
        assert_eq!(hits[1].doc_id, 0);
    }

    #[test]
    fn test_insert_vector_checks_dimensions() {
        let mut index = hashing_index();
        let result = index.insert_vector(0, vec![1.0, 0.0]);
        assert!(matches!(
            result,
            Err(IndexError::DimensionMismatch { expected: 64, actual: 2 })
        ));
        assert!(index.is_empty());
    }

    #[test]
    fn test_search_vector_with_precomputed_embeddings() {
        let encoder = Arc::new(HashingEncoder::new(4));
        let mut index = FlatIndex::new(encoder);
        index.insert_vector(10, vec![1.0, 0.0, 0.0, 0.0]).unwrap();
        index.insert_vector(11, vec![0.0, 1.0, 0.0, 0.0]).unwrap();
        index.insert_vector(12, vec![0.6, 0.8, 0.0, 0.0]).unwrap();

        let hits = index.search_vector(&[1.0, 0.0, 0.0, 0.0], 3).unwrap();
        let ids: Vec<u64> = hits.iter().map(|h| h.doc_id).collect();
        assert_eq!(ids, vec![10, 12, 11]);
        assert_eq!(index.doc_ids(), &[10, 11, 12]);
    }

    #[test]
    fn test_encoder_failure_is_reported_and_nothing_is_stored() {
        let encoder: Arc<dyn TextEncoder> = Arc::new(BrokenEncoder);
        let mut index = FlatIndex::new(encoder);

        let result = index.insert(0, "text");
        assert!(matches!(result, Err(IndexError::Encoding(_))));
        assert!(index.is_empty());
    }
}
