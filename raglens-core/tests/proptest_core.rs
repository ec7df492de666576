//! Property-based tests for the grounding engine using proptest.

use proptest::prelude::*;

use raglens_core::grounding::{
    dedup_entities, ground_answer, link_evidence, match_entities, score, segment,
};
use raglens_core::types::{Entity, QueryResult};

// --- Segmenter properties ---

proptest! {
    #[test]
    fn segment_never_panics(text in ".{0,400}") {
        let _ = segment(&text);
    }

    #[test]
    fn segment_is_idempotent_per_sentence(text in "[A-Za-z0-9 .!?]{0,200}") {
        for sentence in segment(&text) {
            let again = segment(&sentence.text);
            prop_assert_eq!(again.len(), 1);
            prop_assert_eq!(&again[0].text, &sentence.text);
        }
    }

    #[test]
    fn segment_offsets_slice_back_into_input(text in "[A-Za-z0-9 .!?\\n]{0,200}") {
        for sentence in segment(&text) {
            prop_assert_eq!(&text[sentence.start..sentence.end], sentence.text.as_str());
        }
    }

    #[test]
    fn segment_sentences_are_trimmed_and_nonempty(text in ".{0,300}") {
        for sentence in segment(&text) {
            prop_assert!(!sentence.text.is_empty());
            prop_assert_eq!(sentence.text.trim(), sentence.text.as_str());
        }
    }
}

// --- Matcher properties ---

proptest! {
    #[test]
    fn matcher_agrees_with_substring_containment(
        text in "[a-zA-Z ]{0,80}",
        name in "[a-zA-Z]{1,12}",
    ) {
        let entity = Entity::new(name.clone(), "THING");
        let matched = match_entities(&text, &[entity.clone()]);
        let expected = text.to_lowercase().contains(&name.to_lowercase());
        prop_assert_eq!(matched.contains(&entity), expected);
    }

    #[test]
    fn matcher_result_is_subsequence_of_input(
        text in "[a-z ]{0,80}",
        names in proptest::collection::vec("[a-z]{1,8}", 0..8),
    ) {
        let entities: Vec<Entity> =
            names.iter().map(|n| Entity::new(n.clone(), "THING")).collect();
        let matched = match_entities(&text, &entities);

        // Stable filter: matched entities appear in input order.
        let mut cursor = 0usize;
        for m in &matched {
            let position = entities[cursor..].iter().position(|e| e == m);
            prop_assert!(position.is_some());
            cursor += position.unwrap() + 1;
        }
    }

    #[test]
    fn dedup_is_idempotent_and_case_insensitive(
        names in proptest::collection::vec("[a-zA-Z]{1,8}", 0..10),
    ) {
        let entities: Vec<Entity> =
            names.iter().map(|n| Entity::new(n.clone(), "THING")).collect();
        let deduped = dedup_entities(&entities);
        prop_assert_eq!(dedup_entities(&deduped).len(), deduped.len());

        let mut seen: Vec<String> = Vec::new();
        for e in &deduped {
            let key = e.name.to_lowercase();
            prop_assert!(!seen.contains(&key));
            seen.push(key);
        }
    }
}

// --- Scorer properties ---

proptest! {
    #[test]
    fn score_is_bounded_and_monotone(n in 0usize..50) {
        let s = score(n, None);
        prop_assert!((0.5..=1.0).contains(&s));
        prop_assert!(score(n + 1, None) >= s);
    }

    #[test]
    fn backend_score_is_clamped(raw in -10.0f64..10.0) {
        let s = score(0, Some(raw));
        prop_assert!((0.0..=1.0).contains(&s));
    }
}

// --- Linker properties ---

proptest! {
    #[test]
    fn linker_indices_stay_in_range(
        sentence in "[a-z ]{0,120}",
        snippets in proptest::collection::vec("[a-z ]{0,120}", 0..6),
    ) {
        let links = link_evidence(&sentence, &snippets, &[]);
        for idx in links.supporting_chunks {
            prop_assert!(idx < snippets.len());
        }
    }

    #[test]
    fn linker_support_is_monotone_in_added_overlap(
        sentence in "[a-z]{5,10}( [a-z]{5,10}){1,6}",
        snippet in "[a-z ]{0,80}",
    ) {
        // Appending the whole sentence to a snippet can only add overlap,
        // never remove support.
        let augmented = format!("{snippet} {sentence}");
        let before = link_evidence(&sentence, &[snippet.clone()], &[]);
        let after = link_evidence(&sentence, &[augmented], &[]);
        if before.supporting_chunks.contains(&0) {
            prop_assert!(after.supporting_chunks.contains(&0));
        }
    }
}

// --- Engine-level properties ---

proptest! {
    #[test]
    fn grounding_record_count_equals_sentence_count(
        answer in "[A-Za-z0-9 .!?]{0,200}",
        names in proptest::collection::vec("[a-zA-Z]{1,8}", 0..5),
    ) {
        let result = QueryResult {
            answer: answer.clone(),
            entities: names.iter().map(|n| Entity::new(n.clone(), "THING")).collect(),
            ..Default::default()
        };
        let grounded = ground_answer(&result);
        prop_assert_eq!(grounded.len(), segment(&answer).len());
        for record in grounded {
            prop_assert!((0.5..=1.0).contains(&record.confidence));
        }
    }
}
