//! End-to-end tests for the grounding engine and view-state flows.

use pretty_assertions::assert_eq;
use raglens_core::grounding::{ground_answer, link_evidence};
use raglens_core::types::{Citation, Entity, QueryResult};
use raglens_core::view::{Tab, ViewState};
use raglens_core::SessionState;

fn curie_result() -> QueryResult {
    QueryResult {
        query: "who was Marie Curie?".to_string(),
        answer: "Marie Curie discovered radium. She won two Nobel Prizes.".to_string(),
        entities: vec![
            Entity::new("Marie Curie", "PERSON"),
            Entity::new("Nobel Prize", "EVENT"),
            Entity::new("radium", "SUBSTANCE"),
        ],
        confidence_score: 0.82,
        ..Default::default()
    }
}

#[test]
fn grounds_each_answer_sentence_with_entities_and_confidence() {
    let grounded = ground_answer(&curie_result());
    assert_eq!(grounded.len(), 2);

    let first = &grounded[0];
    assert_eq!(first.sentence.text, "Marie Curie discovered radium.");
    let names: Vec<&str> = first.matched_entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Marie Curie", "radium"]);
    assert_eq!(first.confidence, 0.7);

    let second = &grounded[1];
    assert_eq!(second.sentence.text, "She won two Nobel Prizes.");
    // "nobel prize" matches inside "nobel prizes" by substring containment.
    let names: Vec<&str> = second.matched_entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Nobel Prize"]);
    assert_eq!(second.confidence, 0.6);
}

#[test]
fn grounding_count_always_equals_sentence_count() {
    let mut result = curie_result();
    result.answer =
        "One. Two! Three? A sentence with no evidence whatsoever in this session.".to_string();
    let grounded = ground_answer(&result);
    assert_eq!(grounded.len(), 4);
}

#[test]
fn versailles_snippet_is_flagged_as_supporting() {
    let sentence = "The treaty was signed in 1919 in Versailles.";
    let snippets = vec!["The Treaty of Versailles was signed in 1919 near Paris.".to_string()];
    let links = link_evidence(sentence, &snippets, &[]);
    assert_eq!(links.supporting_chunks, vec![0]);
}

#[test]
fn citations_take_precedence_as_exact_evidence() {
    let mut result = curie_result();
    result.snippets = vec![
        "Marie Curie discovered radium while processing pitchblende.".to_string(),
    ];
    result.citations = vec![Citation {
        chunk_index: 0,
        chunk_text: String::new(),
        relevance_score: 0.9,
        matched_text: Some("discovered radium".to_string()),
    }];

    let grounded = ground_answer(&result);
    assert_eq!(grounded[0].cited_chunks, vec![0]);
    // The second sentence has no citation and no lexical support.
    assert_eq!(grounded[1].cited_chunks, Vec::<usize>::new());
}

#[test]
fn malformed_result_degrades_to_empty_evidence() {
    // Everything missing except the answer: no entities, snippets, citations.
    let result: QueryResult =
        serde_json::from_str(r#"{"answer": "Nothing supports this claim."}"#).unwrap();
    let grounded = ground_answer(&result);
    assert_eq!(grounded.len(), 1);
    assert!(!grounded[0].has_evidence());
    assert_eq!(grounded[0].confidence, 0.5);
}

#[test]
fn entity_click_then_tab_switch_resets_focus() {
    let mut view = ViewState::new();
    view.select_entity(Entity::new("radium", "SUBSTANCE"));
    assert_eq!(view.tab, Tab::Graph);
    assert!(view.focused_entity.is_some());

    view.change_tab(Tab::Sources);
    assert_eq!(view.tab, Tab::Sources);
    assert_eq!(view.focused_entity, None);
}

#[test]
fn full_session_flow_upload_query_navigate_reset() {
    let mut session = SessionState::new();
    assert_eq!(session.view.tab, Tab::Upload);

    session.set_index_id("idx-42");
    session.set_result(curie_result());
    assert_eq!(session.view.tab, Tab::Answer);

    // Entity badge click in the answer panel drives the graph view.
    let entities = session.result().unwrap().entities.clone();
    session.view.navigate_to_entity_by_name("RADIUM", &entities);
    assert_eq!(session.view.tab, Tab::Graph);
    assert_eq!(
        session.view.focused_entity,
        Some(Entity::new("radium", "SUBSTANCE"))
    );

    // Unknown names leave everything alone.
    let before = session.view.clone();
    session.view.navigate_to_entity_by_name("phlogiston", &entities);
    assert_eq!(session.view, before);

    session.reset();
    assert_eq!(session.view.tab, Tab::Upload);
    assert!(session.result().is_none());
    assert_eq!(session.index_id(), None);
}
