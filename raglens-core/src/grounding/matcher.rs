//! Entity matching: which known entities are textually present in a
//! sentence or passage.
//!
//! Matching is case-insensitive substring containment of the entity name —
//! "Nobel Prize" matches inside "Nobel Prizes". There is no fuzzy matching
//! and no reference identity; two entities are the same entity iff their
//! names compare equal case-insensitively.

use crate::types::Entity;

/// Return the entities whose name occurs (case-insensitively) in `text`.
///
/// The result is a stable filter of `entities`: same relative order, no
/// re-sorting and no de-duplication — callers that want one entry per name
/// apply [`dedup_entities`] first. Entities with an empty name never match.
pub fn match_entities(text: &str, entities: &[Entity]) -> Vec<Entity> {
    if text.is_empty() || entities.is_empty() {
        return Vec::new();
    }
    let haystack = text.to_lowercase();
    entities
        .iter()
        .filter(|e| !e.name.is_empty() && haystack.contains(&e.name.to_lowercase()))
        .cloned()
        .collect()
}

/// De-duplicate entities by case-insensitive name, keeping the first-seen
/// entry (and therefore its type).
///
/// The backend's entity list may repeat a name with diverging types across
/// chunks; every grounding view works from the first-seen entry so the same
/// name never appears twice in a panel.
pub fn dedup_entities(entities: &[Entity]) -> Vec<Entity> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for entity in entities {
        if entity.name.is_empty() {
            continue;
        }
        let key = entity.name.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(entity.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_entities() -> Vec<Entity> {
        vec![
            Entity::new("Marie Curie", "PERSON"),
            Entity::new("Nobel Prize", "EVENT"),
            Entity::new("Albert Einstein", "PERSON"),
        ]
    }

    #[test]
    fn test_match_entities_substring_case_insensitive() {
        let matched = match_entities("Marie Curie won the Nobel Prize.", &sample_entities());
        assert_eq!(
            matched,
            vec![
                Entity::new("Marie Curie", "PERSON"),
                Entity::new("Nobel Prize", "EVENT"),
            ]
        );
    }

    #[test]
    fn test_match_entities_plural_contains_singular() {
        // "nobel prize" is a substring of "nobel prizes".
        let matched = match_entities("She won two Nobel Prizes.", &sample_entities());
        assert_eq!(matched, vec![Entity::new("Nobel Prize", "EVENT")]);
    }

    #[test]
    fn test_match_entities_preserves_input_order() {
        let entities = vec![
            Entity::new("radium", "SUBSTANCE"),
            Entity::new("Marie Curie", "PERSON"),
        ];
        let matched = match_entities("Marie Curie discovered radium.", &entities);
        let names: Vec<&str> = matched.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["radium", "Marie Curie"]);
    }

    #[test]
    fn test_match_entities_empty_name_never_matches() {
        let entities = vec![Entity::new("", "PERSON"), Entity::new("radium", "SUBSTANCE")];
        let matched = match_entities("radium everywhere", &entities);
        assert_eq!(matched, vec![Entity::new("radium", "SUBSTANCE")]);
    }

    #[test]
    fn test_match_entities_empty_inputs() {
        assert_eq!(match_entities("", &sample_entities()), Vec::new());
        assert_eq!(match_entities("anything", &[]), Vec::new());
    }

    #[test]
    fn test_match_entities_keeps_duplicates() {
        let entities = vec![
            Entity::new("radium", "SUBSTANCE"),
            Entity::new("Radium", "ELEMENT"),
        ];
        let matched = match_entities("radium glows", &entities);
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_dedup_entities_keeps_first_seen_type() {
        let entities = vec![
            Entity::new("radium", "SUBSTANCE"),
            Entity::new("Radium", "ELEMENT"),
            Entity::new("Marie Curie", "PERSON"),
        ];
        let deduped = dedup_entities(&entities);
        assert_eq!(
            deduped,
            vec![
                Entity::new("radium", "SUBSTANCE"),
                Entity::new("Marie Curie", "PERSON"),
            ]
        );
    }

    #[test]
    fn test_dedup_entities_drops_empty_names() {
        let entities = vec![Entity::new("", "X"), Entity::new("a", "Y")];
        assert_eq!(dedup_entities(&entities), vec![Entity::new("a", "Y")]);
    }
}
