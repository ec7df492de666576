//! Cross-panel navigation state.
//!
//! One small state machine drives every panel: the active tab, the entity
//! the graph view is focused on, and the snippet the sources view is
//! highlighting. Clicking an entity badge in the answer panel, say, focuses
//! the graph on that entity by going through a transition here — panels
//! never reach into each other.
//!
//! All transitions are synchronous and total: an unresolvable entity name
//! is a silent no-op, never an error.

use serde::{Deserialize, Serialize};

use crate::highlight::count_occurrences;
use crate::types::Entity;

/// The panels a session can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Upload,
    Answer,
    Sources,
    Entities,
    Graph,
    Pipeline,
    Export,
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tab::Upload => "upload",
            Tab::Answer => "answer",
            Tab::Sources => "sources",
            Tab::Entities => "entities",
            Tab::Graph => "graph",
            Tab::Pipeline => "pipeline",
            Tab::Export => "export",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upload" => Ok(Tab::Upload),
            "answer" => Ok(Tab::Answer),
            "sources" => Ok(Tab::Sources),
            "entities" => Ok(Tab::Entities),
            "graph" => Ok(Tab::Graph),
            "pipeline" => Ok(Tab::Pipeline),
            "export" => Ok(Tab::Export),
            other => Err(format!("unknown tab: {other}")),
        }
    }
}

/// The cross-panel view state: active tab plus the current focus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub tab: Tab,
    /// Entity the graph/entities views center on, set by entity clicks.
    pub focused_entity: Option<Entity>,
    /// Snippet index the sources view highlights.
    pub highlighted_source: Option<usize>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// Initial state before any query result exists.
    pub fn new() -> Self {
        Self {
            tab: Tab::Upload,
            focused_entity: None,
            highlighted_source: None,
        }
    }

    /// Focus the graph view on `entity`. Sets tab and focus atomically —
    /// unlike [`change_tab`](Self::change_tab), this transition is the one
    /// establishing focus, so nothing is cleared.
    pub fn select_entity(&mut self, entity: Entity) {
        self.focused_entity = Some(entity);
        self.tab = Tab::Graph;
    }

    /// Jump to the sources view with the best-matching snippet for
    /// `entity` highlighted: the snippet containing the most occurrences
    /// of the entity name, ties to the lower index. With no occurrence
    /// anywhere the tab still switches, with nothing highlighted.
    pub fn show_sources_for_entity(&mut self, entity: &Entity, snippets: &[String]) {
        self.highlighted_source = best_matching_snippet(snippets, &entity.name);
        self.tab = Tab::Sources;
    }

    /// Resolve `name` case-insensitively against `entities` and behave as
    /// [`select_entity`](Self::select_entity) when found. Unknown names
    /// leave the state untouched.
    pub fn navigate_to_entity_by_name(&mut self, name: &str, entities: &[Entity]) {
        let found = entities
            .iter()
            .find(|e| !e.name.is_empty() && e.name.eq_ignore_ascii_case(name));
        if let Some(entity) = found {
            self.select_entity(entity.clone());
        }
    }

    /// Switch to `tab`, clearing cross-panel focus. Focus survives only
    /// transitions that set it themselves (`select_entity`,
    /// `show_sources_for_entity`).
    pub fn change_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.focused_entity = None;
        self.highlighted_source = None;
    }

    /// A new query result arrived: land on the answer tab with focus
    /// cleared.
    pub fn on_new_result(&mut self) {
        self.change_tab(Tab::Answer);
    }

    /// Session cleared: back to the initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Index of the snippet with the most case-insensitive occurrences of
/// `name`; ties go to the lower index, zero occurrences everywhere is
/// `None`.
fn best_matching_snippet(snippets: &[String], name: &str) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (idx, snippet) in snippets.iter().enumerate() {
        let count = count_occurrences(snippet, name);
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((idx, count)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snippets() -> Vec<String> {
        vec![
            "Nothing relevant here.".to_string(),
            "Radium was isolated by Marie Curie. Radium salts glow.".to_string(),
            "Radium appears once.".to_string(),
        ]
    }

    #[test]
    fn test_initial_state() {
        let state = ViewState::new();
        assert_eq!(state.tab, Tab::Upload);
        assert_eq!(state.focused_entity, None);
        assert_eq!(state.highlighted_source, None);
    }

    #[test]
    fn test_select_entity_focuses_graph() {
        let mut state = ViewState::new();
        state.select_entity(Entity::new("radium", "SUBSTANCE"));
        assert_eq!(state.tab, Tab::Graph);
        assert_eq!(state.focused_entity, Some(Entity::new("radium", "SUBSTANCE")));
    }

    #[test]
    fn test_change_tab_clears_focus() {
        let mut state = ViewState::new();
        state.select_entity(Entity::new("radium", "SUBSTANCE"));
        state.change_tab(Tab::Sources);
        assert_eq!(state.tab, Tab::Sources);
        assert_eq!(state.focused_entity, None);
        assert_eq!(state.highlighted_source, None);
    }

    #[test]
    fn test_show_sources_picks_most_occurrences() {
        let mut state = ViewState::new();
        state.show_sources_for_entity(&Entity::new("Radium", "SUBSTANCE"), &snippets());
        assert_eq!(state.tab, Tab::Sources);
        assert_eq!(state.highlighted_source, Some(1));
    }

    #[test]
    fn test_show_sources_without_match_still_switches() {
        let mut state = ViewState::new();
        state.show_sources_for_entity(&Entity::new("polonium", "SUBSTANCE"), &snippets());
        assert_eq!(state.tab, Tab::Sources);
        assert_eq!(state.highlighted_source, None);
    }

    #[test]
    fn test_navigate_by_name_case_insensitive() {
        let entities = vec![Entity::new("Marie Curie", "PERSON")];
        let mut state = ViewState::new();
        state.navigate_to_entity_by_name("marie curie", &entities);
        assert_eq!(state.tab, Tab::Graph);
        assert_eq!(state.focused_entity, Some(Entity::new("Marie Curie", "PERSON")));
    }

    #[test]
    fn test_navigate_by_unknown_name_is_noop() {
        let entities = vec![Entity::new("Marie Curie", "PERSON")];
        let mut state = ViewState::new();
        state.change_tab(Tab::Entities);
        state.navigate_to_entity_by_name("nikola tesla", &entities);
        assert_eq!(state.tab, Tab::Entities);
        assert_eq!(state.focused_entity, None);
    }

    #[test]
    fn test_tab_round_trip_parse() {
        for tab in [
            Tab::Upload,
            Tab::Answer,
            Tab::Sources,
            Tab::Entities,
            Tab::Graph,
            Tab::Pipeline,
            Tab::Export,
        ] {
            let parsed: Tab = tab.to_string().parse().unwrap();
            assert_eq!(parsed, tab);
        }
        assert!("bogus".parse::<Tab>().is_err());
    }
}
