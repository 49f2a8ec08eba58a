use std::collections::HashSet;

use super::debounce::GenerationToken;
use super::normalize::{NormalizationPolicy, StandardNormalization};
use super::query::SuggestionMode;
use crate::services::{EntityHit, EntityId, ServiceError};

pub const DEFAULT_ENTITY_CAP: usize = 6;
pub const DEFAULT_TAG_CAP: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: Option<EntityId>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPayload {
    Entities(Vec<EntityHit>),
    Tags(Vec<String>),
}

impl FetchPayload {
    pub fn mode(&self) -> SuggestionMode {
        match self {
            Self::Entities(_) => SuggestionMode::Entity,
            Self::Tags(_) => SuggestionMode::Tag,
        }
    }
}

#[derive(Debug)]
pub struct FetchResponse {
    pub token: GenerationToken,
    pub result: Result<FetchPayload, ServiceError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { count: usize },
    Stale,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKey {
    Up,
    Down,
    Enter,
    Escape,
    Blur,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionCommit {
    SearchTag { tag: String },
    OpenEntity { id: EntityId, name: String },
}

/// Dedups by id, then by display key, keeping backend rank order.
pub fn reconcile_entities(
    hits: Vec<EntityHit>,
    policy: &dyn NormalizationPolicy,
    cap: usize,
) -> Vec<Candidate> {
    let mut seen_ids = HashSet::new();
    let mut seen_keys = HashSet::new();

    hits.into_iter()
        .filter(|hit| seen_ids.insert(hit.id))
        .filter(|hit| seen_keys.insert(policy.display_key(&hit.name)))
        .take(cap)
        .map(|hit| Candidate {
            id: Some(hit.id),
            label: hit.name,
        })
        .collect()
}

pub fn reconcile_tags(tags: Vec<String>, cap: usize) -> Vec<Candidate> {
    let mut seen = HashSet::new();

    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .take(cap)
        .map(|label| Candidate { id: None, label })
        .collect()
}

/// Owns the displayed suggestion list and its keyboard selection.
#[derive(Debug)]
pub struct SuggestionReconciler {
    policy: Box<dyn NormalizationPolicy>,
    entity_cap: usize,
    tag_cap: usize,
    mode: SuggestionMode,
    items: Vec<Candidate>,
    selected: Option<usize>,
}

impl Default for SuggestionReconciler {
    fn default() -> Self {
        Self::new(
            Box::new(StandardNormalization::default()),
            DEFAULT_ENTITY_CAP,
            DEFAULT_TAG_CAP,
        )
    }
}

impl SuggestionReconciler {
    pub fn new(policy: Box<dyn NormalizationPolicy>, entity_cap: usize, tag_cap: usize) -> Self {
        Self {
            policy,
            entity_cap,
            tag_cap,
            mode: SuggestionMode::None,
            items: Vec::new(),
            selected: None,
        }
    }

    /// Applies a response only when it carries the latest issued token.
    pub fn apply(&mut self, response: FetchResponse, latest: GenerationToken) -> ApplyOutcome {
        if response.token != latest {
            tracing::trace!(
                token = response.token.value(),
                latest = latest.value(),
                "stale suggestion response dropped"
            );
            return ApplyOutcome::Stale;
        }

        let payload = match response.result {
            Ok(payload) => payload,
            Err(error) => {
                tracing::debug!(%error, "suggestion fetch failed");
                self.clear();
                return ApplyOutcome::Failed;
            }
        };

        self.mode = payload.mode();
        self.items = match payload {
            FetchPayload::Entities(hits) => {
                reconcile_entities(hits, self.policy.as_ref(), self.entity_cap)
            }
            FetchPayload::Tags(tags) => reconcile_tags(tags, self.tag_cap),
        };
        self.selected = None;
        ApplyOutcome::Applied {
            count: self.items.len(),
        }
    }

    pub fn clear(&mut self) {
        self.mode = SuggestionMode::None;
        self.items.clear();
        self.selected = None;
    }

    pub fn on_key(&mut self, key: SuggestionKey) -> Option<SuggestionCommit> {
        match key {
            SuggestionKey::Down => {
                if !self.items.is_empty() {
                    let next = self.selected.map_or(0, |index| index + 1);
                    self.selected = Some(next.min(self.items.len() - 1));
                }
                None
            }
            SuggestionKey::Up => {
                self.selected = match self.selected {
                    Some(0) | None => None,
                    Some(index) => Some(index - 1),
                };
                None
            }
            SuggestionKey::Enter => {
                let commit = self.selected_candidate().map(|candidate| match candidate.id {
                    Some(id) if self.mode == SuggestionMode::Entity => SuggestionCommit::OpenEntity {
                        id,
                        name: candidate.label.clone(),
                    },
                    _ => SuggestionCommit::SearchTag {
                        tag: candidate.label.clone(),
                    },
                });
                if commit.is_some() {
                    self.clear();
                }
                commit
            }
            SuggestionKey::Escape | SuggestionKey::Blur => {
                self.clear();
                None
            }
        }
    }

    pub fn items(&self) -> &[Candidate] {
        &self.items
    }

    pub fn mode(&self) -> SuggestionMode {
        self.mode
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Selection as a signed index where -1 means nothing is highlighted.
    pub fn selection_index(&self) -> isize {
        self.selected.map_or(-1, |index| index as isize)
    }

    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.selected.and_then(|index| self.items.get(index))
    }

    pub fn is_open(&self) -> bool {
        !self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ApplyOutcome, FetchPayload, FetchResponse, SuggestionCommit, SuggestionKey,
        SuggestionReconciler, reconcile_entities, reconcile_tags,
    };
    use crate::services::{EntityHit, ServiceError};
    use crate::suggest::debounce::GenerationToken;
    use crate::suggest::normalize::StandardNormalization;

    fn hit(id: u64, name: &str) -> EntityHit {
        EntityHit {
            id,
            name: name.to_string(),
        }
    }

    fn entities(token: GenerationToken, hits: Vec<EntityHit>) -> FetchResponse {
        FetchResponse {
            token,
            result: Ok(FetchPayload::Entities(hits)),
        }
    }

    fn loaded(hits: Vec<EntityHit>) -> SuggestionReconciler {
        let token = GenerationToken::default().next();
        let mut reconciler = SuggestionReconciler::default();
        reconciler.apply(entities(token, hits), token);
        reconciler
    }

    #[test]
    fn identity_then_display_dedup_keeps_first_seen() {
        let items = reconcile_entities(
            vec![hit(1, "Motorhead"), hit(2, "motorhead"), hit(1, "Motorhead")],
            &StandardNormalization::default(),
            6,
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, Some(1));
    }

    #[test]
    fn entity_list_is_capped_in_rank_order() {
        let hits = (1..=10).map(|id| hit(id, &format!("Band {id}"))).collect();
        let items = reconcile_entities(hits, &StandardNormalization::default(), 6);
        let ids: Vec<_> = items.iter().filter_map(|item| item.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn tags_dedup_case_insensitively_on_trimmed_text() {
        let items = reconcile_tags(
            vec![
                "Rock".to_string(),
                " rock ".to_string(),
                "ROCK".to_string(),
                "rockabilly".to_string(),
            ],
            8,
        );
        let labels: Vec<_> = items.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, vec!["Rock", "rockabilly"]);
    }

    #[test]
    fn stale_response_is_ignored() {
        let mut reconciler = loaded(vec![hit(1, "Motorhead")]);
        let stale = GenerationToken::default();
        let latest = stale.next().next();

        let outcome = reconciler.apply(entities(stale, vec![hit(9, "Other")]), latest);
        assert_eq!(outcome, ApplyOutcome::Stale);
        assert_eq!(reconciler.items()[0].id, Some(1));
    }

    #[test]
    fn failed_fetch_clears_list() {
        let mut reconciler = loaded(vec![hit(1, "Motorhead")]);
        let token = GenerationToken::default().next().next();
        let outcome = reconciler.apply(
            FetchResponse {
                token,
                result: Err(ServiceError::Network {
                    message: "timeout".to_string(),
                }),
            },
            token,
        );
        assert_eq!(outcome, ApplyOutcome::Failed);
        assert!(!reconciler.is_open());
    }

    #[test]
    fn selection_clamps_at_both_ends() {
        let mut reconciler = loaded(vec![hit(1, "A"), hit(2, "B")]);
        assert_eq!(reconciler.selection_index(), -1);

        reconciler.on_key(SuggestionKey::Down);
        reconciler.on_key(SuggestionKey::Down);
        reconciler.on_key(SuggestionKey::Down);
        assert_eq!(reconciler.selection_index(), 1);

        reconciler.on_key(SuggestionKey::Up);
        reconciler.on_key(SuggestionKey::Up);
        reconciler.on_key(SuggestionKey::Up);
        assert_eq!(reconciler.selection_index(), -1);
    }

    #[test]
    fn enter_without_selection_commits_nothing() {
        let mut reconciler = loaded(vec![hit(1, "A")]);
        assert_eq!(reconciler.on_key(SuggestionKey::Enter), None);
        assert!(reconciler.is_open());
    }

    #[test]
    fn enter_commits_entity_and_closes() {
        let mut reconciler = loaded(vec![hit(4, "Motorhead")]);
        reconciler.on_key(SuggestionKey::Down);

        let commit = reconciler.on_key(SuggestionKey::Enter);
        assert_eq!(
            commit,
            Some(SuggestionCommit::OpenEntity {
                id: 4,
                name: "Motorhead".to_string()
            })
        );
        assert!(!reconciler.is_open());
        assert_eq!(reconciler.selection_index(), -1);
    }

    #[test]
    fn enter_commits_tag_search() {
        let token = GenerationToken::default().next();
        let mut reconciler = SuggestionReconciler::default();
        reconciler.apply(
            FetchResponse {
                token,
                result: Ok(FetchPayload::Tags(vec!["rock".to_string()])),
            },
            token,
        );
        reconciler.on_key(SuggestionKey::Down);
        assert_eq!(
            reconciler.on_key(SuggestionKey::Enter),
            Some(SuggestionCommit::SearchTag {
                tag: "rock".to_string()
            })
        );
    }

    #[test]
    fn escape_and_blur_close_without_commit() {
        let mut reconciler = loaded(vec![hit(1, "A")]);
        reconciler.on_key(SuggestionKey::Down);
        assert_eq!(reconciler.on_key(SuggestionKey::Escape), None);
        assert!(!reconciler.is_open());

        let mut reconciler = loaded(vec![hit(1, "A")]);
        reconciler.on_key(SuggestionKey::Down);
        assert_eq!(reconciler.on_key(SuggestionKey::Blur), None);
        assert_eq!(reconciler.selection_index(), -1);
    }
}
