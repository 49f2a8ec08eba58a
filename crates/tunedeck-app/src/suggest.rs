use anyhow::{Context, Result};
use tunedeck_core::suggest::reconcile::{reconcile_entities, reconcile_tags};
use tunedeck_core::suggest::{
    Candidate, FetchPayload, StandardNormalization, SuggestionMode, SuggestionQuery,
};

use crate::App;
use crate::search::fetch_payload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestOutcome {
    pub query: SuggestionQuery,
    pub candidates: Vec<Candidate>,
}

impl<'a> App<'a> {
    /// Classifies and resolves one query synchronously, without debouncing.
    pub fn suggest_once(&self, raw: &str) -> Result<SuggestOutcome> {
        let query = self.config.classifier().classify(raw);
        if query.mode == SuggestionMode::None {
            return Ok(SuggestOutcome {
                query,
                candidates: Vec::new(),
            });
        }

        let payload = fetch_payload(
            self.suggestions.as_ref(),
            &query,
            self.config.search.entity_fetch_limit,
            self.config.search.tag_fetch_limit,
        )
        .with_context(|| format!("failed to fetch suggestions for '{}'", query.text))?;

        let candidates = match payload {
            FetchPayload::Entities(hits) => reconcile_entities(
                hits,
                &StandardNormalization::default(),
                self.config.search.entity_cap,
            ),
            FetchPayload::Tags(tags) => reconcile_tags(tags, self.config.search.tag_cap),
        };

        Ok(SuggestOutcome { query, candidates })
    }
}
