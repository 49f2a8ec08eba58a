use std::sync::Arc;

use tunedeck_core::config::TunedeckConfig;
use tunedeck_core::services::{ConfigService, SuggestionService};
use tunedeck_core::suggest::{
    StandardNormalization, SuggestionDebouncer, SuggestionReconciler,
};

mod backends;
mod editor;
mod search;
mod show;
mod suggest;

pub use backends::LocalBackends;
pub use editor::{EditorNotice, EditorSession};
pub use search::{SearchBox, SuggestionFetcher, ThreadedFetcher, commit_target, fetch_payload};
pub use show::{SettingRow, ValueSource, render_value};
pub use suggest::SuggestOutcome;

pub struct App<'a> {
    pub config: TunedeckConfig,
    pub settings: &'a dyn ConfigService,
    pub suggestions: Arc<dyn SuggestionService>,
}

impl<'a> App<'a> {
    pub fn new(
        config: TunedeckConfig,
        settings: &'a dyn ConfigService,
        suggestions: Arc<dyn SuggestionService>,
    ) -> Self {
        Self {
            config,
            settings,
            suggestions,
        }
    }

    pub fn new_editor(&self) -> EditorSession {
        EditorSession::new(self.config.settle_delay())
    }

    pub fn new_search_box(&self) -> SearchBox {
        let fetcher = ThreadedFetcher::new(
            Arc::clone(&self.suggestions),
            self.config.search.entity_fetch_limit,
            self.config.search.tag_fetch_limit,
        );
        self.search_box_with(Arc::new(fetcher))
    }

    pub fn search_box_with(&self, fetcher: Arc<dyn SuggestionFetcher>) -> SearchBox {
        let debouncer =
            SuggestionDebouncer::new(self.config.classifier(), self.config.quiet_interval());
        let reconciler = SuggestionReconciler::new(
            Box::new(StandardNormalization::default()),
            self.config.search.entity_cap,
            self.config.search.tag_cap,
        );
        SearchBox::new(debouncer, reconciler, fetcher)
    }
}
