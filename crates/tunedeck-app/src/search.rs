use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

use tunedeck_core::navigation::{NavigationTarget, SearchKind, SearchRequest};
use tunedeck_core::services::{ServiceError, SuggestionService};
use tunedeck_core::suggest::{
    Candidate, FetchPayload, FetchResponse, FetchTicket, GenerationToken, InputOutcome,
    SuggestionCommit, SuggestionDebouncer, SuggestionKey, SuggestionMode, SuggestionQuery,
    SuggestionReconciler,
};

/// Dispatches one suggestion fetch and hands back the channel its response arrives on.
pub trait SuggestionFetcher: Send + Sync {
    fn spawn_fetch(&self, ticket: FetchTicket) -> Receiver<FetchResponse>;
}

pub fn fetch_payload(
    service: &dyn SuggestionService,
    query: &SuggestionQuery,
    entity_limit: usize,
    tag_limit: usize,
) -> Result<FetchPayload, ServiceError> {
    match query.mode {
        SuggestionMode::Entity => service
            .search_entities(&query.text, entity_limit, 0)
            .map(FetchPayload::Entities),
        SuggestionMode::Tag => service
            .search_tags(&query.text, tag_limit)
            .map(FetchPayload::Tags),
        SuggestionMode::None => Ok(FetchPayload::Entities(Vec::new())),
    }
}

pub struct ThreadedFetcher {
    service: Arc<dyn SuggestionService>,
    entity_limit: usize,
    tag_limit: usize,
}

impl ThreadedFetcher {
    pub fn new(service: Arc<dyn SuggestionService>, entity_limit: usize, tag_limit: usize) -> Self {
        Self {
            service,
            entity_limit,
            tag_limit,
        }
    }
}

impl SuggestionFetcher for ThreadedFetcher {
    fn spawn_fetch(&self, ticket: FetchTicket) -> Receiver<FetchResponse> {
        let (tx, rx) = mpsc::channel::<FetchResponse>();
        let service = Arc::clone(&self.service);
        let entity_limit = self.entity_limit;
        let tag_limit = self.tag_limit;

        thread::spawn(move || {
            let result = fetch_payload(service.as_ref(), &ticket.query, entity_limit, tag_limit);
            let _ = tx.send(FetchResponse {
                token: ticket.token,
                result,
            });
        });

        rx
    }
}

pub fn commit_target(commit: SuggestionCommit) -> NavigationTarget {
    match commit {
        SuggestionCommit::SearchTag { tag } => NavigationTarget::Search(SearchRequest {
            text: tag,
            kind: SearchKind::Tag,
        }),
        SuggestionCommit::OpenEntity { id, name } => NavigationTarget::Entity {
            id,
            name_hint: name,
        },
    }
}

/// Typeahead search control: query text, debounced fetches and the reconciled list.
pub struct SearchBox {
    query: String,
    debouncer: SuggestionDebouncer,
    reconciler: SuggestionReconciler,
    fetcher: Arc<dyn SuggestionFetcher>,
    in_flight: Vec<(GenerationToken, Receiver<FetchResponse>)>,
}

impl SearchBox {
    pub fn new(
        debouncer: SuggestionDebouncer,
        reconciler: SuggestionReconciler,
        fetcher: Arc<dyn SuggestionFetcher>,
    ) -> Self {
        Self {
            query: String::new(),
            debouncer,
            reconciler,
            fetcher,
            in_flight: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, text: &str, now: Instant) {
        self.query = text.to_string();
        if self.debouncer.on_input(text, now) == InputOutcome::Cleared {
            self.reconciler.clear();
            self.in_flight.clear();
        }
    }

    /// Fires a due fetch and applies whatever responses have arrived. Returns whether the list changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if let Some(ticket) = self.debouncer.poll(now) {
            let token = ticket.token;
            let rx = self.fetcher.spawn_fetch(ticket);
            self.in_flight.push((token, rx));
        }

        let latest = self.debouncer.latest();
        let debouncer = &self.debouncer;
        let reconciler = &mut self.reconciler;
        let mut changed = false;

        self.in_flight.retain(|(token, rx)| {
            if !debouncer.is_current(*token) {
                return false;
            }

            match rx.try_recv() {
                Ok(response) => {
                    reconciler.apply(response, latest);
                    changed = true;
                    false
                }
                Err(TryRecvError::Empty) => true,
                Err(TryRecvError::Disconnected) => {
                    reconciler.apply(
                        FetchResponse {
                            token: *token,
                            result: Err(ServiceError::Network {
                                message: "suggestion worker stopped without a response"
                                    .to_string(),
                            }),
                        },
                        latest,
                    );
                    changed = true;
                    false
                }
            }
        });

        changed
    }

    /// Handles list navigation keys. Returns where to go when something was committed.
    pub fn on_key(&mut self, key: SuggestionKey) -> Option<NavigationTarget> {
        match key {
            SuggestionKey::Up | SuggestionKey::Down => {
                self.reconciler.on_key(key);
                None
            }
            SuggestionKey::Escape | SuggestionKey::Blur => {
                self.abandon();
                self.reconciler.on_key(key);
                None
            }
            SuggestionKey::Enter => {
                if let Some(commit) = self.reconciler.on_key(key) {
                    self.reset();
                    return Some(commit_target(commit));
                }

                if self.reconciler.selected().is_some() || self.query.trim().is_empty() {
                    return None;
                }

                let target = self.keyword_target();
                self.reset();
                Some(target)
            }
        }
    }

    fn keyword_target(&self) -> NavigationTarget {
        let trimmed = self.query.trim();
        let classified = self.debouncer.classify(trimmed);
        let request = if classified.mode == SuggestionMode::Tag {
            SearchRequest {
                text: classified.text,
                kind: SearchKind::Tag,
            }
        } else {
            SearchRequest {
                text: trimmed.to_string(),
                kind: SearchKind::Keyword,
            }
        };
        NavigationTarget::Search(request)
    }

    fn abandon(&mut self) {
        self.debouncer.cancel();
        self.in_flight.clear();
    }

    fn reset(&mut self) {
        self.query.clear();
        self.abandon();
        self.reconciler.clear();
    }

    pub fn teardown(&mut self) {
        self.reset();
    }

    pub fn is_fetching(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn has_pending(&self) -> bool {
        self.debouncer.has_pending()
    }

    pub fn items(&self) -> &[Candidate] {
        self.reconciler.items()
    }

    pub fn selected(&self) -> Option<usize> {
        self.reconciler.selected()
    }

    pub fn mode(&self) -> SuggestionMode {
        self.reconciler.mode()
    }

    pub fn is_open(&self) -> bool {
        self.reconciler.is_open()
    }
}
