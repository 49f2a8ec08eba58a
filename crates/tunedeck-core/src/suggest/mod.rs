pub mod debounce;
pub mod normalize;
pub mod query;
pub mod reconcile;

pub use debounce::{FetchTicket, GenerationToken, InputOutcome, SuggestionDebouncer};
pub use normalize::{NormalizationPolicy, StandardNormalization};
pub use query::{QueryClassifier, SuggestionMode, SuggestionQuery};
pub use reconcile::{
    ApplyOutcome, Candidate, FetchPayload, FetchResponse, SuggestionCommit, SuggestionKey,
    SuggestionReconciler,
};
