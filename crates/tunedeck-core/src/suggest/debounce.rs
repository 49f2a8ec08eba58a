use std::time::{Duration, Instant};

use super::query::{QueryClassifier, SuggestionMode, SuggestionQuery};

pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(250);

/// Monotonic request generation. Only the response carrying the latest token is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GenerationToken(u64);

impl GenerationToken {
    pub fn value(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub token: GenerationToken,
    pub query: SuggestionQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Scheduled { due: Instant },
    Cleared,
}

/// Coalesces keystrokes into at most one fetch per quiet interval.
#[derive(Debug)]
pub struct SuggestionDebouncer {
    classifier: QueryClassifier,
    quiet: Duration,
    scheduled: Option<(SuggestionQuery, Instant)>,
    latest: GenerationToken,
}

impl Default for SuggestionDebouncer {
    fn default() -> Self {
        Self::new(QueryClassifier::default(), DEFAULT_QUIET_INTERVAL)
    }
}

impl SuggestionDebouncer {
    pub fn new(classifier: QueryClassifier, quiet: Duration) -> Self {
        Self {
            classifier,
            quiet,
            scheduled: None,
            latest: GenerationToken::default(),
        }
    }

    /// Restarts the quiet window. Input below the threshold clears instead and
    /// invalidates anything already in flight.
    pub fn on_input(&mut self, raw: &str, now: Instant) -> InputOutcome {
        let query = self.classifier.classify(raw);
        if query.mode == SuggestionMode::None {
            self.scheduled = None;
            self.invalidate();
            return InputOutcome::Cleared;
        }

        let due = now + self.quiet;
        self.scheduled = Some((query, due));
        InputOutcome::Scheduled { due }
    }

    /// Emits the scheduled fetch once its quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<FetchTicket> {
        let due = self.scheduled.as_ref().map(|(_, due)| *due)?;
        if now < due {
            return None;
        }

        let (query, _) = self.scheduled.take()?;
        self.latest = self.latest.next();
        tracing::trace!(token = self.latest.value(), mode = ?query.mode, "suggestion fetch due");
        Some(FetchTicket {
            token: self.latest,
            query,
        })
    }

    pub fn classify(&self, raw: &str) -> SuggestionQuery {
        self.classifier.classify(raw)
    }

    pub fn is_current(&self, token: GenerationToken) -> bool {
        token == self.latest
    }

    pub fn latest(&self) -> GenerationToken {
        self.latest
    }

    /// Makes every outstanding ticket stale.
    pub fn invalidate(&mut self) {
        self.latest = self.latest.next();
    }

    pub fn cancel(&mut self) {
        self.scheduled = None;
        self.invalidate();
    }

    pub fn has_pending(&self) -> bool {
        self.scheduled.is_some()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.scheduled.as_ref().map(|(_, due)| *due)
    }
}
