pub const DEFAULT_TAG_MARKER: char = '#';
pub const DEFAULT_MIN_ENTITY_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionMode {
    None,
    Tag,
    Entity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionQuery {
    pub mode: SuggestionMode,
    pub text: String,
}

impl SuggestionQuery {
    pub fn none() -> Self {
        Self {
            mode: SuggestionMode::None,
            text: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryClassifier {
    tag_marker: char,
    min_entity_chars: usize,
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_TAG_MARKER, DEFAULT_MIN_ENTITY_CHARS)
    }
}

impl QueryClassifier {
    pub fn new(tag_marker: char, min_entity_chars: usize) -> Self {
        Self {
            tag_marker,
            min_entity_chars,
        }
    }

    pub fn classify(&self, raw: &str) -> SuggestionQuery {
        let trimmed = raw.trim();

        if let Some(rest) = trimmed.strip_prefix(self.tag_marker) {
            return SuggestionQuery {
                mode: SuggestionMode::Tag,
                text: rest.trim().to_string(),
            };
        }

        if trimmed.chars().count() >= self.min_entity_chars {
            return SuggestionQuery {
                mode: SuggestionMode::Entity,
                text: trimmed.to_string(),
            };
        }

        SuggestionQuery::none()
    }
}
