use std::fmt::Debug;

/// Maps a candidate label to the key used for display-level deduplication.
pub trait NormalizationPolicy: Send + Sync + Debug {
    fn display_key(&self, label: &str) -> String;
}

/// Case-folding, whitespace-collapsing policy that treats a trailing "4" as "for".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardNormalization {
    for_aliases: Vec<String>,
}

impl Default for StandardNormalization {
    fn default() -> Self {
        Self {
            for_aliases: vec!["4".to_string()],
        }
    }
}

impl StandardNormalization {
    pub fn with_aliases(for_aliases: Vec<String>) -> Self {
        Self { for_aliases }
    }
}

fn trim_trailing_symbols(value: &str) -> &str {
    value.trim_end_matches(|ch: char| !ch.is_alphanumeric())
}

impl NormalizationPolicy for StandardNormalization {
    fn display_key(&self, label: &str) -> String {
        let folded = label
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let mut tokens: Vec<String> = trim_trailing_symbols(&folded)
            .split(' ')
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();

        if tokens.len() > 1
            && let Some(last) = tokens.last_mut()
            && self.for_aliases.iter().any(|alias| alias == last)
        {
            *last = "for".to_string();
        }

        let key = trim_trailing_symbols(&tokens.join(" ")).to_string();
        if key.is_empty() { folded } else { key }
    }
}

#[cfg(test)]
mod tests {
    use super::{NormalizationPolicy, StandardNormalization};

    #[test]
    fn case_and_whitespace_are_folded() {
        let policy = StandardNormalization::default();
        assert_eq!(policy.display_key("  The   Cure "), "the cure");
        assert_eq!(policy.display_key("THE CURE"), "the cure");
    }

    #[test]
    fn trailing_punctuation_is_dropped() {
        let policy = StandardNormalization::default();
        assert_eq!(policy.display_key("Motorhead!!"), "motorhead");
        assert_eq!(policy.display_key("Motorhead."), "motorhead");
    }

    #[test]
    fn trailing_alias_folds_to_for() {
        let policy = StandardNormalization::default();
        assert_eq!(policy.display_key("Ready 4"), "ready for");
        assert_eq!(policy.display_key("ready for"), "ready for");
        assert_eq!(policy.display_key("4 Non Blondes"), "4 non blondes");
    }

    #[test]
    fn lone_alias_stays_as_is() {
        let policy = StandardNormalization::default();
        assert_eq!(policy.display_key("4"), "4");
    }

    #[test]
    fn symbol_only_label_keeps_folded_text() {
        let policy = StandardNormalization::default();
        assert_eq!(policy.display_key("!!!"), "!!!");
    }
}
