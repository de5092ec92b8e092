/// How vocabulary entries are compared against field text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Whole text equals an entry
    Exact,
    /// Lowercased text contains an entry
    ContainsLowercase,
}

/// A closed set of known free-text values for one field.
///
/// Text matching the vocabulary collapses to a sentinel; anything else must
/// parse or the value is reported as unrecognized.
#[derive(Debug, Clone, Copy)]
pub struct Vocabulary {
    pub field: &'static str,
    pub rule: MatchRule,
    pub entries: &'static [&'static str],
}

/// Free text that matched neither the vocabulary nor the field's format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub value: String,
}

impl Vocabulary {
    pub const fn exact(field: &'static str, entries: &'static [&'static str]) -> Self {
        Self {
            field,
            rule: MatchRule::Exact,
            entries,
        }
    }

    pub const fn contains(field: &'static str, entries: &'static [&'static str]) -> Self {
        Self {
            field,
            rule: MatchRule::ContainsLowercase,
            entries,
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        match self.rule {
            MatchRule::Exact => self.entries.contains(&text),
            MatchRule::ContainsLowercase => {
                let lowered = text.to_lowercase();
                self.entries.iter().any(|e| lowered.contains(e))
            }
        }
    }

    pub fn classify_or_fail<T, F>(&self, text: &str, sentinel: T, parse: F) -> Result<T, FieldError>
    where
        F: FnOnce(&str) -> Option<T>,
    {
        if self.matches(text) {
            return Ok(sentinel);
        }
        parse(text).ok_or_else(|| FieldError {
            field: self.field,
            value: text.to_string(),
        })
    }
}
