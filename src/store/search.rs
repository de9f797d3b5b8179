//! Pattern search over account identity fields and free-text terms.
//!
//! A pattern matches an account when the lowercased external id, the
//! display name, the email or any associated search term matches, all
//! case-insensitively. The matching mode decides where wildcards go.

use super::predicate::BindValue;

/// How a search pattern is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Substring match: wildcards on both sides of the pattern.
    Medial,
    /// Prefix match: wildcard at the end only.
    Prefix,
}

/// A prepared LIKE filter, built once per search call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilter {
    like: String,
}

impl SearchFilter {
    /// Build a filter for `pattern`, or `None` for the empty pattern.
    ///
    /// The empty pattern means "every member"; returning `None` lets the
    /// caller skip the OR predicate and the terms join entirely.
    pub fn for_pattern(pattern: &str, mode: MatchMode) -> Option<SearchFilter> {
        if pattern.is_empty() {
            return None;
        }

        let escaped = escape_like(&pattern.to_lowercase());
        let like = match mode {
            MatchMode::Medial => format!("%{}%", escaped),
            MatchMode::Prefix => format!("{}%", escaped),
        };

        Some(SearchFilter { like })
    }

    /// The OR clause over every searchable field. `t` is the LEFT-joined
    /// `account_terms` table; a NULL term never matches.
    pub(crate) fn fragment(&self) -> &'static str {
        "(a.lower_user_id LIKE ? ESCAPE '\\' \
         OR LOWER(a.display_name) LIKE ? ESCAPE '\\' \
         OR LOWER(a.email) LIKE ? ESCAPE '\\' \
         OR LOWER(t.term) LIKE ? ESCAPE '\\')"
    }

    pub(crate) fn push_binds(&self, binds: &mut Vec<BindValue>) {
        for _ in 0..4 {
            binds.push(BindValue::Text(self.like.clone()));
        }
    }

    #[cfg(test)]
    fn like(&self) -> &str {
        &self.like
    }
}

/// Escape LIKE metacharacters so the pattern matches literally.
fn escape_like(pattern: &str) -> String {
    pattern
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
