//! Keyword classification of located expressions.
//!
//! Classification is an ordered rule table evaluated top to bottom; the first
//! rule whose keyword appears (case-insensitively, as a substring) in the
//! text decides the category. Exam keywords sit above "project", so a span
//! mentioning both is an exam.

use crate::event::EventCategory;

/// One row of the classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    /// Lowercase keywords; any one of them matches.
    pub keywords: &'static [&'static str],
    /// The category assigned on a match.
    pub category: EventCategory,
}

impl CategoryRule {
    /// Returns true if any keyword occurs in `lowercase_text`.
    fn matches(&self, lowercase_text: &str) -> bool {
        self.keywords.iter().any(|kw| lowercase_text.contains(kw))
    }
}

/// The default rule table.
pub const DEFAULT_RULES: &[CategoryRule] = &[
    CategoryRule {
        keywords: &["exam", "midterm", "final"],
        category: EventCategory::Exam,
    },
    CategoryRule {
        keywords: &["project"],
        category: EventCategory::Project,
    },
];

/// Classifies `text` with [`DEFAULT_RULES`].
pub fn classify(text: &str) -> EventCategory {
    classify_with(DEFAULT_RULES, text)
}

/// Classifies `text` with a custom rule table.
///
/// Falls back to [`EventCategory::Assignment`] when no rule matches.
pub fn classify_with(rules: &[CategoryRule], text: &str) -> EventCategory {
    let lower = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.category)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exam_keywords() {
        assert_eq!(classify("Midterm exam on 10/15 at 2pm"), EventCategory::Exam);
        assert_eq!(classify("FINAL on Dec 12"), EventCategory::Exam);
        assert_eq!(classify("Exam 2"), EventCategory::Exam);
    }

    #[test]
    fn project_keyword() {
        assert_eq!(classify("Project proposal due 11/01"), EventCategory::Project);
        assert_eq!(classify("Group PROJECT demo"), EventCategory::Project);
    }

    #[test]
    fn exam_wins_over_project() {
        assert_eq!(classify("midterm project presentation"), EventCategory::Exam);
        assert_eq!(classify("Project review before the final"), EventCategory::Exam);
    }

    #[test]
    fn default_is_assignment() {
        assert_eq!(classify("Homework 3 due Friday"), EventCategory::Assignment);
        assert_eq!(classify(""), EventCategory::Assignment);
    }

    #[test]
    fn substring_semantics() {
        // "finalize" carries "final".
        assert_eq!(classify("Finalize reading list"), EventCategory::Exam);
        assert_eq!(classify("Projector setup"), EventCategory::Project);
    }

    #[test]
    fn custom_table() {
        const RULES: &[CategoryRule] = &[CategoryRule {
            keywords: &["quiz"],
            category: EventCategory::Exam,
        }];
        assert_eq!(classify_with(RULES, "Pop quiz"), EventCategory::Exam);
        assert_eq!(classify_with(RULES, "Midterm"), EventCategory::Assignment);
        assert_eq!(classify_with(&[], "Midterm"), EventCategory::Assignment);
    }
}
