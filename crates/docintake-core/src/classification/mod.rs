//! Filename-based document type classification.
//!
//! The classifier is pure: it looks only at the filename, an optional fiscal
//! year hint and an optional manual selection, and always yields a catalog
//! tag. Rules are evaluated in order and the first match wins; a name that
//! matches nothing is treated as a financial statement.

mod policy;
mod rules;

pub use policy::{OverrideMode, OverridePolicy, DEFAULT_AUTHORITATIVE_TYPES};
pub use rules::{
    default_rules, ClassificationRule, KeywordPredicate, NormalizedName, RuleOutcome,
};

use chrono::{Datelike, Utc};
use std::sync::OnceLock;

use crate::models::DocumentType;

pub const MANUAL_OVERRIDE_RULE: &str = "manual_override";
pub const FALLBACK_RULE: &str = "fallback";
pub const FALLBACK_TYPE: DocumentType = DocumentType::FinancialStatements;

/// Result of a classification, with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub document_type: DocumentType,
    /// True when an authoritative manual selection decided the type.
    pub manual_override_applied: bool,
    pub rule: &'static str,
}

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<ClassificationRule>,
    policy: OverridePolicy,
}

impl Classifier {
    pub fn new(policy: OverridePolicy) -> Self {
        Self {
            rules: default_rules(),
            policy,
        }
    }

    /// Append a rule after the built-in ones (still ahead of the fallback).
    pub fn with_rule(mut self, rule: ClassificationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn policy(&self) -> &OverridePolicy {
        &self.policy
    }

    pub fn classify(
        &self,
        filename: &str,
        fiscal_year: Option<i32>,
        manual_override: Option<&str>,
    ) -> DocumentType {
        self.classify_detailed(filename, fiscal_year, manual_override)
            .document_type
    }

    pub fn classify_at(
        &self,
        filename: &str,
        fiscal_year: Option<i32>,
        manual_override: Option<&str>,
        current_year: i32,
    ) -> DocumentType {
        self.classify_detailed_at(filename, fiscal_year, manual_override, current_year)
            .document_type
    }

    pub fn classify_detailed(
        &self,
        filename: &str,
        fiscal_year: Option<i32>,
        manual_override: Option<&str>,
    ) -> Classification {
        self.classify_detailed_at(filename, fiscal_year, manual_override, Utc::now().year())
    }

    pub fn classify_detailed_at(
        &self,
        filename: &str,
        fiscal_year: Option<i32>,
        manual_override: Option<&str>,
        current_year: i32,
    ) -> Classification {
        // Unknown manual strings are ignored; advisory ones fall through.
        if let Some(selected) = manual_override.and_then(DocumentType::from_code) {
            if self.policy.is_authoritative(selected) {
                return Classification {
                    document_type: selected,
                    manual_override_applied: true,
                    rule: MANUAL_OVERRIDE_RULE,
                };
            }
        }

        let name = NormalizedName::new(filename);
        self.rules
            .iter()
            .find(|rule| rule.predicate.matches(&name))
            .map(|rule| Classification {
                document_type: rule.outcome.resolve(fiscal_year, current_year),
                manual_override_applied: false,
                rule: rule.name,
            })
            .unwrap_or(Classification {
                document_type: FALLBACK_TYPE,
                manual_override_applied: false,
                rule: FALLBACK_RULE,
            })
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(OverridePolicy::default())
    }
}

fn default_classifier() -> &'static Classifier {
    static CLASSIFIER: OnceLock<Classifier> = OnceLock::new();
    CLASSIFIER.get_or_init(Classifier::default)
}

/// Classify with the built-in rules and the default override policy.
pub fn classify(
    filename: &str,
    fiscal_year: Option<i32>,
    manual_override: Option<&str>,
) -> DocumentType {
    default_classifier().classify(filename, fiscal_year, manual_override)
}

pub fn classify_at(
    filename: &str,
    fiscal_year: Option<i32>,
    manual_override: Option<&str>,
    current_year: i32,
) -> DocumentType {
    default_classifier().classify_at(filename, fiscal_year, manual_override, current_year)
}

pub fn classify_detailed(
    filename: &str,
    fiscal_year: Option<i32>,
    manual_override: Option<&str>,
) -> Classification {
    default_classifier().classify_detailed(filename, fiscal_year, manual_override)
}
