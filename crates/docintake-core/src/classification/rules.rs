//! Ordered filename rule table used by the classifier.

use crate::models::DocumentType;

/// Lowercased filename in the two forms keywords are matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    lower: String,
    normalized: String,
}

impl NormalizedName {
    pub fn new(filename: &str) -> Self {
        let lower = filename.trim().to_lowercase();
        let normalized = normalize(&lower);
        Self { lower, normalized }
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// `-` and whitespace become `_` so "business plan", "business-plan" and
/// "business_plan" compare equal.
fn normalize(lower: &str) -> String {
    lower
        .chars()
        .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Case-insensitive substring match against any keyword of a list.
#[derive(Debug, Clone)]
pub struct KeywordPredicate {
    keywords: Vec<(String, String)>,
}

impl KeywordPredicate {
    pub fn any_of(keywords: &[&str]) -> Self {
        let keywords = keywords
            .iter()
            .map(|k| {
                let lower = k.to_lowercase();
                let normalized = normalize(&lower);
                (lower, normalized)
            })
            .collect();
        Self { keywords }
    }

    pub fn matches(&self, name: &NormalizedName) -> bool {
        self.keywords.iter().any(|(lower, normalized)| {
            name.lower().contains(lower.as_str())
                || name.normalized().contains(normalized.as_str())
        })
    }
}

/// What a matching rule resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Fixed(DocumentType),
    /// `current` when the fiscal year hint equals the current calendar year,
    /// `other` otherwise (including no hint).
    ByFiscalYear {
        current: DocumentType,
        other: DocumentType,
    },
}

impl RuleOutcome {
    pub fn resolve(&self, fiscal_year: Option<i32>, current_year: i32) -> DocumentType {
        match *self {
            RuleOutcome::Fixed(document_type) => document_type,
            RuleOutcome::ByFiscalYear { current, other } => {
                if fiscal_year == Some(current_year) {
                    current
                } else {
                    other
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pub name: &'static str,
    pub predicate: KeywordPredicate,
    pub outcome: RuleOutcome,
}

impl ClassificationRule {
    pub fn new(name: &'static str, keywords: &[&str], outcome: RuleOutcome) -> Self {
        Self {
            name,
            predicate: KeywordPredicate::any_of(keywords),
            outcome,
        }
    }
}

const LEASING_KEYWORDS: &[&str] = &[
    // Finnish electronics / hardware retailers
    "verkkokauppa",
    "gigantti",
    "power.fi",
    "jimms",
    "proshop",
    "motonet",
    "k-rauta",
    "bauhaus",
    "quote",
    "tarjous",
    "offert",
    "leasing",
    "rahoitusleasing",
    "kaivinkone",
    "trukki",
    "traktori",
    "excavator",
    "forklift",
    "tractor",
    "machine",
    "equipment",
    "vehicle",
];

const COLLATERAL_KEYWORDS: &[&str] = &[
    "collateral",
    "mortgage",
    "pledge",
    "valuation",
    "vakuus",
    "kiinnitys",
    "pantti",
    "panttikirja",
    "arviokirja",
    "säkerhet",
    "pantbrev",
    "värdering",
];

const PURCHASE_KEYWORDS: &[&str] = &[
    "receipt",
    "invoice",
    "order",
    "kuitti",
    "lasku",
    "tilaus",
    "kvitto",
    "faktura",
    "beställning",
];

const ANNUAL_STATEMENT_KEYWORDS: &[&str] = &[
    "tilinpäätös",
    "tilinpaatos",
    "financial_statements",
    "financial statements",
    "annual_report",
    "annual report",
    "vuosikertomus",
    "bokslut",
    "årsredovisning",
    "arsredovisning",
];

const INTERIM_KEYWORDS: &[&str] = &[
    "osavuosikatsaus",
    "puolivuosikatsaus",
    "interim",
    "delårsrapport",
    "delarsrapport",
    "half_year",
    "quarterly",
    "kvartalsrapport",
];

const INCOME_BALANCE_KEYWORDS: &[&str] = &[
    "tuloslaskelma",
    "tase",
    "balance",
    "income",
    "profit",
    "resultaträkning",
    "resultatrakning",
    "balansräkning",
    "balansrakning",
];

const FORECAST_KEYWORDS: &[&str] = &[
    "ennuste",
    "forecast",
    "budjetti",
    "budget",
    "prognos",
    "projection",
];

const BUSINESS_PLAN_KEYWORDS: &[&str] = &[
    "liiketoimintasuunnitelma",
    "business_plan",
    "business plan",
    "businessplan",
    "affärsplan",
    "affarsplan",
    "pitch",
];

/// Built-in rule table. Order is significant: the first match wins.
pub fn default_rules() -> Vec<ClassificationRule> {
    vec![
        ClassificationRule::new(
            "leasing_offer",
            LEASING_KEYWORDS,
            RuleOutcome::Fixed(DocumentType::LeasingDocument),
        ),
        ClassificationRule::new(
            "collateral",
            COLLATERAL_KEYWORDS,
            RuleOutcome::Fixed(DocumentType::CollateralDocument),
        ),
        ClassificationRule::new(
            "purchase_receipt",
            PURCHASE_KEYWORDS,
            RuleOutcome::Fixed(DocumentType::LeasingDocument),
        ),
        ClassificationRule::new(
            "annual_statement",
            ANNUAL_STATEMENT_KEYWORDS,
            RuleOutcome::Fixed(DocumentType::FinancialStatements),
        ),
        ClassificationRule::new(
            "interim_statement",
            INTERIM_KEYWORDS,
            RuleOutcome::Fixed(DocumentType::BalanceIncomeInterim),
        ),
        ClassificationRule::new(
            "income_balance",
            INCOME_BALANCE_KEYWORDS,
            RuleOutcome::ByFiscalYear {
                current: DocumentType::BalanceIncomeInterim,
                other: DocumentType::FinancialStatements,
            },
        ),
        ClassificationRule::new(
            "forecast",
            FORECAST_KEYWORDS,
            RuleOutcome::Fixed(DocumentType::Forecast),
        ),
        ClassificationRule::new(
            "business_plan",
            BUSINESS_PLAN_KEYWORDS,
            RuleOutcome::Fixed(DocumentType::BusinessPlan),
        ),
    ]
}
