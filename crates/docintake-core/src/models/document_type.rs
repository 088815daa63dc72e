use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Document type tag.
///
/// The string codes are stable: they are the primary key of the
/// `document_types` catalog table and appear in API payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    FinancialStatements,
    BalanceIncomeInterim,
    Forecast,
    BusinessPlan,
    LeasingDocument,
    CollateralDocument,
    TaxReturn,
    CompanyRegistration,
    Other,
}

impl DocumentType {
    pub const ALL: [DocumentType; 9] = [
        DocumentType::FinancialStatements,
        DocumentType::BalanceIncomeInterim,
        DocumentType::Forecast,
        DocumentType::BusinessPlan,
        DocumentType::LeasingDocument,
        DocumentType::CollateralDocument,
        DocumentType::TaxReturn,
        DocumentType::CompanyRegistration,
        DocumentType::Other,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DocumentType::FinancialStatements => "financial_statements",
            DocumentType::BalanceIncomeInterim => "balance_income_interim",
            DocumentType::Forecast => "forecast",
            DocumentType::BusinessPlan => "business_plan",
            DocumentType::LeasingDocument => "leasing_document",
            DocumentType::CollateralDocument => "collateral_document",
            DocumentType::TaxReturn => "tax_return",
            DocumentType::CompanyRegistration => "company_registration",
            DocumentType::Other => "other",
        }
    }

    /// Lenient lookup used for manual selections coming from form fields.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.code().eq_ignore_ascii_case(code))
    }
}

impl FromStr for DocumentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| anyhow::anyhow!("Unknown document type: {}", s))
    }
}

impl Display for DocumentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.code())
    }
}

/// Row of the `document_types` lookup table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DocumentTypeEntry {
    pub id: Uuid,
    pub code: String,
    pub name_fi: String,
    pub name_sv: String,
    pub name_en: String,
    pub sort_order: i32,
}

impl DocumentTypeEntry {
    pub fn document_type(&self) -> Option<DocumentType> {
        DocumentType::from_code(&self.code)
    }

    pub fn localized_name(&self, locale: super::Locale) -> &str {
        match locale {
            super::Locale::Fi => &self.name_fi,
            super::Locale::Sv => &self.name_sv,
            super::Locale::En => &self.name_en,
        }
    }
}
