use std::collections::HashMap;

use crate::error::AppError;
use crate::models::DocumentType;

/// How a manual document type selection is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideMode {
    /// The selection is returned unchanged.
    Authoritative,
    /// The filename is still classified; the selection is only recorded.
    Advisory,
}

pub const DEFAULT_AUTHORITATIVE_TYPES: [DocumentType; 3] = [
    DocumentType::LeasingDocument,
    DocumentType::CollateralDocument,
    DocumentType::Other,
];

/// Per-type override table. Types not listed are advisory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverridePolicy {
    modes: HashMap<DocumentType, OverrideMode>,
}

impl OverridePolicy {
    pub fn with_authoritative<I>(types: I) -> Self
    where
        I: IntoIterator<Item = DocumentType>,
    {
        let mut modes: HashMap<DocumentType, OverrideMode> = DocumentType::ALL
            .iter()
            .map(|t| (*t, OverrideMode::Advisory))
            .collect();
        for t in types {
            modes.insert(t, OverrideMode::Authoritative);
        }
        Self { modes }
    }

    /// Parse a comma separated list of type codes, e.g.
    /// `leasing_document,collateral_document,other`.
    pub fn parse_list(raw: &str) -> Result<Self, AppError> {
        let mut types = Vec::new();
        for code in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let document_type = DocumentType::from_code(code).ok_or_else(|| {
                AppError::InvalidInput(format!("Unknown document type in override policy: {}", code))
            })?;
            types.push(document_type);
        }
        Ok(Self::with_authoritative(types))
    }

    pub fn mode(&self, document_type: DocumentType) -> OverrideMode {
        self.modes
            .get(&document_type)
            .copied()
            .unwrap_or(OverrideMode::Advisory)
    }

    pub fn is_authoritative(&self, document_type: DocumentType) -> bool {
        self.mode(document_type) == OverrideMode::Authoritative
    }

    /// Authoritative types in catalog order.
    pub fn authoritative_types(&self) -> Vec<DocumentType> {
        DocumentType::ALL
            .iter()
            .copied()
            .filter(|t| self.is_authoritative(*t))
            .collect()
    }
}

impl Default for OverridePolicy {
    fn default() -> Self {
        Self::with_authoritative(DEFAULT_AUTHORITATIVE_TYPES)
    }
}
