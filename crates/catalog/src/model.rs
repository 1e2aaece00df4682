use serde::{Deserialize, Serialize};

/// A single company from the catalog CSV
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyRecord {
    /// Stock ticker symbol (stable unique identifier)
    pub symbol: String,

    /// Company name
    pub name: String,

    /// Sector classification
    #[serde(default)]
    pub sector: String,

    /// Free-text business description
    #[serde(default)]
    pub description: String,
}

impl CompanyRecord {
    /// Create new company record
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        sector: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            sector: sector.into(),
            description: description.into(),
        }
    }

    /// Composite text used for embedding: name, sector, description in
    /// fixed order. Never exposed to API callers.
    pub fn combined_text(&self) -> String {
        [&self.name, &self.sector, &self.description]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// A record is usable when it carries an identifier and a name
    pub fn is_valid(&self) -> bool {
        !self.symbol.trim().is_empty() && !self.name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_text_order() {
        let record = CompanyRecord::new(
            "NVDA",
            "NVIDIA Corporation",
            "Information Technology",
            "Designs GPUs for gaming and AI computing",
        );
        assert_eq!(
            record.combined_text(),
            "NVIDIA Corporation Information Technology Designs GPUs for gaming and AI computing"
        );
    }

    #[test]
    fn test_combined_text_skips_empty_fields() {
        let record = CompanyRecord::new("TSLA", "Tesla Inc.", "", "  ");
        assert_eq!(record.combined_text(), "Tesla Inc.");
    }

    #[test]
    fn test_is_valid() {
        assert!(CompanyRecord::new("MSFT", "Microsoft", "IT", "Software").is_valid());
        assert!(!CompanyRecord::new("", "Microsoft", "IT", "Software").is_valid());
        assert!(!CompanyRecord::new("MSFT", "   ", "IT", "Software").is_valid());
    }
}
