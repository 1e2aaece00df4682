use semsearch_common::{Result, SemSearchError};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::model::CompanyRecord;

/// Load and validate company records from a catalog CSV file.
///
/// Expected headers: `name,symbol,sector,description`. Missing sector or
/// description fields become empty strings; rows without a symbol or name
/// are dropped with a warning. Duplicate symbols keep the last occurrence.
pub fn load_companies(path: &Path) -> Result<Vec<CompanyRecord>> {
    info!("Loading company catalog from {}", path.display());

    let file = std::fs::File::open(path).map_err(|e| {
        SemSearchError::catalog(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let companies = read_companies(file)?;
    info!("Loaded {} companies from catalog", companies.len());
    Ok(companies)
}

/// Parse company records from any CSV reader
pub fn read_companies<R: Read>(reader: R) -> Result<Vec<CompanyRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut companies: Vec<CompanyRecord> = Vec::new();
    // symbol -> position in `companies`, so later rows replace earlier ones
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0usize;

    for (row, result) in csv_reader.deserialize::<CompanyRecord>().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping malformed CSV row {}: {}", row + 2, e);
                dropped += 1;
                continue;
            }
        };

        if !record.is_valid() {
            warn!(
                "Skipping CSV row {} with missing symbol or name",
                row + 2
            );
            dropped += 1;
            continue;
        }

        match positions.get(&record.symbol) {
            Some(&pos) => {
                warn!("Duplicate symbol {} in catalog, keeping last row", record.symbol);
                companies[pos] = record;
            }
            None => {
                positions.insert(record.symbol.clone(), companies.len());
                companies.push(record);
            }
        }
    }

    if dropped > 0 {
        warn!("Dropped {} invalid catalog rows", dropped);
    }

    if companies.is_empty() {
        return Err(SemSearchError::catalog("Catalog contains no valid rows"));
    }

    Ok(companies)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
name,symbol,sector,description
NVIDIA Corporation,NVDA,Information Technology,Designs GPUs for gaming and AI computing
Microsoft Corporation,MSFT,Information Technology,Develops Windows Azure and Xbox
Tesla Inc.,TSLA,Consumer Discretionary,Electric vehicles and energy storage
";

    #[test]
    fn test_read_companies() {
        let companies = read_companies(CSV.as_bytes()).unwrap();
        assert_eq!(companies.len(), 3);
        assert_eq!(companies[0].symbol, "NVDA");
        assert_eq!(companies[2].name, "Tesla Inc.");
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let csv = "name,symbol,sector,description\nAcme Corp,ACME,,\n";
        let companies = read_companies(csv.as_bytes()).unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].sector, "");
        assert_eq!(companies[0].description, "");
    }

    #[test]
    fn test_rows_without_symbol_are_dropped() {
        let csv = "name,symbol,sector,description\n\
            Acme Corp,ACME,Industrials,Widgets\n\
            No Symbol Inc,,Industrials,Missing ticker\n";
        let companies = read_companies(csv.as_bytes()).unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].symbol, "ACME");
    }

    #[test]
    fn test_duplicate_symbol_keeps_last() {
        let csv = "name,symbol,sector,description\n\
            Acme Corp,ACME,Industrials,Old description\n\
            Acme Corporation,ACME,Industrials,New description\n";
        let companies = read_companies(csv.as_bytes()).unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Acme Corporation");
        assert_eq!(companies[0].description, "New description");
    }

    #[test]
    fn test_empty_catalog_is_error() {
        let csv = "name,symbol,sector,description\n";
        assert!(read_companies(csv.as_bytes()).is_err());
    }
}
