//! Tabular persistence for extracted records.
//!
//! Thin collaborator outside the extraction core. Always produces an output
//! artifact: an empty record set still yields a header-only CSV.

use crate::error::Result;
use crate::extract::ProductRecord;
use std::fs;
use std::path::Path;
use tracing::info;

const HEADER: [&str; 3] = ["name", "attributes", "price"];

/// Write records to a CSV file at `path`, creating parent directories as
/// needed. The header row is written even when `records` is empty.
pub fn write_csv(records: &[ProductRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record([&record.name, &record.attributes, &record.price])?;
    }
    writer.flush()?;

    info!(count = records.len(), path = %path.display(), "records written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, attributes: &str, price: &str) -> ProductRecord {
        ProductRecord {
            name: name.into(),
            attributes: attributes.into(),
            price: price.into(),
        }
    }

    #[test]
    fn writes_rows_after_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        let records = vec![
            record("Laptop X", "8GB RAM, 256GB SSD", "199 999 Ft"),
            record("Laptop Y", "", "149 999 Ft"),
        ];

        write_csv(&records, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "name,attributes,price");
        assert!(lines[1].contains("Laptop X"));
        // the joined attribute field contains a comma, so it must be quoted
        assert!(lines[1].contains("\"8GB RAM, 256GB SSD\""));
        assert_eq!(lines[2], "Laptop Y,,149 999 Ft");
    }

    #[test]
    fn empty_input_still_produces_header_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/products.csv");

        write_csv(&[], &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim(), "name,attributes,price");
    }
}
