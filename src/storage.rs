use rust_xlsxwriter::Workbook;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::constants::{CSV_COLUMNS, MENU_COLUMN, NOT_AVAILABLE};
use crate::error::Result;
use crate::metrics;
use crate::types::BreweryRecord;

/// Read a previously written record set.
pub fn load_records(path: &Path) -> Result<Vec<BreweryRecord>> {
    let content = fs::read_to_string(path)?;
    let records: Vec<BreweryRecord> = serde_json::from_str(&content)?;
    info!("Loaded {} breweries from {}", records.len(), path.display());
    Ok(records)
}

/// Write the records as a JSON array indented by four spaces. Output is
/// UTF-8 with non-ASCII text and forward slashes left unescaped.
pub fn save_json(path: &Path, records: &[BreweryRecord]) -> Result<()> {
    ensure_parent(path)?;

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;

    fs::write(path, buf)?;
    metrics::records_written("json", records.len());
    info!("Data successfully saved to {}", path.display());
    Ok(())
}

/// Write the records as a flat CSV table. List fields are stored as JSON
/// array text; the `menu_url` column only appears once some record has one.
pub fn save_csv(path: &Path, records: &[BreweryRecord]) -> Result<()> {
    ensure_parent(path)?;

    let with_menu = records.iter().any(BreweryRecord::has_menu_url);
    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<&str> = CSV_COLUMNS.to_vec();
    if with_menu {
        header.push(MENU_COLUMN);
    }
    writer.write_record(&header)?;

    for record in records {
        let mut row = csv_row(record)?;
        if with_menu {
            row.push(
                record
                    .menu_url
                    .as_ref()
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;

    metrics::records_written("csv", records.len());
    info!("Data also saved to {}", path.display());
    Ok(())
}

/// Write the same table as `save_csv` to a single-sheet workbook.
pub fn save_xlsx(path: &Path, records: &[BreweryRecord]) -> Result<()> {
    ensure_parent(path)?;

    let with_menu = records.iter().any(BreweryRecord::has_menu_url);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let mut header: Vec<&str> = CSV_COLUMNS.to_vec();
    if with_menu {
        header.push(MENU_COLUMN);
    }
    for (col, title) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *title)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        let mut cells = csv_row(record)?;
        if with_menu {
            cells.push(
                record
                    .menu_url
                    .as_ref()
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            );
        }
        for (col, value) in cells.iter().enumerate() {
            sheet.write_string(row, col as u16, value.as_str())?;
        }
    }

    workbook.save(path)?;
    metrics::records_written("xlsx", records.len());
    info!("Data also saved to {}", path.display());
    Ok(())
}

fn csv_row(record: &BreweryRecord) -> Result<Vec<String>> {
    let or_na = |value: &Option<String>| value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let social_media = if record.social_media.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        serde_json::to_string(&record.social_media)?
    };

    Ok(vec![
        record.name.clone(),
        or_na(&record.city),
        serde_json::to_string(&record.brewery_type)?,
        or_na(&record.url),
        or_na(&record.address),
        or_na(&record.postal_code),
        record.state_province.clone(),
        record.country.clone(),
        or_na(&record.phone),
        or_na(&record.website_url),
        social_media,
    ])
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DetailInfo, ListingEntry, MenuUrl};
    use tempfile::tempdir;

    fn record(name: &str) -> BreweryRecord {
        BreweryRecord::from_parts(
            ListingEntry {
                name: name.into(),
                city: Some("Québec Street".into()),
                brewery_type: vec!["Brewery".into(), "Taproom".into()],
                url: Some("https://bcaletrail.ca/breweries/x/".into()),
            },
            DetailInfo {
                address: Some("1 Main St".into()),
                postal_code: None,
                phone: Some("6045551234".into()),
                website_url: None,
                social_media: vec!["https://facebook.com/x".into()],
            },
        )
    }

    #[test]
    fn json_is_four_space_indented_and_unescaped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        save_json(&path, &[record("Brasserie Été")]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n    {\n        \"name\": \"Brasserie Été\""));
        assert!(text.contains("https://bcaletrail.ca/breweries/x/"));
        assert!(text.contains("\"postal_code\": \"N/A\""));
        assert!(!text.contains("\\/"));
    }

    #[test]
    fn csv_has_flat_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        save_csv(&path, &[record("A"), record("B")]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_COLUMNS.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "A");
        assert_eq!(&rows[0][2], r#"["Brewery","Taproom"]"#);
        assert_eq!(&rows[0][5], "N/A");
        assert_eq!(&rows[1][8], "6045551234");
    }

    #[test]
    fn csv_adds_menu_column_when_present() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menus.csv");
        let records = vec![
            record("A").with_menu_url(MenuUrl::Found("https://untappd.com/a".into())),
            record("B"),
        ];
        save_csv(&path, &records).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().get(11), Some("menu_url"));
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][11], "https://untappd.com/a");
        assert_eq!(&rows[1][11], "");
    }

    #[test]
    fn xlsx_is_written_as_a_workbook() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheets").join("out.xlsx");
        let records = vec![
            record("A").with_menu_url(MenuUrl::NotFound),
            record("B"),
        ];
        save_xlsx(&path, &records).unwrap();

        let bytes = fs::read(&path).unwrap();
        // xlsx files are zip archives
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_records(&dir.path().join("absent.json")).is_err());
    }
}
