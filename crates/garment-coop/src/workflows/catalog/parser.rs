use serde::Deserialize;
use std::io::Read;

/// One raw catalog line together with its 1-based line number in the source.
#[derive(Debug)]
pub(crate) struct CatalogRecord {
    pub(crate) line: u64,
    pub(crate) row: CatalogRow,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<CatalogRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let row: CatalogRow = record.deserialize(Some(&headers))?;
        records.push(CatalogRecord { line, row });
    }

    Ok(records)
}

/// Column layout written by the data-preparation step. The Indonesian headers are the
/// canonical export; English aliases are accepted for hand-maintained sheets.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogRow {
    #[serde(rename = "Nama", alias = "Name")]
    pub(crate) name: String,
    #[serde(rename = "Usia", alias = "Age")]
    pub(crate) age: u32,
    #[serde(
        rename = "Jarak Rumah ke Koperasi (Km)",
        alias = "Distance (Km)",
        alias = "Home Distance (Km)"
    )]
    pub(crate) distance_km: f64,
    #[serde(
        rename = "Seragam Hem Putih (Pcs/hari)",
        alias = "White Shirt (Pcs/day)",
        default
    )]
    pub(crate) white_shirt: Option<f64>,
    #[serde(
        rename = "Seragam Hem Pramuka (Pcs/hari)",
        alias = "Scout Shirt (Pcs/day)",
        default
    )]
    pub(crate) scout_shirt: Option<f64>,
    #[serde(
        rename = "Celana Pramuka Seragam (Pcs/hari)",
        alias = "Scout Trousers (Pcs/day)",
        default
    )]
    pub(crate) scout_trousers: Option<f64>,
    #[serde(
        rename = "Rok Seragam (Pcs/hari)",
        alias = "Skirt (Pcs/day)",
        default
    )]
    pub(crate) skirt: Option<f64>,
    #[serde(
        rename = "Kemeja Kerja (Pcs/hari)",
        alias = "Work Shirt (Pcs/day)",
        default
    )]
    pub(crate) work_shirt: Option<f64>,
    #[serde(
        rename = "Custom (Sulit) (Pcs/hari)",
        alias = "Custom Difficult (Pcs/day)",
        default
    )]
    pub(crate) custom_difficult: Option<f64>,
    #[serde(rename = "Kerapian", alias = "Neatness", default)]
    pub(crate) neatness: Option<f64>,
    #[serde(rename = "Komitmen", alias = "Commitment", default)]
    pub(crate) commitment: Option<f64>,
    #[serde(rename = "Ketepatan Waktu", alias = "Punctuality", default)]
    pub(crate) punctuality: Option<f64>,
    #[serde(rename = "Spesialis", alias = "Specialty", default)]
    pub(crate) specialty: Option<String>,
}
