//! CSV listing import used to seed a marketplace.
//!
//! Expected header: `title,address,city,state,zip_code,price,bedrooms,
//! bathrooms,square_feet,lot_size,year_built,property_type,status,features,
//! image_url,description`. `features` is `;`-separated. Blank optional cells
//! are `None`; a blank description is derived from type and location.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{PropertyDraft, PropertyStatus};
use super::service::check_draft;
use super::validation::ValidationReport;

#[derive(Debug, thiserror::Error)]
pub enum ListingImportError {
    #[error("failed to read listing export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid listing CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unknown status '{value}'")]
    Status { row: usize, value: String },
    #[error("row {row}: {report}")]
    Invalid {
        row: usize,
        report: ValidationReport,
    },
}

pub struct ListingImporter;

impl ListingImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<PropertyDraft>, ListingImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parses and validates every row; the first bad row aborts the import.
    /// Row numbers count data rows from 1.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<PropertyDraft>, ListingImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut drafts = Vec::new();
        for (index, record) in csv_reader.deserialize::<ListingRow>().enumerate() {
            let row = index + 1;
            let draft = record?.into_draft(row)?;
            check_draft(&draft)
                .map_err(|report| ListingImportError::Invalid { row, report })?;
            drafts.push(draft);
        }

        Ok(drafts)
    }
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    title: String,
    address: String,
    city: String,
    state: String,
    zip_code: String,
    price: u64,
    bedrooms: u32,
    bathrooms: f64,
    square_feet: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    lot_size: Option<String>,
    year_built: u16,
    property_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    features: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    image_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
}

impl ListingRow {
    fn into_draft(self, row: usize) -> Result<PropertyDraft, ListingImportError> {
        let status = match self.status {
            Some(value) => value
                .parse::<PropertyStatus>()
                .map_err(|_| ListingImportError::Status { row, value })?,
            None => PropertyStatus::default(),
        };

        let features = self
            .features
            .map(|raw| {
                raw.split(';')
                    .map(str::trim)
                    .filter(|feature| !feature.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let description = self
            .description
            .unwrap_or_else(|| format!("{} in {}, {}", self.property_type, self.city, self.state));

        Ok(PropertyDraft {
            title: self.title,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            price: self.price,
            description,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            square_feet: self.square_feet,
            lot_size: self.lot_size,
            year_built: self.year_built,
            property_type: self.property_type,
            status,
            features,
            image_url: self.image_url,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
