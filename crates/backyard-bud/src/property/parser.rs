use super::{PropertyDirectoryError, PropertyRecord};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use tracing::warn;

const SQUARE_METRES_PER_HECTARE: f64 = 10_000.0;

#[derive(Debug, Deserialize)]
struct PropertyRow {
    property_number: String,
    #[serde(default)]
    house_number: String,
    #[serde(default)]
    street_name: String,
    #[serde(default)]
    street_suffix: String,
    #[serde(default)]
    suburb: String,
    #[serde(default)]
    post_code: String,
    short_address: String,
    zone_type: String,
    #[serde(default)]
    zone_description: String,
    area_total: f64,
    #[serde(default)]
    area_units: String,
    #[serde(deserialize_with = "flag")]
    heritage_overlay: bool,
    #[serde(deserialize_with = "flag")]
    flood_overlay: bool,
    #[serde(deserialize_with = "flag")]
    bushfire_prone: bool,
    #[serde(deserialize_with = "flag")]
    has_environmental_overlay: bool,
    #[serde(deserialize_with = "flag")]
    has_easement: bool,
}

pub(crate) fn parse_properties<R: Read>(reader: R) -> Result<Vec<PropertyRecord>, PropertyDirectoryError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<PropertyRow>().enumerate() {
        // Header is line 1, so data rows start at line 2.
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(err) if is_row_error(&err) => {
                warn!(line, error = %err, "skipping malformed property row");
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let Some(area_total) = area_in_square_metres(row.area_total, &row.area_units) else {
            warn!(
                line,
                property_number = %row.property_number,
                area = %format!("{} {}", row.area_total, row.area_units),
                "skipping property with invalid lot area"
            );
            continue;
        };

        records.push(PropertyRecord {
            property_number: row.property_number,
            house_number: row.house_number,
            street_name: row.street_name,
            street_suffix: row.street_suffix,
            suburb: row.suburb,
            post_code: row.post_code,
            short_address: row.short_address,
            zone_type: row.zone_type.to_ascii_uppercase(),
            zone_description: row.zone_description,
            area_total,
            heritage_overlay: row.heritage_overlay,
            flood_overlay: row.flood_overlay,
            bushfire_prone: row.bushfire_prone,
            has_environmental_overlay: row.has_environmental_overlay,
            has_easement: row.has_easement,
        });
    }

    Ok(records)
}

/// Bad values on one row; anything else (io, encoding) spoils the whole table.
fn is_row_error(err: &csv::Error) -> bool {
    matches!(
        err.kind(),
        csv::ErrorKind::Deserialize { .. } | csv::ErrorKind::UnequalLengths { .. }
    )
}

/// Hectare units (`h²`, `ha`) are converted; anything else is taken as square metres.
fn area_in_square_metres(value: f64, units: &str) -> Option<f64> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    match units.trim().to_ascii_lowercase().as_str() {
        "h²" | "h2" | "ha" | "hectares" => Some(value * SQUARE_METRES_PER_HECTARE),
        _ => Some(value),
    }
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!("invalid boolean flag `{other}`"))),
    }
}
