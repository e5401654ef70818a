//! Tabular ingestion of locations, parcels, supplies, collection assignments
//! and crop pattern directives.
//!
//! Every loader accepts a DataFrame whose columns may be strings or already
//! typed; values are normalized to trimmed strings and parsed per row so that
//! errors can name the offending column and row.

use std::path::Path;
use std::str::FromStr;

use polars::prelude::*;
use tracing::{info, warn};

use crate::collection::{CollectionPartType, CollectionType, LocationCollection};
use crate::dataset::Dataset;
use crate::error::CdsError;
use crate::location::DirectiveKind;
use crate::parcel::Parcel;
use crate::schema::{collection, directive, location, parcel, supply};
use crate::supply::{IncludeStatus, PartIdType, Supply};

/// Read a CSV file with all columns as String dtype.
/// Trims whitespace from column names.
pub fn read_csv_as_strings(path: &Path) -> Result<DataFrame, CdsError> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;
    Ok(df)
}

pub fn load_locations(dataset: &mut Dataset, df: &DataFrame) -> Result<(), CdsError> {
    require_columns(df, &[location::LOCATION_ID])?;
    let df = normalize(
        df,
        &[location::LOCATION_ID, location::NAME, location::GROUNDWATER_ONLY],
    )?;

    let ids = required(location::LOCATION_ID, text_column(&df, location::LOCATION_ID)?)?;
    let names = text_column(&df, location::NAME)?;
    let groundwater_only = text_column(&df, location::GROUNDWATER_ONLY)?;

    for (row, id) in ids.iter().enumerate() {
        let flag = match groundwater_only[row].as_deref() {
            Some(value) => parse_flag(location::GROUNDWATER_ONLY, row, value)?,
            None => false,
        };
        let loc = dataset.location_or_insert(id);
        loc.name = names[row].clone();
        loc.set_groundwater_only(flag);
    }

    info!(rows = df.height(), "loaded locations");
    Ok(())
}

pub fn load_parcels(dataset: &mut Dataset, df: &DataFrame) -> Result<(), CdsError> {
    require_columns(df, &[parcel::LOCATION_ID, parcel::PARCEL_ID, parcel::YEAR])?;
    let df = normalize(
        df,
        &[
            parcel::LOCATION_ID,
            parcel::PARCEL_ID,
            parcel::YEAR,
            parcel::DIVISION,
            parcel::WATER_DISTRICT,
            parcel::CROP,
            parcel::AREA,
            parcel::AREA_UNITS,
            parcel::IRRIGATION_METHOD,
        ],
    )?;

    let location_ids = required(parcel::LOCATION_ID, text_column(&df, parcel::LOCATION_ID)?)?;
    let parcel_ids = required(parcel::PARCEL_ID, parsed_column::<i64>(&df, parcel::PARCEL_ID)?)?;
    let years = required(parcel::YEAR, parsed_column::<i32>(&df, parcel::YEAR)?)?;
    let divisions = parsed_column::<i32>(&df, parcel::DIVISION)?;
    let districts = parsed_column::<i32>(&df, parcel::WATER_DISTRICT)?;
    let crops = text_column(&df, parcel::CROP)?;
    let areas = parsed_column::<f64>(&df, parcel::AREA)?;
    let area_units = text_column(&df, parcel::AREA_UNITS)?;
    let methods = text_column(&df, parcel::IRRIGATION_METHOD)?;

    for row in 0..df.height() {
        let loc = dataset.location_or_insert(&location_ids[row]);
        if loc.parcel_mut(parcel_ids[row], years[row]).is_some() {
            return Err(CdsError::InvalidData(format!(
                "Duplicate parcel {} ({}) for location {} at row {row}",
                parcel_ids[row], years[row], location_ids[row]
            )));
        }
        let area = areas[row].unwrap_or_else(|| {
            warn!(
                row,
                parcel_id = parcel_ids[row],
                year = years[row],
                "parcel has no area, using 0"
            );
            0.0
        });
        let mut p = Parcel::new(parcel_ids[row], years[row], area);
        p.division = divisions[row];
        p.water_district = districts[row];
        p.crop = crops[row].clone();
        p.area_units = area_units[row].clone();
        p.irrigation_method = methods[row].clone();
        loc.add_parcel(p);
    }

    info!(rows = df.height(), "loaded parcels");
    Ok(())
}

pub fn load_supplies(dataset: &mut Dataset, df: &DataFrame) -> Result<(), CdsError> {
    require_columns(
        df,
        &[
            supply::LOCATION_ID,
            supply::PARCEL_ID,
            supply::YEAR,
            supply::SUPPLY_ID,
            supply::KIND,
        ],
    )?;
    let df = normalize(
        df,
        &[
            supply::LOCATION_ID,
            supply::PARCEL_ID,
            supply::YEAR,
            supply::SUPPLY_ID,
            supply::KIND,
            supply::PART_ID_TYPE,
            supply::AMOUNT,
            supply::PERCENT_IRRIG,
            supply::INCLUDE_IN_CDS,
        ],
    )?;

    let location_ids = required(supply::LOCATION_ID, text_column(&df, supply::LOCATION_ID)?)?;
    let parcel_ids = required(supply::PARCEL_ID, parsed_column::<i64>(&df, supply::PARCEL_ID)?)?;
    let years = required(supply::YEAR, parsed_column::<i32>(&df, supply::YEAR)?)?;
    let supply_ids = required(supply::SUPPLY_ID, text_column(&df, supply::SUPPLY_ID)?)?;
    let kinds = required(supply::KIND, text_column(&df, supply::KIND)?)?;
    let part_id_types = parsed_column::<PartIdType>(&df, supply::PART_ID_TYPE)?;
    let amounts = parsed_column::<f64>(&df, supply::AMOUNT)?;
    let fractions = parsed_column::<f64>(&df, supply::PERCENT_IRRIG)?;
    let statuses = parsed_column::<IncludeStatus>(&df, supply::INCLUDE_IN_CDS)?;

    for row in 0..df.height() {
        let mut s = match kinds[row].to_ascii_lowercase().as_str() {
            "surface" | "sw" | "surface_water" => {
                let mut s = Supply::surface_water(supply_ids[row].clone(), fractions[row]);
                if let Some(t) = part_id_types[row] {
                    s.part_id_type = t;
                }
                s
            }
            "groundwater" | "gw" | "ground_water" => {
                if fractions[row].is_some() {
                    warn!(
                        row,
                        supply_id = %supply_ids[row],
                        "percent irrigated ignored for groundwater supply"
                    );
                }
                Supply::ground_water(
                    supply_ids[row].clone(),
                    part_id_types[row].unwrap_or(PartIdType::Well),
                )
            }
            other => {
                return Err(CdsError::InvalidData(format!(
                    "Column '{}' row {row}: invalid supply kind '{other}'. \
                     Must be 'surface' or 'groundwater'",
                    supply::KIND
                )))
            }
        };
        s.amount = amounts[row];
        s.include_in_cds = statuses[row].unwrap_or_default();

        let p = dataset
            .parcel_mut(&location_ids[row], parcel_ids[row], years[row])
            .ok_or_else(|| {
                CdsError::InvalidData(format!(
                    "Supply {} at row {row} refers to parcel {} ({}) of location {} which is \
                     not loaded",
                    supply_ids[row], parcel_ids[row], years[row], location_ids[row]
                ))
            })?;
        p.add_supply(s);
    }

    info!(rows = df.height(), "loaded supplies");
    Ok(())
}

/// One row per part membership; rows for the same location build its
/// collection in row order.
pub fn load_collections(dataset: &mut Dataset, df: &DataFrame) -> Result<(), CdsError> {
    require_columns(
        df,
        &[
            collection::LOCATION_ID,
            collection::COLLECTION_TYPE,
            collection::PART_TYPE,
            collection::PART_ID,
        ],
    )?;
    let df = normalize(
        df,
        &[
            collection::LOCATION_ID,
            collection::COLLECTION_TYPE,
            collection::PART_TYPE,
            collection::PART_ID_TYPE,
            collection::DIVISION,
            collection::YEAR,
            collection::PART_ID,
        ],
    )?;

    let location_ids = required(
        collection::LOCATION_ID,
        text_column(&df, collection::LOCATION_ID)?,
    )?;
    let collection_types = required(
        collection::COLLECTION_TYPE,
        parsed_column::<CollectionType>(&df, collection::COLLECTION_TYPE)?,
    )?;
    let part_types = required(
        collection::PART_TYPE,
        parsed_column::<CollectionPartType>(&df, collection::PART_TYPE)?,
    )?;
    let part_id_types = parsed_column::<PartIdType>(&df, collection::PART_ID_TYPE)?;
    let divisions = parsed_column::<i32>(&df, collection::DIVISION)?;
    let years = parsed_column::<i32>(&df, collection::YEAR)?;
    let part_ids = required(collection::PART_ID, text_column(&df, collection::PART_ID)?)?;

    for row in 0..df.height() {
        let location_id = &location_ids[row];
        let (collection_type, part_type) = (collection_types[row], part_types[row]);
        let loc = dataset.location_or_insert(location_id);
        if loc.collection().is_none() {
            loc.set_collection(LocationCollection::new(collection_type, part_type));
        }
        let Some(c) = loc.collection_mut() else {
            continue;
        };
        if c.collection_type() != collection_type || c.part_type() != part_type {
            return Err(CdsError::InvalidData(format!(
                "Location {location_id} row {row}: collection {collection_type}/{part_type} \
                 conflicts with {}/{}",
                c.collection_type(),
                c.part_type()
            )));
        }

        if let Some(part_id_type) = part_id_types[row] {
            if part_type == CollectionPartType::Well {
                c.set_part_id_type(part_id_type);
            } else {
                warn!(
                    location_id = %location_id,
                    row,
                    "part id type is only used for well collections, ignored"
                );
            }
        }

        if let Some(division) = divisions[row] {
            match c.division() {
                Some(existing) if existing != division => {
                    return Err(CdsError::InvalidData(format!(
                        "Location {location_id} row {row}: division {division} conflicts with \
                         {existing}"
                    )))
                }
                _ => c.set_division(division),
            }
        }

        let year = match (years[row], part_type.is_year_keyed()) {
            (Some(year), _) => year,
            (None, false) => 0,
            (None, true) => {
                return Err(CdsError::InvalidData(format!(
                    "Column '{}' row {row} is empty but {part_type} collections are year keyed",
                    collection::YEAR
                )))
            }
        };
        c.push_part(year, part_ids[row].clone());
    }

    info!(rows = df.height(), "loaded collections");
    Ok(())
}

pub fn load_directives(dataset: &mut Dataset, df: &DataFrame) -> Result<(), CdsError> {
    require_columns(
        df,
        &[directive::LOCATION_ID, directive::DIRECTIVE, directive::YEAR],
    )?;
    let df = normalize(
        df,
        &[directive::LOCATION_ID, directive::DIRECTIVE, directive::YEAR],
    )?;

    let location_ids = required(directive::LOCATION_ID, text_column(&df, directive::LOCATION_ID)?)?;
    let kinds = required(
        directive::DIRECTIVE,
        parsed_column::<DirectiveKind>(&df, directive::DIRECTIVE)?,
    )?;
    let years = required(directive::YEAR, parsed_column::<i32>(&df, directive::YEAR)?)?;

    for row in 0..df.height() {
        dataset
            .location_or_insert(&location_ids[row])
            .add_directive(kinds[row], years[row]);
    }

    info!(rows = df.height(), "loaded directives");
    Ok(())
}

// ── Private helpers ─────────────────────────────────────────────────────────

fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), CdsError> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(CdsError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

/// Cast the present columns to trimmed strings.
fn normalize(df: &DataFrame, columns: &[&str]) -> Result<DataFrame, CdsError> {
    let schema = df.schema();
    let exprs: Vec<Expr> = columns
        .iter()
        .filter(|name| schema.contains(name))
        .map(|name| {
            col(*name)
                .cast(DataType::String)
                .str()
                .strip_chars(lit(" \t\r\n"))
        })
        .collect();
    if exprs.is_empty() {
        return Ok(df.clone());
    }
    Ok(df.clone().lazy().with_columns(exprs).collect()?)
}

/// String values of a column, empty cells as `None`. An absent column reads
/// as all `None`.
fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, CdsError> {
    if !df.schema().contains(name) {
        return Ok(vec![None; df.height()]);
    }
    Ok(df
        .column(name)?
        .str()?
        .into_iter()
        .map(|v| v.filter(|s| !s.is_empty()).map(str::to_string))
        .collect())
}

fn parsed_column<T: FromStr>(df: &DataFrame, name: &str) -> Result<Vec<Option<T>>, CdsError> {
    text_column(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            None => Ok(None),
            Some(s) => s.parse::<T>().map(Some).map_err(|_| {
                CdsError::InvalidData(format!("Column '{name}' row {row}: cannot parse '{s}'"))
            }),
        })
        .collect()
}

fn required<T>(name: &str, values: Vec<Option<T>>) -> Result<Vec<T>, CdsError> {
    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| CdsError::InvalidData(format!("Column '{name}' row {row} is empty")))
        })
        .collect()
}

fn parse_flag(name: &str, row: usize, value: &str) -> Result<bool, CdsError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        other => Err(CdsError::InvalidData(format!(
            "Column '{name}' row {row}: invalid flag '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_column_treats_blank_as_missing() {
        let df = df!("name" => &["  a ", "", "b"]).unwrap();
        let df = normalize(&df, &["name"]).unwrap();
        assert_eq!(
            text_column(&df, "name").unwrap(),
            vec![Some("a".to_string()), None, Some("b".to_string())]
        );
        assert_eq!(text_column(&df, "absent").unwrap(), vec![None, None, None]);
    }

    #[test]
    fn parse_errors_name_column_and_row() {
        let df = df!("year" => &["2010", "20x0"]).unwrap();
        let err = parsed_column::<i32>(&df, "year").unwrap_err();
        assert_eq!(
            err.to_string(),
            "InvalidData: Column 'year' row 1: cannot parse '20x0'"
        );
    }

    #[test]
    fn numeric_columns_are_accepted() {
        let df = df!("area" => &[12.5f64, 3.0]).unwrap();
        let df = normalize(&df, &["area"]).unwrap();
        assert_eq!(
            parsed_column::<f64>(&df, "area").unwrap(),
            vec![Some(12.5), Some(3.0)]
        );
    }

    #[test]
    fn missing_required_column() {
        let df = df!("location_id" => &["0100501"]).unwrap();
        let mut ds = Dataset::new();
        let err = load_parcels(&mut ds, &df).unwrap_err();
        assert!(matches!(err, CdsError::MissingColumn(c) if c == parcel::PARCEL_ID));
    }

    #[test]
    fn flags_parse() {
        assert!(parse_flag("f", 0, "Yes").unwrap());
        assert!(!parse_flag("f", 0, "0").unwrap());
        assert!(parse_flag("f", 0, "maybe").is_err());
    }
}
