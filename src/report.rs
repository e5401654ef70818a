use polars::prelude::*;

use crate::dataset::CropPatternRow;
use crate::error::CdsError;
use crate::schema::{crop_pattern, problem};
use crate::validation::ValidationResult;

/// One row per problem, in the order the problems were found.
pub fn problems_frame(result: &ValidationResult) -> Result<DataFrame, CdsError> {
    let n = result.len();
    let mut severities = Vec::with_capacity(n);
    let mut kinds = Vec::with_capacity(n);
    let mut location_ids: Vec<Option<String>> = Vec::with_capacity(n);
    let mut years: Vec<Option<i32>> = Vec::with_capacity(n);
    let mut parcel_ids: Vec<Option<i64>> = Vec::with_capacity(n);
    let mut supply_ids: Vec<Option<String>> = Vec::with_capacity(n);
    let mut messages = Vec::with_capacity(n);
    let mut recommendations = Vec::with_capacity(n);

    for p in result.problems() {
        severities.push(p.severity.as_str());
        kinds.push(p.kind.as_str());
        location_ids.push(p.source.location_id().map(str::to_string));
        years.push(p.source.year());
        parcel_ids.push(p.source.parcel_id());
        supply_ids.push(p.source.supply_id().map(str::to_string));
        messages.push(p.message.clone());
        recommendations.push(p.recommendation.clone());
    }

    let df = DataFrame::new(vec![
        Column::new(problem::SEVERITY.into(), &severities),
        Column::new(problem::KIND.into(), &kinds),
        Column::new(problem::LOCATION_ID.into(), &location_ids),
        Column::new(problem::YEAR.into(), &years),
        Column::new(problem::PARCEL_ID.into(), &parcel_ids),
        Column::new(problem::SUPPLY_ID.into(), &supply_ids),
        Column::new(problem::MESSAGE.into(), &messages),
        Column::new(problem::RECOMMENDATION.into(), &recommendations),
    ])?;
    Ok(df)
}

pub fn crop_pattern_frame(rows: &[CropPatternRow]) -> Result<DataFrame, CdsError> {
    let location_ids: Vec<&str> = rows.iter().map(|r| r.location_id.as_str()).collect();
    let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    let crops: Vec<&str> = rows.iter().map(|r| r.crop.as_str()).collect();
    let areas: Vec<f64> = rows.iter().map(|r| r.area).collect();

    let df = DataFrame::new(vec![
        Column::new(crop_pattern::LOCATION_ID.into(), &location_ids),
        Column::new(crop_pattern::YEAR.into(), &years),
        Column::new(crop_pattern::CROP.into(), &crops),
        Column::new(crop_pattern::AREA.into(), &areas),
    ])?;
    Ok(df)
}
