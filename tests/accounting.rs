//! Supply accounting and validation over in-memory data sets.
//!
//! Run: cargo test --test accounting

use float_cmp::approx_eq;

use _core::validation::format_fixed;
use _core::{
    CdsError, CollectionPartType, CollectionType, CuLocation, Dataset, LocationCollection,
    Parcel, ParcelValidator, PartIdType, ProblemKind, Severity, Supply, SupplyFractionCalculator,
    ValidationConfig,
};

fn surface_parcel(area: f64, fractions: &[f64]) -> Parcel {
    let mut parcel = Parcel::new(1042, 2010, area).with_division(1);
    for (i, f) in fractions.iter().enumerate() {
        parcel.add_supply(Supply::surface_water(format!("010050{i}"), Some(*f)));
    }
    parcel
}

// ---------------------------------------------------------------------------
// Fraction calculation
// ---------------------------------------------------------------------------

#[test]
fn groundwater_split_evenly_across_claiming_locations() {
    let n = 4;
    let mut ds = Dataset::new();
    for i in 0..n {
        ds.add_location(
            CuLocation::new(format!("01_ADW{i:03}")).with_parcel(
                Parcel::new(77, 2005, 100.0)
                    .with_division(1)
                    .with_supply(Supply::ground_water("0105001", PartIdType::Well)),
            ),
        );
    }
    ds.recompute_fractions().unwrap();

    let fractions: Vec<f64> = ds
        .locations()
        .iter()
        .map(|l| l.parcels()[0].supplies()[0].area_irrig_fraction())
        .collect();
    for f in &fractions {
        assert!(approx_eq!(f64, *f, 1.0 / n as f64, ulps = 2));
    }
    let total: f64 = fractions.iter().sum();
    assert_eq!(format_fixed(total, 3), "1.000");
}

#[test]
fn diversion_and_well_scales_groundwater_by_surface_fraction() {
    let mut ds = Dataset::new();
    for id in ["0100501", "0100502"] {
        ds.add_location(
            CuLocation::new(id).with_parcel(
                Parcel::new(77, 2005, 80.0)
                    .with_division(1)
                    .with_supply(Supply::surface_water(id, Some(0.5)))
                    .with_supply(Supply::ground_water("0105001", PartIdType::Well)),
            ),
        );
    }
    ds.recompute_fractions().unwrap();

    for location in ds.locations() {
        let gw = location.parcels()[0]
            .ground_water_supplies()
            .next()
            .unwrap();
        assert_eq!(gw.area_irrig_fraction(), 0.25);
        assert_eq!(gw.area_irrig(), 20.0);
    }
}

#[test]
fn same_parcel_number_in_other_division_is_a_different_parcel() {
    let mut ds = Dataset::new();
    for division in [1, 2] {
        ds.add_location(
            CuLocation::new(format!("0{division}_AWP001")).with_parcel(
                Parcel::new(77, 2010, 60.0)
                    .with_division(division)
                    .with_supply(Supply::ground_water("0105001", PartIdType::Well)),
            ),
        );
    }
    ds.recompute_fractions().unwrap();

    for location in ds.locations() {
        let gw = &location.parcels()[0].supplies()[0];
        assert_eq!(gw.area_irrig_fraction(), 1.0);
        assert_eq!(gw.area_irrig(), 60.0);
    }
}

#[test]
fn surface_only_location_does_not_claim_groundwater() {
    let mut ds = Dataset::new();
    ds.add_location(
        CuLocation::new("0100501").with_parcel(
            Parcel::new(77, 2010, 80.0)
                .with_division(1)
                .with_supply(Supply::surface_water("0100501", Some(0.5)))
                .with_supply(Supply::ground_water("0105001", PartIdType::Well)),
        ),
    );
    ds.add_location(
        CuLocation::new("0100502").with_parcel(
            Parcel::new(77, 2010, 80.0)
                .with_division(1)
                .with_supply(Supply::surface_water("0100502", Some(0.5))),
        ),
    );
    ds.recompute_fractions().unwrap();

    let dw = &ds.location("0100501").unwrap().parcels()[0];
    let gw = dw.ground_water_supplies().next().unwrap();
    assert_eq!(gw.area_irrig_fraction(), 0.5);
    assert_eq!(gw.area_irrig(), 40.0);

    let surface_only = &ds.location("0100502").unwrap().parcels()[0];
    assert_eq!(surface_only.ground_water_supply_count(), 0);
    assert_eq!(surface_only.supplies()[0].area_irrig(), 40.0);
}

#[test]
fn surface_area_round_trip_has_no_area_mismatch() {
    let mut parcel = surface_parcel(100.0, &[0.5, 0.3, 0.2]);
    parcel.recompute(0).unwrap();

    let areas: Vec<f64> = parcel.supplies().iter().map(|s| s.area_irrig()).collect();
    assert!(approx_eq!(f64, areas[0], 50.0, epsilon = 1e-9));
    assert!(approx_eq!(f64, areas[1], 30.0, epsilon = 1e-9));
    assert!(approx_eq!(f64, areas[2], 20.0, epsilon = 1e-9));

    let loc = CuLocation::new("0100501").with_parcel(parcel);
    let result = ParcelValidator::new(3).validate_component(&loc);
    assert_eq!(result.of_kind(ProblemKind::AreaMismatch).count(), 0);
}

#[test]
fn surface_area_shortfall_is_one_mismatch() {
    let mut parcel = surface_parcel(100.0, &[0.5, 0.3, 0.1]);
    parcel.recompute(0).unwrap();
    let loc = CuLocation::new("0100501").with_parcel(parcel);

    let result = ParcelValidator::new(3).validate_component(&loc);
    let mismatches: Vec<_> = result.of_kind(ProblemKind::AreaMismatch).collect();
    assert_eq!(mismatches.len(), 1);
    let p = mismatches[0];
    assert_eq!(p.severity, Severity::Error);
    assert_eq!(p.source.location_id(), Some("0100501"));
    assert_eq!(p.source.parcel_id(), Some(1042));
    assert!(p.message.contains("0100501"));
    assert!(p.message.contains("1042"));
    assert!(p.message.contains("90.000"));
}

#[test]
fn recompute_is_idempotent() {
    let mut parcel = surface_parcel(123.456, &[0.7, 0.3]);
    parcel.add_supply(Supply::ground_water("0105001", PartIdType::Well));

    SupplyFractionCalculator::compute(&mut parcel, 3).unwrap();
    let first: Vec<(u64, u64)> = parcel
        .supplies()
        .iter()
        .map(|s| (s.area_irrig().to_bits(), s.area_irrig_fraction().to_bits()))
        .collect();

    SupplyFractionCalculator::compute(&mut parcel, 3).unwrap();
    let second: Vec<(u64, u64)> = parcel
        .supplies()
        .iter()
        .map(|s| (s.area_irrig().to_bits(), s.area_irrig_fraction().to_bits()))
        .collect();

    assert_eq!(first, second);
}

#[test]
fn missing_percent_irrigated_stops_recompute() {
    let mut ds = Dataset::new();
    ds.add_location(
        CuLocation::new("0100501")
            .with_parcel(Parcel::new(1, 2010, 10.0).with_supply(Supply::surface_water("0100501", None))),
    );
    let err = ds.recompute_fractions().unwrap_err();
    assert!(matches!(err, CdsError::InsufficientData(_)));
}

#[test]
fn failed_recompute_leaves_earlier_locations_untouched() {
    let mut ds = Dataset::new();
    ds.add_location(
        CuLocation::new("0100501")
            .with_parcel(Parcel::new(1, 2010, 10.0).with_supply(Supply::surface_water("0100501", Some(1.0)))),
    );
    ds.add_location(
        CuLocation::new("0100502")
            .with_parcel(Parcel::new(2, 2010, 10.0).with_supply(Supply::surface_water("0100502", None))),
    );
    let err = ds.recompute_fractions().unwrap_err();
    assert!(matches!(err, CdsError::InsufficientData(_)));

    let untouched = &ds.location("0100501").unwrap().parcels()[0].supplies()[0];
    assert_eq!(untouched.area_irrig_fraction(), 0.0);
    assert_eq!(untouched.area_irrig(), 0.0);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn dataset_with_divisions(divisions: &[i32]) -> Dataset {
    let mut ds = Dataset::new();
    for (i, division) in divisions.iter().enumerate() {
        let mut parcel = Parcel::new(i as i64, 2010, 10.0)
            .with_division(*division)
            .with_supply(Supply::surface_water("0100501", Some(1.0)));
        parcel.recompute(0).unwrap();
        ds.add_location(CuLocation::new(format!("LOC{i}")).with_parcel(parcel));
    }
    ds
}

#[test]
fn single_division_is_clean() {
    let ds = dataset_with_divisions(&[1, 1, 1]);
    let result = ParcelValidator::new(3).validate_all_component_data(ds.locations());
    assert!(result.is_empty());
}

#[test]
fn mixed_divisions_warn_once_naming_each() {
    let ds = dataset_with_divisions(&[1, 2]);
    let result = ParcelValidator::new(3).validate_all_component_data(ds.locations());

    assert_eq!(result.len(), 1);
    let p = &result.problems()[0];
    assert_eq!(p.kind, ProblemKind::DivisionMixed);
    assert_eq!(p.severity, Severity::Warning);
    assert!(p.recommendation.contains('1'));
    assert!(p.recommendation.contains('2'));
}

#[test]
fn groundwater_only_location_skips_parcels_with_surface_supply() {
    let mut parcel = Parcel::new(5, 2010, 100.0)
        .with_division(1)
        .with_supply(Supply::ground_water("0105001", PartIdType::Well))
        .with_supply(Supply::surface_water("0100501", Some(0.3)));
    parcel.recompute(1).unwrap();
    assert_ne!(format_fixed(parcel.surface_water_area_irrig(), 3), "100.000");

    let loc = CuLocation::new("01_AWP001")
        .with_groundwater_only(true)
        .with_parcel(parcel);
    let result = ParcelValidator::new(3).validate_component(&loc);
    assert_eq!(result.of_kind(ProblemKind::AreaMismatch).count(), 0);
    assert!(result.is_empty());
}

#[test]
fn dataset_validation_runs_division_pass_first() {
    let mut ds = dataset_with_divisions(&[1, 2]);
    ds.add_location(CuLocation::new("EMPTY").with_parcel(Parcel::new(99, 2010, 5.0).with_division(1)));

    let result = ds.validate(&ValidationConfig::default());
    let kinds: Vec<_> = result.problems().iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ProblemKind::DivisionMixed,
            ProblemKind::NoSupply,
            ProblemKind::LocationUnsupplied,
            ProblemKind::InclusionUnknown,
            ProblemKind::InclusionUnknown,
        ]
    );
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[test]
fn collection_resolution_by_part_type() {
    let mut ditches = LocationCollection::new(CollectionType::Aggregate, CollectionPartType::Ditch);
    ditches.push_part(0, "0100501");
    ditches.push_part(0, "0100502");
    assert_eq!(ditches.parts_for_year(1956).unwrap().len(), 2);
    assert_eq!(ditches.parts_for_year(2010).unwrap().len(), 2);

    let mut parcels = LocationCollection::new(CollectionType::System, CollectionPartType::Parcel);
    parcels.set_parts(2010, vec!["12".into(), "13".into()]);
    parcels.set_parts(1956, vec!["12".into()]);
    parcels.set_parts(2010, vec!["14".into()]);

    assert_eq!(parcels.years().collect::<Vec<_>>(), vec![2010, 1956]);
    assert_eq!(parcels.parts_for_year(2010).unwrap(), ["14".to_string()]);
    assert!(parcels.parts_for_year(2001).is_none());
}
