/// Column-name and value constants for the tabular inputs and report frames.
/// Single source of truth - exported to Python via PyO3.

// ── Location columns ────────────────────────────────────────────────────────
pub mod location {
    pub const LOCATION_ID: &str = "location_id";
    pub const NAME: &str = "name";
    pub const GROUNDWATER_ONLY: &str = "groundwater_only";
}

// ── Parcel columns ──────────────────────────────────────────────────────────
pub mod parcel {
    pub const LOCATION_ID: &str = "location_id";
    pub const PARCEL_ID: &str = "parcel_id";
    pub const YEAR: &str = "year";
    pub const DIVISION: &str = "division";
    pub const WATER_DISTRICT: &str = "water_district";
    pub const CROP: &str = "crop";
    pub const AREA: &str = "area";
    pub const AREA_UNITS: &str = "area_units";
    pub const IRRIGATION_METHOD: &str = "irrigation_method";
}

// ── Supply columns ──────────────────────────────────────────────────────────
pub mod supply {
    pub const LOCATION_ID: &str = "location_id";
    pub const PARCEL_ID: &str = "parcel_id";
    pub const YEAR: &str = "year";
    pub const SUPPLY_ID: &str = "supply_id";
    pub const KIND: &str = "kind";
    pub const PART_ID_TYPE: &str = "part_id_type";
    pub const AMOUNT: &str = "amount";
    pub const PERCENT_IRRIG: &str = "percent_irrig";
    pub const INCLUDE_IN_CDS: &str = "include_in_cds";
}

// ── Collection assignment columns ───────────────────────────────────────────
pub mod collection {
    pub const LOCATION_ID: &str = "location_id";
    pub const COLLECTION_TYPE: &str = "collection_type";
    pub const PART_TYPE: &str = "part_type";
    pub const PART_ID_TYPE: &str = "part_id_type";
    pub const DIVISION: &str = "division";
    pub const YEAR: &str = "year";
    pub const PART_ID: &str = "part_id";
}

// ── Crop pattern directive columns ──────────────────────────────────────────
pub mod directive {
    pub const LOCATION_ID: &str = "location_id";
    pub const DIRECTIVE: &str = "directive";
    pub const YEAR: &str = "year";

    pub const SET: &str = "set";
    pub const FILL: &str = "fill";
}

// ── Validation report columns ───────────────────────────────────────────────
pub mod problem {
    pub const SEVERITY: &str = "severity";
    pub const KIND: &str = "kind";
    pub const LOCATION_ID: &str = "location_id";
    pub const YEAR: &str = "year";
    pub const PARCEL_ID: &str = "parcel_id";
    pub const SUPPLY_ID: &str = "supply_id";
    pub const MESSAGE: &str = "message";
    pub const RECOMMENDATION: &str = "recommendation";
}

// ── Crop pattern report columns ─────────────────────────────────────────────
pub mod crop_pattern {
    pub const LOCATION_ID: &str = "location_id";
    pub const YEAR: &str = "year";
    pub const CROP: &str = "crop";
    pub const AREA: &str = "area";
}

// ── Default file names ──────────────────────────────────────────────────────
pub mod files {
    pub const LOCATIONS: &str = "locations.csv";
    pub const PARCELS: &str = "parcels.csv";
    pub const SUPPLIES: &str = "supplies.csv";
    pub const COLLECTIONS: &str = "collections.csv";
    pub const DIRECTIVES: &str = "directives.csv";
}
