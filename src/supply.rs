use std::fmt;
use std::str::FromStr;

use crate::error::CdsError;

/// How a supply's identifier should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartIdType {
    Wdid,
    Receipt,
    Well,
}

impl PartIdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartIdType::Wdid => "WDID",
            PartIdType::Receipt => "Receipt",
            PartIdType::Well => "Well",
        }
    }
}

impl FromStr for PartIdType {
    type Err = CdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wdid" => Ok(PartIdType::Wdid),
            "receipt" => Ok(PartIdType::Receipt),
            "well" => Ok(PartIdType::Well),
            other => Err(CdsError::InvalidData(format!(
                "Invalid part id type: '{other}'. Must be 'wdid', 'receipt' or 'well'"
            ))),
        }
    }
}

impl fmt::Display for PartIdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a supply is carried into the crop pattern data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IncludeStatus {
    /// Bad input that must be resolved.
    Error,
    No,
    Yes,
    /// Not yet evaluated.
    #[default]
    Unknown,
}

impl IncludeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncludeStatus::Error => "error",
            IncludeStatus::No => "no",
            IncludeStatus::Yes => "yes",
            IncludeStatus::Unknown => "unknown",
        }
    }

    /// `No` and `Error` keep a supply out of the crop pattern data set.
    pub fn is_excluded(&self) -> bool {
        matches!(self, IncludeStatus::No | IncludeStatus::Error)
    }
}

impl FromStr for IncludeStatus {
    type Err = CdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(IncludeStatus::Error),
            "no" | "n" => Ok(IncludeStatus::No),
            "yes" | "y" => Ok(IncludeStatus::Yes),
            "unknown" | "" => Ok(IncludeStatus::Unknown),
            other => Err(CdsError::InvalidData(format!(
                "Invalid include status: '{other}'. Must be 'error', 'no', 'yes' or 'unknown'"
            ))),
        }
    }
}

/// Source-specific part of a supply.
///
/// A supply is either surface water or groundwater, never both and never
/// neither, so validators branch on the tag.
#[derive(Debug, Clone, PartialEq)]
pub enum SupplyKind {
    SurfaceWater {
        /// Fraction of the parcel irrigated by this ditch, as recorded by the
        /// administrative database. This is the authoritative fraction.
        area_irrig_fraction_from_source: Option<f64>,
        /// `1 / ditch count` for the parcel-year, used only as a cross-check.
        ditch_fraction: Option<f64>,
    },
    GroundWater,
}

/// One water source attached to one parcel-year.
#[derive(Debug, Clone, PartialEq)]
pub struct Supply {
    pub id: String,
    pub part_id_type: PartIdType,
    /// Flow or decree magnitude, unit-dependent.
    pub amount: Option<f64>,
    pub include_in_cds: IncludeStatus,
    kind: SupplyKind,
    area_irrig: f64,
    area_irrig_fraction: f64,
}

impl Supply {
    pub fn surface_water(id: impl Into<String>, fraction_from_source: Option<f64>) -> Self {
        Self {
            id: id.into(),
            part_id_type: PartIdType::Wdid,
            amount: None,
            include_in_cds: IncludeStatus::Unknown,
            kind: SupplyKind::SurfaceWater {
                area_irrig_fraction_from_source: fraction_from_source,
                ditch_fraction: None,
            },
            area_irrig: 0.0,
            area_irrig_fraction: 0.0,
        }
    }

    pub fn ground_water(id: impl Into<String>, part_id_type: PartIdType) -> Self {
        Self {
            id: id.into(),
            part_id_type,
            amount: None,
            include_in_cds: IncludeStatus::Unknown,
            kind: SupplyKind::GroundWater,
            area_irrig: 0.0,
            area_irrig_fraction: 0.0,
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_include_status(mut self, status: IncludeStatus) -> Self {
        self.include_in_cds = status;
        self
    }

    pub fn kind(&self) -> &SupplyKind {
        &self.kind
    }

    pub fn is_surface_water(&self) -> bool {
        matches!(self.kind, SupplyKind::SurfaceWater { .. })
    }

    pub fn is_ground_water(&self) -> bool {
        matches!(self.kind, SupplyKind::GroundWater)
    }

    pub fn area_irrig(&self) -> f64 {
        self.area_irrig
    }

    pub fn area_irrig_fraction(&self) -> f64 {
        self.area_irrig_fraction
    }

    pub fn area_irrig_fraction_from_source(&self) -> Option<f64> {
        match self.kind {
            SupplyKind::SurfaceWater {
                area_irrig_fraction_from_source,
                ..
            } => area_irrig_fraction_from_source,
            SupplyKind::GroundWater => None,
        }
    }

    pub fn ditch_fraction(&self) -> Option<f64> {
        match self.kind {
            SupplyKind::SurfaceWater { ditch_fraction, .. } => ditch_fraction,
            SupplyKind::GroundWater => None,
        }
    }

    /// Replace the externally supplied fraction. No effect on groundwater.
    pub fn set_area_irrig_fraction_from_source(&mut self, fraction: Option<f64>) {
        if let SupplyKind::SurfaceWater {
            area_irrig_fraction_from_source,
            ..
        } = &mut self.kind
        {
            *area_irrig_fraction_from_source = fraction;
        }
    }

    /// Set the derived fraction and the acreage it implies for `parcel_area`.
    pub fn set_area_irrig(&mut self, fraction: f64, parcel_area: f64) {
        self.area_irrig_fraction = fraction;
        self.area_irrig = fraction * parcel_area;
    }

    pub(crate) fn set_ditch_fraction(&mut self, fraction: f64) {
        if let SupplyKind::SurfaceWater { ditch_fraction, .. } = &mut self.kind {
            *ditch_fraction = Some(fraction);
        }
    }
}
