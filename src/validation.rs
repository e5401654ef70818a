use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// What a validation problem is about, so reports can filter by check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    /// Parcels exist but none carry a division.
    DivisionMissing,
    /// Parcels span more than one division.
    DivisionMixed,
    /// A parcel-year has neither surface nor groundwater supply.
    NoSupply,
    /// Surface `area_irrig` does not add up to the parcel area.
    AreaMismatch,
    /// Fraction recorded at the source disagrees with `1 / ditch count`.
    SupplyFractionMismatch,
    /// Area mismatch on a parcel that also has groundwater supply.
    CombinedSupply,
    /// A location with parcels has no supply in any year.
    LocationUnsupplied,
    /// Every supply of a location has unknown inclusion status.
    InclusionUnknown,
}

impl ProblemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemKind::DivisionMissing => "division_missing",
            ProblemKind::DivisionMixed => "division_mixed",
            ProblemKind::NoSupply => "no_supply",
            ProblemKind::AreaMismatch => "area_mismatch",
            ProblemKind::SupplyFractionMismatch => "supply_fraction_mismatch",
            ProblemKind::CombinedSupply => "combined_supply",
            ProblemKind::LocationUnsupplied => "location_unsupplied",
            ProblemKind::InclusionUnknown => "inclusion_unknown",
        }
    }
}

/// The object a problem refers to, by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemSource {
    Dataset,
    Location {
        location_id: String,
    },
    Parcel {
        location_id: String,
        parcel_id: i64,
        year: i32,
    },
    Supply {
        location_id: String,
        parcel_id: i64,
        year: i32,
        supply_id: String,
    },
}

impl ProblemSource {
    pub fn location_id(&self) -> Option<&str> {
        match self {
            ProblemSource::Dataset => None,
            ProblemSource::Location { location_id }
            | ProblemSource::Parcel { location_id, .. }
            | ProblemSource::Supply { location_id, .. } => Some(location_id.as_str()),
        }
    }

    pub fn parcel_id(&self) -> Option<i64> {
        match self {
            ProblemSource::Parcel { parcel_id, .. } | ProblemSource::Supply { parcel_id, .. } => {
                Some(*parcel_id)
            }
            _ => None,
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            ProblemSource::Parcel { year, .. } | ProblemSource::Supply { year, .. } => Some(*year),
            _ => None,
        }
    }

    pub fn supply_id(&self) -> Option<&str> {
        match self {
            ProblemSource::Supply { supply_id, .. } => Some(supply_id.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ProblemSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemSource::Dataset => write!(f, "dataset"),
            ProblemSource::Location { location_id } => write!(f, "location {location_id}"),
            ProblemSource::Parcel {
                location_id,
                parcel_id,
                year,
            } => write!(f, "location {location_id} parcel {parcel_id} ({year})"),
            ProblemSource::Supply {
                location_id,
                parcel_id,
                year,
                supply_id,
            } => write!(
                f,
                "location {location_id} parcel {parcel_id} ({year}) supply {supply_id}"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationProblem {
    pub severity: Severity,
    pub kind: ProblemKind,
    pub source: ProblemSource,
    pub message: String,
    pub recommendation: String,
}

impl ValidationProblem {
    pub fn error(
        kind: ProblemKind,
        source: ProblemSource,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            source,
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }

    pub fn warning(
        kind: ProblemKind,
        source: ProblemSource,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(kind, source, message, recommendation)
        }
    }
}

impl fmt::Display for ValidationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.severity.as_str(),
            self.source,
            self.message,
            self.recommendation
        )
    }
}

/// Problems found by one validation pass, in the order they were found.
///
/// Empty means no problems were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    problems: Vec<ValidationProblem>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, problem: ValidationProblem) {
        self.problems.push(problem);
    }

    pub fn extend(&mut self, other: ValidationResult) {
        self.problems.extend(other.problems);
    }

    pub fn problems(&self) -> &[ValidationProblem] {
        &self.problems
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationProblem> {
        self.problems
            .iter()
            .filter(|p| p.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationProblem> {
        self.problems
            .iter()
            .filter(|p| p.severity == Severity::Warning)
    }

    pub fn of_kind(&self, kind: ProblemKind) -> impl Iterator<Item = &ValidationProblem> {
        self.problems.iter().filter(move |p| p.kind == kind)
    }
}

impl IntoIterator for ValidationResult {
    type Item = ValidationProblem;
    type IntoIter = std::vec::IntoIter<ValidationProblem>;

    fn into_iter(self) -> Self::IntoIter {
        self.problems.into_iter()
    }
}

/// Format `value` with `precision` decimal digits for equality checks.
///
/// Ties on the exact binary value round to even, as `format!` does. Negative
/// zero prints as zero.
pub fn format_fixed(value: f64, precision: usize) -> String {
    let s = format!("{value:.precision$}");
    if let Some(rest) = s.strip_prefix('-') {
        if rest.chars().all(|c| c == '0' || c == '.') {
            return rest.to_string();
        }
    }
    s
}

/// True when both values format identically at `precision`.
pub fn same_at_precision(a: f64, b: f64, precision: usize) -> bool {
    format_fixed(a, precision) == format_fixed(b, precision)
}
