//! Input record - the single row handed to the preprocessing transform
//!
//! Column labels and their order are fixed by the schema the transform was
//! fitted against. They are reproduced byte for byte, odd spacing included.

use serde::{Deserialize, Serialize};

/// Number of columns in the trained schema
pub const COLUMN_COUNT: usize = 18;

/// Column labels in schema order
pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "cement type",
    "Aggregate type",
    "cement (Kg/m³)",
    "Fine  (Kg/m³)",
    "coarse agg  (Kg/m³)",
    "W/C ratio(%)",
    "Fly Ash+ GGBFS(Kg/m³)",
    " admixture (Lit/m³)",
    "SF aspect ratio",
    "steel fiber %",
    "Sample Surface area (mm²)",
    "depth(mm)",
    "RH (%)",
    "T (˚C)",
    "fck",
    "curing time days",
    "Loading  Compressive stress(Mpa)",
    "loading time (days)",
];

// ============================================================================
// CATEGORICAL FIELDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CementType {
    #[default]
    #[serde(rename = "rapid hardening cement")]
    RapidHardening,
    #[serde(rename = "Ordinary cement")]
    Ordinary,
    #[serde(rename = "Type 1 Portland cement")]
    Type1Portland,
    #[serde(rename = "Shrinkage limited cement")]
    ShrinkageLimited,
}

impl CementType {
    pub const ALL: [CementType; 4] = [
        CementType::RapidHardening,
        CementType::Ordinary,
        CementType::Type1Portland,
        CementType::ShrinkageLimited,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            CementType::RapidHardening => "rapid hardening cement",
            CementType::Ordinary => "Ordinary cement",
            CementType::Type1Portland => "Type 1 Portland cement",
            CementType::ShrinkageLimited => "Shrinkage limited cement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AggregateType {
    #[default]
    #[serde(rename = "Limestone aggregate")]
    Limestone,
    #[serde(rename = "Local crashed limestone aggregate")]
    LocalCrashedLimestone,
}

impl AggregateType {
    pub const ALL: [AggregateType; 2] = [
        AggregateType::Limestone,
        AggregateType::LocalCrashedLimestone,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            AggregateType::Limestone => "Limestone aggregate",
            AggregateType::LocalCrashedLimestone => "Local crashed limestone aggregate",
        }
    }
}

// ============================================================================
// RECORD
// ============================================================================

/// One assembled set of mixture and environment parameters.
///
/// Only produced by [`crate::models::collect`], so every value is already
/// inside its control's bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputRecord {
    pub cement_type: CementType,
    pub aggregate_type: AggregateType,
    pub cement_kg_per_m3: f64,
    pub fine_aggregate_kg_per_m3: f64,
    pub coarse_aggregate_kg_per_m3: f64,
    pub wc_ratio_percent: f64,
    pub fly_ash_ggbfs_kg_per_m3: f64,
    pub admixture_lit_per_m3: f64,
    pub steel_fiber_aspect_ratio: f64,
    pub steel_fiber_percent: f64,
    pub sample_surface_area_mm2: f64,
    pub depth_mm: f64,
    pub relative_humidity_percent: f64,
    pub temperature_c: f64,
    pub compressive_strength_mpa: f64,
    pub curing_time_days: f64,
    pub loading_stress_mpa: f64,
    pub loading_time_days: f64,
}

impl InputRecord {
    /// Lay the record out as a one-row table in schema order
    pub fn to_table(&self) -> RecordTable {
        let values = [
            Cell::Text(self.cement_type.as_str().to_string()),
            Cell::Text(self.aggregate_type.as_str().to_string()),
            Cell::Number(self.cement_kg_per_m3),
            Cell::Number(self.fine_aggregate_kg_per_m3),
            Cell::Number(self.coarse_aggregate_kg_per_m3),
            Cell::Number(self.wc_ratio_percent),
            Cell::Number(self.fly_ash_ggbfs_kg_per_m3),
            Cell::Number(self.admixture_lit_per_m3),
            Cell::Number(self.steel_fiber_aspect_ratio),
            Cell::Number(self.steel_fiber_percent),
            Cell::Number(self.sample_surface_area_mm2),
            Cell::Number(self.depth_mm),
            Cell::Number(self.relative_humidity_percent),
            Cell::Number(self.temperature_c),
            Cell::Number(self.compressive_strength_mpa),
            Cell::Number(self.curing_time_days),
            Cell::Number(self.loading_stress_mpa),
            Cell::Number(self.loading_time_days),
        ];

        RecordTable {
            columns: COLUMNS
                .iter()
                .zip(values)
                .map(|(name, value)| Column { name: name.to_string(), value })
                .collect(),
        }
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// A single cell of the one-row table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub value: Cell,
}

/// Ordered, named, single-row table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordTable {
    pub columns: Vec<Column>,
}

impl RecordTable {
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
