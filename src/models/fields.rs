//! Field descriptors for the input panel
//!
//! One entry per schema column, in schema order. Drives the rendered widgets,
//! the schema endpoint and the wording of boundary rejections.

use serde::Serialize;

use super::record::{AggregateType, CementType, COLUMNS, COLUMN_COUNT};

const CEMENT_OPTIONS: [&str; 4] = [
    CementType::RapidHardening.as_str(),
    CementType::Ordinary.as_str(),
    CementType::Type1Portland.as_str(),
    CementType::ShrinkageLimited.as_str(),
];

const AGGREGATE_OPTIONS: [&str; 2] = [
    AggregateType::Limestone.as_str(),
    AggregateType::LocalCrashedLimestone.as_str(),
];

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Select {
        options: &'static [&'static str],
    },
    Number {
        min: f64,
        max: Option<f64>,
        step: f64,
    },
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    /// Form / JSON key
    pub key: &'static str,
    /// Column label in the trained schema
    pub column: &'static str,
    /// Widget label
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Human readable bounds, e.g. "between 0 and 100"
    pub fn bounds_text(&self) -> String {
        match self.kind {
            FieldKind::Select { options } => format!("one of: {}", options.join(", ")),
            FieldKind::Number { min, max: Some(max), .. } => format!("between {} and {}", min, max),
            FieldKind::Number { min, max: None, .. } => format!("at least {}", min),
        }
    }
}

const fn select(i: usize, key: &'static str, label: &'static str, options: &'static [&'static str]) -> FieldSpec {
    FieldSpec { key, column: COLUMNS[i], label, kind: FieldKind::Select { options } }
}

const fn number(i: usize, key: &'static str, label: &'static str, min: f64, max: Option<f64>, step: f64) -> FieldSpec {
    FieldSpec { key, column: COLUMNS[i], label, kind: FieldKind::Number { min, max, step } }
}

/// All input fields in schema order
pub const FIELDS: [FieldSpec; COLUMN_COUNT] = [
    select(0, "cement_type", "Cement Type", &CEMENT_OPTIONS),
    select(1, "aggregate_type", "Aggregate Type", &AGGREGATE_OPTIONS),
    number(2, "cement_kg_per_m3", "Cement (kg/m³)", 0.0, None, 1.0),
    number(3, "fine_aggregate_kg_per_m3", "Fine Aggregate (kg/m³)", 0.0, None, 1.0),
    number(4, "coarse_aggregate_kg_per_m3", "Coarse Aggregate (kg/m³)", 0.0, None, 1.0),
    number(5, "wc_ratio_percent", "Water-Cement Ratio (%)", 0.0, Some(100.0), 1.0),
    number(6, "fly_ash_ggbfs_kg_per_m3", "Fly Ash/GGBFS (kg/m³)", 0.0, None, 1.0),
    number(7, "admixture_lit_per_m3", "Admixture (liters/m³)", 0.0, None, 0.1),
    number(8, "steel_fiber_aspect_ratio", "Steel Fiber Aspect Ratio", 0.0, None, 1.0),
    number(9, "steel_fiber_percent", "Steel Fiber (%)", 0.0, Some(100.0), 0.1),
    number(10, "sample_surface_area_mm2", "Sample Surface Area (mm²)", 0.0, None, 1.0),
    number(11, "depth_mm", "Depth (mm)", 0.0, None, 1.0),
    number(12, "relative_humidity_percent", "Relative Humidity (%)", 0.0, Some(100.0), 1.0),
    number(13, "temperature_c", "Temperature (°C)", -50.0, Some(100.0), 1.0),
    number(14, "compressive_strength_mpa", "Compressive Cylindrical Strength (MPa)", 0.0, None, 1.0),
    number(15, "curing_time_days", "Curing Time (days)", 0.0, None, 1.0),
    number(16, "loading_stress_mpa", "Loading Compressive Stress (MPa)", 0.0, None, 0.1),
    number(17, "loading_time_days", "Loading Time (days)", 0.0, None, 1.0),
];
