//! Input panel submission and record assembly

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::fields::{FieldSpec, FIELDS};
use super::record::{AggregateType, CementType, InputRecord};
use crate::{AppError, AppResult};

/// Raw values as submitted from the input panel.
///
/// Categorical fields deserialize straight into their enums, so an unknown
/// option is rejected before it ever reaches [`collect`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PredictionForm {
    pub cement_type: CementType,
    pub aggregate_type: AggregateType,
    #[validate(range(min = 0.0))]
    pub cement_kg_per_m3: f64,
    #[validate(range(min = 0.0))]
    pub fine_aggregate_kg_per_m3: f64,
    #[validate(range(min = 0.0))]
    pub coarse_aggregate_kg_per_m3: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub wc_ratio_percent: f64,
    #[validate(range(min = 0.0))]
    pub fly_ash_ggbfs_kg_per_m3: f64,
    #[validate(range(min = 0.0))]
    pub admixture_lit_per_m3: f64,
    #[validate(range(min = 0.0))]
    pub steel_fiber_aspect_ratio: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub steel_fiber_percent: f64,
    #[validate(range(min = 0.0))]
    pub sample_surface_area_mm2: f64,
    #[validate(range(min = 0.0))]
    pub depth_mm: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub relative_humidity_percent: f64,
    #[validate(range(min = -50.0, max = 100.0))]
    pub temperature_c: f64,
    #[validate(range(min = 0.0))]
    pub compressive_strength_mpa: f64,
    #[validate(range(min = 0.0))]
    pub curing_time_days: f64,
    #[validate(range(min = 0.0))]
    pub loading_stress_mpa: f64,
    #[validate(range(min = 0.0))]
    pub loading_time_days: f64,
}

impl Default for PredictionForm {
    /// Every control starts at its minimum, dropdowns at their first option
    fn default() -> Self {
        Self {
            cement_type: CementType::default(),
            aggregate_type: AggregateType::default(),
            cement_kg_per_m3: 0.0,
            fine_aggregate_kg_per_m3: 0.0,
            coarse_aggregate_kg_per_m3: 0.0,
            wc_ratio_percent: 0.0,
            fly_ash_ggbfs_kg_per_m3: 0.0,
            admixture_lit_per_m3: 0.0,
            steel_fiber_aspect_ratio: 0.0,
            steel_fiber_percent: 0.0,
            sample_surface_area_mm2: 0.0,
            depth_mm: 0.0,
            relative_humidity_percent: 0.0,
            temperature_c: -50.0,
            compressive_strength_mpa: 0.0,
            curing_time_days: 0.0,
            loading_stress_mpa: 0.0,
            loading_time_days: 0.0,
        }
    }
}

impl PredictionForm {
    /// Numeric value behind a form key
    pub fn number(&self, key: &str) -> Option<f64> {
        let value = match key {
            "cement_kg_per_m3" => self.cement_kg_per_m3,
            "fine_aggregate_kg_per_m3" => self.fine_aggregate_kg_per_m3,
            "coarse_aggregate_kg_per_m3" => self.coarse_aggregate_kg_per_m3,
            "wc_ratio_percent" => self.wc_ratio_percent,
            "fly_ash_ggbfs_kg_per_m3" => self.fly_ash_ggbfs_kg_per_m3,
            "admixture_lit_per_m3" => self.admixture_lit_per_m3,
            "steel_fiber_aspect_ratio" => self.steel_fiber_aspect_ratio,
            "steel_fiber_percent" => self.steel_fiber_percent,
            "sample_surface_area_mm2" => self.sample_surface_area_mm2,
            "depth_mm" => self.depth_mm,
            "relative_humidity_percent" => self.relative_humidity_percent,
            "temperature_c" => self.temperature_c,
            "compressive_strength_mpa" => self.compressive_strength_mpa,
            "curing_time_days" => self.curing_time_days,
            "loading_stress_mpa" => self.loading_stress_mpa,
            "loading_time_days" => self.loading_time_days,
            _ => return None,
        };
        Some(value)
    }

    /// Current value of a field as the widget shows it
    pub fn value_of(&self, key: &str) -> Option<String> {
        match key {
            "cement_type" => Some(self.cement_type.as_str().to_string()),
            "aggregate_type" => Some(self.aggregate_type.as_str().to_string()),
            _ => self.number(key).map(|v| v.to_string()),
        }
    }
}

/// Assemble a record from the submitted panel values.
///
/// Out-of-range and non-finite numbers are rejected here; nothing outside
/// the declared bounds reaches the pipeline.
pub fn collect(form: &PredictionForm) -> AppResult<InputRecord> {
    let mut rejected: Vec<&'static FieldSpec> = Vec::new();

    if let Err(errors) = form.validate() {
        let failed = errors.field_errors();
        rejected.extend(FIELDS.iter().filter(|f| failed.contains_key(f.key)));
    }

    // Range checks let NaN through
    for spec in FIELDS.iter() {
        let non_finite = form.number(spec.key).map_or(false, |v| !v.is_finite());
        if non_finite && !rejected.iter().any(|r| r.key == spec.key) {
            rejected.push(spec);
        }
    }

    if !rejected.is_empty() {
        // Report in schema order
        rejected.sort_by_key(|spec| FIELDS.iter().position(|f| f.key == spec.key));
        let message = rejected
            .iter()
            .map(|spec| format!("{} must be {}", spec.label, spec.bounds_text()))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(AppError::ValidationError(message));
    }

    Ok(InputRecord {
        cement_type: form.cement_type,
        aggregate_type: form.aggregate_type,
        cement_kg_per_m3: form.cement_kg_per_m3,
        fine_aggregate_kg_per_m3: form.fine_aggregate_kg_per_m3,
        coarse_aggregate_kg_per_m3: form.coarse_aggregate_kg_per_m3,
        wc_ratio_percent: form.wc_ratio_percent,
        fly_ash_ggbfs_kg_per_m3: form.fly_ash_ggbfs_kg_per_m3,
        admixture_lit_per_m3: form.admixture_lit_per_m3,
        steel_fiber_aspect_ratio: form.steel_fiber_aspect_ratio,
        steel_fiber_percent: form.steel_fiber_percent,
        sample_surface_area_mm2: form.sample_surface_area_mm2,
        depth_mm: form.depth_mm,
        relative_humidity_percent: form.relative_humidity_percent,
        temperature_c: form.temperature_c,
        compressive_strength_mpa: form.compressive_strength_mpa,
        curing_time_days: form.curing_time_days,
        loading_stress_mpa: form.loading_stress_mpa,
        loading_time_days: form.loading_time_days,
    })
}
