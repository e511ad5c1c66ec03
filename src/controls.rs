use std::ops::RangeInclusive;

use crate::chart::MAX_BINS;
use crate::data::filter::{all_species, SpeciesSelection};
use crate::data::model::{Attribute, Species};
use crate::error::ControlError;

// ---------------------------------------------------------------------------
// Control surface: identifiers, domains, defaults
// ---------------------------------------------------------------------------

pub const SELECTED_ATTRIBUTE: &str = "selected_attribute";
pub const NUMERIC_BINS: &str = "numeric_bins";
pub const SLIDER_BINS: &str = "slider_bins";
pub const SELECTED_SPECIES: &str = "selected_species_list";

pub const NUMERIC_BINS_RANGE: RangeInclusive<u32> = 1..=MAX_BINS;
pub const SLIDER_BINS_RANGE: RangeInclusive<u32> = 1..=100;

/// Initial control values.
#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    pub attribute: Attribute,
    pub numeric_bins: u32,
    pub slider_bins: u32,
    pub species: SpeciesSelection,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            attribute: Attribute::BillLengthMm,
            numeric_bins: 20,
            slider_bins: 20,
            species: all_species(),
        }
    }
}

/// A user interaction with one control.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    SelectAttribute(String),
    SetNumericBins(i64),
    SetSliderBins(i64),
    ToggleSpecies(Species),
    SetSpecies(SpeciesSelection),
}

impl ControlEvent {
    /// Identifier of the control that produced the event.
    pub fn control(&self) -> &'static str {
        match self {
            ControlEvent::SelectAttribute(_) => SELECTED_ATTRIBUTE,
            ControlEvent::SetNumericBins(_) => NUMERIC_BINS,
            ControlEvent::SetSliderBins(_) => SLIDER_BINS,
            ControlEvent::ToggleSpecies(_) | ControlEvent::SetSpecies(_) => SELECTED_SPECIES,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation at the control boundary
// ---------------------------------------------------------------------------

pub fn parse_attribute(name: &str) -> Result<Attribute, ControlError> {
    name.parse()
}

/// Numeric entry values outside [`NUMERIC_BINS_RANGE`] are rejected.
pub fn validate_numeric_bins(value: i64) -> Result<u32, ControlError> {
    let (min, max) = (*NUMERIC_BINS_RANGE.start(), *NUMERIC_BINS_RANGE.end());
    u32::try_from(value)
        .ok()
        .filter(|v| NUMERIC_BINS_RANGE.contains(v))
        .ok_or(ControlError::InvalidBinCount {
            control: NUMERIC_BINS,
            value,
            min: i64::from(min),
            max: i64::from(max),
        })
}

/// Slider values are pulled back into range instead of being rejected.
pub fn clamp_slider_bins(value: i64) -> u32 {
    let (min, max) = (*SLIDER_BINS_RANGE.start(), *SLIDER_BINS_RANGE.end());
    value.clamp(i64::from(min), i64::from(max)) as u32
}
