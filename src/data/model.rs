use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ControlError;

// ---------------------------------------------------------------------------
// Species – the categorical filter column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    Adelie,
    Gentoo,
    Chinstrap,
}

impl Species {
    /// The fixed species domain, in checkbox order.
    pub const ALL: [Species; 3] = [Species::Adelie, Species::Gentoo, Species::Chinstrap];

    pub fn as_str(self) -> &'static str {
        match self {
            Species::Adelie => "Adelie",
            Species::Gentoo => "Gentoo",
            Species::Chinstrap => "Chinstrap",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown species '{0}' (expected Adelie, Gentoo or Chinstrap)")]
pub struct UnknownSpecies(pub String);

impl FromStr for Species {
    type Err = UnknownSpecies;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .into_iter()
            .find(|sp| sp.as_str() == s.trim())
            .ok_or_else(|| UnknownSpecies(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Attribute – the numeric columns a histogram can show
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    BillLengthMm,
    BillDepthMm,
    FlipperLengthMm,
    BodyMassG,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::BillLengthMm,
        Attribute::BillDepthMm,
        Attribute::FlipperLengthMm,
        Attribute::BodyMassG,
    ];

    /// Column name in the dataset schema.
    pub fn column(self) -> &'static str {
        match self {
            Attribute::BillLengthMm => "bill_length_mm",
            Attribute::BillDepthMm => "bill_depth_mm",
            Attribute::FlipperLengthMm => "flipper_length_mm",
            Attribute::BodyMassG => "body_mass_g",
        }
    }

    /// Human readable axis label.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::BillLengthMm => "Bill Length (mm)",
            Attribute::BillDepthMm => "Bill Depth (mm)",
            Attribute::FlipperLengthMm => "Flipper Length (mm)",
            Attribute::BodyMassG => "Body Mass (g)",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Attribute {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|attr| attr.column() == s)
            .ok_or_else(|| ControlError::InvalidAttribute(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Penguin – one row of the table
// ---------------------------------------------------------------------------

/// Every column the dataset may carry, in canonical order.
pub const COLUMNS: [&str; 8] = [
    "species",
    "island",
    "bill_length_mm",
    "bill_depth_mm",
    "flipper_length_mm",
    "body_mass_g",
    "sex",
    "year",
];

/// A single observation. Measurements are optional because the source table
/// has missing cells (`NA`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Penguin {
    pub species: Species,
    #[serde(default)]
    pub island: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub bill_length_mm: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub bill_depth_mm: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub flipper_length_mm: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub body_mass_g: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub sex: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub year: Option<i64>,
}

impl Penguin {
    pub fn measurement(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::BillLengthMm => self.bill_length_mm,
            Attribute::BillDepthMm => self.bill_depth_mm,
            Attribute::FlipperLengthMm => self.flipper_length_mm,
            Attribute::BodyMassG => self.body_mass_g,
        }
    }

    /// Text of one cell, `None` when the cell is missing or the column is
    /// not part of the schema.
    pub fn cell(&self, column: &str) -> Option<String> {
        match column {
            "species" => Some(self.species.to_string()),
            "island" => Some(self.island.clone()),
            "sex" => self.sex.clone(),
            "year" => self.year.map(|y| y.to_string()),
            other => {
                let attr: Attribute = other.parse().ok()?;
                self.measurement(attr).map(|v| v.to_string())
            }
        }
    }

    /// Turn `NaN` / `"NA"` style placeholders into missing values.
    fn normalize(&mut self) {
        for v in [
            &mut self.bill_length_mm,
            &mut self.bill_depth_mm,
            &mut self.flipper_length_mm,
            &mut self.body_mass_g,
        ] {
            if v.is_some_and(|x| !x.is_finite()) {
                *v = None;
            }
        }
        if self
            .sex
            .as_deref()
            .is_some_and(|s| s.is_empty() || s.eq_ignore_ascii_case("na"))
        {
            self.sex = None;
        }
    }
}

// ---------------------------------------------------------------------------
// PenguinDataset – the immutable table
// ---------------------------------------------------------------------------

/// The loaded table. Built once, then shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct PenguinDataset {
    pub rows: Vec<Penguin>,
    /// Columns present in the source, in source order.
    pub column_names: Vec<String>,
}

impl PenguinDataset {
    pub fn from_rows(mut rows: Vec<Penguin>, column_names: Vec<String>) -> Self {
        for row in &mut rows {
            row.normalize();
        }
        PenguinDataset { rows, column_names }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c.as_str() == column)
    }

    pub fn count_species(&self, species: Species) -> usize {
        self.rows.iter().filter(|p| p.species == species).count()
    }
}
