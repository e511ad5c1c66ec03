// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------
//
// Control errors are raised at the control boundary and recovered there.
// Render errors come out of sinks and are drawn in place of the artifact.
// An empty species selection is not an error.

/// A control value outside its documented domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("'{0}' is not a numeric column (expected bill_length_mm, bill_depth_mm, flipper_length_mm or body_mass_g)")]
    InvalidAttribute(String),

    #[error("{control}: bin count {value} is outside {min}..={max}")]
    InvalidBinCount {
        control: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Failure while producing an output artifact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("cannot plot '{0}': not a numeric column of the dataset")]
    InvalidAttribute(String),

    #[error("cannot bin values into {0} bins")]
    InvalidBinCount(i64),

    #[error("export failed: {0}")]
    Export(String),
}

impl From<ControlError> for RenderError {
    fn from(err: ControlError) -> Self {
        match err {
            ControlError::InvalidAttribute(name) => RenderError::InvalidAttribute(name),
            ControlError::InvalidBinCount { value, .. } => RenderError::InvalidBinCount(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_error_keeps_rejected_bin_count() {
        let err = ControlError::InvalidBinCount {
            control: "numeric_bins",
            value: -7,
            min: 1,
            max: 1000,
        };
        let render = RenderError::from(err);
        assert_eq!(render, RenderError::InvalidBinCount(-7));
        assert_eq!(render.to_string(), "cannot bin values into -7 bins");
    }

    #[test]
    fn render_error_keeps_attribute_name() {
        let render = RenderError::from(ControlError::InvalidAttribute("island".into()));
        assert!(render.to_string().contains("'island'"));
    }
}
