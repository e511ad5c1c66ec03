use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Species;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Species → Color32
// ---------------------------------------------------------------------------

/// Fixed colour per species so charts and checkboxes agree.
#[derive(Debug, Clone)]
pub struct SpeciesColors {
    mapping: BTreeMap<Species, Color32>,
}

impl Default for SpeciesColors {
    fn default() -> Self {
        let mapping = Species::ALL
            .into_iter()
            .zip(generate_palette(Species::ALL.len()))
            .collect();
        SpeciesColors { mapping }
    }
}

impl SpeciesColors {
    pub fn color_for(&self, species: Species) -> Color32 {
        self.mapping.get(&species).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let palette = generate_palette(3);
        assert_eq!(palette.len(), 3);
        assert_ne!(palette[0], palette[1]);
        assert_ne!(palette[1], palette[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn every_species_has_a_colour() {
        let colors = SpeciesColors::default();
        for sp in Species::ALL {
            assert_ne!(colors.color_for(sp), Color32::GRAY);
        }
        assert_ne!(
            colors.color_for(Species::Adelie),
            colors.color_for(Species::Chinstrap)
        );
    }
}
