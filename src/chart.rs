use crate::data::filter::FilteredView;
use crate::data::model::{Attribute, Species};
use crate::error::RenderError;

/// Upper bound on the number of bins a histogram may be split into.
pub const MAX_BINS: u32 = 1000;

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width histogram of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramChart {
    pub title: String,
    pub attribute: Attribute,
    pub bins: Vec<HistogramBin>,
    /// Number of values that were binned.
    pub total: usize,
}

impl HistogramChart {
    /// Bin `values` into `bin_count` equal-width bins spanning their range.
    /// `bin_count` must lie in `1..=MAX_BINS`.
    ///
    /// Non-finite values are skipped. Values equal to the maximum land in the
    /// last bin. When every value is the same the range is widened to one
    /// unit around it. No values gives a chart without bins.
    pub fn compute(
        title: impl Into<String>,
        attribute: Attribute,
        values: &[f64],
        bin_count: u32,
    ) -> Result<Self, RenderError> {
        if bin_count == 0 || bin_count > MAX_BINS {
            return Err(RenderError::InvalidBinCount(i64::from(bin_count)));
        }
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let title = title.into();
        if finite.is_empty() {
            return Ok(HistogramChart {
                title,
                attribute,
                bins: Vec::new(),
                total: 0,
            });
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let (lo, hi) = if (max - min).abs() < f64::EPSILON {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };

        let n = bin_count as usize;
        let width = (hi - lo) / n as f64;
        let mut counts = vec![0usize; n];
        for v in &finite {
            let idx = (((v - lo) / width).floor() as usize).min(n - 1);
            counts[idx] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: lo + i as f64 * width,
                end: lo + (i + 1) as f64 * width,
                count,
            })
            .collect();

        Ok(HistogramChart {
            title,
            attribute,
            bins,
            total: finite.len(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Scatterplot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub species: Species,
    pub points: Vec<[f64; 2]>,
}

/// Bill length against body mass, one series per species.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub title: String,
    pub x: Attribute,
    pub y: Attribute,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    pub fn compute(view: &FilteredView) -> Self {
        let x = Attribute::BillLengthMm;
        let y = Attribute::BodyMassG;
        let series = Species::ALL
            .into_iter()
            .filter_map(|species| {
                let points: Vec<[f64; 2]> = view
                    .rows()
                    .filter(|p| p.species == species)
                    .filter_map(|p| Some([p.measurement(x)?, p.measurement(y)?]))
                    .collect();
                (!points.is_empty()).then_some(ScatterSeries { species, points })
            })
            .collect();

        ScatterChart {
            title: "Penguins: Bill Length vs Body Mass".to_string(),
            x,
            y,
            series,
        }
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{all_species, tests::penguins, SpeciesSelection};

    #[test]
    fn histogram_counts_every_value_once() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 5.0];
        let h = HistogramChart::compute("h", Attribute::BodyMassG, &values, 4).unwrap();
        assert_eq!(h.bins.len(), 4);
        assert_eq!(h.total, 6);
        assert_eq!(h.bins.iter().map(|b| b.count).sum::<usize>(), 6);
        assert_eq!(h.bins[0].start, 1.0);
        assert_eq!(h.bins[3].end, 5.0);
        // max value lands in the last bin
        assert_eq!(h.bins[3].count, 2);
    }

    #[test]
    fn histogram_rejects_zero_bins() {
        assert_eq!(
            HistogramChart::compute("h", Attribute::BillDepthMm, &[1.0], 0),
            Err(RenderError::InvalidBinCount(0))
        );
    }

    #[test]
    fn histogram_rejects_more_than_max_bins() {
        assert!(HistogramChart::compute("h", Attribute::BillDepthMm, &[1.0], MAX_BINS).is_ok());
        assert_eq!(
            HistogramChart::compute("h", Attribute::BillDepthMm, &[1.0], 3_000_000_000),
            Err(RenderError::InvalidBinCount(3_000_000_000))
        );
    }

    #[test]
    fn histogram_of_no_values_is_empty() {
        let h = HistogramChart::compute("h", Attribute::BillDepthMm, &[f64::NAN], 10).unwrap();
        assert!(h.is_empty());
        assert!(h.bins.is_empty());
        assert_eq!(h.max_count(), 0);
    }

    #[test]
    fn histogram_of_constant_values_widens_range() {
        let h = HistogramChart::compute("h", Attribute::FlipperLengthMm, &[200.0; 3], 2).unwrap();
        assert_eq!(h.bins[0].start, 199.5);
        assert_eq!(h.bins[1].end, 200.5);
        assert_eq!(h.bins[1].count, 3);
        assert!((h.bins[0].width() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn scatter_has_one_series_per_selected_species() {
        let view = FilteredView::new(penguins(), &all_species());
        let chart = ScatterChart::compute(&view);
        assert_eq!(chart.series.len(), 3);
        // rows missing either coordinate are skipped
        assert!(chart.point_count() < view.len());

        let adelie: SpeciesSelection = [Species::Adelie].into_iter().collect();
        let chart = ScatterChart::compute(&FilteredView::new(penguins(), &adelie));
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].species, Species::Adelie);
    }

    #[test]
    fn scatter_of_empty_view_has_no_series() {
        let view = FilteredView::new(penguins(), &SpeciesSelection::new());
        assert!(ScatterChart::compute(&view).series.is_empty());
    }
}
