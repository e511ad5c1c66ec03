use std::rc::Rc;

use crate::chart::{HistogramChart, ScatterChart};
use crate::controls::{self, ControlEvent, Defaults};
use crate::data::export::CsvExport;
use crate::data::filter::{FilteredView, SpeciesSelection};
use crate::data::model::{Attribute, PenguinDataset, Species};
use crate::data::table::TableView;
use crate::error::{ControlError, RenderError};
use crate::reactive::{Memo, NodeId, ReactiveGraph, Signal};

pub type HistogramResult = Result<HistogramChart, RenderError>;
pub type ExportResult = Result<CsvExport, RenderError>;

// ---------------------------------------------------------------------------
// Graph handles
// ---------------------------------------------------------------------------

/// Input store: one signal per control.
#[derive(Debug, Clone, Copy)]
pub struct Inputs {
    /// Raw text so an unknown column surfaces as a render error.
    pub selected_attribute: Signal<String>,
    pub numeric_bins: Signal<u32>,
    pub slider_bins: Signal<u32>,
    pub selected_species: Signal<SpeciesSelection>,
}

/// Terminal nodes whose artifacts are drawn.
#[derive(Debug, Clone, Copy)]
pub struct Sinks {
    pub data_table: Memo<TableView>,
    pub data_grid: Memo<TableView>,
    pub numeric_histogram: Memo<HistogramResult>,
    pub slider_histogram: Memo<HistogramResult>,
    pub scatterplot: Memo<ScatterChart>,
    pub download_data: Memo<ExportResult>,
}

impl Sinks {
    pub fn ids(&self) -> [NodeId; 6] {
        [
            self.data_table.id(),
            self.data_grid.id(),
            self.numeric_histogram.id(),
            self.slider_histogram.id(),
            self.scatterplot.id(),
            self.download_data.id(),
        ]
    }
}

/// Every sink's current artifact, fetched once per frame.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub data_table: Rc<TableView>,
    pub data_grid: Rc<TableView>,
    pub numeric_histogram: Rc<HistogramResult>,
    pub slider_histogram: Rc<HistogramResult>,
    pub scatterplot: Rc<ScatterChart>,
    pub download_data: Rc<ExportResult>,
}

// ---------------------------------------------------------------------------
// Dashboard – the wired graph
// ---------------------------------------------------------------------------

/// Inputs, the `filtered_data` computation and the output sinks, built over
/// one immutable dataset.
pub struct Dashboard {
    graph: ReactiveGraph,
    dataset: Rc<PenguinDataset>,
    inputs: Inputs,
    filtered: Memo<FilteredView>,
    sinks: Sinks,
}

impl Dashboard {
    pub fn new(dataset: Rc<PenguinDataset>) -> Self {
        Self::with_defaults(dataset, Defaults::default())
    }

    pub fn with_defaults(dataset: Rc<PenguinDataset>, defaults: Defaults) -> Self {
        let mut graph = ReactiveGraph::new();

        let inputs = Inputs {
            selected_attribute: graph.input(
                controls::SELECTED_ATTRIBUTE,
                defaults.attribute.column().to_string(),
            ),
            numeric_bins: graph.input(controls::NUMERIC_BINS, defaults.numeric_bins),
            slider_bins: graph.input(controls::SLIDER_BINS, defaults.slider_bins),
            selected_species: graph.input(controls::SELECTED_SPECIES, defaults.species),
        };

        let ds = dataset.clone();
        let species = inputs.selected_species;
        let filtered = graph.memo("filtered_data", move |cx| {
            FilteredView::new(ds.clone(), &cx.get(species))
        });

        let data_table = graph.sink("data_table", move |cx| TableView::from_view(&cx.get(filtered)));
        let data_grid = graph.sink("data_grid", move |cx| TableView::from_view(&cx.get(filtered)));

        let attribute = inputs.selected_attribute;
        let numeric_bins = inputs.numeric_bins;
        let numeric_histogram = graph.sink("numeric_histogram", move |cx| {
            let view = cx.get(filtered);
            let attribute = cx.get(attribute);
            let bins = *cx.get(numeric_bins);
            histogram("Histogram", &view, &attribute, bins)
        });

        let slider_bins = inputs.slider_bins;
        let slider_histogram = graph.sink("slider_histogram", move |cx| {
            let view = cx.get(filtered);
            let attribute = cx.get(attribute);
            let bins = *cx.get(slider_bins);
            histogram("Binned Histogram", &view, &attribute, bins)
        });

        let scatterplot = graph.sink("scatterplot", move |cx| ScatterChart::compute(&cx.get(filtered)));
        let download_data = graph.sink("download_data", move |cx| CsvExport::from_view(&cx.get(filtered)));

        Dashboard {
            graph,
            dataset,
            inputs,
            filtered,
            sinks: Sinks {
                data_table,
                data_grid,
                numeric_histogram,
                slider_histogram,
                scatterplot,
                download_data,
            },
        }
    }

    // -- Control events --

    /// Apply one control event. `Ok(true)` when an input changed.
    pub fn apply(&mut self, event: ControlEvent) -> Result<bool, ControlError> {
        log::debug!("{} <- {event:?}", event.control());
        match event {
            ControlEvent::SelectAttribute(name) => Ok(self.select_attribute(&name)),
            ControlEvent::SetNumericBins(value) => self.set_numeric_bins(value),
            ControlEvent::SetSliderBins(value) => Ok(self.set_slider_bins(value)),
            ControlEvent::ToggleSpecies(species) => Ok(self.toggle_species(species)),
            ControlEvent::SetSpecies(selection) => Ok(self.set_species(selection)),
        }
    }

    /// Store the attribute name as given; the histograms validate it.
    pub fn select_attribute(&mut self, name: &str) -> bool {
        self.graph.set(self.inputs.selected_attribute, name.to_string())
    }

    /// Rejects counts outside `NUMERIC_BINS_RANGE` and keeps the previous value.
    pub fn set_numeric_bins(&mut self, value: i64) -> Result<bool, ControlError> {
        let bins = controls::validate_numeric_bins(value)?;
        Ok(self.graph.set(self.inputs.numeric_bins, bins))
    }

    /// Clamps into the slider range.
    pub fn set_slider_bins(&mut self, value: i64) -> bool {
        let bins = controls::clamp_slider_bins(value);
        if i64::from(bins) != value {
            log::warn!("slider bins {value} clamped to {bins}");
        }
        self.graph.set(self.inputs.slider_bins, bins)
    }

    pub fn set_species(&mut self, selection: SpeciesSelection) -> bool {
        self.graph.set(self.inputs.selected_species, selection)
    }

    pub fn toggle_species(&mut self, species: Species) -> bool {
        self.graph.update(self.inputs.selected_species, |selected| {
            if !selected.remove(&species) {
                selected.insert(species);
            }
        })
    }

    // -- Recompute --

    /// Recompute stale sinks. Returns their labels in the order they ran.
    pub fn flush(&mut self) -> Vec<&'static str> {
        let ran: Vec<&'static str> = self
            .graph
            .flush()
            .into_iter()
            .map(|id| self.graph.label(id))
            .collect();
        if !ran.is_empty() {
            log::debug!(
                "flushed {ran:?} ({} of {} rows visible)",
                self.graph.get(self.filtered).len(),
                self.dataset.len()
            );
        }
        ran
    }

    // -- Reads --

    /// The current filtered view; recomputed only after the species
    /// selection changed.
    pub fn filtered_data(&mut self) -> Rc<FilteredView> {
        self.graph.get(self.filtered)
    }

    pub fn data_table(&mut self) -> Rc<TableView> {
        self.graph.get(self.sinks.data_table)
    }

    pub fn data_grid(&mut self) -> Rc<TableView> {
        self.graph.get(self.sinks.data_grid)
    }

    pub fn numeric_histogram(&mut self) -> Rc<HistogramResult> {
        self.graph.get(self.sinks.numeric_histogram)
    }

    pub fn slider_histogram(&mut self) -> Rc<HistogramResult> {
        self.graph.get(self.sinks.slider_histogram)
    }

    pub fn scatterplot(&mut self) -> Rc<ScatterChart> {
        self.graph.get(self.sinks.scatterplot)
    }

    pub fn download_data(&mut self) -> Rc<ExportResult> {
        self.graph.get(self.sinks.download_data)
    }

    pub fn artifacts(&mut self) -> Artifacts {
        Artifacts {
            data_table: self.data_table(),
            data_grid: self.data_grid(),
            numeric_histogram: self.numeric_histogram(),
            slider_histogram: self.slider_histogram(),
            scatterplot: self.scatterplot(),
            download_data: self.download_data(),
        }
    }

    pub fn selected_attribute(&self) -> Rc<String> {
        self.graph.read(self.inputs.selected_attribute)
    }

    pub fn numeric_bins(&self) -> u32 {
        *self.graph.read(self.inputs.numeric_bins)
    }

    pub fn slider_bins(&self) -> u32 {
        *self.graph.read(self.inputs.slider_bins)
    }

    pub fn selected_species(&self) -> Rc<SpeciesSelection> {
        self.graph.read(self.inputs.selected_species)
    }

    /// Current control values, for rebuilding over another dataset.
    /// An invalid attribute falls back to the default column.
    pub fn current_defaults(&self) -> Defaults {
        Defaults {
            attribute: controls::parse_attribute(&self.selected_attribute())
                .unwrap_or(Defaults::default().attribute),
            numeric_bins: self.numeric_bins(),
            slider_bins: self.slider_bins(),
            species: (*self.selected_species()).clone(),
        }
    }

    pub fn dataset(&self) -> &Rc<PenguinDataset> {
        &self.dataset
    }

    pub fn graph(&self) -> &ReactiveGraph {
        &self.graph
    }

    pub fn inputs(&self) -> Inputs {
        self.inputs
    }

    pub fn sinks(&self) -> Sinks {
        self.sinks
    }

    pub fn filtered_node(&self) -> NodeId {
        self.filtered.id()
    }
}

fn histogram(title: &str, view: &FilteredView, attribute: &str, bins: u32) -> HistogramResult {
    let attribute: Attribute = controls::parse_attribute(attribute)?;
    if !view.dataset().has_column(attribute.column()) {
        return Err(RenderError::InvalidAttribute(attribute.column().to_string()));
    }
    HistogramChart::compute(title, attribute, &view.values(attribute), bins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{all_species, tests::penguins};
    use crate::reactive::NodeState;

    fn dashboard() -> Dashboard {
        let mut d = Dashboard::new(penguins());
        d.flush();
        d
    }

    fn runs(d: &Dashboard, id: NodeId) -> u64 {
        d.graph().runs(id)
    }

    #[test]
    fn first_flush_renders_every_sink_once() {
        let mut d = Dashboard::new(penguins());
        let ran = d.flush();
        assert_eq!(
            ran,
            vec![
                "data_table",
                "data_grid",
                "numeric_histogram",
                "slider_histogram",
                "scatterplot",
                "download_data"
            ]
        );
        assert_eq!(runs(&d, d.filtered_node()), 1);
        for id in d.sinks().ids() {
            assert_eq!(d.graph().state(id), NodeState::Fresh);
        }
    }

    #[test]
    fn accessor_is_memoized() {
        let mut d = dashboard();
        let a = d.filtered_data();
        let b = d.filtered_data();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(runs(&d, d.filtered_node()), 1);
        assert!(d.flush().is_empty());
    }

    #[test]
    fn species_change_recomputes_filter_and_dependent_sinks() {
        let mut d = dashboard();
        let before: Vec<u64> = d.sinks().ids().iter().map(|&id| runs(&d, id)).collect();

        let adelie: SpeciesSelection = [Species::Adelie].into_iter().collect();
        assert!(d.apply(ControlEvent::SetSpecies(adelie)).unwrap());
        assert_eq!(d.graph().state(d.filtered_node()), NodeState::Stale);

        let ran = d.flush();
        assert_eq!(ran.len(), 6);
        assert_eq!(runs(&d, d.filtered_node()), 2);
        for (id, prev) in d.sinks().ids().into_iter().zip(before) {
            assert_eq!(runs(&d, id), prev + 1);
        }

        let view = d.filtered_data();
        assert_eq!(view.len(), d.dataset().count_species(Species::Adelie));
        assert_eq!(d.data_table().len(), view.len());
    }

    #[test]
    fn bin_change_recomputes_only_its_histogram() {
        let mut d = dashboard();
        assert!(d.apply(ControlEvent::SetNumericBins(35)).unwrap());
        assert_eq!(d.flush(), vec!["numeric_histogram"]);
        assert_eq!(runs(&d, d.filtered_node()), 1);

        assert!(d.apply(ControlEvent::SetSliderBins(7)).unwrap());
        assert_eq!(d.flush(), vec!["slider_histogram"]);

        let hist = d.slider_histogram();
        assert_eq!(hist.as_ref().as_ref().unwrap().bins.len(), 7);
    }

    #[test]
    fn attribute_change_recomputes_both_histograms() {
        let mut d = dashboard();
        assert!(d.apply(ControlEvent::SelectAttribute("body_mass_g".into())).unwrap());
        assert_eq!(d.flush(), vec!["numeric_histogram", "slider_histogram"]);
        let hist = d.numeric_histogram();
        assert_eq!(hist.as_ref().as_ref().unwrap().attribute, Attribute::BodyMassG);
    }

    #[test]
    fn unchanged_value_triggers_nothing() {
        let mut d = dashboard();
        assert!(!d.apply(ControlEvent::SetNumericBins(20)).unwrap());
        assert!(!d.set_species(all_species()));
        assert!(d.flush().is_empty());
    }

    #[test]
    fn invalid_attribute_is_reported_not_fatal() {
        let mut d = dashboard();
        d.apply(ControlEvent::SelectAttribute("beak_colour".into())).unwrap();
        d.flush();
        assert_eq!(
            *d.numeric_histogram(),
            Err(RenderError::InvalidAttribute("beak_colour".into()))
        );
        assert_eq!(
            *d.slider_histogram(),
            Err(RenderError::InvalidAttribute("beak_colour".into()))
        );
        // unrelated sinks still render
        assert_eq!(d.data_table().len(), d.dataset().len());
        assert_eq!(
            d.current_defaults().attribute,
            Defaults::default().attribute
        );
    }

    #[test]
    fn non_positive_numeric_bins_are_rejected_and_previous_value_kept() {
        let mut d = dashboard();
        let err = d.apply(ControlEvent::SetNumericBins(0)).unwrap_err();
        assert!(matches!(err, ControlError::InvalidBinCount { value: 0, .. }));
        assert_eq!(d.numeric_bins(), 20);
        assert!(d.flush().is_empty());
    }

    #[test]
    fn oversized_numeric_bins_are_rejected_before_binning() {
        let mut d = dashboard();
        let err = d.apply(ControlEvent::SetNumericBins(3_000_000_000)).unwrap_err();
        assert!(matches!(
            err,
            ControlError::InvalidBinCount { value: 3_000_000_000, max: 1000, .. }
        ));
        assert_eq!(d.numeric_bins(), 20);
        assert!(d.flush().is_empty());

        assert!(d.apply(ControlEvent::SetNumericBins(1000)).unwrap());
        assert_eq!(d.flush(), vec!["numeric_histogram"]);
        assert_eq!(d.numeric_histogram().as_ref().as_ref().unwrap().bins.len(), 1000);
    }

    #[test]
    fn slider_bins_are_clamped() {
        let mut d = dashboard();
        d.apply(ControlEvent::SetSliderBins(1000)).unwrap();
        assert_eq!(d.slider_bins(), 100);
        d.set_slider_bins(-4);
        assert_eq!(d.slider_bins(), 1);
    }

    #[test]
    fn empty_selection_gives_empty_but_valid_artifacts() {
        let mut d = dashboard();
        assert!(d.set_species(SpeciesSelection::new()));
        d.flush();
        let art = d.artifacts();
        assert!(d.filtered_data().is_empty());
        assert!(art.data_table.is_empty());
        assert!(art.numeric_histogram.as_ref().as_ref().unwrap().is_empty());
        assert!(art.scatterplot.series.is_empty());
        assert_eq!(art.download_data.as_ref().as_ref().unwrap().rows, 0);
    }

    #[test]
    fn toggling_species_twice_restores_view() {
        let mut d = dashboard();
        let all = d.filtered_data();
        assert!(d.toggle_species(Species::Gentoo));
        assert!(!d.selected_species().contains(&Species::Gentoo));
        assert!(d.toggle_species(Species::Gentoo));
        assert_eq!(*d.filtered_data(), *all);
    }

    #[test]
    fn download_matches_filtered_view() {
        let mut d = dashboard();
        d.apply(ControlEvent::ToggleSpecies(Species::Chinstrap)).unwrap();
        d.flush();
        let view = d.filtered_data();
        let export = d.download_data();
        let export = export.as_ref().as_ref().unwrap();
        assert_eq!(export.rows, view.len());
        assert_eq!(export.filename, crate::data::export::EXPORT_FILENAME);
    }

    #[test]
    fn defaults_carry_over() {
        let mut d = dashboard();
        d.set_numeric_bins(12).unwrap();
        d.toggle_species(Species::Adelie);
        let rebuilt = Dashboard::with_defaults(penguins(), d.current_defaults());
        assert_eq!(rebuilt.numeric_bins(), 12);
        assert!(!rebuilt.selected_species().contains(&Species::Adelie));
    }
}
