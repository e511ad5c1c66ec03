use std::collections::BTreeSet;
use std::rc::Rc;

use super::model::{Attribute, Penguin, PenguinDataset, Species};

// ---------------------------------------------------------------------------
// Filter predicate: which species are selected
// ---------------------------------------------------------------------------

/// Selected species. An empty set selects no rows.
pub type SpeciesSelection = BTreeSet<Species>;

/// Every species selected (i.e., show everything).
pub fn all_species() -> SpeciesSelection {
    Species::ALL.into_iter().collect()
}

/// Return indices of rows whose species is in `selection`.
pub fn filtered_indices(dataset: &PenguinDataset, selection: &SpeciesSelection) -> Vec<usize> {
    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, p)| selection.contains(&p.species))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// FilteredView – logical subset of the dataset
// ---------------------------------------------------------------------------

/// Rows of a shared dataset that passed the species filter. Holds indices,
/// not copies.
#[derive(Debug, Clone)]
pub struct FilteredView {
    dataset: Rc<PenguinDataset>,
    indices: Vec<usize>,
}

impl FilteredView {
    pub fn new(dataset: Rc<PenguinDataset>, selection: &SpeciesSelection) -> Self {
        let indices = filtered_indices(&dataset, selection);
        FilteredView { dataset, indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn dataset(&self) -> &Rc<PenguinDataset> {
        &self.dataset
    }

    pub fn column_names(&self) -> &[String] {
        &self.dataset.column_names
    }

    pub fn rows(&self) -> impl Iterator<Item = &Penguin> + '_ {
        self.indices.iter().map(|&i| &self.dataset.rows[i])
    }

    /// Non-missing values of one numeric column.
    pub fn values(&self, attribute: Attribute) -> Vec<f64> {
        self.rows()
            .filter_map(|p| p.measurement(attribute))
            .collect()
    }
}

impl PartialEq for FilteredView {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.dataset, &other.dataset) && self.indices == other.indices
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::loader;

    pub(crate) fn penguins() -> Rc<PenguinDataset> {
        Rc::new(loader::bundled().unwrap())
    }

    /// All 8 subsets of the species domain.
    fn subsets() -> Vec<SpeciesSelection> {
        (0u8..8)
            .map(|mask| {
                Species::ALL
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, sp)| sp)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn view_matches_selected_species_for_every_subset() {
        let ds = penguins();
        for selection in subsets() {
            let view = FilteredView::new(ds.clone(), &selection);
            let expected: Vec<&Penguin> = ds
                .rows
                .iter()
                .filter(|p| selection.contains(&p.species))
                .collect();
            let actual: Vec<&Penguin> = view.rows().collect();
            assert_eq!(actual, expected, "selection {selection:?}");
        }
    }

    #[test]
    fn empty_selection_yields_empty_view() {
        let view = FilteredView::new(penguins(), &SpeciesSelection::new());
        assert!(view.is_empty());
        assert_eq!(view.rows().count(), 0);
        assert!(view.values(Attribute::BodyMassG).is_empty());
    }

    #[test]
    fn all_species_keeps_every_row() {
        let ds = penguins();
        let view = FilteredView::new(ds.clone(), &all_species());
        assert_eq!(view.len(), ds.len());
    }

    #[test]
    fn values_skip_missing_measurements() {
        let ds = penguins();
        let view = FilteredView::new(ds.clone(), &all_species());
        let missing = ds.rows.iter().filter(|p| p.bill_length_mm.is_none()).count();
        assert!(missing > 0);
        assert_eq!(view.values(Attribute::BillLengthMm).len(), ds.len() - missing);
    }
}
