use super::filter::FilteredView;

/// Placeholder shown for missing cells.
pub const MISSING: &str = "NA";

/// Pre-formatted rows of a filtered view, ready for a table widget.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub columns: Vec<String>,
    /// Position of each row in the full dataset.
    pub row_ids: Vec<usize>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn from_view(view: &FilteredView) -> Self {
        let columns = view.column_names().to_vec();
        let rows = view
            .rows()
            .map(|p| {
                columns
                    .iter()
                    .map(|c| p.cell(c).unwrap_or_else(|| MISSING.to_string()))
                    .collect()
            })
            .collect();
        TableView {
            columns,
            row_ids: view.indices().to_vec(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
