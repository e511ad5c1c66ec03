use eframe::egui::{self, Align, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::table::TableView;

const ROW_HEIGHT: f32 = 18.0;
const MAX_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Tabular renderings of the filtered view
// ---------------------------------------------------------------------------

/// Plain striped table.
pub fn data_table(ui: &mut Ui, table: &TableView) {
    ui.push_id("data_table", |ui: &mut Ui| {
        caption(ui, "Data Table", table);
        if table.columns.is_empty() {
            return;
        }
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(48.0), table.columns.len())
            .max_scroll_height(MAX_HEIGHT)
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for col in &table.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.rows.len(), |mut row| {
                    let cells = &table.rows[row.index()];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

/// Grid with resizable columns, led by each row's position in the dataset.
pub fn data_grid(ui: &mut Ui, table: &TableView) {
    ui.push_id("data_grid", |ui: &mut Ui| {
        caption(ui, "Data Grid", table);
        if table.columns.is_empty() {
            return;
        }
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::exact(36.0))
            .columns(
                Column::initial(80.0).at_least(40.0).clip(true),
                table.columns.len(),
            )
            .max_scroll_height(MAX_HEIGHT)
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("#");
                });
                for col in &table.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.rows.len(), |mut row| {
                    let index = row.index();
                    row.col(|ui: &mut Ui| {
                        ui.label(RichText::new(table.row_ids[index].to_string()).weak());
                    });
                    for cell in &table.rows[index] {
                        row.col(|ui: &mut Ui| {
                            ui.monospace(cell);
                        });
                    }
                });
            });
    });
}

fn caption(ui: &mut Ui, title: &str, table: &TableView) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(title);
        ui.label(format!("{} rows", table.len()));
    });
    if table.is_empty() {
        ui.label(egui::RichText::new("No rows match the current filter.").italics());
    }
}
