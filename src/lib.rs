//! Interactive explorer for the Palmer penguins table.
//!
//! Controls feed a [`reactive::ReactiveGraph`]; the [`dashboard::Dashboard`]
//! wires the species filter and the output sinks onto it, and the egui layer
//! draws whatever the sinks last produced.

pub mod app;
pub mod chart;
pub mod color;
pub mod controls;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod reactive;
pub mod state;
pub mod ui;
