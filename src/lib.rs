//! Tourism dataset explorer.
//!
//! The `data` module is the pipeline (parse, filter, summarise, chart, export);
//! `state` holds the per-session view every consumer reads; `app` and `ui`
//! are the egui front end that feeds user choices into it.

pub mod app;
pub mod color;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
