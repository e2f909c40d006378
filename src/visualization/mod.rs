//! Rendering of run results: SVG figures, console text charts, and file exports.

pub mod charts;
pub mod export;
pub mod text_plots;

pub use charts::{draw_histograms, draw_layer_chart};
pub use export::{
    export_all, export_markdown_report, export_records_csv, export_report_json, save_histograms,
    save_layer_charts,
};
pub use text_plots::{histogram, plot_layer_series, run_summary, snapshot_histograms, Series};
