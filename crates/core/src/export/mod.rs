//! Report export

pub mod report;

pub use report::{month_bounds, render_csv, ReportExporter, REPORT_COLUMNS};
