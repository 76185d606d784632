//! scoutsheet-report: CSV and HTML report generation.

pub mod csv;
pub mod html;
