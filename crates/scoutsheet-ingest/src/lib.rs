//! scoutsheet-ingest: settings and team-record ingestion.
//!
//! Loads the tool settings file and turns a directory of per-team record
//! files into [`scoutsheet_core::team::TeamRecord`]s ready for scoring.

pub mod config;
pub mod error;
pub mod teams;

pub use config::{load_config, load_config_from, ScoutsheetConfig};
pub use error::IngestError;
pub use teams::{load_team_directory, load_team_file};
