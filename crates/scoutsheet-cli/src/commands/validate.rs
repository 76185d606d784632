//! The `scoutsheet validate` command.

use std::path::PathBuf;

use anyhow::Result;

use scoutsheet_core::config::{load_config, validate_config};

pub fn execute(config_path: PathBuf) -> Result<()> {
    let config = load_config(&config_path)?;
    let columns = config.schema.column_headers();

    println!(
        "Form config: {} ({} fields, {} columns, {} equations)",
        config_path.display(),
        config.schema.len(),
        columns.len(),
        config.equations.len()
    );
    if !columns.is_empty() {
        println!("  columns: {}", columns.join(", "));
    }

    for d in &config.diagnostics {
        println!("  line {}: ERROR: {}", d.line, d.error);
    }

    let warnings = validate_config(&config);
    for w in &warnings {
        let prefix = w
            .subject
            .as_ref()
            .map(|s| format!("  [{s}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if config.diagnostics.is_empty() && warnings.is_empty() {
        println!("Form config valid.");
    } else {
        println!(
            "\n{} error(s), {} warning(s) found.",
            config.diagnostics.len(),
            warnings.len()
        );
    }

    Ok(())
}
