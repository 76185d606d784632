//! The `scoutsheet init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("scoutsheet.toml").exists() {
        println!("scoutsheet.toml already exists, skipping.");
    } else {
        std::fs::write("scoutsheet.toml", SAMPLE_SETTINGS)?;
        println!("Created scoutsheet.toml");
    }

    let form_path = std::path::Path::new("config.txt");
    if form_path.exists() {
        println!("config.txt already exists, skipping.");
    } else {
        std::fs::write(form_path, SAMPLE_FORM)?;
        println!("Created config.txt");
    }

    std::fs::create_dir_all("teams")?;
    let team_path = std::path::Path::new("teams/254.json");
    if team_path.exists() {
        println!("teams/254.json already exists, skipping.");
    } else {
        std::fs::write(team_path, SAMPLE_TEAM)?;
        println!("Created teams/254.json");
    }

    println!("\nNext steps:");
    println!("  1. Edit config.txt with your form fields and equations");
    println!("  2. Run: scoutsheet validate --config config.txt");
    println!("  3. Run: scoutsheet run --teams teams");

    Ok(())
}

const SAMPLE_SETTINGS: &str = r#"# scoutsheet settings

form_config = "config.txt"
team_number_key = "team_num"
output_dir = "./scoutsheet-results"
formats = ["csv", "html"]
sort_by = "Total Score"
"#;

const SAMPLE_FORM: &str = r#"# Fields: TYPE ;; descriptions ;; keys
LABEL ;; Autonomous
TEXTFIELD<number> ;; Team Number ;; team_num
STEPPER<0,20> ;; Auto Points ;; auto_points
SPACE
LABEL ;; Teleop
STEPPER<0,50> ;; Gears Delivered ;; gears
SEGMENTED_CONTROL<None,Light,Heavy> ;; Defense ;; defense
SWITCH ;; Climbed ;; climbed
TEXTFIELD<text> ;; Notes ;; notes

# Equations: Name = expression
Total Score = auto_points + gears*2 + climbed_yes*50
Auto Share = auto_points / (auto_points + gears + 1)
"#;

const SAMPLE_TEAM: &str = r#"{
  "team_num": "254",
  "auto_points": "12",
  "gears": "6",
  "defense": "Light",
  "climbed": "yes",
  "notes": "fast cycles"
}
"#;
