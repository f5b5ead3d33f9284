use std::path::Path;

use hearth_core::export::{render_export, HouseholdSnapshot};

use crate::cli::ExportFormat;
use crate::commands::common::{open_store, resolve_household};
use crate::error::CliError;

pub async fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    household: Option<&str>,
    db_path: &Path,
) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let household = resolve_household(&store, household).await?;
    let household_id = household.id.as_str();

    let snapshot = HouseholdSnapshot {
        members: store.find_by_household(&household_id).await?,
        chores: store.find_by_household(&household_id).await?,
        rewards: store.find_by_household(&household_id).await?,
        completions: store.find_by_household(&household_id).await?,
        household,
    };

    let rendered = render_export(&snapshot, format.into())?;

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::commands::household::run_init;

    #[tokio::test(flavor = "multi_thread")]
    async fn export_writes_json_file() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("hearth.db");
        run_init("Maple Street", "Alex", &db_path).await.unwrap();

        let output_path = dir.path().join("export.json");
        run_export(ExportFormat::Json, Some(&output_path), None, &db_path)
            .await
            .unwrap();

        let exported = std::fs::read_to_string(&output_path).unwrap();
        assert!(exported.contains("\"name\": \"Maple Street\""));
        assert!(exported.contains("\"display_name\": \"Alex\""));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn export_renders_markdown() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("hearth.db");
        run_init("Maple Street", "Alex", &db_path).await.unwrap();

        let output_path = dir.path().join("export.md");
        run_export(ExportFormat::Markdown, Some(&output_path), None, &db_path)
            .await
            .unwrap();

        let exported = std::fs::read_to_string(&output_path).unwrap();
        assert!(exported.contains("# Maple Street"));
        assert!(exported.contains("## Members"));
    }
}
