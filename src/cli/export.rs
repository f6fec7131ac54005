use anyhow::Result;

use crate::config::QuantMindConfig;

/// Export all accepted strategies as JSON to stdout.
pub fn export(config: &QuantMindConfig) -> Result<()> {
    let conn = crate::db::open_database(config.resolved_db_path())?;

    let strategies = crate::vault::store::export_all(&conn)?;

    let json = serde_json::to_string_pretty(&strategies)?;
    println!("{json}");

    eprintln!("Exported {} strategies.", strategies.len());

    Ok(())
}
