//! Show the effective configuration after hierarchical merging.

use anyhow::Result;

use crate::domain::models::VerifierConfig;

pub fn execute(config: &VerifierConfig, json_mode: bool) -> Result<()> {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!("{}", serde_yaml::to_string(config)?);
    }
    Ok(())
}
