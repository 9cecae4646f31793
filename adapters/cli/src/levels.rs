//! Campaigns loaded from TOML level files.

use std::{collections::HashSet, fs, path::Path};

use anyhow::{bail, Context, Result};
use ghostlane_campaign::LevelGenerator;
use ghostlane_core::LevelConfig;
use serde::Deserialize;

const SUPPORTED_LEVEL_FILE_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct LevelFile {
    version: u32,
    #[serde(default)]
    levels: Vec<LevelConfig>,
}

/// Campaign whose levels come from a file, served in file order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FileCampaign {
    levels: Vec<LevelConfig>,
}

impl FileCampaign {
    /// Reads and validates the level file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read level file {}", path.display()))?;
        parse_levels(&contents)
            .with_context(|| format!("invalid level file {}", path.display()))
    }
}

impl LevelGenerator for FileCampaign {
    fn level(&self, index: u32) -> Option<LevelConfig> {
        let position = usize::try_from(index.checked_sub(1)?).ok()?;
        self.levels.get(position).cloned()
    }

    fn level_count(&self) -> u32 {
        u32::try_from(self.levels.len()).unwrap_or(u32::MAX)
    }
}

fn parse_levels(contents: &str) -> Result<FileCampaign> {
    let file: LevelFile =
        toml::from_str(contents).context("failed to parse level file toml contents")?;
    if file.version != SUPPORTED_LEVEL_FILE_VERSION {
        bail!(
            "unsupported level file version {}; expected {}",
            file.version,
            SUPPORTED_LEVEL_FILE_VERSION
        );
    }
    if file.levels.is_empty() {
        bail!("level file does not define any [[levels]]");
    }

    let mut seen = HashSet::new();
    for level in &file.levels {
        if !seen.insert(level.id) {
            bail!("level file contains duplicate level id {}", level.id);
        }
        level
            .validate()
            .with_context(|| format!("level {} (`{}`) is invalid", level.id, level.name))?;
    }

    Ok(FileCampaign {
        levels: file.levels,
    })
}

#[cfg(test)]
mod tests {
    use ghostlane_core::GhostKind;

    use super::*;

    const TWO_LEVELS: &str = r#"
        version = 1

        [[levels]]
        id = 1
        name = "Porch"
        total_ghosts_to_defeat = 6
        spawn_interval_ms = 2500
        allowed_ghosts = ["TRAVESSO"]
        hp_multiplier = 1.0
        speed_multiplier = 1.0
        initial_energy = 75

        [[levels]]
        id = 7
        name = "Attic"
        total_ghosts_to_defeat = 20
        spawn_interval_ms = 1200
        allowed_ghosts = ["MEDROSO", "POEIRA"]
        hp_multiplier = 1.5
        speed_multiplier = 1.25
        initial_energy = 100
    "#;

    #[test]
    fn levels_are_served_in_file_order() {
        let campaign = parse_levels(TWO_LEVELS).expect("level file parses");
        assert_eq!(campaign.level_count(), 2);

        let attic = campaign.level(2).expect("second level exists");
        assert_eq!(attic.id, 7);
        assert_eq!(attic.allowed_ghosts, vec![GhostKind::Medroso, GhostKind::Poeira]);
        assert_eq!(attic.spawn_interval_ms, 1_200);
        assert!(campaign.level(0).is_none());
        assert!(campaign.level(3).is_none());
    }

    #[test]
    fn unknown_version_is_rejected() {
        let contents = TWO_LEVELS.replacen("version = 1", "version = 2", 1);
        let error = parse_levels(&contents).expect_err("version 2 is unknown");
        assert!(error.to_string().contains("unsupported level file version 2"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let contents = TWO_LEVELS.replacen("id = 7", "id = 1", 1);
        let error = parse_levels(&contents).expect_err("ids collide");
        assert!(error.to_string().contains("duplicate level id 1"));
    }

    #[test]
    fn invalid_levels_name_the_offender() {
        let contents = TWO_LEVELS.replacen("spawn_interval_ms = 1200", "spawn_interval_ms = 0", 1);
        let error = parse_levels(&contents).expect_err("zero interval is invalid");
        assert!(error.to_string().contains("level 7 (`Attic`) is invalid"));
    }

    #[test]
    fn unknown_ghost_kinds_fail_to_parse() {
        let contents = TWO_LEVELS.replacen("\"TRAVESSO\"", "\"BANSHEE\"", 1);
        assert!(parse_levels(&contents).is_err());
    }

    #[test]
    fn empty_files_are_rejected() {
        assert!(parse_levels("version = 1").is_err());
    }
}
