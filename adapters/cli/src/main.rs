#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line runner for Ghostlane levels.

mod layout_transfer;
mod levels;
mod runner;

use std::{path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use ghostlane_campaign::{completion_reward, Campaign, LevelGenerator};
use ghostlane_core::{CellCoord, TowerKind, TowerLevel, UpgradeLevels};
use ghostlane_engine::{Simulation, SimulationConfig};
use ghostlane_system_spawning::SpawnSelection;
use log::info;

use crate::{
    layout_transfer::TowerLayout,
    levels::FileCampaign,
    runner::{run_to_conclusion, RunLimits, RunReport},
};

/// Ghostlane - lane defence against waves of ghosts
#[derive(Parser, Debug)]
#[command(name = "ghostlane")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One-based level to play
    #[arg(short, long, default_value = "1")]
    level: u32,

    /// TOML level file replacing the built-in campaign
    #[arg(long)]
    levels: Option<PathBuf>,

    /// Seed for spawn and melee randomness
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Unlock harder ghost kinds as the level progresses
    #[arg(long)]
    escalating: bool,

    /// Tower layout string to build before the first frame
    #[arg(long)]
    layout: Option<String>,

    /// Extra tower as ROW,COL,KIND (e.g. 2,0,energy)
    #[arg(long = "place", value_name = "ROW,COL,KIND")]
    placements: Vec<PlacementArg>,

    /// Upgrade tier as KIND=LEVEL (e.g. basic=2)
    #[arg(long = "upgrade", value_name = "KIND=LEVEL")]
    upgrades: Vec<UpgradeArg>,

    /// Simulated milliseconds per frame
    #[arg(long, default_value = "16", value_parser = clap::value_parser!(u64).range(1..))]
    frame_ms: u64,

    /// Simulated seconds before the run gives up
    #[arg(long, default_value = "900")]
    max_seconds: u64,

    /// Print the layout string of the built defence
    #[arg(long)]
    export_layout: bool,
}

/// Tower requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PlacementArg {
    kind: TowerKind,
    cell: CellCoord,
}

impl FromStr for PlacementArg {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let fields: Vec<&str> = value.split(',').map(str::trim).collect();
        let [row, column, kind] = fields.as_slice() else {
            bail!("expected ROW,COL,KIND but got `{value}`");
        };
        let row = row
            .parse()
            .with_context(|| format!("invalid row `{row}`"))?;
        let column = column
            .parse()
            .with_context(|| format!("invalid column `{column}`"))?;
        Ok(Self {
            kind: parse_tower_kind(kind)?,
            cell: CellCoord::new(row, column),
        })
    }
}

/// Upgrade tier requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct UpgradeArg {
    kind: TowerKind,
    level: TowerLevel,
}

impl FromStr for UpgradeArg {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let (kind, level) = value
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KIND=LEVEL but got `{value}`"))?;
        let tier: u8 = level
            .trim()
            .parse()
            .with_context(|| format!("invalid tower level `{level}`"))?;
        let level = TowerLevel::try_from(tier)?;
        Ok(Self {
            kind: parse_tower_kind(kind.trim())?,
            level,
        })
    }
}

fn parse_tower_kind(name: &str) -> Result<TowerKind> {
    match name.to_ascii_lowercase().as_str() {
        "basic" => Ok(TowerKind::Basic),
        "turbo" => Ok(TowerKind::Turbo),
        "robot" => Ok(TowerKind::Robot),
        "energy" => Ok(TowerKind::Energy),
        "mega" => Ok(TowerKind::Mega),
        _ => bail!("unknown tower kind `{name}`"),
    }
}

/// Entry point for the Ghostlane command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.levels {
        Some(path) => {
            let campaign = FileCampaign::load(path)?;
            select_level(&campaign, args.level)?
        }
        None => select_level(&Campaign::new(), args.level)?,
    };

    let mut upgrades = UpgradeLevels::default();
    for upgrade in &args.upgrades {
        upgrades.set(upgrade.kind, upgrade.level);
    }

    let mut simulation = Simulation::new(SimulationConfig {
        seed: args.seed,
        spawn_selection: if args.escalating {
            SpawnSelection::Escalating
        } else {
            SpawnSelection::Uniform
        },
    });
    let name = config.name.clone();
    simulation
        .initialize_level(config, upgrades)
        .with_context(|| format!("level `{name}` cannot be started"))?;

    let mut requested = Vec::new();
    if let Some(encoded) = &args.layout {
        let layout = TowerLayout::decode(encoded).context("failed to read --layout")?;
        layout.check_fits_grid().context("failed to apply --layout")?;
        requested.extend(layout.towers.iter().map(|tower| PlacementArg {
            kind: tower.kind,
            cell: tower.cell,
        }));
    }
    requested.extend(args.placements.iter().copied());
    for placement in requested {
        let _ = simulation
            .place_tower(placement.kind, placement.cell)
            .with_context(|| {
                format!(
                    "cannot place {:?} at row {} column {}",
                    placement.kind,
                    placement.cell.row(),
                    placement.cell.column()
                )
            })?;
    }

    if args.export_layout {
        let layout = TowerLayout::capture(simulation.towers().iter());
        println!("{}", layout.encode().context("failed to encode layout")?);
    }

    info!("running level `{name}` with seed {}", args.seed);
    let report = run_to_conclusion(
        &mut simulation,
        RunLimits {
            frame: Duration::from_millis(args.frame_ms),
            max_time: Duration::from_secs(args.max_seconds),
        },
    );
    print_summary(&name, &report);
    Ok(())
}

fn select_level(generator: &impl LevelGenerator, index: u32) -> Result<ghostlane_core::LevelConfig> {
    generator.level(index).ok_or_else(|| {
        anyhow!(
            "level {index} does not exist; choose 1..={}",
            generator.level_count()
        )
    })
}

fn print_summary(name: &str, report: &RunReport) {
    println!("level:     {name}");
    println!("outcome:   {:?}", report.status);
    println!("time:      {:.1}s", report.elapsed.as_secs_f32());
    println!(
        "ghosts:    {} spawned, {} defeated of {}",
        report.spawned, report.defeated, report.quota
    );
    println!("lives:     {}", report.lives);
    println!("energy:    {}", report.energy);
    println!(
        "activity:  {} shots, {} melee exchanges, {} energy produced, {} leaks",
        report.tally.shots,
        report.tally.melee_exchanges,
        report.tally.energy_produced,
        report.tally.leaks
    );
    if let Some(completion) = report.completion {
        println!(
            "reward:    {} stars",
            completion_reward(completion.final_lives, completion.max_lives)
        );
    }
}
