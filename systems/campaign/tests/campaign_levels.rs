use ghostlane_campaign::{Campaign, LevelGenerator};
use ghostlane_core::{Command, Event, GameStatus, UpgradeLevels, INITIAL_LIVES};
use ghostlane_world::{self as world, query, World};

#[test]
fn every_campaign_level_starts_a_playable_world() {
    let campaign = Campaign::new();
    for index in 1..=campaign.level_count() {
        let config = campaign.level(index).expect("campaign level exists");
        let energy = config.initial_energy;

        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::InitializeLevel {
                config,
                upgrades: UpgradeLevels::default(),
            },
            &mut events,
        );

        assert_eq!(
            events.first(),
            Some(&Event::LevelInitialized {
                level: index,
                energy,
                lives: INITIAL_LIVES,
            })
        );
        assert_eq!(query::status(&world), GameStatus::Playing);
        assert_eq!(query::ledger(&world).energy(), energy);
    }
}
