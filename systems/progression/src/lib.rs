#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Run progression: gold, experience, upgrades, gear and ascension.
//!
//! [`Progression`] consumes the events of a tick and replies with turret
//! commands (stat reconfiguration, heals) plus its own economy events. The
//! ascension helpers operate on a [`PlayerProfile`] between runs.

mod ascension;
mod economy;
mod error;
mod leveling;
mod loot;
mod upgrades;

use std::collections::BTreeMap;

use desktop_defender_core::{
    Command, EnemyKind, Event, GearId, GearItem, GearSlot, PlayerProfile, RunState,
    TurretSnapshot, UpgradeKind,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

pub use ascension::{
    ascendium_reward, finish_run, purchase_ascension, starting_bonuses, RunSummary,
    StartingBonuses,
};
pub use economy::wave_bonus;
pub use error::ProgressionError;
pub use leveling::xp_for_level;
pub use loot::{BASE_DROP_CHANCE, INVENTORY_CAPACITY};
pub use upgrades::{compute_stats, ComputedStats, REGEN_INTERVAL_MS};

use economy::Economy;
use leveling::Leveling;
use loot::Loot;
use upgrades::Upgrades;

/// Stream of the run seed reserved for loot rolls.
const LOOT_STREAM: u64 = 7;

/// Share of maximum health restored when a wave is cleared.
const WAVE_HEAL_PERCENT: u32 = 15;

/// Progression state for a single run.
#[derive(Clone, Debug)]
pub struct Progression {
    economy: Economy,
    leveling: Leveling,
    loot: Loot,
    upgrades: Upgrades,
    bonuses: StartingBonuses,
    current_wave: u32,
    enemies_killed: u64,
    resumed_health: Option<u32>,
    rng: ChaCha8Rng,
}

impl Progression {
    /// Starts a fresh run with the bonuses bought in `profile`.
    #[must_use]
    pub fn new(profile: &PlayerProfile, seed: u64) -> Self {
        let bonuses = starting_bonuses(profile);
        Self {
            economy: Economy::new(bonuses.starting_gold, 0),
            leveling: Leveling::new(1, 0),
            loot: Loot::new(Vec::new(), BTreeMap::new(), bonuses.drop_rate_multiplier),
            upgrades: Upgrades::default(),
            bonuses,
            current_wave: 0,
            enemies_killed: 0,
            resumed_health: None,
            rng: loot_rng(seed),
        }
    }

    /// Continues the run captured in `run`.
    #[must_use]
    pub fn resume(profile: &PlayerProfile, run: &RunState, seed: u64) -> Self {
        let bonuses = starting_bonuses(profile);
        Self {
            economy: Economy::new(run.gold, run.total_gold_earned),
            leveling: Leveling::new(run.level, run.current_xp),
            loot: Loot::new(
                run.inventory.clone(),
                run.equipped_gear.clone(),
                bonuses.drop_rate_multiplier,
            ),
            upgrades: Upgrades::new(run.upgrade_levels.clone()),
            bonuses,
            current_wave: run.current_wave,
            enemies_killed: run.enemies_killed_this_run,
            resumed_health: Some(run.turret_health),
            rng: loot_rng(seed),
        }
    }

    /// Pushes the initial turret configuration and balance events.
    pub fn begin(&mut self, out_commands: &mut Vec<Command>, out_events: &mut Vec<Event>) {
        self.reconfigure(out_commands);
        if let Some(health) = self.resumed_health.take() {
            out_commands.push(Command::RestoreTurretHealth { health });
        }
        out_events.push(Event::GoldChanged {
            amount: self.economy.gold(),
        });
        out_events.push(Event::XpChanged {
            current: self.leveling.xp(),
            required: xp_for_level(self.leveling.level()),
            level: self.leveling.level(),
        });
    }

    /// Reacts to the events of one tick and advances regeneration.
    pub fn handle(
        &mut self,
        dt_ms: f32,
        events: &[Event],
        turret: &TurretSnapshot,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        for event in events {
            match event {
                Event::WaveStarted { wave, .. } => self.current_wave = *wave,
                Event::EnemyKilled {
                    position,
                    kind,
                    xp_value,
                    gold_value,
                    ..
                } => {
                    self.enemies_killed += 1;
                    let _ = self.economy.earn(u64::from(*gold_value), out_events);
                    self.leveling.add_xp(u64::from(*xp_value), out_events);
                    let is_boss = *kind == EnemyKind::Boss;
                    if let Some(item) = self.loot.roll_drop(&mut self.rng, self.current_wave, is_boss)
                    {
                        debug!(id = item.id.get(), rarity = ?item.rarity, "gear dropped");
                        out_events.push(Event::LootDropped {
                            position: *position,
                            item: item.clone(),
                        });
                        let _ = self.loot.add_to_inventory(item, out_events);
                    }
                }
                Event::WaveComplete { wave } => {
                    let _ = self.economy.earn(wave_bonus(*wave), out_events);
                }
                Event::WaveHeal if turret.health > 0 => {
                    out_commands.push(Command::HealTurret {
                        amount: turret.max_health * WAVE_HEAL_PERCENT / 100,
                    });
                }
                _ => {}
            }
        }

        if let Some(amount) = self
            .upgrades
            .tick_regen(dt_ms, turret.health, turret.max_health)
        {
            out_commands.push(Command::HealTurret { amount });
        }
    }

    /// Buys the next level of `upgrade` and returns the new level.
    pub fn purchase_upgrade(
        &mut self,
        upgrade: UpgradeKind,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) -> Result<u32, ProgressionError> {
        let required_level = upgrade.unlock_level();
        if self.leveling.level() < required_level {
            return Err(ProgressionError::UpgradeLocked {
                upgrade,
                required_level,
            });
        }
        let level = self.upgrades.level(upgrade);
        let cost = self
            .upgrade_cost(upgrade)
            .ok_or(ProgressionError::UpgradeMaxed(upgrade))?;
        self.economy.spend(cost, out_events)?;

        let new_level = level + 1;
        self.upgrades.set_level(upgrade, new_level);
        self.reconfigure(out_commands);
        info!(%upgrade, new_level, cost, "upgrade purchased");
        out_events.push(Event::UpgradePurchased { upgrade, new_level });
        Ok(new_level)
    }

    /// Equips an inventory item, returning any displaced item to the inventory.
    pub fn equip(
        &mut self,
        id: GearId,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ProgressionError> {
        self.loot.equip(id, out_events)?;
        self.reconfigure(out_commands);
        Ok(())
    }

    /// Moves the item in `slot` back to the inventory.
    pub fn unequip(
        &mut self,
        slot: GearSlot,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ProgressionError> {
        self.loot.unequip(slot, out_events)?;
        self.reconfigure(out_commands);
        Ok(())
    }

    /// Destroys an inventory item for gold and returns the gold paid.
    pub fn scrap(&mut self, id: GearId, out_events: &mut Vec<Event>) -> Result<u32, ProgressionError> {
        let value = self.loot.scrap(id, out_events)?;
        self.economy.deposit(u64::from(value), out_events);
        Ok(value)
    }

    /// Price of the next level of `upgrade`, or `None` once maxed.
    #[must_use]
    pub fn upgrade_cost(&self, upgrade: UpgradeKind) -> Option<u64> {
        upgrade
            .cost()
            .cost_at(self.upgrades.level(upgrade))
            .map(u64::from)
    }

    /// Stats derived from the current upgrades, gear and bonuses.
    #[must_use]
    pub fn stats(&self) -> ComputedStats {
        compute_stats(
            self.upgrades.levels(),
            &self.loot.equipped_stats(),
            &self.bonuses,
        )
    }

    /// Gold on hand.
    #[must_use]
    pub fn gold(&self) -> u64 {
        self.economy.gold()
    }

    /// Gold earned over the run.
    #[must_use]
    pub fn total_gold_earned(&self) -> u64 {
        self.economy.total_earned()
    }

    /// Player level.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.leveling.level()
    }

    /// Experience toward the next level.
    #[must_use]
    pub fn current_xp(&self) -> u64 {
        self.leveling.xp()
    }

    /// Purchased upgrade levels.
    #[must_use]
    pub fn upgrade_levels(&self) -> &BTreeMap<UpgradeKind, u32> {
        self.upgrades.levels()
    }

    /// Equipped gear keyed by slot.
    #[must_use]
    pub fn equipped(&self) -> &BTreeMap<GearSlot, GearItem> {
        self.loot.equipped()
    }

    /// Carried gear.
    #[must_use]
    pub fn inventory(&self) -> &[GearItem] {
        self.loot.inventory()
    }

    /// Enemies killed during the run.
    #[must_use]
    pub fn enemies_killed(&self) -> u64 {
        self.enemies_killed
    }

    /// Wave most recently started.
    #[must_use]
    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    fn reconfigure(&mut self, out_commands: &mut Vec<Command>) {
        let stats = self.stats();
        self.economy.set_multiplier(stats.gold_multiplier);
        self.leveling.set_multiplier(stats.xp_multiplier);
        out_commands.push(Command::ConfigureTurret {
            stats: stats.turret,
            max_health: stats.max_health,
        });
    }
}

fn loot_rng(seed: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(LOOT_STREAM);
    rng
}
