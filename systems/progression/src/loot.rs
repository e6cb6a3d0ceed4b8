//! Gear drops, inventory and equipment.

use std::collections::BTreeMap;

use desktop_defender_core::{
    gear::GearStatKind, Event, GearId, GearItem, GearSlot, GearStats, Rarity,
};
use rand::{seq::SliceRandom, Rng};

use crate::ProgressionError;

/// Items the inventory can hold.
pub const INVENTORY_CAPACITY: usize = 20;

/// Chance that a regular kill drops gear before drop-rate bonuses.
pub const BASE_DROP_CHANCE: f64 = 0.08;

#[derive(Clone, Debug)]
pub(crate) struct Loot {
    inventory: Vec<GearItem>,
    equipped: BTreeMap<GearSlot, GearItem>,
    next_id: u64,
    drop_rate_multiplier: f64,
}

impl Loot {
    pub(crate) fn new(
        inventory: Vec<GearItem>,
        equipped: BTreeMap<GearSlot, GearItem>,
        drop_rate_multiplier: f64,
    ) -> Self {
        let next_id = inventory
            .iter()
            .chain(equipped.values())
            .map(|item| item.id.get() + 1)
            .max()
            .unwrap_or(1);
        Self {
            inventory,
            equipped,
            next_id,
            drop_rate_multiplier,
        }
    }

    pub(crate) fn inventory(&self) -> &[GearItem] {
        &self.inventory
    }

    pub(crate) fn equipped(&self) -> &BTreeMap<GearSlot, GearItem> {
        &self.equipped
    }

    /// Sum of every stat line across equipped items.
    pub(crate) fn equipped_stats(&self) -> GearStats {
        let mut total = GearStats::default();
        for item in self.equipped.values() {
            total.accumulate(&item.stats);
        }
        total
    }

    /// Rolls whether a kill on `wave` drops an item, and which.
    pub(crate) fn roll_drop<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        wave: u32,
        is_boss: bool,
    ) -> Option<GearItem> {
        let chance = if is_boss {
            1.0
        } else {
            BASE_DROP_CHANCE * self.drop_rate_multiplier
        };
        if rng.gen::<f64>() > chance {
            return None;
        }

        let rarity = roll_rarity(rng, wave, is_boss);
        let slot = *GearSlot::ALL.choose(rng)?;

        let mut pool = GearStatKind::ALL;
        pool.shuffle(rng);
        let mut stats = GearStats::default();
        for kind in pool.iter().take(rarity.stat_count()) {
            *stats.line_mut(*kind) = kind.roll_value(rarity, wave);
        }

        let prefix = rarity.prefixes().choose(rng)?;
        let base = slot.base_names().choose(rng)?;

        let id = GearId::new(self.next_id);
        self.next_id += 1;
        Some(GearItem {
            id,
            name: format!("{prefix} {base}"),
            slot,
            rarity,
            stats,
            level: wave,
        })
    }

    /// Stores `item`, evicting the lowest-rarity item when full if `item`
    /// outranks it. Returns whether the item was kept.
    pub(crate) fn add_to_inventory(&mut self, item: GearItem, out_events: &mut Vec<Event>) -> bool {
        if self.inventory.len() >= INVENTORY_CAPACITY {
            let Some((weakest, rarity)) = self
                .inventory
                .iter()
                .enumerate()
                .min_by_key(|(_, held)| held.rarity)
                .map(|(index, held)| (index, held.rarity))
            else {
                return false;
            };
            if item.rarity <= rarity {
                return false;
            }
            let _ = self.inventory.remove(weakest);
        }
        self.inventory.push(item);
        out_events.push(Event::InventoryChanged);
        true
    }

    pub(crate) fn equip(
        &mut self,
        id: GearId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ProgressionError> {
        let index = self
            .inventory
            .iter()
            .position(|item| item.id == id)
            .ok_or(ProgressionError::UnknownItem(id))?;
        let item = self.inventory.remove(index);
        if let Some(previous) = self.equipped.insert(item.slot, item) {
            self.inventory.push(previous);
        }
        out_events.push(Event::GearChanged);
        out_events.push(Event::InventoryChanged);
        Ok(())
    }

    pub(crate) fn unequip(
        &mut self,
        slot: GearSlot,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ProgressionError> {
        if !self.equipped.contains_key(&slot) {
            return Err(ProgressionError::EmptySlot(slot));
        }
        if self.inventory.len() >= INVENTORY_CAPACITY {
            return Err(ProgressionError::InventoryFull);
        }
        let item = self
            .equipped
            .remove(&slot)
            .ok_or(ProgressionError::EmptySlot(slot))?;
        self.inventory.push(item);
        out_events.push(Event::GearChanged);
        out_events.push(Event::InventoryChanged);
        Ok(())
    }

    /// Destroys an inventory item and returns its scrap value.
    pub(crate) fn scrap(
        &mut self,
        id: GearId,
        out_events: &mut Vec<Event>,
    ) -> Result<u32, ProgressionError> {
        let index = self
            .inventory
            .iter()
            .position(|item| item.id == id)
            .ok_or(ProgressionError::UnknownItem(id))?;
        let item = self.inventory.remove(index);
        out_events.push(Event::InventoryChanged);
        Ok(item.scrap_value())
    }
}

fn roll_rarity<R: Rng + ?Sized>(rng: &mut R, wave: u32, is_boss: bool) -> Rarity {
    let roll = rng.gen::<f64>();
    if is_boss {
        return if roll < 0.05 && wave >= 25 {
            Rarity::Legendary
        } else if roll < 0.20 && wave >= 18 {
            Rarity::Epic
        } else {
            Rarity::Rare
        };
    }
    if roll < 0.01 && wave >= 25 {
        Rarity::Legendary
    } else if roll < 0.05 && wave >= 18 {
        Rarity::Epic
    } else if roll < 0.15 && wave >= 12 {
        Rarity::Rare
    } else if roll < 0.40 {
        Rarity::Uncommon
    } else {
        Rarity::Common
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn item(id: u64, slot: GearSlot, rarity: Rarity) -> GearItem {
        GearItem {
            id: GearId::new(id),
            name: "Basic Barrel".to_owned(),
            slot,
            rarity,
            stats: GearStats {
                damage_flat: 2,
                ..GearStats::default()
            },
            level: 1,
        }
    }

    fn full_inventory() -> Loot {
        let inventory = (0..INVENTORY_CAPACITY as u64)
            .map(|id| {
                let rarity = if id == 7 { Rarity::Common } else { Rarity::Rare };
                item(id, GearSlot::Scope, rarity)
            })
            .collect();
        Loot::new(inventory, BTreeMap::new(), 1.0)
    }

    #[test]
    fn boss_always_drops_at_least_rare() {
        let mut loot = Loot::new(Vec::new(), BTreeMap::new(), 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..50 {
            let item = loot.roll_drop(&mut rng, 5, true).expect("boss drop");
            assert_eq!(item.rarity, Rarity::Rare);
            assert_eq!(item.level, 5);
            let lines = GearStatKind::ALL
                .iter()
                .filter(|kind| item.stats.line(**kind) > 0)
                .count();
            assert_eq!(lines, Rarity::Rare.stat_count());
        }
    }

    #[test]
    fn drop_ids_are_unique() {
        let mut loot = Loot::new(vec![item(41, GearSlot::Core, Rarity::Common)], BTreeMap::new(), 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let first = loot.roll_drop(&mut rng, 3, true).expect("drop");
        let second = loot.roll_drop(&mut rng, 3, true).expect("drop");
        assert_eq!(first.id, GearId::new(42));
        assert_eq!(second.id, GearId::new(43));
    }

    #[test]
    fn regular_drop_rate_is_near_eight_percent() {
        let mut loot = Loot::new(Vec::new(), BTreeMap::new(), 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let drops = (0..10_000)
            .filter(|_| loot.roll_drop(&mut rng, 1, false).is_some())
            .count();
        assert!((600..1_000).contains(&drops), "{drops} drops");
    }

    #[test]
    fn full_inventory_evicts_lowest_rarity_for_better_item() {
        let mut loot = full_inventory();
        let mut events = Vec::new();
        assert!(!loot.add_to_inventory(item(99, GearSlot::Ammo, Rarity::Common), &mut events));
        assert!(events.is_empty());

        assert!(loot.add_to_inventory(item(100, GearSlot::Ammo, Rarity::Epic), &mut events));
        assert_eq!(loot.inventory().len(), INVENTORY_CAPACITY);
        assert!(loot.inventory().iter().all(|held| held.id != GearId::new(7)));
        assert_eq!(events, vec![Event::InventoryChanged]);
    }

    #[test]
    fn equipping_swaps_previous_item_back() {
        let mut loot = Loot::new(
            vec![
                item(1, GearSlot::Barrel, Rarity::Common),
                item(2, GearSlot::Barrel, Rarity::Rare),
            ],
            BTreeMap::new(),
            1.0,
        );
        let mut events = Vec::new();
        loot.equip(GearId::new(1), &mut events).expect("equip");
        loot.equip(GearId::new(2), &mut events).expect("equip");
        assert_eq!(
            loot.equipped().get(&GearSlot::Barrel).map(|item| item.id),
            Some(GearId::new(2))
        );
        assert_eq!(loot.inventory().len(), 1);
        assert_eq!(loot.equipped_stats().damage_flat, 2);
        assert_eq!(
            loot.equip(GearId::new(2), &mut events),
            Err(ProgressionError::UnknownItem(GearId::new(2)))
        );
    }

    #[test]
    fn unequip_needs_room_and_an_item() {
        let mut loot = full_inventory();
        let mut events = Vec::new();
        assert_eq!(
            loot.unequip(GearSlot::Core, &mut events),
            Err(ProgressionError::EmptySlot(GearSlot::Core))
        );
        loot.equip(GearId::new(3), &mut events).expect("equip");
        assert!(loot.add_to_inventory(item(50, GearSlot::Ammo, Rarity::Rare), &mut events));
        assert_eq!(
            loot.unequip(GearSlot::Scope, &mut events),
            Err(ProgressionError::InventoryFull)
        );
    }

    #[test]
    fn scrapping_returns_value() {
        let mut loot = Loot::new(vec![item(5, GearSlot::Core, Rarity::Rare)], BTreeMap::new(), 1.0);
        let mut events = Vec::new();
        assert_eq!(loot.scrap(GearId::new(5), &mut events), Ok(56));
        assert!(loot.inventory().is_empty());
    }
}
