//! Synchronous publish/subscribe fan-out for [`Event`] values.
//!
//! Listeners are keyed by [`EventKind`] and invoked in subscription order.
//! Nothing is buffered: an event published with no listener is dropped.

use std::{collections::HashMap, fmt};

use crate::Event;

/// Discriminant of an [`Event`], used as the subscription key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// [`Event::TimeAdvanced`].
    TimeAdvanced,
    /// [`Event::WaveStarted`].
    WaveStarted,
    /// [`Event::WaveComplete`].
    WaveComplete,
    /// [`Event::WaveHeal`].
    WaveHeal,
    /// [`Event::EnemySpawned`].
    EnemySpawned,
    /// [`Event::EnemyTeleported`].
    EnemyTeleported,
    /// [`Event::EnemyBeamFired`].
    EnemyBeamFired,
    /// [`Event::EnemyReachedTurret`].
    EnemyReachedTurret,
    /// [`Event::BossSpawned`].
    BossSpawned,
    /// [`Event::BossPhaseStarted`].
    BossPhaseStarted,
    /// [`Event::BossMinionKilled`].
    BossMinionKilled,
    /// [`Event::BossVulnerableStarted`].
    BossVulnerableStarted,
    /// [`Event::BossEnraged`].
    BossEnraged,
    /// [`Event::BossRecoveryState`].
    BossRecoveryState,
    /// [`Event::BossDamaged`].
    BossDamaged,
    /// [`Event::BossKilled`].
    BossKilled,
    /// [`Event::EnemyKilled`].
    EnemyKilled,
    /// [`Event::SpawnScouts`].
    SpawnScouts,
    /// [`Event::DamageDealt`].
    DamageDealt,
    /// [`Event::TurretDamaged`].
    TurretDamaged,
    /// [`Event::WeaponFired`].
    WeaponFired,
    /// [`Event::WeaponFiredVfx`].
    WeaponFiredVfx,
    /// [`Event::ProjectileHit`].
    ProjectileHit,
    /// [`Event::GoldChanged`].
    GoldChanged,
    /// [`Event::XpChanged`].
    XpChanged,
    /// [`Event::LevelUp`].
    LevelUp,
    /// [`Event::UpgradePurchased`].
    UpgradePurchased,
    /// [`Event::LootDropped`].
    LootDropped,
    /// [`Event::InventoryChanged`].
    InventoryChanged,
    /// [`Event::GearChanged`].
    GearChanged,
    /// [`Event::AutosaveRequested`].
    AutosaveRequested,
    /// [`Event::GameOver`].
    GameOver,
}

impl EventKind {
    /// Signal name used by presentation layers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TimeAdvanced => "time-advanced",
            Self::WaveStarted => "wave-started",
            Self::WaveComplete => "wave-complete",
            Self::WaveHeal => "wave-heal",
            Self::EnemySpawned => "enemy-spawned",
            Self::EnemyTeleported => "enemy-teleported",
            Self::EnemyBeamFired => "enemy-beam-fired",
            Self::EnemyReachedTurret => "enemy-reached-turret",
            Self::BossSpawned => "boss-spawned",
            Self::BossPhaseStarted => "boss-phase-started",
            Self::BossMinionKilled => "boss-minion-killed",
            Self::BossVulnerableStarted => "boss-vulnerable-started",
            Self::BossEnraged => "boss-enraged",
            Self::BossRecoveryState => "boss-recovery-state",
            Self::BossDamaged => "boss-damaged",
            Self::BossKilled => "boss-killed",
            Self::EnemyKilled => "enemy-killed",
            Self::SpawnScouts => "spawn-scouts",
            Self::DamageDealt => "damage-dealt",
            Self::TurretDamaged => "turret-damaged",
            Self::WeaponFired => "weapon-fired",
            Self::WeaponFiredVfx => "weapon-fired-vfx",
            Self::ProjectileHit => "projectile-hit",
            Self::GoldChanged => "gold-changed",
            Self::XpChanged => "xp-changed",
            Self::LevelUp => "level-up",
            Self::UpgradePurchased => "upgrade-purchased",
            Self::LootDropped => "loot-dropped",
            Self::InventoryChanged => "inventory-changed",
            Self::GearChanged => "gear-changed",
            Self::AutosaveRequested => "autosave-requested",
            Self::GameOver => "game-over",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Event {
    /// Subscription key of the event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::TimeAdvanced { .. } => EventKind::TimeAdvanced,
            Self::WaveStarted { .. } => EventKind::WaveStarted,
            Self::WaveComplete { .. } => EventKind::WaveComplete,
            Self::WaveHeal => EventKind::WaveHeal,
            Self::EnemySpawned { .. } => EventKind::EnemySpawned,
            Self::EnemyTeleported { .. } => EventKind::EnemyTeleported,
            Self::EnemyBeamFired { .. } => EventKind::EnemyBeamFired,
            Self::EnemyReachedTurret { .. } => EventKind::EnemyReachedTurret,
            Self::BossSpawned { .. } => EventKind::BossSpawned,
            Self::BossPhaseStarted { .. } => EventKind::BossPhaseStarted,
            Self::BossMinionKilled { .. } => EventKind::BossMinionKilled,
            Self::BossVulnerableStarted => EventKind::BossVulnerableStarted,
            Self::BossEnraged => EventKind::BossEnraged,
            Self::BossRecoveryState => EventKind::BossRecoveryState,
            Self::BossDamaged { .. } => EventKind::BossDamaged,
            Self::BossKilled { .. } => EventKind::BossKilled,
            Self::EnemyKilled { .. } => EventKind::EnemyKilled,
            Self::SpawnScouts { .. } => EventKind::SpawnScouts,
            Self::DamageDealt { .. } => EventKind::DamageDealt,
            Self::TurretDamaged { .. } => EventKind::TurretDamaged,
            Self::WeaponFired { .. } => EventKind::WeaponFired,
            Self::WeaponFiredVfx { .. } => EventKind::WeaponFiredVfx,
            Self::ProjectileHit { .. } => EventKind::ProjectileHit,
            Self::GoldChanged { .. } => EventKind::GoldChanged,
            Self::XpChanged { .. } => EventKind::XpChanged,
            Self::LevelUp { .. } => EventKind::LevelUp,
            Self::UpgradePurchased { .. } => EventKind::UpgradePurchased,
            Self::LootDropped { .. } => EventKind::LootDropped,
            Self::InventoryChanged => EventKind::InventoryChanged,
            Self::GearChanged => EventKind::GearChanged,
            Self::AutosaveRequested => EventKind::AutosaveRequested,
            Self::GameOver { .. } => EventKind::GameOver,
        }
    }
}

/// Handle returned by [`SignalBus::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

type Listener = Box<dyn FnMut(&Event)>;

/// Maps event kinds to listeners and delivers events synchronously.
#[derive(Default)]
pub struct SignalBus {
    listeners: HashMap<EventKind, Vec<(ListenerId, Listener)>>,
    next_id: u64,
}

impl SignalBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for every event of `kind`.
    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&Event) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` when it was not registered.
    pub fn unsubscribe(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let Some(listeners) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        before != listeners.len()
    }

    /// Drops every listener registered for `kind`.
    pub fn clear(&mut self, kind: EventKind) {
        let _ = self.listeners.remove(&kind);
    }

    /// Delivers `event` to its listeners in subscription order.
    pub fn publish(&mut self, event: &Event) {
        if let Some(listeners) = self.listeners.get_mut(&event.kind()) {
            for (_, listener) in listeners.iter_mut() {
                listener(event);
            }
        }
    }

    /// Delivers each event in order.
    pub fn publish_all(&mut self, events: &[Event]) {
        for event in events {
            self.publish(event);
        }
    }

    /// Number of listeners registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }
}

impl fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<(EventKind, usize)> = self
            .listeners
            .iter()
            .map(|(kind, listeners)| (*kind, listeners.len()))
            .collect();
        counts.sort();
        f.debug_struct("SignalBus").field("listeners", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[test]
    fn listeners_fire_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = SignalBus::new();
        for tag in ["first", "second"] {
            let log = Rc::clone(&log);
            let _ = bus.subscribe(EventKind::WaveComplete, move |_| log.borrow_mut().push(tag));
        }

        bus.publish(&Event::WaveComplete { wave: 1 });
        bus.publish(&Event::WaveHeal);

        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn unsubscribed_listener_stops_receiving() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = SignalBus::new();
        let counter = Rc::clone(&count);
        let id = bus.subscribe(EventKind::LevelUp, move |_| *counter.borrow_mut() += 1);

        bus.publish(&Event::LevelUp { level: 2 });
        assert!(bus.unsubscribe(EventKind::LevelUp, id));
        assert!(!bus.unsubscribe(EventKind::LevelUp, id));
        bus.publish(&Event::LevelUp { level: 3 });

        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.listener_count(EventKind::LevelUp), 0);
    }

    #[test]
    fn event_names_are_kebab_case() {
        assert_eq!(Event::WaveHeal.kind().name(), "wave-heal");
        assert_eq!(
            Event::BossMinionKilled {
                remaining: 1,
                total: 2
            }
            .kind()
            .to_string(),
            "boss-minion-killed"
        );
    }
}
