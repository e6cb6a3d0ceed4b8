use std::collections::BTreeMap;

use desktop_defender_core::{
    Command, EnemyKind, EnemySpawn, Event, GearSlot, PlayerProfile, RunState, UpgradeKind, Vec2,
    WeaponKind,
};
use desktop_defender_system_progression::{Progression, ProgressionError};
use desktop_defender_world::{self as world, query, World};

fn grunt(position: Vec2) -> Command {
    Command::SpawnEnemy {
        spawn: EnemySpawn {
            kind: EnemyKind::Grunt,
            position,
            health: 10,
            speed: 0.0,
            damage: 5,
            xp_value: 30,
            gold_value: 20,
            is_elite: false,
            boss_number: None,
        },
    }
}

#[test]
fn world_kills_fund_an_upgrade_that_reaches_the_turret() {
    let mut world = World::new();
    let mut progression = Progression::new(&PlayerProfile::default(), 77);
    let mut commands = Vec::new();
    let mut events = Vec::new();
    progression.begin(&mut commands, &mut events);
    for command in commands.drain(..) {
        world::apply(&mut world, command, &mut events);
    }

    for x in [100.0, 140.0] {
        world::apply(&mut world, grunt(Vec2::new(x, 0.0)), &mut events);
    }
    let targets: Vec<_> = query::enemy_view(&world).iter().map(|enemy| enemy.id).collect();
    let mut tick = Vec::new();
    for enemy in targets {
        world::apply(
            &mut world,
            Command::DamageEnemy {
                enemy,
                amount: 50,
                knockback: 0.0,
                is_crit: false,
            },
            &mut tick,
        );
    }
    progression.handle(16.0, &tick, &query::turret(&world), &mut commands, &mut events);

    assert_eq!(progression.enemies_killed(), 2);
    assert_eq!(progression.gold(), 40);
    assert_eq!(progression.level(), 2);

    let level = progression
        .purchase_upgrade(UpgradeKind::Range, &mut commands, &mut events)
        .expect("affordable");
    assert_eq!(level, 1);
    for command in commands.drain(..) {
        world::apply(&mut world, command, &mut events);
    }
    assert_eq!(query::turret(&world).stats.range, 210.0);
    assert_eq!(progression.gold(), 20);
}

#[test]
fn resumed_run_restores_health_and_rejects_missing_gear() {
    let run = RunState {
        current_wave: 9,
        turret_health: 35,
        turret_max_health: 140,
        gold: 500,
        total_gold_earned: 900,
        level: 6,
        current_xp: 12,
        upgrade_levels: BTreeMap::from([(UpgradeKind::MaxHealth, 2)]),
        equipped_gear: BTreeMap::new(),
        inventory: Vec::new(),
        active_weapon_id: WeaponKind::Basic,
        enemies_killed_this_run: 120,
        run_start_time: 0,
        run_duration: 300_000,
    };
    let mut world = World::new();
    let mut progression = Progression::resume(&PlayerProfile::default(), &run, 3);
    let mut commands = Vec::new();
    let mut events = Vec::new();
    progression.begin(&mut commands, &mut events);
    for command in commands.drain(..) {
        world::apply(&mut world, command, &mut events);
    }

    let turret = query::turret(&world);
    assert_eq!((turret.health, turret.max_health), (35, 140));
    assert_eq!(progression.current_wave(), 9);
    assert!(events.contains(&Event::GoldChanged { amount: 500 }));
    assert_eq!(
        progression.unequip(GearSlot::Barrel, &mut commands, &mut events),
        Err(ProgressionError::EmptySlot(GearSlot::Barrel))
    );
}
