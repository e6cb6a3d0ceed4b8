use desktop_defender_core::{Command, EnemyKind, Event, Vec2};
use desktop_defender_system_wave_director::{BossPhase, WaveDirector};
use desktop_defender_world::{self as world, query, World};

const DT_MS: f32 = 100.0;
const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

struct Harness {
    world: World,
    director: WaveDirector,
    kill_boss: bool,
    kill_all: bool,
}

impl Harness {
    fn at_wave(wave: u32) -> Self {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::PlaceTurret {
                position: VIEWPORT / 2.0,
            },
            &mut events,
        );
        Self {
            world,
            director: WaveDirector::starting_at(0x5eed, VIEWPORT, wave),
            kill_boss: false,
            kill_all: false,
        }
    }

    fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt_ms: DT_MS }, &mut events);

        let mut commands = Vec::new();
        self.director.spawn_phase(
            DT_MS,
            query::active_enemy_count(&self.world),
            &mut commands,
            &mut events,
        );
        commands.push(Command::StepEntities { dt_ms: DT_MS });
        self.apply_all(&mut commands, &mut events);

        let boss = self.director.boss_enemy();
        let targets: Vec<_> = query::enemy_view(&self.world)
            .iter()
            .filter(|enemy| {
                self.kill_all
                    || enemy.kind == EnemyKind::BossMinion
                    || (self.kill_boss && Some(enemy.id) == boss)
            })
            .map(|enemy| enemy.id)
            .collect();
        for enemy in targets {
            commands.push(Command::DamageEnemy {
                enemy,
                amount: 1_000_000,
                knockback: 0.0,
                is_crit: false,
            });
        }
        self.apply_all(&mut commands, &mut events);

        self.director.observe(&events.clone(), &mut commands, &mut events);
        self.apply_all(&mut commands, &mut events);

        let boss_alive = boss.map_or(false, |id| query::is_enemy_active(&self.world, id));
        self.director.check_completion(
            query::active_enemy_count(&self.world),
            boss_alive,
            &mut events,
        );
        events
    }

    fn apply_all(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }

    fn run_until(&mut self, limit_ms: f32, mut stop: impl FnMut(&Event) -> bool) -> Vec<Event> {
        let mut log = Vec::new();
        let mut elapsed = 0.0;
        while elapsed < limit_ms {
            let events = self.tick();
            elapsed += DT_MS;
            let done = events.iter().any(&mut stop);
            log.extend(events);
            if done {
                return log;
            }
        }
        panic!("condition not reached within {limit_ms} ms");
    }
}

#[test]
fn boss_wave_runs_gauntlet_then_completes_once() {
    let mut harness = Harness::at_wave(5);

    let opening = harness.run_until(5_000.0, |event| {
        matches!(event, Event::BossPhaseStarted { .. })
    });
    assert!(opening.contains(&Event::WaveStarted {
        wave: 5,
        is_boss_wave: true
    }));
    assert!(opening.contains(&Event::BossSpawned { wave: 5 }));
    assert!(opening.contains(&Event::BossPhaseStarted { total: 12 }));
    assert_eq!(harness.director.boss_phase(), BossPhase::Orbit);
    let boss = harness.director.boss_enemy().expect("boss handle");

    let gauntlet = harness.run_until(60_000.0, |event| {
        matches!(event, Event::BossVulnerableStarted)
    });
    let kills: Vec<u32> = gauntlet
        .iter()
        .filter_map(|event| match event {
            Event::BossMinionKilled { remaining, total } => {
                assert_eq!(*total, 12);
                Some(*remaining)
            }
            _ => None,
        })
        .collect();
    assert_eq!(kills, (0..12).rev().collect::<Vec<_>>());
    assert_eq!(harness.director.boss_phase(), BossPhase::Vulnerable);
    let status = query::boss_status(&harness.world, boss).expect("boss alive");
    assert!(!status.shielded);
    assert!(status.overloaded);

    let overload = harness.run_until(5_000.0, |event| matches!(event, Event::BossEnraged));
    assert!(!overload
        .iter()
        .any(|event| matches!(event, Event::BossVulnerableStarted)));

    harness.kill_boss = true;
    let finale = harness.run_until(1_000.0, |event| {
        matches!(event, Event::WaveComplete { .. })
    });
    assert!(finale
        .iter()
        .any(|event| matches!(event, Event::BossKilled { .. })));
    assert!(finale.contains(&Event::WaveHeal));
    assert!(harness.director.is_in_break());

    let mut after = Vec::new();
    for _ in 0..10 {
        after.extend(harness.tick());
    }
    assert!(!after
        .iter()
        .any(|event| matches!(event, Event::WaveComplete { .. })));
}

#[test]
fn regular_wave_completes_once_then_waits_out_the_break() {
    let mut harness = Harness::at_wave(1);
    harness.kill_all = true;

    let wave = harness.run_until(30_000.0, |event| {
        matches!(event, Event::WaveComplete { .. })
    });
    assert!(wave.contains(&Event::WaveStarted {
        wave: 1,
        is_boss_wave: false
    }));
    let spawned = wave
        .iter()
        .filter(|event| matches!(event, Event::EnemySpawned { .. }))
        .count();
    let killed = wave
        .iter()
        .filter(|event| matches!(event, Event::EnemyKilled { .. }))
        .count();
    assert!(spawned > 0);
    assert_eq!(spawned, killed);
    assert_eq!(
        harness.director.enemies_spawned(),
        harness.director.wave_config().enemy_count
    );
    let completions: Vec<&Event> = wave
        .iter()
        .filter(|event| matches!(event, Event::WaveComplete { .. }))
        .collect();
    assert_eq!(completions, vec![&Event::WaveComplete { wave: 1 }]);
    assert!(harness.director.is_in_break());

    let break_ticks = (harness.director.wave_config().break_time_ms / DT_MS) as usize;
    for tick in 1..break_ticks {
        let events = harness.tick();
        assert!(
            !events.iter().any(|event| matches!(
                event,
                Event::WaveStarted { .. } | Event::WaveComplete { .. }
            )),
            "tick {tick} of the break emitted {events:?}"
        );
    }
    assert!(harness.tick().contains(&Event::WaveStarted {
        wave: 2,
        is_boss_wave: false
    }));
}

#[test]
fn identical_seeds_replay_identical_spawns() {
    let spawns = |seed: u64| {
        let mut director = WaveDirector::starting_at(seed, VIEWPORT, 16);
        let mut commands = Vec::new();
        let mut events = Vec::new();
        director.spawn_phase(2_000.0, 0, &mut commands, &mut events);
        for _ in 0..20 {
            director.spawn_phase(2_000.0, 0, &mut commands, &mut events);
        }
        commands
    };

    assert_eq!(spawns(42), spawns(42));
    assert_ne!(spawns(42), spawns(43));
}
