//! Overlap detection between projectiles, enemies and the turret.

use desktop_defender_core::{EnemyView, Overlap, ProjectileView, TurretSnapshot};

/// Source of the overlap pairs resolved by combat each tick.
///
/// Implementations report projectile pairs before turret contacts so a kill
/// by a projectile wins over a contact in the same tick.
pub trait CollisionLayer {
    /// Appends every overlap present in the provided state to `out`.
    fn overlaps(
        &mut self,
        turret: &TurretSnapshot,
        enemies: &EnemyView,
        projectiles: &ProjectileView,
        out: &mut Vec<Overlap>,
    );
}

/// Brute-force circle tests over every active pair, in slot order.
#[derive(Clone, Copy, Debug, Default)]
pub struct CircleOverlap;

impl CollisionLayer for CircleOverlap {
    fn overlaps(
        &mut self,
        turret: &TurretSnapshot,
        enemies: &EnemyView,
        projectiles: &ProjectileView,
        out: &mut Vec<Overlap>,
    ) {
        for projectile in projectiles.iter() {
            for enemy in enemies.iter() {
                let reach = projectile.radius + enemy.radius;
                if projectile.position.distance_squared(enemy.position) <= reach * reach {
                    out.push(Overlap::ProjectileEnemy {
                        projectile: projectile.id,
                        enemy: enemy.id,
                    });
                }
            }
        }

        for enemy in enemies.iter() {
            let reach = turret.radius + enemy.radius;
            if turret.position.distance_squared(enemy.position) <= reach * reach {
                out.push(Overlap::EnemyTurret { enemy: enemy.id });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desktop_defender_core::{
        EnemyId, EnemyKind, EnemySnapshot, ProjectileId, ProjectileSnapshot, TurretStats, Vec2,
        WeaponKind, PROJECTILE_RADIUS, TURRET_RADIUS,
    };

    fn enemy(index: u32, position: Vec2) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(index, 0),
            kind: EnemyKind::Grunt,
            position,
            velocity: Vec2::ZERO,
            radius: 10.0,
            health: 10,
            max_health: 10,
            invulnerable: false,
            is_elite: false,
        }
    }

    #[test]
    fn projectile_pairs_precede_turret_contacts() {
        let turret = TurretSnapshot {
            position: Vec2::ZERO,
            radius: TURRET_RADIUS,
            health: 100,
            max_health: 100,
            stats: TurretStats::default(),
        };
        let enemies = EnemyView::from_snapshots(vec![
            enemy(0, Vec2::new(25.0, 0.0)),
            enemy(1, Vec2::new(100.0, 0.0)),
        ]);
        let projectiles = ProjectileView::from_snapshots(vec![ProjectileSnapshot {
            id: ProjectileId::new(3, 1),
            position: Vec2::new(112.0, 0.0),
            velocity: Vec2::ZERO,
            radius: PROJECTILE_RADIUS,
            damage: 10,
            piercing: 0,
            weapon: WeaponKind::Basic,
        }]);
        let mut out = Vec::new();

        CircleOverlap.overlaps(&turret, &enemies, &projectiles, &mut out);

        assert_eq!(
            out,
            vec![
                Overlap::ProjectileEnemy {
                    projectile: ProjectileId::new(3, 1),
                    enemy: EnemyId::new(1, 0),
                },
                Overlap::EnemyTurret {
                    enemy: EnemyId::new(0, 0),
                },
            ]
        );
    }
}
