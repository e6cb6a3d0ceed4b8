//! Experience and player level.

use desktop_defender_core::Event;

/// Experience required to advance from `level` to the next.
#[must_use]
pub fn xp_for_level(level: u32) -> u64 {
    let required = (50.0 * f64::from(level).powf(1.8)).floor() as u64;
    required.max(1)
}

#[derive(Clone, Debug)]
pub(crate) struct Leveling {
    level: u32,
    xp: u64,
    multiplier: f64,
}

impl Leveling {
    pub(crate) fn new(level: u32, xp: u64) -> Self {
        Self {
            level: level.max(1),
            xp,
            multiplier: 1.0,
        }
    }

    pub(crate) fn level(&self) -> u32 {
        self.level
    }

    pub(crate) fn xp(&self) -> u64 {
        self.xp
    }

    pub(crate) fn set_multiplier(&mut self, multiplier: f64) {
        self.multiplier = multiplier.max(0.0);
    }

    /// Adds scaled experience, emitting one level-up per level gained and a
    /// single xp-changed afterwards.
    pub(crate) fn add_xp(&mut self, amount: u64, out_events: &mut Vec<Event>) {
        self.xp += (amount as f64 * self.multiplier).floor() as u64;
        let mut required = xp_for_level(self.level);
        while self.xp >= required {
            self.xp -= required;
            self.level += 1;
            out_events.push(Event::LevelUp { level: self.level });
            required = xp_for_level(self.level);
        }
        out_events.push(Event::XpChanged {
            current: self.xp,
            required,
            level: self.level,
        });
    }
}
