#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure movement system that closes pursuer enemies on the player.
//!
//! Movement behavior is a property of the enemy's kind rather than of a
//! type hierarchy: sentinels hold their spawn position, pursuers step
//! toward the player every tick. The system proposes steps as commands;
//! the world remains the only writer of positions.

use std::time::Duration;

use chroma_strike_core::{Command, EnemyKind, EnemyView, Event, PlayerSnapshot};

const DEFAULT_PURSUIT_SPEED: f32 = 12.0;

/// Configuration parameters required to construct the pursuit system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    speed: f32,
}

impl Config {
    /// Creates a new configuration using the provided speed in world
    /// units per second.
    #[must_use]
    pub const fn new(speed: f32) -> Self {
        Self { speed }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_PURSUIT_SPEED)
    }
}

/// Pure system that emits movement steps for pursuer enemies.
#[derive(Debug)]
pub struct Pursuit {
    speed: f32,
}

impl Pursuit {
    /// Creates a new pursuit system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            speed: config.speed,
        }
    }

    /// Consumes events and immutable views to emit movement commands.
    ///
    /// Steps clamp to the player's position so pursuers never overshoot.
    pub fn handle(
        &self,
        events: &[Event],
        enemies: &EnemyView,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        let travel = self.speed * accumulated.as_secs_f32();
        for snapshot in enemies.iter() {
            if snapshot.is_dead || snapshot.kind != EnemyKind::Pursuer {
                continue;
            }

            let to = snapshot.position.stepped_toward(player.position, travel);
            if to == snapshot.position {
                continue;
            }
            out.push(Command::MoveEnemy {
                enemy: snapshot.id,
                to,
            });
        }
    }
}
