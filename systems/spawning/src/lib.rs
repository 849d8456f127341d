#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawn scheduling system responsible for emitting enemy
//! spawn commands on a jittered cadence.

use std::time::Duration;

use chroma_strike_core::{Command, EnemyKind, Event, PlayerSnapshot, WorldOffset};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Bounds of the uniformly resampled spawn deadline in seconds.
const CADENCE_MIN_SECONDS: f32 = 1.0;
const CADENCE_MAX_SECONDS: f32 = 2.0;

/// Half-width of the square region enemies appear in around the player.
const SPAWN_OFFSET_RANGE: f32 = 50.0;

const ENEMY_ROSTER: [EnemyKind; 2] = [EnemyKind::Sentinel, EnemyKind::Pursuer];

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that deterministically emits spawn commands while the player
/// lives.
#[derive(Debug)]
pub struct Spawning {
    accumulator: Duration,
    deadline: Duration,
    rng_state: u64,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut spawning = Self {
            accumulator: Duration::ZERO,
            deadline: Duration::ZERO,
            rng_state: config.rng_seed,
        };
        spawning.deadline = spawning.sample_deadline();
        spawning
    }

    /// Consumes events and the player snapshot to emit spawn commands.
    ///
    /// Time accumulates only while the player is alive; once dead no further
    /// enemies are requested. Every crossed deadline yields one spawn and a
    /// fresh uniformly sampled deadline, so a single large delta can emit
    /// several commands.
    pub fn handle(&mut self, events: &[Event], player: &PlayerSnapshot, out: &mut Vec<Command>) {
        if player.is_dead {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        while self.accumulator >= self.deadline {
            self.accumulator -= self.deadline;
            let kind = self.select_kind();
            let position = player.position.offset_by(self.sample_offset());
            out.push(Command::SpawnEnemy { kind, position });
            self.deadline = self.sample_deadline();
        }
    }

    fn select_kind(&mut self) -> EnemyKind {
        let value = self.advance_rng();
        let index = ((value >> 33) % ENEMY_ROSTER.len() as u64) as usize;
        ENEMY_ROSTER[index]
    }

    fn sample_offset(&mut self) -> WorldOffset {
        let x = self.sample_symmetric(SPAWN_OFFSET_RANGE);
        let z = self.sample_symmetric(SPAWN_OFFSET_RANGE);
        WorldOffset::new(x, z)
    }

    fn sample_symmetric(&mut self, range: f32) -> f32 {
        let value = self.advance_rng();
        (unit_interval(value) * 2.0 - 1.0) * range
    }

    fn sample_deadline(&mut self) -> Duration {
        let value = self.advance_rng();
        let seconds =
            CADENCE_MIN_SECONDS + unit_interval(value) * (CADENCE_MAX_SECONDS - CADENCE_MIN_SECONDS);
        Duration::from_secs_f32(seconds)
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }
}

fn unit_interval(value: u64) -> f32 {
    ((value >> 40) as f32) / (1u64 << 24) as f32
}
