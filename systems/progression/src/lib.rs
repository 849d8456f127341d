#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that extends the level track ahead of the advancing player.
//!
//! The world owns the track window and its eviction policy; this system only
//! decides *when* the next slice of geometry is due. Each extension pushes
//! the frontier far past the trigger radius, so the check stays
//! edge-triggered without any local state.

use chroma_strike_core::{Command, PlayerSnapshot, WorldPoint};

/// Distance at which an approaching player pulls new geometry forward.
const TRIGGER_RADIUS: f32 = 120.0;

/// Pure system that emits track extension commands.
#[derive(Debug, Default)]
pub struct Progression;

impl Progression {
    /// Creates a new progression system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits `Command::ExtendTrack` when the player nears the frontier.
    pub fn handle(&self, player: &PlayerSnapshot, frontier: WorldPoint, out: &mut Vec<Command>) {
        if player.is_dead {
            return;
        }
        if player.position.distance(frontier) <= TRIGGER_RADIUS {
            out.push(Command::ExtendTrack);
        }
    }
}
