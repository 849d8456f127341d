#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Chroma Strike engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session world, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems
//! and external collaborators to react to deterministically. Systems consume
//! event streams, query immutable snapshots, and respond exclusively with new
//! command batches. Rendering, physics, particles, and audio live entirely
//! behind the event boundary.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Chroma Strike.";

/// Maximum health a player holds at session start.
pub const PLAYER_MAX_HEALTH: f32 = 100.0;

/// Damage dealt to the player by a mismatched beam contact.
pub const ENEMY_CONTACT_DAMAGE: f32 = 10.0;

/// Base score value credited for a color-matched kill.
pub const ENEMY_BASE_VALUE: u32 = 10;

/// Base score value credited for a collected token.
pub const TOKEN_BASE_VALUE: u32 = 5;

/// Idle window after which the combo multiplier resets to zero.
pub const COMBO_WINDOW: Duration = Duration::from_secs(5);

/// Grace period between an enemy dying and its removal from the registry.
pub const DESPAWN_GRACE: Duration = Duration::from_secs(3);

/// Lifecycle states of a single play-through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Simulation is live and all timers advance.
    Started,
    /// Simulation is frozen; timers hold and player input is revoked.
    Paused,
    /// Terminal state entered when the player dies.
    Over,
}

/// Binary color category assigned to enemies and to the player's beam.
///
/// Matching the beam color against an enemy's color is the core scoring
/// mechanic; a mismatch damages the player instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessColor {
    /// First enumerated process color.
    Blue,
    /// Second enumerated process color.
    Red,
}

/// Movement behavior selected for an enemy at spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Holds its spawn position and never moves.
    Sentinel,
    /// Closes on the player's position every tick.
    Pursuer,
}

/// Intensity requested from the camera feedback collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraShakeMode {
    /// Standard shake accompanying a matched kill.
    Normal,
    /// Stronger shake accompanying player damage.
    Heavy,
}

/// Body the physics collaborator should switch into ragdoll simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RagdollTarget {
    /// The player's character rig.
    Player,
    /// A specific enemy body.
    Enemy(EnemyId),
}

/// Variants of level geometry laid along the track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// A full playable level unit.
    Unit,
    /// A short connector bridging two units.
    Connector,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a collectible token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(u32);

impl TokenId {
    /// Creates a new token identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a track segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId(u32);

impl SegmentId {
    /// Creates a new segment identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Position on the ground plane expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    z: f32,
}

impl WorldPoint {
    /// Origin of the world coordinate system.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a new world point from its plane coordinates.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Coordinate along the first horizontal axis.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Coordinate along the second horizontal axis.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }

    /// Returns the point displaced by the provided offset.
    #[must_use]
    pub const fn offset_by(self, offset: WorldOffset) -> Self {
        Self::new(self.x + offset.x(), self.z + offset.z())
    }

    /// Euclidean distance between two points on the ground plane.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Returns the point moved `travel` world units toward `target`.
    ///
    /// The step never overshoots: when `travel` meets or exceeds the
    /// remaining distance the target itself is returned.
    #[must_use]
    pub fn stepped_toward(self, target: WorldPoint, travel: f32) -> Self {
        let distance = self.distance(target);
        if travel <= 0.0 || distance <= f32::EPSILON {
            return self;
        }
        if travel >= distance {
            return target;
        }
        let ratio = travel / distance;
        Self::new(
            self.x + (target.x - self.x) * ratio,
            self.z + (target.z - self.z) * ratio,
        )
    }
}

/// Displacement on the ground plane expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldOffset {
    x: f32,
    z: f32,
}

impl WorldOffset {
    /// Creates a new displacement from its plane components.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Component along the first horizontal axis.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Component along the second horizontal axis.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Switches the player's beam to the provided process color.
    SelectBeam {
        /// Color the beam should adopt.
        color: ProcessColor,
    },
    /// Reports that the beam intersected an enemy body.
    ///
    /// Collision detection happens in an external collaborator; the world
    /// resolves the contact against the currently selected beam color.
    ReportBeamContact {
        /// Identifier of the enemy the beam touched.
        enemy: EnemyId,
    },
    /// Pushes the player's externally integrated position into the world.
    RelocatePlayer {
        /// Position reported by the movement collaborator.
        position: WorldPoint,
    },
    /// Requests that an enemy advance to the provided position.
    MoveEnemy {
        /// Identifier of the enemy attempting to move.
        enemy: EnemyId,
        /// Destination of the attempted step.
        to: WorldPoint,
    },
    /// Requests that a new enemy enter the world.
    SpawnEnemy {
        /// Movement behavior the enemy should adopt.
        kind: EnemyKind,
        /// Position the enemy should occupy after spawning.
        position: WorldPoint,
    },
    /// Requests that the session freeze.
    Pause,
    /// Requests that a paused session continue.
    Resume,
    /// Requests that the next slice of level geometry be laid down.
    ExtendTrack,
    /// Reports that the player touched a collectible token.
    CollectToken {
        /// Identifier of the collected token.
        token: TokenId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    ///
    /// Emitted only while the session is live; pausing freezes every
    /// downstream timer by withholding this event.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the session entered a new lifecycle state.
    SessionStateChanged {
        /// State that became active after processing commands.
        state: SessionState,
    },
    /// Confirms that the player's beam adopted a new color.
    BeamSelected {
        /// Color now carried by the beam.
        color: ProcessColor,
    },
    /// Confirms that an enemy was created.
    EnemySpawned {
        /// Identifier assigned to the newly spawned enemy.
        enemy: EnemyId,
        /// Movement behavior the enemy adopted.
        kind: EnemyKind,
        /// Process color assigned for the enemy's lifetime.
        color: ProcessColor,
        /// Position the enemy occupies after spawning.
        position: WorldPoint,
    },
    /// Confirms that an enemy advanced between two positions.
    EnemyMoved {
        /// Identifier of the enemy that moved.
        enemy: EnemyId,
        /// Position occupied before the step.
        from: WorldPoint,
        /// Position occupied after the step.
        to: WorldPoint,
    },
    /// Confirms that an enemy died.
    EnemyKilled {
        /// Identifier of the enemy that died.
        enemy: EnemyId,
        /// Process color the enemy carried.
        color: ProcessColor,
        /// Position where the enemy died.
        position: WorldPoint,
    },
    /// Confirms that a dead enemy's grace period elapsed and it was reclaimed.
    EnemyRemoved {
        /// Identifier of the reclaimed enemy.
        enemy: EnemyId,
    },
    /// Reports that the player absorbed damage.
    PlayerDamaged {
        /// Amount of health lost.
        damage: f32,
        /// Health remaining after the hit.
        remaining: f32,
    },
    /// Announces the player's one-way transition to the dead state.
    PlayerDied,
    /// Reports that the combo multiplier grew.
    ComboAdvanced {
        /// Multiplier value after the addition.
        multiplier: u32,
    },
    /// Reports that the combo window drained and the multiplier reset.
    ComboExpired,
    /// Reports that the session score changed.
    ScoreChanged {
        /// Total score after the addition.
        score: u32,
        /// Points awarded by this addition.
        awarded: u32,
    },
    /// One-shot notification that the stored high score was surpassed.
    HighScoreBeaten {
        /// Score value that beat the stored record.
        score: u32,
    },
    /// Requests a camera shake from the feedback collaborator.
    CameraShakeRequested {
        /// Intensity of the requested shake.
        mode: CameraShakeMode,
    },
    /// Requests an explosion effect from the feedback collaborator.
    ExplosionRequested {
        /// Color variant of the explosion.
        color: ProcessColor,
        /// World position of the effect.
        position: WorldPoint,
    },
    /// Requests a floating feedback text from the feedback collaborator.
    FeedbackTextRequested {
        /// World position the text should rise from.
        position: WorldPoint,
    },
    /// Requests that the physics collaborator ragdoll a body.
    RagdollRequested {
        /// Body to switch into physical simulation.
        target: RagdollTarget,
    },
    /// Confirms that a segment of level geometry was laid down.
    SegmentPlaced {
        /// Identifier assigned to the segment.
        segment: SegmentId,
        /// Geometry variant of the segment.
        kind: SegmentKind,
        /// Position the segment occupies.
        position: WorldPoint,
    },
    /// Confirms that a collectible token was scattered onto the track.
    TokenSpawned {
        /// Identifier assigned to the token.
        token: TokenId,
        /// Position the token occupies.
        position: WorldPoint,
    },
    /// Confirms that the player collected a token.
    TokenCollected {
        /// Identifier of the collected token.
        token: TokenId,
        /// Position the token occupied.
        position: WorldPoint,
    },
    /// Confirms that a trailing segment left the bounded track window.
    SegmentRetired {
        /// Identifier of the reclaimed segment.
        segment: SegmentId,
    },
    /// Confirms that a token was reclaimed alongside its retired segment.
    TokenDespawned {
        /// Identifier of the reclaimed token.
        token: TokenId,
    },
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Movement behavior the enemy adopted at spawn.
    pub kind: EnemyKind,
    /// Process color assigned for the enemy's lifetime.
    pub color: ProcessColor,
    /// Position the enemy currently occupies.
    pub position: WorldPoint,
    /// Indicates whether the enemy already died.
    pub is_dead: bool,
    /// Remaining grace period before a dead enemy is reclaimed.
    pub despawn_in: Option<Duration>,
}

/// Read-only snapshot describing all enemies within the session.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single token's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TokenSnapshot {
    /// Unique identifier assigned to the token.
    pub id: TokenId,
    /// Position the token occupies on the track.
    pub position: WorldPoint,
}

/// Read-only snapshot describing all collectible tokens on the track.
#[derive(Clone, Debug, Default)]
pub struct TokenView {
    snapshots: Vec<TokenSnapshot>,
}

impl TokenView {
    /// Creates a new token view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TokenSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured token snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TokenSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TokenSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single track segment used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentSnapshot {
    /// Unique identifier assigned to the segment.
    pub id: SegmentId,
    /// Geometry variant of the segment.
    pub kind: SegmentKind,
    /// Position the segment occupies.
    pub position: WorldPoint,
}

/// Read-only snapshot describing the bounded window of track segments.
#[derive(Clone, Debug, Default)]
pub struct SegmentView {
    snapshots: Vec<SegmentSnapshot>,
}

impl SegmentView {
    /// Creates a new segment view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<SegmentSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured segment snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &SegmentSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<SegmentSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Position the player currently occupies.
    pub position: WorldPoint,
    /// Health remaining to the player.
    pub health: f32,
    /// Maximum health the player can hold.
    pub max_health: f32,
    /// Color currently carried by the beam.
    pub beam: ProcessColor,
    /// Indicates whether player input is currently honored.
    pub is_controllable: bool,
    /// Indicates whether the player already died.
    pub is_dead: bool,
}

/// Immutable representation of the combo tracker used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComboSnapshot {
    /// Current score multiplier.
    pub multiplier: u32,
    /// Time remaining before the multiplier resets.
    pub decay_remaining: Duration,
}

/// Read-only observables published to the UI collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudSnapshot {
    /// Total score accumulated this session.
    pub score: u32,
    /// Best score recorded across all sessions.
    pub high_score: u32,
    /// Current combo multiplier.
    pub combo_multiplier: u32,
    /// Player health expressed as a fraction of the maximum.
    pub player_health_fraction: f32,
    /// Lifecycle state of the session.
    pub session_state: SessionState,
}
