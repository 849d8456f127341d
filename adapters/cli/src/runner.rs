//! Deterministic headless session driver.
//!
//! Replays a scripted play-through against the authoritative world: the
//! scripted player trails the track frontier, retunes the beam toward the
//! nearest enemy, fires, and picks up tokens, while the pure systems keep
//! the world populated. Frame ordering follows the simulation contract:
//! input and combat commands first, then the clock tick, then the systems
//! reacting to the frame's events.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

use chroma_strike_core::{Command, EnemySnapshot, Event, SessionState, WorldPoint};
use chroma_strike_system_progression::Progression;
use chroma_strike_system_pursuit::{self as pursuit, Pursuit};
use chroma_strike_system_spawning::{self as spawning, Spawning};
use chroma_strike_world::{self as world, query, World};

const BEAM_REACH: f32 = 45.0;
const PICKUP_REACH: f32 = 10.0;
const PLAYER_SPEED: f32 = 20.0;
const AIM_PROBABILITY: f64 = 0.7;
const FIRE_PROBABILITY: f64 = 0.5;
const PAUSE_EPISODE_FRAMES: u32 = 30;

/// Aggregated outcome of one headless session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SessionReport {
    pub(crate) frames: u32,
    pub(crate) score: u32,
    pub(crate) high_score: u32,
    pub(crate) combo_peak: u32,
    pub(crate) enemies_spawned: u32,
    pub(crate) enemies_killed: u32,
    pub(crate) tokens_collected: u32,
    pub(crate) hits_taken: u32,
    pub(crate) record_beaten: bool,
    pub(crate) final_state: SessionState,
}

/// Runs a scripted session and reports its outcome.
pub(crate) fn run(
    seed: &str,
    frames: u32,
    frame: Duration,
    stored_high_score: u32,
) -> SessionReport {
    let mut world = World::new(world::Config::new(
        derive_labeled_seed(seed, "world"),
        stored_high_score,
    ));
    let mut spawning = Spawning::new(spawning::Config::new(derive_labeled_seed(seed, "spawning")));
    let pursuit = Pursuit::new(pursuit::Config::default());
    let progression = Progression::new();
    let mut script = ChaCha8Rng::seed_from_u64(derive_labeled_seed(seed, "script"));

    let mut report = SessionReport {
        frames: 0,
        score: 0,
        high_score: 0,
        combo_peak: 0,
        enemies_spawned: 0,
        enemies_killed: 0,
        tokens_collected: 0,
        hits_taken: 0,
        record_beaten: false,
        final_state: SessionState::Started,
    };

    let pause_at = frames / 2;
    let resume_at = pause_at.saturating_add(PAUSE_EPISODE_FRAMES);

    for frame_index in 0..frames {
        report.frames = frame_index + 1;
        let mut frame_events = Vec::new();

        if frame_index == pause_at {
            world::apply(&mut world, Command::Pause, &mut frame_events);
        }
        if frame_index == resume_at {
            world::apply(&mut world, Command::Resume, &mut frame_events);
        }

        // Geometry first so the player always has a frontier to walk toward.
        let mut commands = Vec::new();
        progression.handle(
            &query::player(&world),
            query::track_frontier(&world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut world, command, &mut frame_events);
        }

        drive_player(&mut world, &mut script, frame, &mut frame_events);

        world::apply(&mut world, Command::Tick { dt: frame }, &mut frame_events);

        let player = query::player(&world);
        let mut commands = Vec::new();
        spawning.handle(&frame_events, &player, &mut commands);
        pursuit.handle(&frame_events, &query::enemy_view(&world), &player, &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut frame_events);
        }

        tally(&frame_events, &mut report);

        if query::session_state(&world) == SessionState::Over {
            break;
        }
    }

    let hud = query::hud(&world);
    report.score = hud.score;
    report.high_score = hud.high_score;
    report.final_state = hud.session_state;
    report
}

fn drive_player(
    world: &mut World,
    script: &mut ChaCha8Rng,
    frame: Duration,
    frame_events: &mut Vec<Event>,
) {
    let player = query::player(world);
    if !player.is_controllable {
        return;
    }

    let position = player
        .position
        .stepped_toward(query::track_frontier(world), PLAYER_SPEED * frame.as_secs_f32());
    world::apply(world, Command::RelocatePlayer { position }, frame_events);

    if let Some(nearest) = nearest_alive_enemy(world, position) {
        if nearest.color != player.beam && script.gen_bool(AIM_PROBABILITY) {
            world::apply(
                world,
                Command::SelectBeam {
                    color: nearest.color,
                },
                frame_events,
            );
        }
        if nearest.position.distance(position) <= BEAM_REACH && script.gen_bool(FIRE_PROBABILITY) {
            world::apply(
                world,
                Command::ReportBeamContact { enemy: nearest.id },
                frame_events,
            );
        }
    }

    let pickups: Vec<_> = query::token_view(world)
        .into_vec()
        .into_iter()
        .filter(|token| token.position.distance(position) <= PICKUP_REACH)
        .collect();
    for token in pickups {
        world::apply(world, Command::CollectToken { token: token.id }, frame_events);
    }
}

fn nearest_alive_enemy(world: &World, position: WorldPoint) -> Option<EnemySnapshot> {
    query::enemy_view(world)
        .into_vec()
        .into_iter()
        .filter(|snapshot| !snapshot.is_dead)
        .min_by(|left, right| {
            left.position
                .distance(position)
                .total_cmp(&right.position.distance(position))
        })
}

fn tally(events: &[Event], report: &mut SessionReport) {
    for event in events {
        match event {
            Event::EnemySpawned { .. } => report.enemies_spawned += 1,
            Event::EnemyKilled { .. } => report.enemies_killed += 1,
            Event::TokenCollected { .. } => report.tokens_collected += 1,
            Event::PlayerDamaged { .. } => report.hits_taken += 1,
            Event::ComboAdvanced { multiplier } => {
                report.combo_peak = report.combo_peak.max(*multiplier);
            }
            Event::HighScoreBeaten { .. } => report.record_beaten = true,
            _ => {}
        }
    }
}

fn derive_labeled_seed(seed: &str, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update([0x1f]);
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
