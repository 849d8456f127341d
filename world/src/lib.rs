#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Chroma Strike.
//!
//! A [`World`] owns one play-through: the player, the enemy registry, the
//! combo tracker, the score keeper, the level track, and the session state
//! machine. All mutations flow through [`apply`], which executes a single
//! [`Command`] deterministically and broadcasts the resulting [`Event`]
//! values. Read access goes through the [`query`] module.

mod track;

use std::time::Duration;

use chroma_strike_core::{
    CameraShakeMode, Command, EnemyId, EnemyKind, Event, ProcessColor, RagdollTarget,
    SessionState, TokenId, WorldPoint, COMBO_WINDOW, DESPAWN_GRACE, ENEMY_BASE_VALUE,
    ENEMY_CONTACT_DAMAGE, PLAYER_MAX_HEALTH, TOKEN_BASE_VALUE,
};

use track::Track;

const COLOR_ASSIGNMENT_SEED: u64 = 0x7c3a_91d4_0b56_e8af;

/// Configuration parameters required to construct a session world.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    initial_high_score: u32,
}

impl Config {
    /// Creates a new configuration from an RNG seed and the persisted record.
    ///
    /// The high score is read from the persistence collaborator before the
    /// session starts; the world never performs I/O itself.
    #[must_use]
    pub const fn new(rng_seed: u64, initial_high_score: u32) -> Self {
        Self {
            rng_seed,
            initial_high_score,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(COLOR_ASSIGNMENT_SEED, 0)
    }
}

/// Represents the authoritative Chroma Strike session state.
#[derive(Debug)]
pub struct World {
    session: SessionState,
    player: Player,
    enemies: Vec<Enemy>,
    next_enemy: u32,
    combo: Combo,
    score: ScoreBoard,
    track: Track,
    rng_state: u64,
}

impl World {
    /// Creates a new session ready for simulation.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            session: SessionState::Started,
            player: Player::new(),
            enemies: Vec::new(),
            next_enemy: 0,
            combo: Combo::new(),
            score: ScoreBoard::new(config.initial_high_score),
            track: Track::new(),
            rng_state: config.rng_seed,
        }
    }

    fn advance_time(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        match self.session {
            SessionState::Paused => {}
            SessionState::Over => self.advance_despawn_timers(dt, out_events),
            SessionState::Started => {
                out_events.push(Event::TimeAdvanced { dt });
                if self.combo.tick(dt) {
                    out_events.push(Event::ComboExpired);
                }
                self.advance_despawn_timers(dt, out_events);
            }
        }
    }

    fn advance_despawn_timers(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for enemy in self.enemies.iter_mut() {
            if let Some(remaining) = enemy.despawn_in.as_mut() {
                *remaining = remaining.saturating_sub(dt);
            }
        }

        let mut index = 0;
        while index < self.enemies.len() {
            if self.enemies[index].despawn_in == Some(Duration::ZERO) {
                let removed = self.enemies.remove(index);
                out_events.push(Event::EnemyRemoved { enemy: removed.id });
            } else {
                index += 1;
            }
        }
    }

    fn select_beam(&mut self, color: ProcessColor, out_events: &mut Vec<Event>) {
        if !self.player.controllable || self.player.beam == color {
            return;
        }
        self.player.beam = color;
        out_events.push(Event::BeamSelected { color });
    }

    fn relocate_player(&mut self, position: WorldPoint) {
        if self.player.controllable {
            self.player.position = position;
        }
    }

    fn resolve_beam_contact(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        if self.session != SessionState::Started {
            return;
        }
        let Some(index) = self.enemies.iter().position(|held| held.id == enemy) else {
            return;
        };
        if self.enemies[index].dead {
            return;
        }

        if self.enemies[index].color == self.player.beam {
            self.kill_enemy_at(index, out_events);
            let multiplier = self.combo.add(1);
            out_events.push(Event::ComboAdvanced { multiplier });
            self.award(ENEMY_BASE_VALUE, out_events);
            out_events.push(Event::CameraShakeRequested {
                mode: CameraShakeMode::Normal,
            });
        } else {
            let remaining = self.player.take_damage(ENEMY_CONTACT_DAMAGE);
            out_events.push(Event::PlayerDamaged {
                damage: ENEMY_CONTACT_DAMAGE,
                remaining,
            });
            out_events.push(Event::CameraShakeRequested {
                mode: CameraShakeMode::Heavy,
            });
            if self.player.health <= 0.0 && !self.player.dead {
                self.on_player_died(out_events);
            }
        }
    }

    fn kill_enemy_at(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let enemy = &mut self.enemies[index];
        enemy.dead = true;
        enemy.despawn_in = Some(DESPAWN_GRACE);

        let (id, color, position) = (enemy.id, enemy.color, enemy.position);
        out_events.push(Event::EnemyKilled {
            enemy: id,
            color,
            position,
        });
        out_events.push(Event::RagdollRequested {
            target: RagdollTarget::Enemy(id),
        });
        out_events.push(Event::ExplosionRequested { color, position });
        out_events.push(Event::FeedbackTextRequested { position });
    }

    fn on_player_died(&mut self, out_events: &mut Vec<Event>) {
        self.player.dead = true;
        self.player.controllable = false;
        out_events.push(Event::PlayerDied);
        out_events.push(Event::RagdollRequested {
            target: RagdollTarget::Player,
        });

        for index in 0..self.enemies.len() {
            if !self.enemies[index].dead {
                self.kill_enemy_at(index, out_events);
            }
        }

        self.session = SessionState::Over;
        out_events.push(Event::SessionStateChanged {
            state: SessionState::Over,
        });
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, position: WorldPoint, out_events: &mut Vec<Event>) {
        if self.session != SessionState::Started || self.player.dead {
            return;
        }

        let id = EnemyId::new(self.next_enemy);
        self.next_enemy = self.next_enemy.wrapping_add(1);
        let color = self.assign_color();

        self.enemies.push(Enemy {
            id,
            kind,
            color,
            position,
            dead: false,
            despawn_in: None,
        });
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind,
            color,
            position,
        });
    }

    fn assign_color(&mut self) -> ProcessColor {
        self.rng_state = next_random(self.rng_state);
        if self.rng_state >> 63 == 0 {
            ProcessColor::Blue
        } else {
            ProcessColor::Red
        }
    }

    fn step_enemy(&mut self, enemy: EnemyId, to: WorldPoint, out_events: &mut Vec<Event>) {
        if self.session != SessionState::Started {
            return;
        }
        let Some(held) = self
            .enemies
            .iter_mut()
            .find(|held| held.id == enemy && !held.dead)
        else {
            return;
        };

        let from = held.position;
        held.position = to;
        out_events.push(Event::EnemyMoved { enemy, from, to });
    }

    fn pause(&mut self, out_events: &mut Vec<Event>) {
        if self.session != SessionState::Started {
            return;
        }
        self.session = SessionState::Paused;
        self.player.controllable = false;
        out_events.push(Event::SessionStateChanged {
            state: SessionState::Paused,
        });
    }

    fn resume(&mut self, out_events: &mut Vec<Event>) {
        if self.session != SessionState::Paused {
            return;
        }
        self.session = SessionState::Started;
        self.player.controllable = true;
        out_events.push(Event::SessionStateChanged {
            state: SessionState::Started,
        });
    }

    fn extend_track(&mut self, out_events: &mut Vec<Event>) {
        if self.session != SessionState::Started {
            return;
        }
        self.track.extend(&mut self.rng_state, out_events);
    }

    fn collect_token(&mut self, token: TokenId, out_events: &mut Vec<Event>) {
        if self.session != SessionState::Started || self.player.dead {
            return;
        }
        let Some(position) = self.track.collect(token) else {
            return;
        };

        out_events.push(Event::TokenCollected { token, position });
        let multiplier = self.combo.add(1);
        out_events.push(Event::ComboAdvanced { multiplier });
        self.award(TOKEN_BASE_VALUE, out_events);
    }

    fn award(&mut self, base: u32, out_events: &mut Vec<Event>) {
        let delta = self.score.add(base, self.combo.multiplier);
        out_events.push(Event::ScoreChanged {
            score: delta.total,
            awarded: delta.awarded,
        });
        if delta.beat_record {
            out_events.push(Event::HighScoreBeaten { score: delta.total });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.advance_time(dt, out_events),
        Command::SelectBeam { color } => world.select_beam(color, out_events),
        Command::ReportBeamContact { enemy } => world.resolve_beam_contact(enemy, out_events),
        Command::RelocatePlayer { position } => world.relocate_player(position),
        Command::MoveEnemy { enemy, to } => world.step_enemy(enemy, to, out_events),
        Command::SpawnEnemy { kind, position } => world.spawn_enemy(kind, position, out_events),
        Command::Pause => world.pause(out_events),
        Command::Resume => world.resume(out_events),
        Command::ExtendTrack => world.extend_track(out_events),
        Command::CollectToken { token } => world.collect_token(token, out_events),
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use chroma_strike_core::{
        ComboSnapshot, EnemySnapshot, EnemyView, HudSnapshot, PlayerSnapshot, SegmentView,
        SessionState, TokenView, WorldPoint, PLAYER_MAX_HEALTH,
    };

    use super::World;

    /// Current lifecycle state of the session.
    #[must_use]
    pub fn session_state(world: &World) -> SessionState {
        world.session
    }

    /// Captures a read-only snapshot of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            health: world.player.health,
            max_health: PLAYER_MAX_HEALTH,
            beam: world.player.beam,
            is_controllable: world.player.controllable,
            is_dead: world.player.dead,
        }
    }

    /// Captures a read-only view of the enemies inhabiting the session.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    kind: enemy.kind,
                    color: enemy.color,
                    position: enemy.position,
                    is_dead: enemy.dead,
                    despawn_in: enemy.despawn_in,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the live tokens on the track.
    #[must_use]
    pub fn token_view(world: &World) -> TokenView {
        TokenView::from_snapshots(world.track.token_snapshots())
    }

    /// Captures a read-only view of the bounded track window.
    #[must_use]
    pub fn segment_view(world: &World) -> SegmentView {
        SegmentView::from_snapshots(world.track.segment_snapshots())
    }

    /// Captures a read-only snapshot of the combo tracker.
    #[must_use]
    pub fn combo(world: &World) -> ComboSnapshot {
        ComboSnapshot {
            multiplier: world.combo.multiplier,
            decay_remaining: world.combo.decay,
        }
    }

    /// Position of the most recently laid track piece.
    #[must_use]
    pub fn track_frontier(world: &World) -> WorldPoint {
        world.track.frontier()
    }

    /// Read-only observables published to the UI collaborator.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        HudSnapshot {
            score: world.score.score,
            high_score: world.score.high_score,
            combo_multiplier: world.combo.multiplier,
            player_health_fraction: world.player.health / PLAYER_MAX_HEALTH,
            session_state: world.session,
        }
    }
}

#[derive(Debug)]
struct Player {
    position: WorldPoint,
    health: f32,
    beam: ProcessColor,
    controllable: bool,
    dead: bool,
}

impl Player {
    fn new() -> Self {
        Self {
            position: WorldPoint::ORIGIN,
            health: PLAYER_MAX_HEALTH,
            beam: ProcessColor::Blue,
            controllable: true,
            dead: false,
        }
    }

    fn take_damage(&mut self, damage: f32) -> f32 {
        self.health = (self.health - damage).max(0.0);
        self.health
    }
}

#[derive(Debug)]
struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    color: ProcessColor,
    position: WorldPoint,
    dead: bool,
    despawn_in: Option<Duration>,
}

/// Decaying score multiplier. Invariant: `multiplier > 0` implies the decay
/// window still holds time.
#[derive(Debug)]
struct Combo {
    multiplier: u32,
    decay: Duration,
}

impl Combo {
    fn new() -> Self {
        Self {
            multiplier: 0,
            decay: Duration::ZERO,
        }
    }

    /// Grows the multiplier and refreshes the full decay window.
    fn add(&mut self, amount: u32) -> u32 {
        self.multiplier = self.multiplier.saturating_add(amount);
        self.decay = COMBO_WINDOW;
        self.multiplier
    }

    /// Counts the window down; returns true exactly when it drains.
    fn tick(&mut self, dt: Duration) -> bool {
        if self.decay.is_zero() {
            return false;
        }
        self.decay = self.decay.saturating_sub(dt);
        if self.decay.is_zero() {
            self.cancel();
            return true;
        }
        false
    }

    fn cancel(&mut self) {
        self.multiplier = 0;
        self.decay = Duration::ZERO;
    }
}

#[derive(Debug)]
struct ScoreBoard {
    score: u32,
    high_score: u32,
    record_beaten: bool,
}

#[derive(Clone, Copy, Debug)]
struct ScoreDelta {
    total: u32,
    awarded: u32,
    beat_record: bool,
}

impl ScoreBoard {
    fn new(initial_high_score: u32) -> Self {
        Self {
            score: 0,
            high_score: initial_high_score,
            record_beaten: false,
        }
    }

    /// Awards `base * multiplier` points; a zero multiplier awards nothing.
    ///
    /// The stored record rises with every crossing, but the notification is
    /// one-shot per session.
    fn add(&mut self, base: u32, multiplier: u32) -> ScoreDelta {
        let awarded = base.saturating_mul(multiplier);
        self.score = self.score.saturating_add(awarded);

        let mut beat_record = false;
        if self.score > self.high_score {
            self.high_score = self.score;
            if !self.record_beaten {
                self.record_beaten = true;
                beat_record = true;
            }
        }

        ScoreDelta {
            total: self.score,
            awarded,
            beat_record,
        }
    }
}

fn next_random(state: u64) -> u64 {
    state
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1)
}

fn unit_interval(value: u64) -> f32 {
    ((value >> 40) as f32) / (1u64 << 24) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_strike_core::EnemyView;

    fn new_world() -> World {
        World::new(Config::new(0x1234_5678_9abc_def0, 0))
    }

    fn applied(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    fn spawn_one(world: &mut World, position: WorldPoint) -> (EnemyId, ProcessColor) {
        let events = applied(
            world,
            Command::SpawnEnemy {
                kind: EnemyKind::Sentinel,
                position,
            },
        );
        match events.as_slice() {
            [Event::EnemySpawned { enemy, color, .. }] => (*enemy, *color),
            other => panic!("unexpected spawn events: {other:?}"),
        }
    }

    fn mismatched(color: ProcessColor) -> ProcessColor {
        match color {
            ProcessColor::Blue => ProcessColor::Red,
            ProcessColor::Red => ProcessColor::Blue,
        }
    }

    /// Spawns an enemy, aligns the beam to its color, and resolves a contact.
    fn matched_kill(world: &mut World) -> Vec<Event> {
        let (enemy, color) = spawn_one(world, WorldPoint::new(10.0, 10.0));
        let _ = applied(world, Command::SelectBeam { color });
        applied(world, Command::ReportBeamContact { enemy })
    }

    fn find_snapshot(view: EnemyView, enemy: EnemyId) -> chroma_strike_core::EnemySnapshot {
        view.into_vec()
            .into_iter()
            .find(|snapshot| snapshot.id == enemy)
            .expect("enemy present in view")
    }

    #[test]
    fn matched_contact_kills_enemy_and_scores_with_fresh_multiplier() {
        let mut world = new_world();
        let (enemy, color) = spawn_one(&mut world, WorldPoint::new(5.0, 5.0));
        let _ = applied(&mut world, Command::SelectBeam { color });

        let events = applied(&mut world, Command::ReportBeamContact { enemy });

        assert!(events.contains(&Event::EnemyKilled {
            enemy,
            color,
            position: WorldPoint::new(5.0, 5.0),
        }));
        assert!(events.contains(&Event::ComboAdvanced { multiplier: 1 }));
        assert!(events.contains(&Event::ScoreChanged {
            score: ENEMY_BASE_VALUE,
            awarded: ENEMY_BASE_VALUE,
        }));
        assert!(events.contains(&Event::CameraShakeRequested {
            mode: CameraShakeMode::Normal,
        }));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::PlayerDamaged { .. })));

        assert!(find_snapshot(query::enemy_view(&world), enemy).is_dead);
        assert!((query::player(&world).health - PLAYER_MAX_HEALTH).abs() < f32::EPSILON);
    }

    #[test]
    fn mismatched_contact_damages_player_and_spares_enemy() {
        let mut world = new_world();
        let (enemy, color) = spawn_one(&mut world, WorldPoint::new(5.0, 5.0));
        let _ = applied(&mut world, Command::SelectBeam { color: mismatched(color) });

        let events = applied(&mut world, Command::ReportBeamContact { enemy });

        assert!(events.contains(&Event::PlayerDamaged {
            damage: ENEMY_CONTACT_DAMAGE,
            remaining: PLAYER_MAX_HEALTH - ENEMY_CONTACT_DAMAGE,
        }));
        assert!(events.contains(&Event::CameraShakeRequested {
            mode: CameraShakeMode::Heavy,
        }));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::EnemyKilled { .. })));

        assert!(!find_snapshot(query::enemy_view(&world), enemy).is_dead);
        assert_eq!(query::combo(&world).multiplier, 0);
    }

    #[test]
    fn contact_with_dead_enemy_is_a_no_op() {
        let mut world = new_world();
        let (enemy, color) = spawn_one(&mut world, WorldPoint::new(5.0, 5.0));
        let _ = applied(&mut world, Command::SelectBeam { color });
        let _ = applied(&mut world, Command::ReportBeamContact { enemy });
        let hud_before = query::hud(&world);

        let events = applied(&mut world, Command::ReportBeamContact { enemy });

        assert!(events.is_empty());
        assert_eq!(query::hud(&world), hud_before);
        assert_eq!(query::combo(&world).multiplier, 1);
    }

    #[test]
    fn misses_leave_an_active_combo_untouched() {
        let mut world = new_world();
        let _ = matched_kill(&mut world);
        assert_eq!(query::combo(&world).multiplier, 1);

        let (enemy, color) = spawn_one(&mut world, WorldPoint::new(7.0, 7.0));
        let _ = applied(&mut world, Command::SelectBeam { color: mismatched(color) });
        let _ = applied(&mut world, Command::ReportBeamContact { enemy });

        assert_eq!(query::combo(&world).multiplier, 1);
        assert_eq!(query::combo(&world).decay_remaining, COMBO_WINDOW);
    }

    #[test]
    fn combo_expires_when_its_window_drains() {
        let mut world = new_world();
        world.combo = Combo {
            multiplier: 3,
            decay: Duration::from_millis(10),
        };

        let events = applied(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(20),
            },
        );

        assert!(events.contains(&Event::ComboExpired));
        let combo = query::combo(&world);
        assert_eq!(combo.multiplier, 0);
        assert_eq!(combo.decay_remaining, Duration::ZERO);
    }

    #[test]
    fn combo_addition_refreshes_the_window_instead_of_extending_it() {
        let mut world = new_world();
        let _ = matched_kill(&mut world);
        let _ = applied(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(2),
            },
        );
        assert_eq!(
            query::combo(&world).decay_remaining,
            COMBO_WINDOW - Duration::from_secs(2)
        );

        let _ = matched_kill(&mut world);

        let combo = query::combo(&world);
        assert_eq!(combo.multiplier, 2);
        assert_eq!(combo.decay_remaining, COMBO_WINDOW);
    }

    #[test]
    fn repeated_damage_kills_the_player_exactly_once() {
        let mut world = new_world();
        let (enemy, color) = spawn_one(&mut world, WorldPoint::new(5.0, 5.0));
        let _ = applied(&mut world, Command::SelectBeam { color: mismatched(color) });

        let mut all_events = Vec::new();
        for _ in 0..10 {
            all_events.extend(applied(&mut world, Command::ReportBeamContact { enemy }));
        }

        let deaths = all_events
            .iter()
            .filter(|event| matches!(event, Event::PlayerDied))
            .count();
        assert_eq!(deaths, 1);
        assert!(all_events.contains(&Event::SessionStateChanged {
            state: SessionState::Over,
        }));

        let player = query::player(&world);
        assert!(player.is_dead);
        assert!(!player.is_controllable);
        assert!(player.health.abs() < f32::EPSILON);
        assert_eq!(query::session_state(&world), SessionState::Over);

        // Contacts after the terminal transition resolve to nothing.
        assert!(applied(&mut world, Command::ReportBeamContact { enemy }).is_empty());
    }

    #[test]
    fn player_death_force_kills_survivors_without_scoring() {
        let mut world = new_world();
        let (hostile, color) = spawn_one(&mut world, WorldPoint::new(5.0, 5.0));
        let (bystander_a, _) = spawn_one(&mut world, WorldPoint::new(-5.0, 0.0));
        let (bystander_b, _) = spawn_one(&mut world, WorldPoint::new(0.0, -5.0));
        let _ = applied(&mut world, Command::SelectBeam { color: mismatched(color) });

        let mut all_events = Vec::new();
        for _ in 0..10 {
            all_events.extend(applied(&mut world, Command::ReportBeamContact { enemy: hostile }));
        }

        for enemy in [hostile, bystander_a, bystander_b] {
            assert!(find_snapshot(query::enemy_view(&world), enemy).is_dead);
        }
        assert!(all_events.contains(&Event::RagdollRequested {
            target: RagdollTarget::Player,
        }));
        assert_eq!(query::hud(&world).score, 0);
        assert!(!all_events
            .iter()
            .any(|event| matches!(event, Event::ComboAdvanced { .. })));
    }

    #[test]
    fn high_score_notification_fires_exactly_once_per_session() {
        let mut world = World::new(Config::new(0x1234_5678_9abc_def0, 80));

        let mut all_events = Vec::new();
        for _ in 0..5 {
            all_events.extend(matched_kill(&mut world));
        }

        // Chained kills score 10, 20, 30, 40, 50; the record falls at 100.
        let crossings: Vec<&Event> = all_events
            .iter()
            .filter(|event| matches!(event, Event::HighScoreBeaten { .. }))
            .collect();
        assert_eq!(crossings, vec![&Event::HighScoreBeaten { score: 100 }]);

        let hud = query::hud(&world);
        assert_eq!(hud.score, 150);
        assert_eq!(hud.high_score, 150);
    }

    #[test]
    fn pausing_freezes_timers_and_revokes_input() {
        let mut world = new_world();
        let _ = matched_kill(&mut world);

        let events = applied(&mut world, Command::Pause);
        assert!(events.contains(&Event::SessionStateChanged {
            state: SessionState::Paused,
        }));
        assert!(!query::player(&world).is_controllable);

        let frozen = applied(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(30),
            },
        );
        assert!(frozen.is_empty());
        assert_eq!(query::combo(&world).decay_remaining, COMBO_WINDOW);

        let _ = applied(
            &mut world,
            Command::SelectBeam {
                color: ProcessColor::Red,
            },
        );
        let _ = applied(
            &mut world,
            Command::RelocatePlayer {
                position: WorldPoint::new(99.0, 99.0),
            },
        );
        assert_eq!(query::player(&world).position, WorldPoint::ORIGIN);

        let resumed = applied(&mut world, Command::Resume);
        assert!(resumed.contains(&Event::SessionStateChanged {
            state: SessionState::Started,
        }));
        assert!(query::player(&world).is_controllable);
        assert_eq!(query::combo(&world).multiplier, 1);
    }

    #[test]
    fn pause_and_resume_are_ignored_once_the_session_is_over() {
        let mut world = new_world();
        let (enemy, color) = spawn_one(&mut world, WorldPoint::new(5.0, 5.0));
        let _ = applied(&mut world, Command::SelectBeam { color: mismatched(color) });
        for _ in 0..10 {
            let _ = applied(&mut world, Command::ReportBeamContact { enemy });
        }
        assert_eq!(query::session_state(&world), SessionState::Over);

        assert!(applied(&mut world, Command::Pause).is_empty());
        assert!(applied(&mut world, Command::Resume).is_empty());
        assert_eq!(query::session_state(&world), SessionState::Over);
    }

    #[test]
    fn spawning_is_suppressed_once_the_player_is_dead() {
        let mut world = new_world();
        let (enemy, color) = spawn_one(&mut world, WorldPoint::new(5.0, 5.0));
        let _ = applied(&mut world, Command::SelectBeam { color: mismatched(color) });
        for _ in 0..10 {
            let _ = applied(&mut world, Command::ReportBeamContact { enemy });
        }
        let population = query::enemy_view(&world).into_vec().len();

        let events = applied(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Pursuer,
                position: WorldPoint::new(20.0, 20.0),
            },
        );

        assert!(events.is_empty());
        assert_eq!(query::enemy_view(&world).into_vec().len(), population);
    }

    #[test]
    fn dead_enemies_are_reclaimed_after_the_grace_period() {
        let mut world = new_world();
        let (enemy, color) = spawn_one(&mut world, WorldPoint::new(5.0, 5.0));
        let _ = applied(&mut world, Command::SelectBeam { color });
        let _ = applied(&mut world, Command::ReportBeamContact { enemy });

        let early = applied(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
        );
        assert!(!early
            .iter()
            .any(|event| matches!(event, Event::EnemyRemoved { .. })));

        let later = applied(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(2),
            },
        );
        assert!(later.contains(&Event::EnemyRemoved { enemy }));
        assert!(query::enemy_view(&world).into_vec().is_empty());
    }

    #[test]
    fn corpses_finish_despawning_while_the_session_is_over() {
        let mut world = new_world();
        let (enemy, color) = spawn_one(&mut world, WorldPoint::new(5.0, 5.0));
        let _ = applied(&mut world, Command::SelectBeam { color: mismatched(color) });
        for _ in 0..10 {
            let _ = applied(&mut world, Command::ReportBeamContact { enemy });
        }

        let events = applied(
            &mut world,
            Command::Tick {
                dt: DESPAWN_GRACE,
            },
        );

        assert!(events.contains(&Event::EnemyRemoved { enemy }));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. })));
    }

    #[test]
    fn beam_selection_emits_only_on_change() {
        let mut world = new_world();

        let changed = applied(
            &mut world,
            Command::SelectBeam {
                color: ProcessColor::Red,
            },
        );
        assert_eq!(
            changed,
            vec![Event::BeamSelected {
                color: ProcessColor::Red,
            }]
        );

        let unchanged = applied(
            &mut world,
            Command::SelectBeam {
                color: ProcessColor::Red,
            },
        );
        assert!(unchanged.is_empty());
    }

    #[test]
    fn only_living_enemies_step() {
        let mut world = new_world();
        let (enemy, color) = spawn_one(&mut world, WorldPoint::new(30.0, 0.0));

        let destination = WorldPoint::new(25.0, 0.0);
        let events = applied(&mut world, Command::MoveEnemy { enemy, to: destination });
        assert!(events.contains(&Event::EnemyMoved {
            enemy,
            from: WorldPoint::new(30.0, 0.0),
            to: destination,
        }));
        assert_eq!(
            find_snapshot(query::enemy_view(&world), enemy).position,
            destination
        );

        let _ = applied(&mut world, Command::SelectBeam { color });
        let _ = applied(&mut world, Command::ReportBeamContact { enemy });
        let after_death = applied(
            &mut world,
            Command::MoveEnemy {
                enemy,
                to: WorldPoint::new(0.0, 0.0),
            },
        );
        assert!(after_death.is_empty());
    }

    #[test]
    fn token_collection_scores_through_the_combo() {
        let mut world = new_world();
        let _ = applied(&mut world, Command::ExtendTrack);

        let token = query::token_view(&world)
            .into_vec()
            .first()
            .expect("extension scatters tokens")
            .id;

        let events = applied(&mut world, Command::CollectToken { token });
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::TokenCollected { .. })));
        assert!(events.contains(&Event::ComboAdvanced { multiplier: 1 }));
        assert!(events.contains(&Event::ScoreChanged {
            score: TOKEN_BASE_VALUE,
            awarded: TOKEN_BASE_VALUE,
        }));

        let again = applied(&mut world, Command::CollectToken { token });
        assert!(again.is_empty());
    }

    #[test]
    fn score_board_awards_nothing_at_multiplier_zero() {
        let mut board = ScoreBoard::new(50);

        let delta = board.add(10, 0);
        assert_eq!(delta.awarded, 0);
        assert_eq!(delta.total, 0);
        assert!(!delta.beat_record);
        assert_eq!(board.high_score, 50);
    }

    #[test]
    fn combo_cancel_is_idempotent() {
        let mut combo = Combo::new();
        let _ = combo.add(2);
        combo.cancel();
        combo.cancel();
        assert_eq!(combo.multiplier, 0);
        assert_eq!(combo.decay, Duration::ZERO);
        assert!(!combo.tick(Duration::from_secs(1)));
    }
}
