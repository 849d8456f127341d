//! Bounded sliding window of level geometry laid ahead of the player.

use std::collections::VecDeque;

use chroma_strike_core::{
    Event, SegmentId, SegmentKind, SegmentSnapshot, TokenId, TokenSnapshot, WorldOffset,
    WorldPoint,
};

use crate::{next_random, unit_interval};

/// Diagonal stride between consecutive track pieces in world units.
const SEGMENT_STRIDE: f32 = 70.7;
/// Half-width of the square region tokens scatter across around a unit.
const TOKEN_SCATTER_RANGE: f32 = 25.0;
const TOKENS_PER_UNIT: usize = 3;
/// Trailing pieces kept alive before the oldest are reclaimed.
const MAX_TRAILING_SEGMENTS: usize = 12;

/// Monotonically advancing strip of level geometry with bounded history.
#[derive(Debug)]
pub(crate) struct Track {
    cursor: WorldPoint,
    segments: VecDeque<Segment>,
    next_segment: u32,
    next_token: u32,
}

#[derive(Debug)]
struct Segment {
    id: SegmentId,
    kind: SegmentKind,
    position: WorldPoint,
    tokens: Vec<Token>,
}

#[derive(Debug)]
struct Token {
    id: TokenId,
    position: WorldPoint,
}

impl Track {
    pub(crate) fn new() -> Self {
        Self {
            cursor: WorldPoint::ORIGIN,
            segments: VecDeque::new(),
            next_segment: 0,
            next_token: 0,
        }
    }

    /// Position of the most recently laid piece; the spawn cursor.
    pub(crate) fn frontier(&self) -> WorldPoint {
        self.cursor
    }

    /// Lays one connector and one unit past the cursor, scatters tokens onto
    /// the unit, and reclaims pieces that fell out of the trailing window.
    pub(crate) fn extend(&mut self, rng_state: &mut u64, out_events: &mut Vec<Event>) {
        for kind in [SegmentKind::Connector, SegmentKind::Unit] {
            self.cursor = self
                .cursor
                .offset_by(WorldOffset::new(SEGMENT_STRIDE, SEGMENT_STRIDE));

            let id = SegmentId::new(self.next_segment);
            self.next_segment = self.next_segment.wrapping_add(1);

            let mut tokens = Vec::new();
            if kind == SegmentKind::Unit {
                for _ in 0..TOKENS_PER_UNIT {
                    let offset = WorldOffset::new(
                        self.scatter_offset(rng_state),
                        self.scatter_offset(rng_state),
                    );
                    let token = Token {
                        id: TokenId::new(self.next_token),
                        position: self.cursor.offset_by(offset),
                    };
                    self.next_token = self.next_token.wrapping_add(1);
                    out_events.push(Event::TokenSpawned {
                        token: token.id,
                        position: token.position,
                    });
                    tokens.push(token);
                }
            }

            out_events.push(Event::SegmentPlaced {
                segment: id,
                kind,
                position: self.cursor,
            });
            self.segments.push_back(Segment {
                id,
                kind,
                position: self.cursor,
                tokens,
            });
        }

        while self.segments.len() > MAX_TRAILING_SEGMENTS {
            let Some(retired) = self.segments.pop_front() else {
                break;
            };
            for token in &retired.tokens {
                out_events.push(Event::TokenDespawned { token: token.id });
            }
            out_events.push(Event::SegmentRetired {
                segment: retired.id,
            });
        }
    }

    /// Removes the token if it is still live, yielding its position.
    pub(crate) fn collect(&mut self, token: TokenId) -> Option<WorldPoint> {
        for segment in self.segments.iter_mut() {
            if let Some(index) = segment.tokens.iter().position(|held| held.id == token) {
                return Some(segment.tokens.remove(index).position);
            }
        }
        None
    }

    pub(crate) fn segment_snapshots(&self) -> Vec<SegmentSnapshot> {
        self.segments
            .iter()
            .map(|segment| SegmentSnapshot {
                id: segment.id,
                kind: segment.kind,
                position: segment.position,
            })
            .collect()
    }

    pub(crate) fn token_snapshots(&self) -> Vec<TokenSnapshot> {
        self.segments
            .iter()
            .flat_map(|segment| segment.tokens.iter())
            .map(|token| TokenSnapshot {
                id: token.id,
                position: token.position,
            })
            .collect()
    }

    fn scatter_offset(&mut self, rng_state: &mut u64) -> f32 {
        *rng_state = next_random(*rng_state);
        (unit_interval(*rng_state) * 2.0 - 1.0) * TOKEN_SCATTER_RANGE
    }
}
