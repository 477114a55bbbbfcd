//! The engine: active piece control, lock and clear resolution, scoring
//! state, and the game state machine, driven by `step(dt, inputs)`.
//!
//! One `Engine` is one game session. Everything is synchronous and
//! deterministic: identical seed, inputs and dt sequence replay identically.

use crate::bag::SevenBag;
use crate::board::Board;
use crate::config::{ConfigError, EngineConfig};
use crate::pieces::{self, Mino};
use crate::scoring::{gravity_interval_ms, level_for_lines, score_clear, score_drop};
use crate::snapshot::{ActiveSnapshot, EngineSnapshot};
use crate::types::{Input, Phase, PieceKind, Rotation, Turn, PREVIEW_LEN, SPAWN_POSITION};

/// The currently falling piece. Exists only between spawn and lock; merged
/// into the board and destroyed on lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl ActivePiece {
    fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: SPAWN_POSITION.0,
            y: SPAWN_POSITION.1,
        }
    }

    /// Absolute board cells occupied by the piece.
    pub fn cells(&self) -> [Mino; 4] {
        pieces::shape(self.kind, self.rotation).map(|(mx, my)| (self.x + mx, self.y + my))
    }

    fn offset(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// What the last lock did. Consumed by the host via
/// [`Engine::take_last_event`]; a no-clear lock reports zero lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub lines_cleared: u32,
    /// Points this lock awarded for the clear (drop bonuses excluded).
    pub points: u32,
    /// Combo counter after this lock.
    pub combo: u32,
    /// Whether the back-to-back multiplier was applied.
    pub back_to_back: bool,
}

/// A single game session.
pub struct Engine {
    config: EngineConfig,
    board: Board,
    bag: SevenBag,
    active: Option<ActivePiece>,
    hold: Option<PieceKind>,
    can_hold: bool,
    next_queue: [PieceKind; PREVIEW_LEN],
    phase: Phase,
    paused: bool,
    score: u32,
    level: u32,
    lines: u32,
    combo: u32,
    back_to_back: bool,
    drop_timer_ms: u32,
    lock_timer_ms: u32,
    lock_reset_count: u8,
    clear_timer_ms: u32,
    last_event: Option<LockEvent>,
    seed: u32,
}

impl Engine {
    /// Build a new game. Deterministic when `seed` is given; otherwise the
    /// seed is taken from the system clock.
    ///
    /// Fails only on a malformed configuration or geometry table.
    pub fn new(config: EngineConfig, seed: Option<u32>) -> Result<Self, ConfigError> {
        config.validate()?;
        pieces::validate_tables()?;
        let seed = seed.unwrap_or_else(seed_from_clock);
        Ok(Self::from_parts(config, seed))
    }

    /// Infallible constructor used once the config has been validated.
    fn from_parts(config: EngineConfig, seed: u32) -> Self {
        let bag = SevenBag::new(seed);
        let mut engine = Self {
            config,
            board: Board::new(),
            bag,
            active: None,
            hold: None,
            can_hold: true,
            next_queue: [PieceKind::I; PREVIEW_LEN],
            phase: Phase::Spawning,
            paused: false,
            score: 0,
            level: 0,
            lines: 0,
            combo: 0,
            back_to_back: false,
            drop_timer_ms: 0,
            lock_timer_ms: 0,
            lock_reset_count: 0,
            clear_timer_ms: 0,
            last_event: None,
            seed,
        };
        engine.spawn_next();
        engine
    }

    /// New-game reset: reinitializes board, score state, hold slot and bag.
    /// Reuses the previous seed when none is given, replaying the same
    /// piece sequence.
    pub fn reset(&mut self, seed: Option<u32>) {
        let seed = seed.unwrap_or(self.seed);
        *self = Self::from_parts(self.config.clone(), seed);
    }

    /// Advance the simulation by `dt_ms`, applying `inputs` first (in
    /// order), and return the resulting snapshot.
    ///
    /// After game over all inputs are ignored until [`reset`](Self::reset).
    pub fn step(&mut self, dt_ms: u32, inputs: &[Input]) -> EngineSnapshot {
        if self.phase != Phase::GameOver {
            for &input in inputs {
                self.apply_input(input);
            }
            self.tick(dt_ms);
        }
        self.snapshot()
    }

    fn apply_input(&mut self, input: Input) {
        if input == Input::Pause {
            self.paused = !self.paused;
            return;
        }
        if self.paused {
            return;
        }
        match input {
            Input::MoveLeft => {
                self.try_shift(-1, 0);
            }
            Input::MoveRight => {
                self.try_shift(1, 0);
            }
            Input::RotateCw => {
                self.try_turn(Turn::Cw);
            }
            Input::RotateCcw => {
                self.try_turn(Turn::Ccw);
            }
            Input::Rotate180 => {
                self.try_turn(Turn::Half);
            }
            Input::SoftDrop => self.soft_drop(),
            Input::HardDrop => self.hard_drop(),
            Input::Hold => {
                self.hold_piece();
            }
            // Handled before the pause gate.
            Input::Pause => {}
        }
    }

    /// Timers: gravity while falling, lock delay while grounded, the
    /// animation hold while clearing.
    fn tick(&mut self, dt_ms: u32) {
        if self.paused {
            return;
        }
        match self.phase {
            Phase::GameOver => return,
            Phase::Clearing => {
                self.clear_timer_ms = self.clear_timer_ms.saturating_sub(dt_ms);
                if self.clear_timer_ms == 0 {
                    self.spawn_next();
                }
                return;
            }
            _ => {}
        }
        if self.active.is_none() {
            return;
        }

        if self.grounded() {
            self.phase = Phase::Locking;
            self.lock_timer_ms = self.lock_timer_ms.saturating_add(dt_ms);
            if self.lock_timer_ms >= self.config.lock_delay_ms {
                self.lock_active();
            }
        } else {
            self.phase = Phase::Falling;
            self.drop_timer_ms = self.drop_timer_ms.saturating_add(dt_ms);
            let interval = gravity_interval_ms(&self.config, self.level).max(1);
            while self.drop_timer_ms >= interval {
                self.drop_timer_ms -= interval;
                if !self.try_shift(0, 1) {
                    break;
                }
                if self.grounded() {
                    break;
                }
            }
        }
    }

    /// Attempt to shift the active piece; a blocked shift is a silent no-op.
    pub fn try_shift(&mut self, dx: i8, dy: i8) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let moved = active.offset(dx, dy);
        if self.board.is_blocked(&moved.cells()) {
            return false;
        }
        self.active = Some(moved);

        if dy > 0 {
            // Falling to a new row restores the full lock-delay budget.
            self.lock_timer_ms = 0;
            self.lock_reset_count = 0;
        } else if self.grounded() {
            self.restart_lock_delay();
        }
        self.update_phase();
        true
    }

    /// Attempt a rotation with wall kicks; all-kicks-blocked is a silent
    /// no-op with no partial state retained.
    pub fn try_turn(&mut self, turn: Turn) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let board = &self.board;
        let result = pieces::resolve_rotation(
            active.kind,
            active.rotation,
            active.x,
            active.y,
            turn,
            |x, y| board.is_free(x, y),
        );
        let Some((rotation, (dx, dy))) = result else {
            return false;
        };

        self.active = Some(ActivePiece {
            rotation,
            ..active.offset(dx, dy)
        });
        if self.grounded() {
            self.restart_lock_delay();
        }
        self.update_phase();
        true
    }

    /// One row of soft drop. Does not force a lock; the lock delay governs
    /// that once the piece is grounded.
    pub fn soft_drop(&mut self) {
        if self.try_shift(0, 1) {
            let points = score_drop(&self.config, 1, false);
            self.score = self.score.saturating_add(points);
        }
    }

    /// Drop to the landing row and lock immediately, bypassing the lock
    /// delay. Awards the distance bonus.
    pub fn hard_drop(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        let mut distance: u32 = 0;
        while !self
            .board
            .is_blocked(&active.offset(0, distance as i8 + 1).cells())
        {
            distance += 1;
        }
        if distance > 0 {
            self.active = Some(active.offset(0, distance as i8));
        }
        let points = score_drop(&self.config, distance, true);
        self.score = self.score.saturating_add(points);
        self.lock_active();
    }

    /// Swap the active piece with the hold slot (or stash it and spawn when
    /// the slot is empty). One hold per spawn: a no-op until the next lock.
    pub fn hold_piece(&mut self) -> bool {
        if !self.can_hold {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        match self.hold.take() {
            Some(held) => {
                self.hold = Some(active.kind);
                let piece = ActivePiece::spawn(held);
                if self.board.is_blocked(&piece.cells()) {
                    self.active = None;
                    self.phase = Phase::GameOver;
                    return false;
                }
                self.active = Some(piece);
                self.drop_timer_ms = 0;
                self.lock_timer_ms = 0;
                self.lock_reset_count = 0;
                self.update_phase();
            }
            None => {
                self.hold = Some(active.kind);
                self.spawn_next();
            }
        }

        self.can_hold = false;
        true
    }

    /// Merge the active piece into the board, resolve clears and scoring,
    /// then move on to Clearing or directly to the next spawn.
    fn lock_active(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        self.board.merge(&active.cells(), active.kind);
        self.drop_timer_ms = 0;
        self.lock_timer_ms = 0;
        self.lock_reset_count = 0;
        self.can_hold = true;

        let rows = self.board.find_full_rows();
        if rows.is_empty() {
            // No-clear lock: the combo chain breaks, the back-to-back flag
            // is untouched.
            self.combo = 0;
            self.last_event = Some(LockEvent {
                lines_cleared: 0,
                points: 0,
                combo: 0,
                back_to_back: false,
            });
            self.spawn_next();
            return;
        }

        self.board.clear_rows(&rows);
        let cleared = rows.len();
        let clear = score_clear(&self.config, cleared, self.level, self.combo, self.back_to_back);
        self.score = self.score.saturating_add(clear.total);
        self.combo += 1;
        self.back_to_back = clear.b2b_next;
        self.lines += cleared as u32;
        self.level = level_for_lines(self.lines);
        self.last_event = Some(LockEvent {
            lines_cleared: cleared as u32,
            points: clear.total,
            combo: self.combo,
            back_to_back: clear.b2b_applied,
        });

        if self.config.clear_pause_ms > 0 {
            self.phase = Phase::Clearing;
            self.clear_timer_ms = self.config.clear_pause_ms;
        } else {
            self.spawn_next();
        }
    }

    /// Draw the next piece and place it at the spawn origin. A blocked
    /// spawn is game over.
    fn spawn_next(&mut self) -> bool {
        self.phase = Phase::Spawning;
        let kind = self.bag.next();
        self.next_queue = self.bag.preview();

        let piece = ActivePiece::spawn(kind);
        if self.board.is_blocked(&piece.cells()) {
            self.active = None;
            self.phase = Phase::GameOver;
            return false;
        }
        self.active = Some(piece);
        self.drop_timer_ms = 0;
        self.lock_timer_ms = 0;
        self.lock_reset_count = 0;
        self.clear_timer_ms = 0;
        self.update_phase();
        true
    }

    fn restart_lock_delay(&mut self) {
        if self.lock_reset_count < self.config.lock_reset_limit {
            self.lock_timer_ms = 0;
            self.lock_reset_count += 1;
        }
    }

    fn update_phase(&mut self) {
        if self.active.is_some() {
            self.phase = if self.grounded() {
                Phase::Locking
            } else {
                Phase::Falling
            };
        }
    }

    /// Whether the active piece rests on the floor or the stack.
    pub fn grounded(&self) -> bool {
        match self.active {
            Some(piece) => self.board.is_blocked(&piece.offset(0, 1).cells()),
            None => false,
        }
    }

    /// Landing row of the active piece under an immediate hard drop. Pure
    /// query; mutates nothing.
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active?;
        let mut distance: i8 = 0;
        while !self.board.is_blocked(&active.offset(0, distance + 1).cells()) {
            distance += 1;
        }
        Some(active.y + distance)
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let mut snap = EngineSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    /// Fill a caller-owned snapshot buffer, avoiding per-frame allocation.
    pub fn snapshot_into(&self, out: &mut EngineSnapshot) {
        self.board.write_grid(&mut out.board);
        out.active = self.active.map(|a| ActiveSnapshot {
            kind: a.kind,
            rotation: a.rotation,
            x: a.x,
            y: a.y,
        });
        out.ghost_y = self.ghost_y();
        out.hold = self.hold;
        out.next_queue = self.next_queue;
        out.can_hold = self.can_hold;
        out.paused = self.paused;
        out.phase = self.phase;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.combo = self.combo;
        out.back_to_back = self.back_to_back;
        out.seed = self.seed;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for scenario setup: garbage-line injection by
    /// hosts, fixture construction in tests.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn hold(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn next_queue(&self) -> &[PieceKind; PREVIEW_LEN] {
        &self.next_queue
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn back_to_back(&self) -> bool {
        self.back_to_back
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

fn seed_from_clock() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => (elapsed.as_nanos() as u32) | 1,
        Err(_) => 1,
    }
}
