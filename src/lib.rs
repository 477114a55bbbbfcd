//! Deterministic falling-block puzzle engine.
//!
//! Pure simulation with no I/O, no threads and no allocation on the hot
//! path: the host calls [`Engine::step`] with elapsed milliseconds and the
//! inputs gathered since the last call, and renders the returned
//! [`EngineSnapshot`]. Identical seed and input/dt sequence replay the same
//! game, which keeps sessions testable and replayable.
//!
//! ```
//! use tetros_engine::{Engine, EngineConfig, Input};
//!
//! let mut engine = Engine::new(EngineConfig::default(), Some(42))?;
//! let snapshot = engine.step(16, &[Input::MoveLeft]);
//! assert!(!snapshot.game_over());
//! # Ok::<(), tetros_engine::ConfigError>(())
//! ```

pub mod bag;
pub mod board;
pub mod config;
pub mod engine;
pub mod pieces;
pub mod scoring;
pub mod snapshot;
pub mod types;

pub use bag::SevenBag;
pub use board::Board;
pub use config::{ConfigError, EngineConfig};
pub use engine::{ActivePiece, Engine, LockEvent};
pub use snapshot::{ActiveSnapshot, EngineSnapshot};
pub use types::{
    Cell, Input, Phase, PieceKind, Rotation, Turn, BOARD_HEIGHT, BOARD_WIDTH, BUFFER_ROWS,
    PREVIEW_LEN, SPAWN_POSITION, VISIBLE_ROWS,
};
