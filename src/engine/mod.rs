//! Timer engine module.
//!
//! This module contains the core timer functionality:
//! - `timer`: State machine with mode transitions, cycle counting and events
//! - `ticks`: Tick signal sources owned by the engine
//! - `runner`: Async driver serializing commands and ticks
//! - `error`: Settings validation errors

pub mod error;
pub mod runner;
pub mod ticks;
pub mod timer;

pub use error::ValidationError;
pub use runner::{Command, EngineRunner};
pub use ticks::{IntervalTicks, ManualTicks, TickSource, TICK_PERIOD};
pub use timer::{TimerEngine, TimerEvent};
