//! Rotation state machine and the checkpointed replay it produces.

mod machine;
mod state;

pub use machine::{replay, RotationMachine};
pub use state::{Checkpoint, Replay, RotationState, Transition};
