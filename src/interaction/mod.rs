//! Interaction module
//!
//! Pointer-driven manipulation of a loaded model: hit-testing, drag
//! sessions, spring-back animation, listener events and state snapshots.

pub mod config;
pub mod drag;
pub mod events;
pub mod manager;
pub mod state;

pub use config::InteractionConfig;
pub use drag::DragSession;
pub use events::{Command, CommandQueue, InteractionEvents};
pub use manager::InteractionManager;
pub use state::{PartState, SerializedModelState, SerializedPart, SNAPSHOT_VERSION};
