//! Viewport module
//!
//! Camera rays, the scene capability the interaction manager drives, a CPU
//! scene implementation and pointer input translation.

pub mod camera;
pub mod headless;
pub mod pointer;
pub mod raycast;
pub mod scene;

pub use camera::{pixel_to_ndc, Camera};
pub use headless::{HeadlessScene, SceneMesh};
pub use pointer::{PointerEvent, PointerKind, PointerTracker};
pub use raycast::{Plane, Ray};
pub use scene::{Highlight, MeshId, RaycastHit, SceneBackend};
