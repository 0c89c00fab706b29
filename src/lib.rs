#![forbid(unsafe_code)]

pub mod color;
pub mod expression;
pub mod fingerprint;
pub mod foundation;
pub mod frame;
pub mod geometry;
pub mod model;
pub mod render;
pub mod resolve;
pub mod rng;

pub use color::{ColorRamp, Rgb};
pub use expression::{AnimationDriver, AnimationPose, Expression, GazeDirection, MouthFamily};
pub use fingerprint::{AttributeFingerprint, fingerprint_attributes};
pub use foundation::error::{VisageError, VisageResult};
pub use frame::{BackgroundSpec, CANVAS_UNITS, DrawCommand, Frame, GradientStop};
pub use geometry::GeometrySpec;
pub use model::{AppearanceDescriptor, CharacterSnapshot, RenderOptions};
pub use render::{portrait, render_resolved};
pub use resolve::{ResolvedAttributes, resolve};
