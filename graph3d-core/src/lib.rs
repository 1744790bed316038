/// Graph3D Core Library - transform & animation engine
///
/// This library provides the world-space object model, 4x4 matrix algebra,
/// and the serialized operation queue that replays a discrete transform
/// request as time-sliced incremental matrix applications, plus the curve
/// import boundary for plotting an expression and its derivatives.

pub mod animate;
pub mod curve;
pub mod expr;
pub mod geometry;
pub mod matrix;
pub mod world;

// Re-export commonly used types
pub use animate::{Animator, OpKind, Operation, OperationError, STATUS_IDLE};
pub use curve::{build_derivatives, build_graph, CurveEvaluator, EvalError, SampleRange};
pub use expr::{PolyEvaluator, Polynomial};
pub use geometry::{import_object, Edge, GeometryError, LabelAlign, Object, Point, Surface};
pub use matrix::Mat4;
pub use world::{SharedWorld, WorldSpace};
