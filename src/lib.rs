//! Kinetic is a time-driven action engine for animating scene-node properties.
//!
//! An *action* is a small state machine that, given normalized progress `t` in `[0, 1]`, mutates a
//! target node: position, rotation, scale, skew, size, opacity, tint, visibility, the displayed
//! frame, or any named float property. Actions compose through combinators and easing decorators
//! into arbitrarily deep trees that are advanced by an external clock.
//!
//! # Pieces
//!
//! - **Target capability**: [`Target`] is everything an action may read or write on a node;
//!   [`Targets`] resolves [`TargetId`] handles. Actions never own or borrow a node across ticks.
//! - **Actions**: [`FiniteAction`] has a fixed duration; [`Action`] adds the unbounded
//!   `repeat_forever` and the rate-scaling `speed`, which cannot be nested in sequences.
//! - **Constructors**: free functions in [`ops`] (`move_by`, `sequence`, `ease_in`, ...).
//! - **Easing**: [`Ease`] is a closed set of pure curves, each with a named counterpart.
//! - **Driver**: [`ActionManager`] ticks actions in insertion order with per-target pause.
//!
//! Everything is single-threaded and push-driven: nothing advances unless the caller ticks it.
//!
//! ```
//! use kinetic::{ActionManager, Node, NodeStore, Vec2, ops};
//!
//! let mut nodes = NodeStore::new();
//! let id = nodes.insert(Node::at(10.0, 10.0));
//!
//! let mut manager = ActionManager::new();
//! manager.add(ops::move_by(2.0, Vec2::new(100.0, 0.0))?, id, &mut nodes)?;
//! manager.update(0.0, &mut nodes)?;
//! manager.update(1.0, &mut nodes)?;
//! assert_eq!(nodes.get(id).map(|n| n.position), Some(Vec2::new(60.0, 10.0)));
//! # Ok::<(), kinetic::ActionError>(())
//! ```
#![forbid(unsafe_code)]

mod animation;
mod foundation;
mod runner;
mod scene;

pub use animation::action::{Action, ActionState, FiniteAction};
pub use animation::animate::{Animation, AnimationFrame};
pub use animation::ease::Ease;
pub use animation::motion::BezierConfig;
pub use animation::ops;
pub use animation::spline::CATMULL_ROM_TENSION;
pub use foundation::core::{FrameId, Rgb8, Size, Tag, TargetId, Vec2};
pub use foundation::error::{ActionError, ActionResult};
pub use foundation::math::{bezier_at, cardinal_spline_at};
pub use runner::manager::{ActionId, ActionManager, ManagerOpts};
pub use scene::node::{Node, NodeStore};
pub use scene::target::{Target, Targets};
