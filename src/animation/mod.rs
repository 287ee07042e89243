pub(crate) mod action;
pub(crate) mod animate;
pub(crate) mod combinators;
pub(crate) mod ease;
pub(crate) mod motion;
pub mod ops;
pub(crate) mod spline;
