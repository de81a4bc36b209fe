//! Lazy, pull-based processing pipeline.
//!
//! Nodes never store references to their inputs. A node's input is found positionally on every
//! access (the nearest enabled node upstream, else the raw input), which keeps reordering,
//! insertion and bypassing free of reference bookkeeping.

pub(crate) mod chain;
pub(crate) mod context;
pub(crate) mod node;
#[allow(clippy::module_inception)]
pub(crate) mod pipeline;
