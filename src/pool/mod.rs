//! The pool framework: a capability-selected allocation strategy behind a
//! spinlock-guarded façade, backed by an O(1) handle table.

mod counters;
mod facade;
mod handle_table;
mod options;
mod registry;
mod strategies;
mod strategy;

pub use counters::PoolCounters;
pub use facade::Pool;
pub use options::PoolOptions;
pub use registry::num_registered_strategies;
pub use strategies::{magic::NAME as MAGIC_STRATEGY_NAME, none::NAME as NONE_STRATEGY_NAME};
