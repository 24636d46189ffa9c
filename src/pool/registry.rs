//! Process-wide, immutable table of registered strategies.
//!
//! Each entry pairs a capability bitset with a factory producing a fresh
//! [`Strategy`]. A `Strategy` produced by a factory and not kept (e.g.
//! during a by-name scan that didn't match) is simply dropped, so there is
//! no separate per-entry destructor to carry.
//!
//! The table is read concurrently without synchronization: it is built
//! once, from `const fn` factories, and never mutated.

use crate::pool::options::PoolOptions;
use crate::pool::strategies::{magic::MagicStrategy, none::NoneStrategy};
use crate::pool::strategy::Strategy;

pub(crate) struct RegistryEntry {
    pub(crate) options: PoolOptions,
    pub(crate) factory: fn() -> Strategy,
}

pub(crate) static REGISTRY: &[RegistryEntry] = &[
    RegistryEntry {
        options: PoolOptions::UNPOOLED,
        factory: || Strategy::None(NoneStrategy::default()),
    },
    RegistryEntry {
        options: PoolOptions::POOLED,
        factory: || Strategy::Magic(MagicStrategy::default()),
    },
];

/// Number of registered strategies, exposed for diagnostics/tests.
pub fn num_registered_strategies() -> usize {
    REGISTRY.len()
}

/// Finds the entry whose capability bitset exactly equals `options`.
pub(crate) fn find_by_options(options: PoolOptions) -> Option<&'static RegistryEntry> {
    REGISTRY.iter().find(|e| e.options == options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_none_and_magic() {
        assert_eq!(num_registered_strategies(), 2);
        assert!(find_by_options(PoolOptions::UNPOOLED).is_some());
        assert!(find_by_options(PoolOptions::POOLED).is_some());
        assert!(find_by_options(PoolOptions::POOLED | PoolOptions::GC_SYNC).is_none());
    }
}
