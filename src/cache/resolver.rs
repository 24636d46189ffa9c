//! External collaborators the LRU cache relies on but does not implement:
//! the string resolver backing cache misses, and the archive-size hook
//! used to derive a default capacity.

/// Materializes the string behind a string id. Implementations must
/// always succeed for any id the owning archive advertises. An owned
/// `String` is never null, so there is no fallible path here.
pub trait StringResolver {
    /// Materializes the string bound to `id`.
    fn resolve(&self, id: u64) -> String;
}

/// The subset of archive metadata the cache's default-capacity
/// constructor needs.
pub trait ArchiveInfo {
    /// Number of strings embedded in the archive, used to derive
    /// `capacity = floor(0.25 * num_embedded_strings)`.
    fn num_embedded_strings(&self) -> u32;
}
