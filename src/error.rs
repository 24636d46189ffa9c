//! Structured error value shared by every fallible pool operation: a closed
//! code, the call site that raised it, and an optional free-form detail
//! string.

use core::fmt;

/// The closed set of error conditions the pool framework itself can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PoolErrorCode {
    /// A required pointer/argument was null where that is disallowed.
    NullPointer,
    /// A slot index or offset fell outside the handle table.
    OutOfBounds,
    /// The underlying system allocator returned null on a fresh allocation.
    AllocFailed,
    /// The underlying system allocator returned null on a resize.
    ReallocFailed,
    /// No registered strategy matches the requested capability bitset, or
    /// the strategy has no implementation bound for the requested op.
    NotImplemented,
    /// No registered strategy produced the requested name.
    NotFound,
    /// An argument violated a precondition (e.g. a zero-byte allocation).
    IllegalArgument,
    /// The handle table's 16-bit slot space is exhausted.
    PoolLimitReached,
    /// A strategy's `free` call failed.
    FreeFailed,
    /// A nested/child operation failed and the failure was not otherwise
    /// classifiable.
    SubOperationFailed,
}

impl fmt::Display for PoolErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PoolErrorCode::NullPointer => "null pointer",
            PoolErrorCode::OutOfBounds => "out of bounds",
            PoolErrorCode::AllocFailed => "allocation failed",
            PoolErrorCode::ReallocFailed => "reallocation failed",
            PoolErrorCode::NotImplemented => "not implemented",
            PoolErrorCode::NotFound => "not found",
            PoolErrorCode::IllegalArgument => "illegal argument",
            PoolErrorCode::PoolLimitReached => "pool limit reached",
            PoolErrorCode::FreeFailed => "free failed",
            PoolErrorCode::SubOperationFailed => "sub-operation failed",
        };
        f.write_str(msg)
    }
}

/// A single recorded failure: the code, the call site that raised it, and
/// an optional human-readable detail (e.g. the name that a lookup missed).
///
/// `Clone` deep-clones `detail` since it is owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolError {
    /// The closed error condition that was raised.
    pub code: PoolErrorCode,
    /// The source file that raised the error (`file!()` at the call site).
    pub file: &'static str,
    /// The source line that raised the error (`line!()` at the call site).
    pub line: u32,
    /// An optional free-form detail, e.g. the name a lookup failed to find.
    pub detail: Option<String>,
}

impl PoolError {
    pub(crate) fn new(code: PoolErrorCode, file: &'static str, line: u32) -> Self {
        Self {
            code,
            file,
            line,
            detail: None,
        }
    }

    pub(crate) fn with_detail(
        code: PoolErrorCode,
        file: &'static str,
        line: u32,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            code,
            file,
            line,
            detail: Some(detail.into()),
        }
    }
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.code, self.file, self.line)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

impl std::error::Error for PoolError {}

/// Builds a [`PoolError`] stamped with the call site, analogous to the
/// original's `error_with_details(&pool->err, CODE, "msg %s", name)`.
macro_rules! pool_error {
    ($code:expr) => {
        $crate::error::PoolError::new($code, file!(), line!())
    };
    ($code:expr, $($detail:tt)*) => {
        $crate::error::PoolError::with_detail($code, file!(), line!(), format!($($detail)*))
    };
}

pub(crate) use pool_error;
