use std::alloc::{Layout, handle_alloc_error};
use thiserror::Error;

/// The error type for `try_*` methods that may need to allocate.
///
/// When one of these is returned, the buffer or array the method was called
/// on is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TryReserveError {
    /// The requested capacity does not fit in `isize::MAX` bytes, or
    /// computing it overflowed.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The memory allocator reported a failure.
    #[error("memory allocation of {} bytes failed", layout.size())]
    AllocError {
        /// The layout of the allocation request that failed.
        layout: Layout,
    },
}

impl TryReserveError {
    /// Escalates the error the way infallible collection methods do: capacity
    /// overflow panics, allocator failure goes to [`handle_alloc_error`].
    pub(crate) fn escalate(self) -> ! {
        match self {
            Self::CapacityOverflow => panic!("capacity overflow"),
            Self::AllocError { layout } => handle_alloc_error(layout),
        }
    }
}

/// Unwraps the result of a fallible reservation, escalating on error.
pub(crate) fn infallible<T>(result: Result<T, TryReserveError>) -> T {
    match result {
        Ok(value) => value,
        Err(error) => error.escalate(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(TryReserveError::CapacityOverflow.to_string(), "capacity overflow");
        let layout = Layout::array::<u64>(4).unwrap();
        assert_eq!(
            TryReserveError::AllocError { layout }.to_string(),
            "memory allocation of 32 bytes failed"
        );
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn overflow_escalates_to_panic() {
        infallible::<()>(Err(TryReserveError::CapacityOverflow));
    }
}
