use thiserror::Error;

/// Failure to obtain storage for a requested number of elements.
///
/// Element construction failures are not represented here: a panicking
/// constructor unwinds through the container, and a fallible constructor
/// reports its own error type (see `Vector::try_emplace`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The byte size of the requested element count can not be described by
    /// an allocation layout, or growth arithmetic overflowed.
    #[error("capacity overflow: {requested} elements can not be allocated")]
    CapacityOverflow { requested: usize },
    /// The global allocator could not satisfy the request.
    #[error("out of memory: failed to allocate {bytes} bytes")]
    OutOfMemory { bytes: usize },
}

#[cfg(test)]
mod error_tests {
    use super::Error;

    #[test]
    fn messages_name_the_request() {
        let overflow = Error::CapacityOverflow { requested: 12 };
        assert_eq!("capacity overflow: 12 elements can not be allocated", overflow.to_string());

        let oom = Error::OutOfMemory { bytes: 4096 };
        assert_eq!("out of memory: failed to allocate 4096 bytes", oom.to_string());
    }
}
