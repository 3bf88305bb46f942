//! Builder errors.

/// Contract violations reported by [`Builder`](crate::Builder).
///
/// These signal a programming error in the caller, not a transient
/// condition; retrying the same call fails the same way.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum BuilderError {
    /// The builder was used after `build()` handed its table to a map.
    #[error("builder already sealed: build() has already been called")]
    AlreadySealed,
}
