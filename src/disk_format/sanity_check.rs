//! Structural self-checks for disk and flux images

/// SanityCheck is a trait for structures that can verify they are
/// well-formed.
///
/// These checks are less strict than hard errors but are good
/// indicators something went wrong building a structure.  Failures
/// should be logged at the debug level by the implementation.
pub trait SanityCheck {
    /// Returns true if the structure looks valid
    fn check(&self) -> bool;
}
