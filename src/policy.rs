//! Rules the recipient decoders and the dispatch loop follow where COSE
//! leaves the choice to the recipient.

mod standard;

pub use standard::{StandardPolicy, StrictPolicy};

use crate::recipient::Error;

/// Decides whether the dispatch loop tries further decoders, and further
/// recipients, after a failed attempt.
pub trait DispatchPolicy {
    /// Returns `true` if dispatch should go on after `error`.
    ///
    /// Returning `false` makes the dispatch loop fail with `error`.
    fn continue_after(&self, error: &Error) -> bool;
}

impl<P: DispatchPolicy + ?Sized> DispatchPolicy for &P {
    fn continue_after(&self, error: &Error) -> bool {
        P::continue_after(self, error)
    }
}

/// How a configured key identifier is compared against the `kid` header
/// parameter of a recipient.
///
/// Identifiers are compared byte for byte. Nothing is checked if the decoder
/// has no key identifier configured.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KidMatch {
    /// The `kid` parameter is not looked at.
    Ignore,
    /// A recipient without `kid` is accepted, a recipient with a different
    /// `kid` is rejected.
    #[default]
    IfPresent,
    /// The recipient must carry the configured `kid`.
    Required,
}

impl KidMatch {
    /// Compares the `expected` key identifier with the one `received` in a
    /// recipient.
    ///
    /// # Errors
    ///
    /// Fails if the received identifier differs from the expected one, or if
    /// it is absent while [`KidMatch::Required`] is in effect.
    pub fn check(
        self,
        expected: Option<&[u8]>,
        received: Option<&[u8]>,
    ) -> Result<(), KidMatchFail> {
        let Some(expected) = expected else {
            return Ok(());
        };

        match (self, received) {
            (Self::Ignore, _) | (Self::IfPresent, None) => Ok(()),
            (Self::Required, None) => Err(KidMatchFail::Missing),
            (Self::IfPresent | Self::Required, Some(received)) if received == expected => Ok(()),
            (Self::IfPresent | Self::Required, Some(_)) => Err(KidMatchFail::Mismatch),
        }
    }
}

/// Reasons a [`KidMatch`] rejects a recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KidMatchFail {
    /// The `kid` of the recipient is not the configured one
    #[error("the key identifier of the recipient does not match")]
    Mismatch,
    /// The recipient has no `kid` but one is required
    #[error("the recipient has no key identifier")]
    Missing,
}
