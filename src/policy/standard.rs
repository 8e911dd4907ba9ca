use super::DispatchPolicy;
use crate::recipient::{Error, ErrorKind};

/// The default [`DispatchPolicy`].
///
/// Any failed attempt moves on to the next decoder or recipient, except when
/// the caller supplied storage ran out. A larger storage would be needed for
/// every remaining attempt as well.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StandardPolicy;

impl DispatchPolicy for StandardPolicy {
    fn continue_after(&self, error: &Error) -> bool {
        error.kind() != ErrorKind::StorageExhausted
    }
}

/// A [`DispatchPolicy`] that also gives up on the first malformed recipient.
///
/// Use this if the message is expected to be well formed as a whole, e.g.
/// because all its recipients come from one producer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrictPolicy;

impl DispatchPolicy for StrictPolicy {
    fn continue_after(&self, error: &Error) -> bool {
        !matches!(
            error.kind(),
            ErrorKind::StorageExhausted | ErrorKind::Format
        )
    }
}
