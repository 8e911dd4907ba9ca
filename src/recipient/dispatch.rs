use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use zeroize::Zeroize as _;

use super::{Error, RecipientDecoder, Recovered};
use crate::{
    cbor::Cursor,
    header::{HeaderLocation, ParameterList, ParameterStorage},
    policy::{DispatchPolicy, StandardPolicy},
};

/// A recovered content-encryption key and where it came from.
#[derive(Debug, PartialEq, Eq)]
pub struct Unwrapped<'c> {
    /// The position of the decoder that succeeded, in registration order
    pub decoder: usize,
    /// The location of the recipient the key was recovered from
    pub recipient: HeaderLocation,
    /// The header parameters of that recipient
    pub parameters: ParameterList,
    /// The content-encryption key, at the beginning of the CEK buffer
    pub cek: &'c [u8],
}

/// The set of [`RecipientDecoder`]s used to recover the content-encryption
/// key of a message.
///
/// Decoders are tried in the order they were added. Which failures end the
/// search early is decided by the [`DispatchPolicy`] `P`.
pub struct RecipientDecoders<'k, P = StandardPolicy> {
    decoders: Vec<Box<dyn RecipientDecoder + 'k>>,
    policy: P,
}

impl RecipientDecoders<'_> {
    /// Creates an empty set using the [`StandardPolicy`].
    pub const fn new() -> Self {
        Self {
            decoders: Vec::new(),
            policy: StandardPolicy,
        }
    }
}

impl Default for RecipientDecoders<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: fmt::Debug> fmt::Debug for RecipientDecoders<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipientDecoders")
            .field("decoders", &self.decoders.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl<'k, P> RecipientDecoders<'k, P> {
    /// Replaces the [`DispatchPolicy`].
    pub fn with_policy<Q: DispatchPolicy>(self, policy: Q) -> RecipientDecoders<'k, Q> {
        RecipientDecoders {
            decoders: self.decoders,
            policy,
        }
    }

    /// Registers `decoder` after all previously added ones.
    pub fn add(&mut self, decoder: impl RecipientDecoder + 'k) -> &mut Self {
        self.decoders.push(Box::new(decoder));
        self
    }

    /// The number of registered decoders.
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Returns `true` if no decoder is registered.
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl<P: DispatchPolicy> RecipientDecoders<'_, P> {
    /// Tries every decoder on the recipient at the position of `cursor`.
    ///
    /// Each attempt starts from the same cursor position and the same
    /// storage usage. The first decoder that succeeds wins, its parameters
    /// stay in `storage`.
    ///
    /// # Errors
    ///
    /// If no decoder succeeds, the most telling error of all attempts is
    /// returned: a decrypt failure over a key mismatch over a format error
    /// over an unsupported algorithm. If the policy stops dispatch, the error
    /// that made it stop is returned. In both cases the cursor is left behind
    /// the recipient if it is a well-formed data item.
    pub fn decode_recipient<'b, 'c>(
        &self,
        location: HeaderLocation,
        cursor: &mut Cursor<'b>,
        cek_buffer: &'c mut [u8],
        storage: &mut ParameterStorage<'_, 'b>,
    ) -> Result<Unwrapped<'c>, Error> {
        let (decoder, recovered) = self.trial(location, cursor, cek_buffer, storage)?;
        Ok(unwrapped(decoder, location, recovered, cek_buffer))
    }

    /// Decodes the array of `COSE_Recipient`s at the position of `cursor`
    /// until a key is recovered from one of them.
    ///
    /// The recipients are located at `nesting` and numbered in order. The
    /// recipients after the successful one are skipped, and the cursor is
    /// left behind the array.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NoRecipients`] for an empty array, with a format
    /// error if the array itself is malformed, and otherwise like
    /// [`decode_recipient`](Self::decode_recipient) over all recipients.
    #[tracing::instrument(level = "debug", skip_all, fields(nesting = nesting))]
    pub fn decode_recipients<'b, 'c>(
        &self,
        nesting: u8,
        cursor: &mut Cursor<'b>,
        cek_buffer: &'c mut [u8],
        storage: &mut ParameterStorage<'_, 'b>,
    ) -> Result<Unwrapped<'c>, Error> {
        if cursor.enter_array()? == Some(0) || !cursor.has_more()? {
            cursor.exit_array()?;
            return Err(Error::NoRecipients);
        }

        let mut best: Option<Error> = None;
        let mut found = None;
        let mut index = 0u8;
        while cursor.has_more()? {
            let location = HeaderLocation::new(nesting, index);
            match self.trial(location, cursor, cek_buffer, storage) {
                Ok((decoder, recovered)) => {
                    found = Some((decoder, location, recovered));
                    break;
                }
                Err(err) if !self.policy.continue_after(&err) => return Err(err),
                Err(err) => best = Some(most_telling(best, err)),
            }
            // a recipient that is not a well-formed item ends the array
            if let Some(err) = cursor.current_error() {
                return Err(err.into());
            }
            index = index.saturating_add(1);
        }

        match found {
            Some((decoder, location, recovered)) => {
                while cursor.has_more()? {
                    cursor.skip_item()?;
                }
                cursor.exit_array()?;
                Ok(unwrapped(decoder, location, recovered, cek_buffer))
            }
            None => {
                cursor.exit_array()?;
                Err(best.unwrap_or(Error::NoRecipients))
            }
        }
    }

    /// Runs the decoders on one recipient.
    fn trial<'b>(
        &self,
        location: HeaderLocation,
        cursor: &mut Cursor<'b>,
        cek_buffer: &mut [u8],
        storage: &mut ParameterStorage<'_, 'b>,
    ) -> Result<(usize, Recovered), Error> {
        let checkpoint = cursor.checkpoint();
        let mark = storage.len();

        let mut best: Option<Error> = None;
        for (index, decoder) in self.decoders.iter().enumerate() {
            cursor.restore(checkpoint);
            storage.truncate(mark);

            let err = match decoder.decode(location, cursor, cek_buffer, storage) {
                Ok(recovered) => return Ok((index, recovered)),
                Err(err) => err,
            };
            tracing::debug!(
                decoder = index,
                nesting = location.nesting,
                recipient = location.index,
                kind = ?err.kind(),
                "recipient decoder failed"
            );

            if !self.policy.continue_after(&err) {
                tracing::warn!(
                    decoder = index,
                    kind = ?err.kind(),
                    "dispatch policy stopped recipient decoding"
                );
                best = Some(err);
                break;
            }
            best = Some(most_telling(best, err));
        }

        cek_buffer.zeroize();
        storage.truncate(mark);
        cursor.restore(checkpoint);
        // a failure to skip stays in the cursor as its sticky error
        let _ = cursor.skip_item();

        Err(best.unwrap_or(Error::NoDecoders))
    }
}

fn unwrapped(
    decoder: usize,
    recipient: HeaderLocation,
    recovered: Recovered,
    cek_buffer: &[u8],
) -> Unwrapped<'_> {
    Unwrapped {
        decoder,
        recipient,
        parameters: recovered.parameters,
        cek: &cek_buffer[..recovered.cek_len],
    }
}

/// Keeps the earlier of two errors unless the later one ranks higher.
fn most_telling(best: Option<Error>, err: Error) -> Error {
    match best {
        Some(best) if best.kind().rank() >= err.kind().rank() => best,
        _ => err,
    }
}
