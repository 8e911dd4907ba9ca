//! Steps shared by the recipient decoders.

use zeroize::Zeroize as _;

use super::{Error, FormatError};
use crate::{
    algorithm::Algorithm,
    cbor::{Checkpoint, Cursor},
    crypto::{self, Failure},
    header::{self, DecodedHeaders, HeaderLocation, ParameterList, ParameterStorage},
};

/// A recipient array whose two header buckets have been read.
pub(super) struct Opened<'b> {
    pub(super) headers: DecodedHeaders<'b>,
    len: Option<u64>,
}

/// Enters a recipient array and decodes its header buckets.
///
/// The number of fields is not checked yet. A decoder first looks at the
/// algorithm, so that a recipient of another scheme is reported as such and
/// not as malformed.
pub(super) fn open_recipient<'b>(
    cursor: &mut Cursor<'b>,
    location: HeaderLocation,
    storage: &mut ParameterStorage<'_, 'b>,
) -> Result<Opened<'b>, Error> {
    let len = cursor.enter_array()?;
    let headers = header::decode(cursor, location, storage)?;
    Ok(Opened { headers, len })
}

impl<'b> Opened<'b> {
    /// Reads the `N` byte strings after the header buckets and leaves the
    /// array.
    ///
    /// A definite length array must have exactly `N + 2` items. An indefinite
    /// length one is checked while it is read.
    pub(super) fn read_fields<const N: usize>(
        &self,
        cursor: &mut Cursor<'b>,
    ) -> Result<[&'b [u8]; N], Error> {
        let expected = N as u64 + 2;
        if let Some(found) = self.len {
            if found != expected {
                return Err(FormatError::FieldCount { expected, found }.into());
            }
        }

        let mut fields: [&'b [u8]; N] = [&[][..]; N];
        for field in &mut fields {
            *field = cursor.read_byte_string()?;
        }
        cursor.exit_array()?;

        Ok(fields)
    }
}

/// The integer `alg` of `parameters`, looked up in the registry.
///
/// Fails with [`Error::UnsupportedAlgorithm`] if there is none, or if it is
/// not accepted by `select`.
pub(super) fn algorithm<T>(
    storage: &ParameterStorage<'_, '_>,
    parameters: ParameterList,
    select: impl FnOnce(Algorithm) -> Option<T>,
) -> Result<T, Error> {
    let id = storage
        .algorithm(parameters)
        .ok_or(Error::UnsupportedAlgorithm(None))?;
    select(Algorithm::from_id(id)).ok_or(Error::UnsupportedAlgorithm(Some(id)))
}

/// Maps a failure of the crypto backend.
pub(super) fn crypto_error(err: crypto::Error, cek_capacity: usize) -> Error {
    match err.failure() {
        Failure::InvalidKey => Error::WrongKey,
        Failure::BufferTooSmall { needed } => Error::CekBufferTooSmall {
            needed,
            capacity: cek_capacity,
        },
        _ => Error::DecryptFailure(err),
    }
}

/// The state a decode attempt started from.
pub(super) struct Start {
    checkpoint: Checkpoint,
    storage_len: usize,
}

impl Start {
    pub(super) fn new(cursor: &Cursor<'_>, storage: &ParameterStorage<'_, '_>) -> Self {
        Self {
            checkpoint: cursor.checkpoint(),
            storage_len: storage.len(),
        }
    }

    /// Undoes the effects of a failed attempt.
    ///
    /// The CEK buffer is zeroized, the claimed slots of the storage are
    /// released and the cursor is moved behind the recipient, so that its
    /// siblings can still be read. If the recipient is not even a well-formed
    /// data item, the cursor is left with that error.
    pub(super) fn rewind<T>(
        self,
        result: Result<T, Error>,
        cursor: &mut Cursor<'_>,
        cek_buffer: &mut [u8],
        storage: &mut ParameterStorage<'_, '_>,
    ) -> Result<T, Error> {
        if result.is_err() {
            cek_buffer.zeroize();
            storage.truncate(self.storage_len);
            cursor.restore(self.checkpoint);
            // a failure to skip stays in the cursor as its sticky error
            let _ = cursor.skip_item();
        }
        result
    }
}
