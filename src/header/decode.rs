use super::{
    label::{ALGORITHM, CONTENT_TYPE, CRITICAL, IV, KEY_ID, PARTIAL_IV},
    Bucket, Error, HeaderLocation, Label, Parameter, ParameterList, ParameterStorage, Value,
};
use crate::cbor::{Cursor, ItemType};

/// The result of [`decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedHeaders<'b> {
    /// The parameters of both buckets, protected ones first
    pub parameters: ParameterList,
    /// The encoded protected bucket, exactly as it appeared in the message.
    ///
    /// This is the byte string that gets authenticated, it is empty if the
    /// structure has no protected parameters.
    pub protected: &'b [u8],
}

/// Decodes the protected and the unprotected bucket at the position of
/// `cursor` into `storage`.
///
/// The cursor must be positioned at the protected bucket, which is a byte
/// string, followed by the unprotected bucket, which is a map. Both are
/// consumed.
///
/// # Errors
///
/// Returns an error if either bucket is malformed, if a rule about which
/// parameter may appear where is violated, or if `storage` runs out of slots.
/// On error, no slot of `storage` stays claimed by this call.
pub fn decode<'b>(
    cursor: &mut Cursor<'b>,
    location: HeaderLocation,
    storage: &mut ParameterStorage<'_, 'b>,
) -> Result<DecodedHeaders<'b>, Error> {
    let start = storage.len();
    let decoded = decode_buckets(cursor, location, storage, start);
    if decoded.is_err() {
        storage.truncate(start);
    }
    decoded
}

fn decode_buckets<'b>(
    cursor: &mut Cursor<'b>,
    location: HeaderLocation,
    storage: &mut ParameterStorage<'_, 'b>,
    start: usize,
) -> Result<DecodedHeaders<'b>, Error> {
    let protected = cursor.read_byte_string()?;
    if !protected.is_empty() {
        let mut inner = Cursor::new(protected);
        decode_map(&mut inner, Bucket::Protected, location, storage)?;
        inner.finish()?;
    }

    decode_map(cursor, Bucket::Unprotected, location, storage)?;

    let parameters = ParameterList::new(start, storage.len());
    check_parameters(storage, parameters, location)?;
    mark_critical(storage, parameters)?;

    Ok(DecodedHeaders {
        parameters,
        protected,
    })
}

fn decode_map<'b>(
    cursor: &mut Cursor<'b>,
    bucket: Bucket,
    location: HeaderLocation,
    storage: &mut ParameterStorage<'_, 'b>,
) -> Result<(), Error> {
    cursor.enter_map()?;
    while cursor.has_more()? {
        let label = decode_label(cursor)?;
        let value = decode_value(cursor, label)?;
        storage.push(Parameter {
            label,
            value,
            bucket,
            critical: false,
            location,
        })?;
    }
    cursor.exit_map()?;
    Ok(())
}

fn decode_label<'b>(cursor: &mut Cursor<'b>) -> Result<Label<'b>, Error> {
    match cursor.peek_type()? {
        ItemType::Int => Ok(Label::Int(cursor.read_int()?)),
        ItemType::Text => Ok(Label::Text(cursor.read_text()?)),
        _ => Err(Error::InvalidLabel),
    }
}

fn decode_value<'b>(cursor: &mut Cursor<'b>, label: Label<'b>) -> Result<Value<'b>, Error> {
    let value = match (label, cursor.peek_type()?) {
        (Label::Int(ALGORITHM), ItemType::Int) => Value::Int(cursor.read_int()?),
        (Label::Int(ALGORITHM | CONTENT_TYPE), ItemType::Text) => Value::Text(cursor.read_text()?),
        (Label::Int(CRITICAL), ItemType::Array) => Value::Encoded(cursor.skip_item()?),
        (Label::Int(CONTENT_TYPE), ItemType::Int) => match cursor.read_int()? {
            cty if cty >= 0 => Value::Int(cty),
            _ => return Err(Error::InvalidValue { label: CONTENT_TYPE }),
        },
        (Label::Int(KEY_ID | IV | PARTIAL_IV), ItemType::Bytes) => {
            Value::Bytes(cursor.read_byte_string()?)
        }
        (
            Label::Int(label @ (ALGORITHM | CRITICAL | CONTENT_TYPE | KEY_ID | IV | PARTIAL_IV)),
            _,
        ) => return Err(Error::InvalidValue { label }),
        (_, ItemType::Int) => Value::Int(cursor.read_int()?),
        (_, ItemType::Bytes) => Value::Bytes(cursor.read_byte_string()?),
        (_, ItemType::Text) => Value::Text(cursor.read_text()?),
        (_, ItemType::Bool) => Value::Bool(cursor.read_bool()?),
        (_, _) => Value::Encoded(cursor.skip_item()?),
    };
    Ok(value)
}

/// Applies the rules that involve more than one parameter or the location.
fn check_parameters(
    storage: &ParameterStorage<'_, '_>,
    parameters: ParameterList,
    location: HeaderLocation,
) -> Result<(), Error> {
    for (i, parameter) in storage.parameters(parameters).enumerate() {
        if storage
            .parameters(parameters)
            .skip(i + 1)
            .any(|other| other.label == parameter.label)
        {
            return Err(Error::DuplicateParameter);
        }
    }

    let has = |label| storage.find(parameters, Label::Int(label)).is_some();
    if has(IV) && has(PARTIAL_IV) {
        return Err(Error::IvAndPartialIv);
    }
    if has(CONTENT_TYPE) && !location.is_body() {
        return Err(Error::NotAllowedHere {
            label: CONTENT_TYPE,
        });
    }

    Ok(())
}

/// Validates the `crit` parameter and flags every parameter it lists.
fn mark_critical(
    storage: &mut ParameterStorage<'_, '_>,
    parameters: ParameterList,
) -> Result<(), Error> {
    let Some(crit) = storage.find(parameters, Label::Int(CRITICAL)).copied() else {
        return Ok(());
    };
    if !crit.bucket.is_protected() {
        return Err(Error::CriticalNotProtected);
    }
    let Value::Encoded(encoded) = crit.value else {
        return Err(Error::InvalidValue { label: CRITICAL });
    };

    let mut cursor = Cursor::new(encoded);
    cursor.enter_array()?;
    if !cursor.has_more()? {
        return Err(Error::EmptyCriticalParameters);
    }
    while cursor.has_more()? {
        let label = decode_label(&mut cursor)?;
        if !is_understood(label) {
            return Err(Error::UnknownCriticalParameter);
        }
        for index in parameters.indices() {
            if let Some(parameter) = storage.get_mut(index) {
                if parameter.label == label {
                    parameter.critical = true;
                }
            }
        }
    }
    cursor.exit_array()?;
    cursor.finish()?;

    Ok(())
}

/// Only the parameters of [section 3.1 of RFC 9052] are understood, there is
/// no hook for application defined critical parameters.
///
/// [section 3.1 of RFC 9052]: <https://datatracker.ietf.org/doc/html/rfc9052#section-3.1>
fn is_understood(label: Label<'_>) -> bool {
    matches!(
        label,
        Label::Int(ALGORITHM | CRITICAL | CONTENT_TYPE | KEY_ID | IV | PARTIAL_IV)
    )
}
