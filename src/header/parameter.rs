use core::fmt;

use super::HeaderLocation;

/// The label of a header parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label<'b> {
    /// An integer label, used by all parameters registered in the [IANA
    /// registry][1]
    ///
    /// [1]: <https://www.iana.org/assignments/cose/cose.xhtml#header-parameters>
    Int(i64),
    /// A text label
    Text(&'b str),
}

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(label) => write!(f, "{label}"),
            Label::Text(label) => write!(f, "{label:?}"),
        }
    }
}

/// The decoded value of a header parameter.
///
/// Strings borrow from the decoded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'b> {
    /// An integer
    Int(i64),
    /// A byte string
    Bytes(&'b [u8]),
    /// A text string
    Text(&'b str),
    /// `true` or `false`
    Bool(bool),
    /// Any other data item, kept in its encoded form
    Encoded(&'b [u8]),
}

impl<'b> Value<'b> {
    /// Returns the integer, if this is [`Value::Int`].
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the bytes, if this is [`Value::Bytes`].
    pub const fn as_bytes(&self) -> Option<&'b [u8]> {
        match self {
            Value::Bytes(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text, if this is [`Value::Text`].
    pub const fn as_text(&self) -> Option<&'b str> {
        match self {
            Value::Text(v) => Some(*v),
            _ => None,
        }
    }
}

/// The header bucket a parameter was found in.
///
/// Only parameters of the protected bucket are covered by the integrity
/// protection of the layer they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// The protected bucket, a byte string wrapped map
    Protected,
    /// The unprotected bucket, a plain map
    Unprotected,
}

impl Bucket {
    /// Returns `true` for [`Bucket::Protected`].
    pub const fn is_protected(self) -> bool {
        matches!(self, Bucket::Protected)
    }
}

/// One decoded header parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter<'b> {
    /// The label of this parameter
    pub label: Label<'b>,
    /// The value of this parameter
    pub value: Value<'b>,
    /// The bucket this parameter was found in
    pub bucket: Bucket,
    /// `true` if this parameter is listed in the `crit` parameter
    pub critical: bool,
    /// The header this parameter belongs to
    pub location: HeaderLocation,
}
