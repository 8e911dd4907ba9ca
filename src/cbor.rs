//! A cursor over the CBOR data items that make up COSE structures.
//!
//! [`Cursor`] wraps a [`minicbor::Decoder`] and remembers the arrays and maps
//! it has entered, so that a structure can be walked field by field: every
//! read consumes one item of the innermost container, reading past the end of
//! a container fails, and leaving a container that still has unread items
//! fails too.
//!
//! Errors are sticky. Once a read failed, every following call reports the
//! same error until the cursor is moved back with [`Cursor::restore`]. This
//! allows a caller to perform a run of reads and inspect
//! [`Cursor::current_error`] once at the end, while the methods also return a
//! [`Result`] for use with `?`.

use minicbor::{data::Type, Decoder};

/// Maximum depth of arrays and maps a [`Cursor`] can be inside of.
pub const MAX_NESTING: usize = 15;

/// Errors produced while walking CBOR input with a [`Cursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The input ended in the middle of a data item.
    #[error("unexpected end of input")]
    EndOfInput,
    /// The next data item is not of the requested type.
    #[error("data item has an unexpected type")]
    UnexpectedType,
    /// The innermost array or map has no more items to read.
    #[error("no more items in the enclosing array or map")]
    NoMoreItems,
    /// An array or map was left before all of its items were read.
    #[error("array or map has unconsumed items")]
    UnconsumedItems,
    /// Entering another array or map would exceed [`MAX_NESTING`].
    #[error("arrays and maps are nested too deeply")]
    NestingTooDeep,
    /// `exit_array` or `exit_map` was called without a matching enter.
    #[error("not inside an array or map of the requested kind")]
    NotInContainer,
    /// Bytes are left over after the last data item.
    #[error("trailing bytes after the last data item")]
    TrailingBytes,
    /// The input is not well-formed CBOR.
    #[error("malformed CBOR")]
    Malformed,
}

impl From<minicbor::decode::Error> for Error {
    fn from(err: minicbor::decode::Error) -> Self {
        if err.is_end_of_input() {
            Self::EndOfInput
        } else if err.is_type_mismatch() {
            Self::UnexpectedType
        } else {
            Self::Malformed
        }
    }
}

/// The major kind of the next data item, as reported by
/// [`Cursor::peek_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ItemType {
    /// Unsigned or negative integer.
    Int,
    /// Byte string.
    Bytes,
    /// Text string.
    Text,
    /// Array.
    Array,
    /// Map.
    Map,
    /// Tagged data item.
    Tag,
    /// `true` or `false`.
    Bool,
    /// `null` or `undefined`.
    Null,
    /// Floating point number.
    Float,
    /// Any other simple value or a break marker.
    Other,
}

impl From<Type> for ItemType {
    fn from(ty: Type) -> Self {
        match ty {
            Type::U8
            | Type::U16
            | Type::U32
            | Type::U64
            | Type::I8
            | Type::I16
            | Type::I32
            | Type::I64
            | Type::Int => Self::Int,
            Type::Bytes | Type::BytesIndef => Self::Bytes,
            Type::String | Type::StringIndef => Self::Text,
            Type::Array | Type::ArrayIndef => Self::Array,
            Type::Map | Type::MapIndef => Self::Map,
            Type::Tag => Self::Tag,
            Type::Bool => Self::Bool,
            Type::Null | Type::Undefined => Self::Null,
            Type::F16 | Type::F32 | Type::F64 => Self::Float,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Array,
    Map,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    container: Container,
    /// Items left to read, `None` for indefinite length containers which end
    /// at a break marker.
    remaining: Option<u64>,
}

impl Frame {
    const EMPTY: Frame = Frame {
        container: Container::Array,
        remaining: Some(0),
    };
}

/// A saved position of a [`Cursor`], see [`Cursor::checkpoint`].
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    position: usize,
    depth: usize,
    frames: [Frame; MAX_NESTING],
}

/// A position-advancing reader over CBOR input.
///
/// The cursor borrows its input; every byte or text string it returns
/// borrows from that input as well, nothing is copied.
#[derive(Debug, Clone)]
pub struct Cursor<'b> {
    decoder: Decoder<'b>,
    frames: [Frame; MAX_NESTING],
    depth: usize,
    error: Option<Error>,
}

impl<'b> Cursor<'b> {
    /// Creates a cursor positioned before the first data item of `input`.
    pub fn new(input: &'b [u8]) -> Self {
        Self {
            decoder: Decoder::new(input),
            frames: [Frame::EMPTY; MAX_NESTING],
            depth: 0,
            error: None,
        }
    }

    /// The offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.decoder.position()
    }

    /// The number of arrays and maps the cursor is currently inside of.
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// The error that stopped this cursor, if any.
    pub const fn current_error(&self) -> Option<Error> {
        self.error
    }

    /// Saves the current position, including the containers entered so far.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.decoder.position(),
            depth: self.depth,
            frames: self.frames,
        }
    }

    /// Moves the cursor back to `checkpoint` and clears the sticky error.
    ///
    /// The checkpoint must have been taken from this cursor.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.decoder.set_position(checkpoint.position);
        self.depth = checkpoint.depth;
        self.frames = checkpoint.frames;
        self.error = None;
    }

    /// Returns `true` if the innermost container has items left to read, or,
    /// outside of any container, if input is left.
    ///
    /// # Errors
    ///
    /// Returns the sticky error, or an error if the input ends inside of an
    /// indefinite length container.
    pub fn has_more(&mut self) -> Result<bool, Error> {
        self.check()?;
        let Some(frame) = self.depth.checked_sub(1).map(|i| self.frames[i]) else {
            return Ok(self.decoder.position() < self.decoder.input().len());
        };
        match frame.remaining {
            Some(n) => Ok(n > 0),
            None => {
                let ty = self.decoder.datatype().map_err(Error::from);
                let ty = self.record(ty)?;
                Ok(ty != Type::Break)
            }
        }
    }

    /// Enters an array and returns its length, or `None` for an indefinite
    /// length array.
    ///
    /// # Errors
    ///
    /// Fails if the next item is not an array, if there is no next item in
    /// the current container, or if [`MAX_NESTING`] would be exceeded.
    pub fn enter_array(&mut self) -> Result<Option<u64>, Error> {
        self.begin_item()?;
        if self.depth == MAX_NESTING {
            return self.fail(Error::NestingTooDeep);
        }
        let len = self.decoder.array().map_err(Error::from);
        let len = self.record(len)?;
        self.push(Container::Array, len);
        Ok(len)
    }

    /// Leaves the innermost array.
    ///
    /// # Errors
    ///
    /// Fails if the innermost container is not an array or if it has
    /// unconsumed items.
    pub fn exit_array(&mut self) -> Result<(), Error> {
        self.exit(Container::Array)
    }

    /// Enters a map and returns its number of entries, or `None` for an
    /// indefinite length map.
    ///
    /// Inside of a map, keys and values are read as separate items.
    ///
    /// # Errors
    ///
    /// Same as [`enter_array`](Self::enter_array).
    pub fn enter_map(&mut self) -> Result<Option<u64>, Error> {
        self.begin_item()?;
        if self.depth == MAX_NESTING {
            return self.fail(Error::NestingTooDeep);
        }
        let len = self.decoder.map().map_err(Error::from);
        let len = self.record(len)?;
        let items = match len {
            Some(n) => match n.checked_mul(2) {
                Some(items) => Some(items),
                None => return self.fail(Error::Malformed),
            },
            None => None,
        };
        self.push(Container::Map, items);
        Ok(len)
    }

    /// Leaves the innermost map.
    ///
    /// # Errors
    ///
    /// Same as [`exit_array`](Self::exit_array).
    pub fn exit_map(&mut self) -> Result<(), Error> {
        self.exit(Container::Map)
    }

    /// Reads a definite length byte string.
    ///
    /// # Errors
    ///
    /// Fails if the next item is not a byte string or if there is no next
    /// item in the current container.
    pub fn read_byte_string(&mut self) -> Result<&'b [u8], Error> {
        self.begin_item()?;
        let bytes = self.decoder.bytes().map_err(Error::from);
        self.record(bytes)
    }

    /// Reads a definite length text string.
    ///
    /// # Errors
    ///
    /// Fails if the next item is not a text string or if there is no next
    /// item in the current container.
    pub fn read_text(&mut self) -> Result<&'b str, Error> {
        self.begin_item()?;
        let text = self.decoder.str().map_err(Error::from);
        self.record(text)
    }

    /// Reads an integer that fits into an `i64`.
    ///
    /// # Errors
    ///
    /// Fails if the next item is not an integer, if it is out of range, or if
    /// there is no next item in the current container.
    pub fn read_int(&mut self) -> Result<i64, Error> {
        self.begin_item()?;
        let int = self.decoder.i64().map_err(Error::from);
        self.record(int)
    }

    /// Reads `true` or `false`.
    ///
    /// # Errors
    ///
    /// Fails if the next item is not a boolean or if there is no next item in
    /// the current container.
    pub fn read_bool(&mut self) -> Result<bool, Error> {
        self.begin_item()?;
        let b = self.decoder.bool().map_err(Error::from);
        self.record(b)
    }

    /// Skips the next data item, including everything nested inside of it,
    /// and returns its encoded bytes.
    ///
    /// # Errors
    ///
    /// Fails if the item is malformed or if there is no next item in the
    /// current container.
    pub fn skip_item(&mut self) -> Result<&'b [u8], Error> {
        self.begin_item()?;
        let start = self.decoder.position();
        let skipped = self.decoder.skip().map_err(Error::from);
        self.record(skipped)?;
        let end = self.decoder.position();
        Ok(&self.decoder.input()[start..end])
    }

    /// Returns the type of the next data item without consuming it.
    ///
    /// # Errors
    ///
    /// Returns the sticky error or fails at the end of input.
    pub fn peek_type(&mut self) -> Result<ItemType, Error> {
        self.check()?;
        let ty = self.decoder.datatype().map_err(Error::from);
        self.record(ty).map(ItemType::from)
    }

    /// Checks that the whole input was consumed and every entered container
    /// was left again.
    ///
    /// # Errors
    ///
    /// Returns the sticky error, [`Error::UnconsumedItems`] if a container is
    /// still open, or [`Error::TrailingBytes`] if input is left.
    pub fn finish(&self) -> Result<(), Error> {
        self.check()?;
        if self.depth != 0 {
            return Err(Error::UnconsumedItems);
        }
        if self.decoder.position() != self.decoder.input().len() {
            return Err(Error::TrailingBytes);
        }
        Ok(())
    }

    const fn check(&self) -> Result<(), Error> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fail<T>(&mut self, err: Error) -> Result<T, Error> {
        Err(*self.error.get_or_insert(err))
    }

    fn record<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
        match result {
            Ok(v) => Ok(v),
            Err(err) => self.fail(err),
        }
    }

    /// Accounts for one item of the innermost container about to be read.
    fn begin_item(&mut self) -> Result<(), Error> {
        self.check()?;
        let Some(index) = self.depth.checked_sub(1) else {
            return Ok(());
        };
        match self.frames[index].remaining {
            Some(0) => self.fail(Error::NoMoreItems),
            Some(n) => {
                self.frames[index].remaining = Some(n - 1);
                Ok(())
            }
            None => {
                let ty = self.decoder.datatype().map_err(Error::from);
                if self.record(ty)? == Type::Break {
                    return self.fail(Error::NoMoreItems);
                }
                Ok(())
            }
        }
    }

    fn push(&mut self, container: Container, remaining: Option<u64>) {
        self.frames[self.depth] = Frame {
            container,
            remaining,
        };
        self.depth += 1;
    }

    fn exit(&mut self, container: Container) -> Result<(), Error> {
        self.check()?;
        let Some(index) = self.depth.checked_sub(1) else {
            return self.fail(Error::NotInContainer);
        };
        let frame = self.frames[index];
        if frame.container != container {
            return self.fail(Error::NotInContainer);
        }
        match frame.remaining {
            Some(0) => {}
            Some(_) => return self.fail(Error::UnconsumedItems),
            None => {
                let ty = self.decoder.datatype().map_err(Error::from);
                if self.record(ty)? != Type::Break {
                    return self.fail(Error::UnconsumedItems);
                }
                // a break marker is a single byte
                let position = self.decoder.position();
                self.decoder.set_position(position + 1);
            }
        }
        self.depth = index;
        Ok(())
    }
}
