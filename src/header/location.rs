/// The position of a header inside of a COSE message.
///
/// Some parameters are only meaningful in some layers, e.g. the content type
/// describes the payload and thus only appears in the body layer. The header
/// decoder uses the location to apply these rules, and it records the location
/// in every decoded [`Parameter`](super::Parameter).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeaderLocation {
    /// `0` for the message body, `1` for the first layer of recipients, `2`
    /// for recipients of recipients
    pub nesting: u8,
    /// The position among the siblings at this nesting level
    pub index: u8,
}

impl HeaderLocation {
    /// The location of the body header of a message.
    pub const BODY: HeaderLocation = HeaderLocation {
        nesting: 0,
        index: 0,
    };

    /// Creates a location at the given nesting level and sibling index.
    pub const fn new(nesting: u8, index: u8) -> Self {
        Self { nesting, index }
    }

    /// Returns `true` for the body layer.
    pub const fn is_body(self) -> bool {
        self.nesting == 0
    }
}
