/// Implements the id and name lookups of a COSE algorithm registry enum.
///
/// Every entry maps an IANA algorithm id and name to a variant; the enum must
/// have an `Other(i64)` variant for ids that are not in the list. Ids listed
/// under `unimplemented` stay `Other`, but are displayed with their name.
macro_rules! impl_cose_algorithm {
    ($T:ty, [
        $($id:literal, $name:literal => $val:expr; $valp:pat,)*
    ], unimplemented: [
        $($other_id:literal, $other_name:literal,)*
    ]) => {
        impl core::fmt::Display for $T {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match &self {
                    $($valp => write!(f, "{}", $name),)*
                    Self::Other(other) => match *other {
                        $($other_id => f.write_str($other_name),)*
                        other => write!(f, "{}", other),
                    },
                }
            }
        }

        impl $T {
            /// Looks up the algorithm registered under `id`.
            ///
            /// Ids that are not known to this implementation are returned as
            /// the `Other` variant.
            pub fn from_id(id: i64) -> Self {
                match id {
                    $($id => $val,)*
                    _ => Self::Other(id),
                }
            }

            /// The id this algorithm is registered under.
            pub fn id(&self) -> i64 {
                match self {
                    $($valp => $id,)*
                    Self::Other(other) => *other,
                }
            }
        }
    };
}
