use std::{cmp, fmt, ops, str};

use crate::{order, ParseError, SqlGuid};

/// Positions of the 16 bytes in the 8-4-4-4-12 text form.
///
/// The leading `a`, `b` and `c` fields are little-endian integers and are printed most
/// significant byte first; the trailing eight bytes are printed as they are stored.
const TEXT_ORDER: [usize; 16] = [3, 2, 1, 0, 5, 4, 7, 6, 8, 9, 10, 11, 12, 13, 14, 15];

/// Represents a GUID in its native (in-memory) byte layout.
///
/// The 16 bytes are interpreted as the fields `a: i32`, `b: u16` and `c: u16`, all
/// little-endian, followed by eight opaque bytes. The [`Ord`] implementation is the *native
/// comparator*: it compares `a` as a **signed** integer, then `b` and `c` as unsigned integers,
/// then the trailing bytes lexicographically. Use [`SqlGuid`] for the database comparator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Guid([u8; 16]);

impl Guid {
    /// Nil GUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max GUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Creates a GUID from its native byte layout.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns the underlying byte array.
    pub const fn into_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Re-sequences the bytes so that the value sorts in the same order under the database
    /// comparator as `self` does under the native comparator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hotguid::Guid;
    ///
    /// let x: Guid = "00000000-0000-0000-0000-000000000001".parse()?;
    /// let y: Guid = "00000001-0000-0000-0000-000000000000".parse()?;
    /// assert!(x < y);
    /// assert!(x.to_sql_guid() < y.to_sql_guid());
    /// assert_eq!(x.to_sql_guid().to_guid(), x);
    /// # Ok::<(), hotguid::ParseError>(())
    /// ```
    pub const fn to_sql_guid(&self) -> SqlGuid {
        SqlGuid::from_bytes(order::to_database_order(&self.0))
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// structure that can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hotguid::Guid;
    ///
    /// let x = "01234567-89ab-cdef-aabb-12340102fffe".parse::<Guid>()?;
    /// assert_eq!(x.as_bytes()[..4], [0x67, 0x45, 0x23, 0x01]);
    /// assert_eq!(&x.encode() as &str, "01234567-89ab-cdef-aabb-12340102fffe");
    /// # Ok::<(), hotguid::ParseError>(())
    /// ```
    pub fn encode(&self) -> impl ops::Deref<Target = str> + fmt::Display {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut cursor = 0;
        for (i, &pos) in TEXT_ORDER.iter().enumerate() {
            let e = self.0[pos] as usize;
            buffer[cursor] = DIGITS[e >> 4];
            buffer[cursor + 1] = DIGITS[e & 15];
            cursor += 2;
            if i == 3 || i == 5 || i == 7 || i == 9 {
                buffer[cursor] = b'-';
                cursor += 1;
            }
        }
        debug_assert!(buffer.is_ascii());
        GuidStr(buffer)
    }

    /// Returns the fields compared by the native comparator, in comparison order.
    fn sort_key(&self) -> (i32, u16, u16, &[u8]) {
        let b = &self.0;
        (
            i32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            u16::from_le_bytes([b[4], b[5]]),
            u16::from_le_bytes([b[6], b[7]]),
            &b[8..],
        )
    }
}

impl Ord for Guid {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Guid {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Guid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Guid {
    type Err = ParseError;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        const ERR: ParseError = ParseError {};
        let mut dst = [0u8; 16];
        let mut iter = src.chars();
        for (i, &pos) in TEXT_ORDER.iter().enumerate() {
            let hi = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            let lo = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            dst[pos] = (hi << 4) | lo;
            if (i == 3 || i == 5 || i == 7 || i == 9) && iter.next().ok_or(ERR)? != '-' {
                return Err(ERR);
            }
        }
        if iter.next().is_none() {
            Ok(Self(dst))
        } else {
            Err(ERR)
        }
    }
}

impl From<Guid> for [u8; 16] {
    fn from(src: Guid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Guid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Guid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Guid> for String {
    fn from(src: Guid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Guid {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

/// Concrete return type of [`Guid::encode()`] containing the stack-allocated 8-4-4-4-12 string
/// representation.
struct GuidStr([u8; 36]);

impl ops::Deref for GuidStr {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        debug_assert!(self.0.is_ascii());
        unsafe { str::from_utf8_unchecked(&self.0) }
    }
}

impl fmt::Display for GuidStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Guid;

    impl From<Guid> for uuid::Uuid {
        fn from(src: Guid) -> Self {
            uuid::Uuid::from_bytes_le(src.0)
        }
    }

    impl From<uuid::Uuid> for Guid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.to_bytes_le())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Guid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Guid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Guid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Guid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a GUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::Guid;
        use serde_test::{assert_tokens, Configure, Token};

        /// Serializes and deserializes prepared cases correctly
        #[test]
        fn serializes_and_deserializes_prepared_cases_correctly() {
            let cases = [
                ("00000000-0000-0000-0000-000000000000", &[0u8; 16]),
                (
                    "6553f100-bbaa-12cc-340a-0b0cefbeadde",
                    &[
                        0x00, 0xf1, 0x53, 0x65, 0xaa, 0xbb, 0xcc, 0x12, 0x34, 0x0a, 0x0b, 0x0c,
                        0xef, 0xbe, 0xad, 0xde,
                    ],
                ),
                (
                    "01234567-89ab-cdef-aabb-12340102fffe",
                    &[
                        0x67, 0x45, 0x23, 0x01, 0xab, 0x89, 0xef, 0xcd, 0xaa, 0xbb, 0x12, 0x34,
                        0x01, 0x02, 0xff, 0xfe,
                    ],
                ),
            ];

            for (text, bytes) in cases {
                let e = text.parse::<Guid>().unwrap();
                assert_tokens(&e.readable(), &[Token::String(text)]);
                assert_tokens(&e.compact(), &[Token::Bytes(bytes)]);
            }
        }
    }
}
