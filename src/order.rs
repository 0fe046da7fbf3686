//! Byte permutation between the native and the database representation.
//!
//! SQL Server compares `uniqueidentifier` values by byte groups in the order `10..16`, `8..10`,
//! `6..8`, `4..6` and `0..4`, whereas the native comparator reads the leading bytes as
//! little-endian integer fields. The fixed permutation here moves every byte to the slot with
//! the same significance under the other comparator, so a value and its permuted form sort
//! identically under their respective comparators.

use std::{cmp, fmt, str};

use crate::{Guid, ParseError};

/// `db[i] = native[TO_DATABASE[i]]`
const TO_DATABASE: [usize; 16] = [12, 13, 14, 15, 10, 11, 8, 9, 7, 6, 3, 2, 1, 0, 5, 4];

/// `native[i] = db[TO_NATIVE[i]]`; the exact inverse of [`TO_DATABASE`].
const TO_NATIVE: [usize; 16] = [13, 12, 11, 10, 15, 14, 9, 8, 6, 7, 4, 5, 0, 1, 2, 3];

/// Byte positions in the order SQL Server compares them, most significant first.
const DATABASE_SIGNIFICANCE: [usize; 16] = [10, 11, 12, 13, 14, 15, 8, 9, 6, 7, 4, 5, 0, 1, 2, 3];

const fn permute(src: &[u8; 16], table: &[usize; 16]) -> [u8; 16] {
    let mut dst = [0u8; 16];
    let mut i = 0;
    while i < 16 {
        dst[i] = src[table[i]];
        i += 1;
    }
    dst
}

/// Re-sequences native-layout bytes into the database layout.
pub const fn to_database_order(native: &[u8; 16]) -> [u8; 16] {
    permute(native, &TO_DATABASE)
}

/// Re-sequences database-layout bytes into the native layout.
pub const fn to_native_order(db: &[u8; 16]) -> [u8; 16] {
    permute(db, &TO_NATIVE)
}

/// Selects which byte order a generator emits.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ByteOrder {
    /// Bytes ordered for the native comparator.
    #[default]
    Native,

    /// Bytes ordered for the database comparator, ready to be stored in a `uniqueidentifier`
    /// column.
    Database,
}

impl ByteOrder {
    /// Converts native-layout bytes into this byte order.
    pub const fn apply(self, native: [u8; 16]) -> [u8; 16] {
        match self {
            Self::Native => native,
            Self::Database => to_database_order(&native),
        }
    }
}

/// Represents a GUID in the database byte layout.
///
/// The [`Ord`] implementation is the *database comparator* that SQL Server applies to its
/// `uniqueidentifier` column type. The text form is the same 8-4-4-4-12 form as [`Guid`],
/// rendered from these bytes as they are.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SqlGuid([u8; 16]);

impl SqlGuid {
    /// Creates a value from bytes already in the database layout.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Re-sequences the bytes back into the native layout.
    pub const fn to_guid(&self) -> Guid {
        Guid::from_bytes(to_native_order(&self.0))
    }
}

impl Ord for SqlGuid {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        DATABASE_SIGNIFICANCE
            .iter()
            .map(|&i| self.0[i].cmp(&other.0[i]))
            .find(|o| o.is_ne())
            .unwrap_or(cmp::Ordering::Equal)
    }
}

impl PartialOrd for SqlGuid {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SqlGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Guid::from_bytes(self.0).encode())
    }
}

impl str::FromStr for SqlGuid {
    type Err = ParseError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        src.parse::<Guid>().map(|e| Self(e.into_bytes()))
    }
}

impl From<SqlGuid> for [u8; 16] {
    fn from(src: SqlGuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for SqlGuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

#[cfg(test)]
mod tests {
    use super::{to_database_order, to_native_order, ByteOrder, SqlGuid, TO_DATABASE, TO_NATIVE};
    use crate::Guid;

    /// Uses bijective tables that invert each other
    #[test]
    fn uses_bijective_tables_that_invert_each_other() {
        for table in [TO_DATABASE, TO_NATIVE] {
            let mut seen = [false; 16];
            for i in table {
                assert!(!seen[i], "slot {i} duplicated");
                seen[i] = true;
            }
        }

        for i in 0..16 {
            assert_eq!(TO_DATABASE[TO_NATIVE[i]], i);
            assert_eq!(TO_NATIVE[TO_DATABASE[i]], i);
        }
    }

    /// Round-trips random inputs in both directions
    #[test]
    fn round_trips_random_inputs_in_both_directions() {
        for _ in 0..10_000 {
            let x: [u8; 16] = rand::random();
            assert_eq!(to_native_order(&to_database_order(&x)), x);
            assert_eq!(to_database_order(&to_native_order(&x)), x);
        }
    }

    /// Moves prepared bytes to the expected slots
    #[test]
    fn moves_prepared_bytes_to_the_expected_slots() {
        let native: [u8; 16] = core::array::from_fn(|i| i as u8);
        assert_eq!(
            to_database_order(&native),
            [12, 13, 14, 15, 10, 11, 8, 9, 7, 6, 3, 2, 1, 0, 5, 4]
        );
        assert_eq!(ByteOrder::Native.apply(native), native);
        assert_eq!(ByteOrder::Database.apply(native), to_database_order(&native));
    }

    /// Sorts by the database comparator
    #[test]
    fn sorts_by_the_database_comparator() {
        let sorted = [
            "01000000-0000-0000-0000-000000000000",
            "00010000-0000-0000-0000-000000000000",
            "00000100-0000-0000-0000-000000000000",
            "00000001-0000-0000-0000-000000000000",
            "00000000-0100-0000-0000-000000000000",
            "00000000-0001-0000-0000-000000000000",
            "00000000-0000-0100-0000-000000000000",
            "00000000-0000-0001-0000-000000000000",
            "00000000-0000-0000-0001-000000000000",
            "00000000-0000-0000-0100-000000000000",
            "00000000-0000-0000-0000-000000000001",
            "00000000-0000-0000-0000-000000000100",
            "00000000-0000-0000-0000-000000010000",
            "00000000-0000-0000-0000-000001000000",
            "00000000-0000-0000-0000-000100000000",
            "00000000-0000-0000-0000-010000000000",
        ]
        .map(|e| e.parse::<SqlGuid>().unwrap());

        let mut shuffled = sorted;
        shuffled.reverse();
        shuffled.sort();
        assert_eq!(shuffled, sorted);
    }

    /// Preserves order across the two comparators
    #[test]
    fn preserves_order_across_the_two_comparators() {
        let mut natives: Vec<Guid> = (0..1_000)
            .map(|_| Guid::from(rand::random::<[u8; 16]>()))
            .collect();
        // keep the leading field non-negative so both comparators read it the same way
        for e in natives.iter_mut() {
            let mut bytes = e.into_bytes();
            bytes[3] &= 0x7f;
            *e = Guid::from(bytes);
        }
        natives.sort();

        let sqls: Vec<SqlGuid> = natives.iter().map(Guid::to_sql_guid).collect();
        for pair in sqls.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }
}
