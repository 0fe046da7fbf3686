//! Field layouts and the identifier encoder/decoder.

use chrono::{DateTime, Utc};

use crate::timestamp::{self, UNIX_EPOCH_TICKS};
use crate::{order, Guid, Salt};

/// Selects which fields an identifier carries and where.
///
/// See the [crate documentation](crate#field-and-byte-layout) for the byte-level diagrams.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Layout {
    /// 32-bit Unix seconds, 5-byte salt, 24-bit counter and 32-bit shard key.
    Coarse,

    /// 64-bit 100-nanosecond ticks, 4-byte salt, 16-bit shard code and 16-bit counter.
    #[default]
    Fine,
}

/// Field values packed into an identifier.
///
/// The encoder keeps only as many low-order bits of each field as the layout has room for.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Fields {
    /// Unix seconds ([`Layout::Coarse`]) or ticks since 0001-01-01 ([`Layout::Fine`]).
    pub timestamp: u64,

    /// Machine and process discriminator.
    pub salt: Salt,

    /// Monotonic counter value.
    pub counter: u32,

    /// Caller-supplied shard key.
    pub shard_key: u32,
}

impl Layout {
    /// Returns the largest counter value the layout stores.
    pub const fn max_counter(self) -> u32 {
        match self {
            Self::Coarse => 0x00ff_ffff,
            Self::Fine => 0xffff,
        }
    }

    /// Returns the largest shard key the layout stores.
    pub const fn max_shard_key(self) -> u32 {
        match self {
            Self::Coarse => u32::MAX,
            Self::Fine => 0xffff,
        }
    }

    /// Packs field values into an identifier in native byte order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hotguid::{Fields, Layout, Salt};
    ///
    /// let id = Layout::Fine.encode(&Fields {
    ///     timestamp: 0x0123_4567_89ab_cdef,
    ///     salt: Salt::from_parts([0xaa, 0xbb, 0xcc], 0x1234),
    ///     counter: 0xfffe,
    ///     shard_key: 0x0102,
    /// });
    /// assert_eq!(id.to_string(), "01234567-89ab-cdef-aabb-12340102fffe");
    /// ```
    pub fn encode(self, fields: &Fields) -> Guid {
        let host = fields.salt.host_hash();
        let pid = fields.salt.pid().to_be_bytes();
        let counter = (fields.counter & self.max_counter()).to_be_bytes();

        let bytes = match self {
            Self::Coarse => {
                let ts = (fields.timestamp as u32).to_le_bytes();
                let shard = fields.shard_key.to_le_bytes();
                [
                    ts[0], ts[1], ts[2], ts[3], host[0], host[1], host[2], pid[0], pid[1],
                    counter[1], counter[2], counter[3], shard[0], shard[1], shard[2], shard[3],
                ]
            }
            Self::Fine => {
                let a = ((fields.timestamp >> 32) as u32).to_le_bytes();
                let b = ((fields.timestamp >> 16) as u16).to_le_bytes();
                let c = (fields.timestamp as u16).to_le_bytes();
                let shard = (fields.shard_key as u16).to_be_bytes();
                [
                    a[0], a[1], a[2], a[3], b[0], b[1], c[0], c[1], host[0], host[1], pid[0],
                    pid[1], shard[0], shard[1], counter[2], counter[3],
                ]
            }
        };
        Guid::from_bytes(bytes)
    }

    /// Reads the raw timestamp field bit for bit.
    ///
    /// The result is meaningless for identifiers this layout did not produce.
    pub fn decode_timestamp(self, id: &Guid) -> u64 {
        let b = id.as_bytes();
        let a = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        match self {
            Self::Coarse => u64::from(a),
            Self::Fine => {
                let mid = u16::from_le_bytes([b[4], b[5]]);
                let low = u16::from_le_bytes([b[6], b[7]]);
                u64::from(a) << 32 | u64::from(mid) << 16 | u64::from(low)
            }
        }
    }

    /// Reads the shard key field.
    pub fn decode_shard_key(self, id: &Guid) -> u32 {
        let b = id.as_bytes();
        match self {
            Self::Coarse => u32::from_le_bytes([b[12], b[13], b[14], b[15]]),
            Self::Fine => u32::from(u16::from_be_bytes([b[12], b[13]])),
        }
    }

    /// Reads the counter field.
    pub fn decode_counter(self, id: &Guid) -> u32 {
        let b = id.as_bytes();
        match self {
            Self::Coarse => u32::from_be_bytes([0, b[9], b[10], b[11]]),
            Self::Fine => u32::from(u16::from_be_bytes([b[14], b[15]])),
        }
    }

    /// Converts a UTC instant into this layout's raw timestamp unit, before truncation to the
    /// field width.
    ///
    /// Instants before the layout's origin (the Unix epoch for [`Layout::Coarse`], 0001-01-01 for
    /// [`Layout::Fine`]) saturate to zero.
    pub fn raw_timestamp(self, t: &DateTime<Utc>) -> u64 {
        match self {
            Self::Coarse => t.timestamp().max(0) as u64,
            Self::Fine => timestamp::ticks_from_utc(t),
        }
    }

    /// Converts a raw timestamp of this layout into a UTC instant, or returns `None` if it is
    /// not representable.
    pub fn to_calendar_time(self, raw: u64) -> Option<DateTime<Utc>> {
        match self {
            Self::Coarse => DateTime::from_timestamp(i64::try_from(raw).ok()?, 0),
            Self::Fine => timestamp::utc_from_ticks(raw),
        }
    }

    /// Returns true if the raw timestamp lies between the Unix epoch and now.
    pub fn is_plausible_timestamp(self, raw: u64) -> bool {
        self.is_plausible_timestamp_at(raw, &Utc::now())
    }

    /// Returns true if the raw timestamp lies between the Unix epoch and `now`.
    pub fn is_plausible_timestamp_at(self, raw: u64, now: &DateTime<Utc>) -> bool {
        let floor = match self {
            Self::Coarse => 0,
            Self::Fine => UNIX_EPOCH_TICKS,
        };
        floor <= raw && raw <= self.raw_timestamp(now)
    }

    /// Decodes the creation time of an identifier that may be in either byte order.
    ///
    /// The bytes are read as they are first; if that yields an implausible timestamp, they are
    /// read again after conversion from database to native order. Returns `None` if neither
    /// reading is plausible, which is the common outcome for random or foreign values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use hotguid::{ByteOrder, Config, Generator, Layout};
    ///
    /// let t = Utc.with_ymd_and_hms(2020, 2, 29, 12, 0, 0).unwrap();
    /// let g = Generator::new(Config::new().byte_order(ByteOrder::Database).counter_seed(0));
    /// let id = g.mint_at(7, t)?;
    /// assert_eq!(Layout::Fine.decode_as_calendar_time(&id), Some(t));
    /// # Ok::<(), hotguid::Error>(())
    /// ```
    pub fn decode_as_calendar_time(self, id: &Guid) -> Option<DateTime<Utc>> {
        self.decode_as_calendar_time_at(id, &Utc::now())
    }

    /// Decodes the creation time like [`Layout::decode_as_calendar_time`], judging plausibility
    /// against `now`.
    pub fn decode_as_calendar_time_at(
        self,
        id: &Guid,
        now: &DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let converted = Guid::from_bytes(order::to_native_order(id.as_bytes()));
        [*id, converted]
            .iter()
            .map(|e| self.decode_timestamp(e))
            .find(|&raw| self.is_plausible_timestamp_at(raw, now))
            .and_then(|raw| self.to_calendar_time(raw))
    }
}
