//! Time-ordered 128-bit identifiers with an embedded shard key
//!
//! ```rust
//! use hotguid::hot_guid;
//!
//! let id = hot_guid(42);
//! println!("{}", id); // e.g. "e8e4c100-0d9c-08dc-1c07-d1e2002a4cc5"
//! println!("{:?}", id.as_bytes()); // as 16-byte native array
//! ```
//!
//! Identifiers minted by one [`Generator`] sort in creation order under the *native comparator*
//! ([`Guid`]'s [`Ord`]) and, after the fixed byte permutation in [`order`], under the *database
//! comparator* that SQL Server applies to `uniqueidentifier` columns ([`SqlGuid`]'s [`Ord`]).
//! Each identifier carries a caller-supplied shard key that can be read back without a lookup
//! table, and a salt derived from the host name and process ID that keeps concurrent
//! generators apart.
//!
//! ```rust
//! use hotguid::{ByteOrder, Config, Generator, SqlGuid};
//!
//! let g = Generator::new(Config::new().byte_order(ByteOrder::Database).counter_seed(0));
//! let a = SqlGuid::from_bytes(g.mint(7).into_bytes());
//! let b = SqlGuid::from_bytes(g.mint(7).into_bytes());
//! assert!(a < b);
//! ```
//!
//! # Field and byte layout
//!
//! Two layouts are supported. Multi-byte fields are little-endian (LE) or big-endian (BE) as
//! marked; the native comparator reads bytes `0..4`, `4..6` and `6..8` as LE integers and the
//! rest in byte order.
//!
//! [`Layout::Fine`], the default:
//!
//! ```text
//!  0       4   6   8   10  12  14  16
//! +-------+---+---+---+---+---+---+
//! | ticks | t | t | h | p | s | n |
//! | >>32  |>>16   |   |   |   |   |
//! +-------+---+---+---+---+---+---+
//! ```
//!
//! - `0..4`: bits 63..32 of the timestamp, LE.
//! - `4..6`: bits 31..16 of the timestamp, LE.
//! - `6..8`: bits 15..0 of the timestamp, LE.
//! - `8..10` (`h`): first two bytes of the SHA-256 digest of the host name.
//! - `10..12` (`p`): low 16 bits of the process ID, BE.
//! - `12..14` (`s`): low 16 bits of the shard key, BE.
//! - `14..16` (`n`): low 16 bits of the counter, BE.
//!
//! The timestamp counts 100-nanosecond ticks since 0001-01-01T00:00:00Z.
//!
//! [`Layout::Coarse`]:
//!
//! ```text
//!  0         4         7    9         12        16
//! +---------+---------+----+---------+---------+
//! | seconds |  host   |pid | counter |  shard  |
//! +---------+---------+----+---------+---------+
//! ```
//!
//! - `0..4`: Unix seconds truncated to 32 bits, LE.
//! - `4..7`: first three bytes of the SHA-256 digest of the host name.
//! - `7..9`: low 16 bits of the process ID, BE.
//! - `9..12`: low 24 bits of the counter, BE.
//! - `12..16`: shard key, LE.
//!
//! The native comparator reads the seconds field as a signed integer, so coarse identifiers
//! minted after 2038-01-19T03:14:07Z sort before earlier ones natively; the database
//! comparator is unaffected. The field wraps to zero in 2106.
//!
//! The counter is seeded once per generator, below 500,000 unless configured, and increments
//! by one on every mint, wrapping silently at the field width. Identifiers are therefore
//! unique per generator as long as fewer than 2<sup>16</sup> (fine) or 2<sup>24</sup> (coarse)
//! are minted within one timestamp value.
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen`: enables the process-wide generator behind [`hot_guid`], [`hot_guid_at`],
//!   [`init`] and [`global`].
//!
//! Optional features:
//!
//! - `serde`: enables serialization and deserialization of [`Guid`] and [`Config`].
//! - `uuid`: enables conversion from/to `uuid::Uuid`.
//! - `tracing`: emits `tracing` events on generator construction and timestamp rejection.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::{Error, ParseError, Result};

mod id;
pub use id::Guid;

pub mod order;
pub use order::{ByteOrder, SqlGuid};

mod salt;
pub use salt::Salt;

pub mod timestamp;
pub use timestamp::{Clock, SystemClock, Timestamp};

pub mod layout;
pub use layout::{Fields, Layout};

pub mod generator;
pub use generator::{Config, Generator};

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{global, hot_guid, hot_guid_at, init};
