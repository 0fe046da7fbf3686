//! Identifier generator and its configuration.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use rand::Rng;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::timestamp::{Clock, SystemClock, Timestamp};
use crate::{order, ByteOrder, Error, Fields, Guid, Layout, Result, Salt};


/// Exclusive upper bound of the random initial counter value.
const COUNTER_SEED_BOUND: u32 = 500_000;

/// Settings applied when a [`Generator`] is constructed.
///
/// The host name and process ID default to those of the running process, and the counter seed
/// defaults to a random value below 500,000. Overriding them is mostly useful in tests.
///
/// # Examples
///
/// ```rust
/// use hotguid::{ByteOrder, Config, Layout};
///
/// let config = Config::new()
///     .layout(Layout::Coarse)
///     .byte_order(ByteOrder::Database);
/// assert_eq!(config.layout, Layout::Coarse);
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Field layout of minted identifiers.
    pub layout: Layout,

    /// Byte order of minted identifiers.
    pub byte_order: ByteOrder,

    /// Host name hashed into the salt instead of the system host name.
    pub host_name: Option<String>,

    /// Process ID mixed into the salt instead of the current one.
    pub process_id: Option<u32>,

    /// Initial counter value instead of a random one.
    pub counter_seed: Option<u32>,
}

impl Config {
    /// Creates the default configuration: [`Layout::Fine`] in [`ByteOrder::Native`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field layout.
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the byte order.
    pub fn byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Overrides the host name hashed into the salt.
    pub fn host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = Some(host_name.into());
        self
    }

    /// Overrides the process ID mixed into the salt.
    pub fn process_id(mut self, process_id: u32) -> Self {
        self.process_id = Some(process_id);
        self
    }

    /// Overrides the initial counter value.
    pub fn counter_seed(mut self, counter_seed: u32) -> Self {
        self.counter_seed = Some(counter_seed);
        self
    }
}

/// Represents an identifier generator that owns a machine and process salt and a monotonic
/// counter.
///
/// The salt is computed once at construction and never changes. The counter is the only
/// mutable state; it is advanced with a single atomic read-modify-write, so a generator can be
/// shared across threads by reference.
///
/// # Generator functions
///
/// | Method       | Timestamp         | Validation                          |
/// | ------------ | ----------------- | ----------------------------------- |
/// | [`mint`]     | Now               | None needed                         |
/// | [`mint_at`]  | Calendar argument | UTC or known offset, `[epoch, now]` |
/// | [`mint_raw`] | Raw argument      | None                                |
///
/// Identifiers minted with non-decreasing timestamps sort in minting order under the native
/// comparator (or the database comparator with [`ByteOrder::Database`]) until the counter
/// cycles within a single timestamp value.
///
/// # Examples
///
/// ```rust
/// use std::thread;
/// use hotguid::{Config, Generator, Layout};
///
/// let g = Generator::new(Config::new().layout(Layout::Coarse));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = &g;
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.mint(i), i);
///             }
///         });
///     }
/// });
/// ```
///
/// [`mint`]: Generator::mint
/// [`mint_at`]: Generator::mint_at
/// [`mint_raw`]: Generator::mint_raw
#[derive(Debug)]
pub struct Generator<C = SystemClock> {
    layout: Layout,
    byte_order: ByteOrder,
    salt: Salt,
    counter: AtomicU32,

    /// The time source used by the generator.
    clock: C,
}

impl Generator {
    /// Creates a generator instance reading the system clock.
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<C: Clock> Generator<C> {
    /// Creates a generator instance with a custom time source.
    pub fn with_clock(config: Config, clock: C) -> Self {
        let host_name = config
            .host_name
            .unwrap_or_else(|| gethostname::gethostname().to_string_lossy().into_owned());
        let pid = config.process_id.unwrap_or_else(std::process::id);
        let salt = Salt::compute(&host_name, pid);
        let seed = config
            .counter_seed
            .unwrap_or_else(|| rand::thread_rng().gen_range(0..COUNTER_SEED_BOUND));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            host = %host_name,
            pid,
            ?salt,
            layout = ?config.layout,
            byte_order = ?config.byte_order,
            "initialized identifier generator"
        );

        Self {
            layout: config.layout,
            byte_order: config.byte_order,
            salt,
            counter: AtomicU32::new(seed),
            clock,
        }
    }

    /// Returns the field layout of minted identifiers.
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the byte order of minted identifiers.
    pub const fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Returns the machine and process salt.
    pub const fn salt(&self) -> Salt {
        self.salt
    }

    /// Mints an identifier for the current time.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn mint(&self, shard_key: u32) -> Guid {
        let now = self.clock.now();
        self.mint_raw(shard_key, self.layout.raw_timestamp(&now))
    }

    /// Mints an identifier for a calendar timestamp.
    ///
    /// Local times are normalized to UTC first, so identifiers order by absolute time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnspecifiedKind`] if the timestamp has no offset information, or
    /// [`Error::OutOfRange`] if it lies before the Unix epoch or after the current time. The
    /// counter is left untouched on error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
    /// use hotguid::{Error, Generator};
    ///
    /// let g = Generator::default();
    /// let t = FixedOffset::east_opt(3600)
    ///     .unwrap()
    ///     .with_ymd_and_hms(2021, 6, 1, 13, 0, 0)
    ///     .unwrap();
    /// let id = g.mint_at(42, t)?;
    /// assert_eq!(g.decode_shard_key(&id), 42);
    /// assert_eq!(g.decode_as_calendar_time(&id), Some(t.with_timezone(&Utc)));
    ///
    /// let naive = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
    /// assert_eq!(g.mint_at(42, naive), Err(Error::UnspecifiedKind));
    /// # Ok::<(), Error>(())
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, timestamp)))]
    pub fn mint_at(&self, shard_key: u32, timestamp: impl Into<Timestamp>) -> Result<Guid> {
        let utc = self.validate(timestamp.into())?;
        Ok(self.mint_raw(shard_key, self.layout.raw_timestamp(&utc)))
    }

    /// Mints an identifier for a raw timestamp in the layout's unit, skipping all validation.
    ///
    /// This is the trusted entry point for tests and data migration. Identifiers minted with a
    /// raw timestamp outside `[epoch, now]` legitimately decode to `None` through
    /// [`Generator::decode_as_calendar_time`].
    pub fn mint_raw(&self, shard_key: u32, raw_timestamp: u64) -> Guid {
        let counter = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        let fields = Fields {
            timestamp: raw_timestamp,
            salt: self.salt,
            counter,
            shard_key,
        };
        let native = self.layout.encode(&fields);
        Guid::from_bytes(self.byte_order.apply(native.into_bytes()))
    }

    /// Reads the raw timestamp of an identifier in this generator's byte order.
    pub fn decode_timestamp(&self, id: &Guid) -> u64 {
        self.layout.decode_timestamp(&self.to_native(id))
    }

    /// Reads the shard key of an identifier in this generator's byte order.
    pub fn decode_shard_key(&self, id: &Guid) -> u32 {
        self.layout.decode_shard_key(&self.to_native(id))
    }

    /// Decodes the creation time of an identifier, judged against this generator's clock.
    ///
    /// The identifier is read in this generator's byte order first. If that yields an
    /// implausible timestamp, both byte orders are tried as in
    /// [`Layout::decode_as_calendar_time`].
    pub fn decode_as_calendar_time(&self, id: &Guid) -> Option<DateTime<Utc>> {
        let now = self.clock.now();
        let raw = self.layout.decode_timestamp(&self.to_native(id));
        if self.layout.is_plausible_timestamp_at(raw, &now) {
            self.layout.to_calendar_time(raw)
        } else {
            self.layout.decode_as_calendar_time_at(id, &now)
        }
    }

    fn to_native(&self, id: &Guid) -> Guid {
        match self.byte_order {
            ByteOrder::Native => *id,
            ByteOrder::Database => Guid::from_bytes(order::to_native_order(id.as_bytes())),
        }
    }

    fn validate(&self, timestamp: Timestamp) -> Result<DateTime<Utc>> {
        let Some(utc) = timestamp.to_utc() else {
            #[cfg(feature = "tracing")]
            tracing::trace!(?timestamp, "rejected timestamp without offset");
            return Err(Error::UnspecifiedKind);
        };
        if utc.timestamp() < 0 || utc > self.clock.now() {
            #[cfg(feature = "tracing")]
            tracing::trace!(%utc, "rejected timestamp out of range");
            return Err(Error::OutOfRange(utc));
        }
        Ok(utc)
    }
}
