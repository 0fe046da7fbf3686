//! Process-wide generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync::OnceLock;

use crate::{Config, Error, Generator, Guid, Result, Timestamp};

static GLOBAL: OnceLock<Generator> = OnceLock::new();

/// Installs the process-wide generator built from `config`.
///
/// # Errors
///
/// Returns [`Error::AlreadyInitialized`] if a generator is already installed, whether by an
/// earlier call to this function or lazily by [`global`]. The installed generator is kept.
///
/// # Examples
///
/// ```rust
/// use hotguid::{ByteOrder, Config, Error};
///
/// let g = hotguid::init(Config::new().byte_order(ByteOrder::Database))?;
/// assert_eq!(g.byte_order(), ByteOrder::Database);
/// assert_eq!(hotguid::init(Config::new()).err(), Some(Error::AlreadyInitialized));
/// # Ok::<(), Error>(())
/// ```
pub fn init(config: Config) -> Result<&'static Generator> {
    let mut installed = false;
    let g = GLOBAL.get_or_init(|| {
        installed = true;
        Generator::new(config)
    });

    if installed {
        Ok(g)
    } else {
        #[cfg(feature = "tracing")]
        tracing::warn!("process-wide generator is already initialized");
        Err(Error::AlreadyInitialized)
    }
}

/// Returns the process-wide generator, installing one with the default configuration if none
/// exists.
///
/// Concurrent first callers all observe the same instance.
pub fn global() -> &'static Generator {
    GLOBAL.get_or_init(Generator::default)
}

/// Mints an identifier for the current time with the process-wide generator.
///
/// # Examples
///
/// ```rust
/// let id = hotguid::hot_guid(42);
/// println!("{}", id); // e.g., "e8e4c100-0d9c-08dc-1c07-d1e2002a4cc5"
/// assert_eq!(hotguid::global().decode_shard_key(&id), 42);
/// ```
pub fn hot_guid(shard_key: u32) -> Guid {
    global().mint(shard_key)
}

/// Mints an identifier for a calendar timestamp with the process-wide generator.
///
/// # Errors
///
/// Fails under the same conditions as [`Generator::mint_at`].
pub fn hot_guid_at(shard_key: u32, timestamp: impl Into<Timestamp>) -> Result<Guid> {
    global().mint_at(shard_key, timestamp)
}

#[cfg(test)]
mod tests {
    use super::{global, hot_guid, hot_guid_at, init};
    use crate::{Config, Error, Guid};

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| hot_guid(7).into()).collect());

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Embeds the shard key in every identifier
    #[test]
    fn embeds_the_shard_key_in_every_identifier() {
        SAMPLES.with(|samples| {
            for e in samples {
                let id: Guid = e.parse().unwrap();
                assert_eq!(global().decode_shard_key(&id), 7);
            }
        });
    }

    /// Refuses to replace the installed generator
    #[test]
    fn refuses_to_replace_the_installed_generator() {
        let g = global();
        assert_eq!(init(Config::new()).err(), Some(Error::AlreadyInitialized));
        assert!(std::ptr::eq(g, global()));
    }

    /// Hands out one instance to concurrent first callers
    #[test]
    fn hands_out_one_instance_to_concurrent_first_callers() {
        use std::thread;

        let addrs: Vec<usize> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| global() as *const _ as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }

    /// Validates timestamps like the underlying generator
    #[test]
    fn validates_timestamps_like_the_underlying_generator() {
        use chrono::{Duration, Utc};

        let t = Utc::now() - Duration::days(1);
        let id = hot_guid_at(9, t).unwrap();
        assert_eq!(global().decode_shard_key(&id), 9);

        let later = Utc::now() + Duration::days(1);
        assert_eq!(hot_guid_at(9, later), Err(Error::OutOfRange(later)));
    }
}
