use sha2::{Digest, Sha256};

/// Machine and process discriminator embedded in every identifier.
///
/// The salt is the leading bytes of the SHA-256 digest of the host name followed by the low 16
/// bits of the process ID. [`Layout::Coarse`](crate::Layout::Coarse) embeds three hash bytes and
/// [`Layout::Fine`](crate::Layout::Fine) embeds two.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Salt {
    host: [u8; 3],
    pid: u16,
}

impl Salt {
    /// Creates a salt from a precomputed host hash prefix and process ID.
    pub const fn from_parts(host: [u8; 3], pid: u16) -> Self {
        Self { host, pid }
    }

    /// Computes the salt of the given host name and process ID.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hotguid::Salt;
    ///
    /// let salt = Salt::compute("db-01", 0x0001_2345);
    /// assert_eq!(salt.pid(), 0x2345);
    /// assert_eq!(salt, Salt::compute("db-01", 0x2345));
    /// ```
    pub fn compute(host_name: &str, pid: u32) -> Self {
        let digest = Sha256::digest(host_name.as_bytes());
        Self {
            host: [digest[0], digest[1], digest[2]],
            pid: pid as u16,
        }
    }

    /// Returns the host hash prefix.
    pub const fn host_hash(&self) -> [u8; 3] {
        self.host
    }

    /// Returns the low 16 bits of the process ID.
    pub const fn pid(&self) -> u16 {
        self.pid
    }
}

#[cfg(test)]
mod tests {
    use super::Salt;

    /// Derives the salt from host name and process ID only
    #[test]
    fn derives_the_salt_from_host_name_and_process_id_only() {
        let a = Salt::compute("node-a", 4242);
        assert_eq!(a, Salt::compute("node-a", 4242));
        assert_ne!(a.host_hash(), Salt::compute("node-b", 4242).host_hash());
        assert_eq!(a.host_hash(), Salt::compute("node-a", 1).host_hash());
        assert_eq!(Salt::compute("node-a", 0xdead_beef).pid(), 0xbeef);
    }

    /// Takes the hash prefix from SHA-256
    #[test]
    fn takes_the_hash_prefix_from_sha_256() {
        // SHA-256("") = e3b0c442...
        assert_eq!(Salt::compute("", 0).host_hash(), [0xe3, 0xb0, 0xc4]);
        // SHA-256("abc") = ba7816bf...
        assert_eq!(Salt::compute("abc", 0).host_hash(), [0xba, 0x78, 0x16]);
    }
}
