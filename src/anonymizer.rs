use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128, Block};
use std::net::IpAddr;
use zeroize::Zeroize;

use crate::common::Family;
use crate::error::CryptoPanError;

/// A prefix-preserving address anonymizer (Crypto-PAn).
///
/// Constructed from a 32-byte secret: the first half keys an AES-128 block
/// cipher, the second half is encrypted once under that cipher to become the
/// working pad. For a fixed secret the transform is a bijection on every
/// address width from 1 to 16 bytes, and two addresses sharing their first
/// `n` bits before the transform share their first `n` bits after it.
///
/// All transform methods take `&self` and use per-call stack scratch, so a
/// single instance may be shared across threads. [`release()`] wipes the pad
/// and the key schedule; dropping the value does the same.
///
/// [`release()`]: CryptoPan::release
///
/// # Examples
///
/// ```rust
/// use cryptopan_rs::CryptoPan;
/// use std::net::IpAddr;
/// use std::str::FromStr;
///
/// let key = [42u8; CryptoPan::KEY_BYTES];
/// let pan = CryptoPan::new(key);
///
/// let ip = IpAddr::from_str("192.0.2.1").unwrap();
/// let masked = pan.anonymize_ipaddr(ip).unwrap();
/// let original = pan.deanonymize_ipaddr(masked).unwrap();
/// assert_eq!(ip, original);
/// ```
#[derive(Debug)]
pub struct CryptoPan {
    // `None` once released; every entry point checks this first.
    cipher: Option<Aes128>,
    pad: [u8; 16],
}

impl CryptoPan {
    /// The number of bytes required for the construction secret.
    pub const KEY_BYTES: usize = 32;

    /// The widest address the cascade operates on, in bytes.
    pub const MAX_ADDR_BYTES: usize = 16;

    /// Generates a new random construction secret.
    #[cfg(feature = "random")]
    pub fn generate_key() -> [u8; Self::KEY_BYTES] {
        rand::random()
    }

    /// Creates a new CryptoPan instance with the given secret.
    ///
    /// Bytes `0..16` key the cipher; bytes `16..32` are the pad seed, which
    /// is consumed during setup and never stored.
    pub fn new(key: [u8; Self::KEY_BYTES]) -> Self {
        let (enc_key, pad_seed) = key.split_at(16);
        let cipher =
            Aes128::new_from_slice(enc_key).expect("split width is the AES-128 key width");

        // Encrypting in place destroys the raw seed as the pad is derived.
        let mut pad = Block::default();
        pad.copy_from_slice(pad_seed);
        cipher.encrypt_block(&mut pad);

        Self {
            cipher: Some(cipher),
            pad: pad.into(),
        }
    }

    /// Creates a new CryptoPan instance from a byte slice.
    ///
    /// The first [`KEY_BYTES`] bytes are used; anything past them is
    /// ignored. Fails with [`CryptoPanError::InvalidKey`] on a shorter
    /// slice.
    ///
    /// [`KEY_BYTES`]: CryptoPan::KEY_BYTES
    pub fn new_from_slice(key: &[u8]) -> Result<Self, CryptoPanError> {
        if key.len() < Self::KEY_BYTES {
            return Err(CryptoPanError::InvalidKey);
        }
        let mut fixed = [0u8; Self::KEY_BYTES];
        fixed.copy_from_slice(&key[..Self::KEY_BYTES]);
        let pan = Self::new(fixed);
        fixed.zeroize();
        Ok(pan)
    }

    /// Creates a new CryptoPan instance from a 32-character ASCII key.
    ///
    /// Characters are used as their byte values. Non-ASCII input is
    /// rejected before the length check.
    pub fn from_ascii_key(key: &str) -> Result<Self, CryptoPanError> {
        if !key.is_ascii() {
            return Err(CryptoPanError::InvalidKey);
        }
        Self::new_from_slice(key.as_bytes())
    }

    /// Creates a new CryptoPan instance with a random secret.
    #[cfg(feature = "random")]
    pub fn new_random() -> Self {
        Self::new(Self::generate_key())
    }

    /// Anonymizes an address in place.
    ///
    /// `bytes` is consumed in network byte order. Only the first
    /// [`MAX_ADDR_BYTES`] bytes participate; anything past them is left
    /// untouched. An empty slice fails with
    /// [`CryptoPanError::InvalidInput`].
    ///
    /// [`MAX_ADDR_BYTES`]: CryptoPan::MAX_ADDR_BYTES
    pub fn anonymize_in_place(&self, bytes: &mut [u8]) -> Result<(), CryptoPanError> {
        let cipher = self.cipher.as_ref().ok_or(CryptoPanError::Disposed)?;
        let len = bytes.len().min(Self::MAX_ADDR_BYTES);
        if len == 0 {
            return Err(CryptoPanError::InvalidInput);
        }
        let addr = &mut bytes[..len];

        // One AES block per prefix length; the top bit of each ciphertext
        // becomes one bit of the keystream.
        let mut stream = [0u8; Self::MAX_ADDR_BYTES];
        let mut input = Block::default();
        for pos in 0..len * 8 {
            let idx = pos / 8;
            let bit = pos % 8;

            Self::fill_round_input(&mut input, addr, &self.pad, idx, bit);
            cipher.encrypt_block(&mut input);
            stream[idx] |= (input[0] >> 7) << (7 - bit);
        }

        for (b, s) in addr.iter_mut().zip(&stream) {
            *b ^= s;
        }
        Ok(())
    }

    /// Anonymizes an address, returning a new buffer of the same length.
    ///
    /// Inputs longer than [`MAX_ADDR_BYTES`] are truncated to the first
    /// [`MAX_ADDR_BYTES`] bytes.
    ///
    /// [`MAX_ADDR_BYTES`]: CryptoPan::MAX_ADDR_BYTES
    pub fn anonymize_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>, CryptoPanError> {
        let mut out = bytes[..bytes.len().min(Self::MAX_ADDR_BYTES)].to_vec();
        self.anonymize_in_place(&mut out)?;
        Ok(out)
    }

    /// Recovers the original address from an anonymized one, in place.
    ///
    /// Inverse of [`anonymize_in_place`]: the cascade is replayed against
    /// the plaintext bits recovered so far, so each round unmasks exactly
    /// the bit the forward transform masked.
    ///
    /// [`anonymize_in_place`]: CryptoPan::anonymize_in_place
    pub fn deanonymize_in_place(&self, bytes: &mut [u8]) -> Result<(), CryptoPanError> {
        let cipher = self.cipher.as_ref().ok_or(CryptoPanError::Disposed)?;
        let len = bytes.len().min(Self::MAX_ADDR_BYTES);
        if len == 0 {
            return Err(CryptoPanError::InvalidInput);
        }
        let addr = &mut bytes[..len];

        let mut input = Block::default();
        for pos in 0..len * 8 {
            let idx = pos / 8;
            let bit = pos % 8;

            // The first `pos` bits of `addr` are already plaintext again.
            Self::fill_round_input(&mut input, addr, &self.pad, idx, bit);
            cipher.encrypt_block(&mut input);
            addr[idx] ^= (input[0] >> 7) << (7 - bit);
        }
        Ok(())
    }

    /// Recovers the original address, returning a new buffer.
    pub fn deanonymize_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>, CryptoPanError> {
        let mut out = bytes[..bytes.len().min(Self::MAX_ADDR_BYTES)].to_vec();
        self.deanonymize_in_place(&mut out)?;
        Ok(out)
    }

    /// Anonymizes raw bytes declared as `family`.
    ///
    /// The first `family.width()` bytes are used; a shorter slice fails
    /// with [`CryptoPanError::InvalidInput`].
    pub fn anonymize_family(
        &self,
        bytes: &[u8],
        family: Family,
    ) -> Result<Vec<u8>, CryptoPanError> {
        let width = family.width();
        if bytes.len() < width {
            return Err(CryptoPanError::InvalidInput);
        }
        self.anonymize_bytes(&bytes[..width])
    }

    /// Recovers raw bytes declared as `family`.
    pub fn deanonymize_family(
        &self,
        bytes: &[u8],
        family: Family,
    ) -> Result<Vec<u8>, CryptoPanError> {
        let width = family.width();
        if bytes.len() < width {
            return Err(CryptoPanError::InvalidInput);
        }
        self.deanonymize_bytes(&bytes[..width])
    }

    /// Anonymizes an IP address, preserving its family.
    ///
    /// IPv4 runs through the 4-byte path and IPv6 through the 16-byte path;
    /// an IPv4-mapped IPv6 address is treated as a plain 16-byte address.
    pub fn anonymize_ipaddr(&self, ip: IpAddr) -> Result<IpAddr, CryptoPanError> {
        match ip {
            IpAddr::V4(v4) => {
                let mut octets = v4.octets();
                self.anonymize_in_place(&mut octets)?;
                Ok(IpAddr::V4(octets.into()))
            }
            IpAddr::V6(v6) => {
                let mut octets = v6.octets();
                self.anonymize_in_place(&mut octets)?;
                Ok(IpAddr::V6(octets.into()))
            }
        }
    }

    /// Recovers the original IP address from an anonymized one.
    pub fn deanonymize_ipaddr(&self, ip: IpAddr) -> Result<IpAddr, CryptoPanError> {
        match ip {
            IpAddr::V4(v4) => {
                let mut octets = v4.octets();
                self.deanonymize_in_place(&mut octets)?;
                Ok(IpAddr::V4(octets.into()))
            }
            IpAddr::V6(v6) => {
                let mut octets = v6.octets();
                self.deanonymize_in_place(&mut octets)?;
                Ok(IpAddr::V6(octets.into()))
            }
        }
    }

    /// Anonymizes a formatted IP address string.
    ///
    /// Convenience over [`anonymize_ipaddr`] for callers holding text;
    /// a string that does not parse as an IPv4 or IPv6 address fails with
    /// [`CryptoPanError::InvalidInput`].
    ///
    /// [`anonymize_ipaddr`]: CryptoPan::anonymize_ipaddr
    pub fn anonymize_ip_str(&self, ip: &str) -> Result<String, CryptoPanError> {
        let ip: IpAddr = ip.parse().map_err(|_| CryptoPanError::InvalidInput)?;
        Ok(self.anonymize_ipaddr(ip)?.to_string())
    }

    /// Recovers the original IP address string from an anonymized one.
    pub fn deanonymize_ip_str(&self, ip: &str) -> Result<String, CryptoPanError> {
        let ip: IpAddr = ip.parse().map_err(|_| CryptoPanError::InvalidInput)?;
        Ok(self.deanonymize_ipaddr(ip)?.to_string())
    }

    /// Anonymizes a MAC address in canonical byte order.
    ///
    /// Runs the 6-byte path, so two addresses from the same vendor keep a
    /// common (anonymized) OUI.
    pub fn anonymize_mac(&self, mac: &[u8; 6]) -> Result<[u8; 6], CryptoPanError> {
        let mut out = *mac;
        self.anonymize_in_place(&mut out)?;
        Ok(out)
    }

    /// Recovers the original MAC address.
    pub fn deanonymize_mac(&self, mac: &[u8; 6]) -> Result<[u8; 6], CryptoPanError> {
        let mut out = *mac;
        self.deanonymize_in_place(&mut out)?;
        Ok(out)
    }

    /// Anonymizes a host-order IPv4 word.
    ///
    /// Regression aid for ports that still carry the classical integer
    /// interface. The caller performs the network/host conversion on both
    /// sides; the result equals the 4-byte path after re-swapping.
    pub fn anonymize_ipv4_u32(&self, addr: u32) -> Result<u32, CryptoPanError> {
        let mut bytes = addr.to_be_bytes();
        self.anonymize_in_place(&mut bytes)?;
        Ok(u32::from_be_bytes(bytes))
    }

    /// Recovers a host-order IPv4 word.
    pub fn deanonymize_ipv4_u32(&self, addr: u32) -> Result<u32, CryptoPanError> {
        let mut bytes = addr.to_be_bytes();
        self.deanonymize_in_place(&mut bytes)?;
        Ok(u32::from_be_bytes(bytes))
    }

    /// Wipes the working pad and drops the key schedule.
    ///
    /// Idempotent; dropping the value performs the same wipe. Any later
    /// call on this instance fails with [`CryptoPanError::Disposed`].
    pub fn release(&mut self) {
        self.pad.zeroize();
        // Dropping the cipher wipes its round keys (aes "zeroize" feature).
        self.cipher = None;
    }

    /// Whether [`release`] has run on this instance.
    ///
    /// [`release`]: CryptoPan::release
    pub fn is_released(&self) -> bool {
        self.cipher.is_none()
    }

    /// Builds the cipher input for the round at byte `idx`, bit `bit`: the
    /// first `idx * 8 + bit` bits come from `addr`, everything after from
    /// `pad`. Bit 0 is the most significant bit of its byte, so `bit == 0`
    /// takes byte `idx` entirely from the pad, and `idx == 0, bit == 0` is
    /// the pad verbatim.
    fn fill_round_input(input: &mut Block, addr: &[u8], pad: &[u8; 16], idx: usize, bit: usize) {
        input.copy_from_slice(pad);
        input[..idx].copy_from_slice(&addr[..idx]);
        if bit != 0 {
            let keep = 0xFFu8 << (8 - bit);
            input[idx] = (addr[idx] & keep) | (pad[idx] & !keep);
        }
    }

    #[cfg(test)]
    pub(crate) fn pad_bytes(&self) -> &[u8; 16] {
        &self.pad
    }
}

impl Drop for CryptoPan {
    fn drop(&mut self) {
        self.release();
    }
}
