//! Prefix-preserving IP address anonymization (Crypto-PAn).
//!
//! This crate implements the Crypto-PAn construction: a deterministic,
//! invertible transform on IP addresses keyed by a 32-byte secret. Two
//! addresses that share an n-bit prefix before anonymization share an n-bit
//! prefix after it, so subnet structure survives while the addresses
//! themselves do not.
//!
//! # Features
//!
//! - One-to-one mapping per address width: the same secret always produces
//!   the same pseudonym, and the key holder can reverse it.
//! - Generalized bit cascade: IPv4 (4 bytes), IPv6 (16 bytes), MAC
//!   addresses (6 bytes), and any other 1..=16-byte value in network byte
//!   order.
//! - Bit-exact with the canonical Crypto-PAn reference vectors for IPv4 and
//!   with the common IPv6 generalization.
//! - Key material is wiped on [`CryptoPan::release`] and on drop.
//!
//! # Examples
//!
//! ```rust
//! use cryptopan_rs::CryptoPan;
//! use std::net::IpAddr;
//! use std::str::FromStr;
//!
//! let pan = CryptoPan::new([7u8; CryptoPan::KEY_BYTES]);
//!
//! let ip = IpAddr::from_str("10.0.0.47").unwrap();
//! let masked = pan.anonymize_ipaddr(ip).unwrap();
//! assert_eq!(pan.deanonymize_ipaddr(masked).unwrap(), ip);
//!
//! // Addresses in the same /24 stay in the same anonymized /24.
//! let sibling = IpAddr::from_str("10.0.0.129").unwrap();
//! let masked_sibling = pan.anonymize_ipaddr(sibling).unwrap();
//! match (masked, masked_sibling) {
//!     (IpAddr::V4(a), IpAddr::V4(b)) => assert_eq!(a.octets()[..3], b.octets()[..3]),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! # Security Considerations
//!
//! - The transform is a pseudonymization, not encryption: anyone holding the
//!   secret can reverse it, and prefix relationships are public by design.
//! - The secret must be stored by the caller; there is no key derivation
//!   beyond using 32 ASCII characters as bytes.
//! - Timing side channels of the underlying AES implementation are out of
//!   scope.

pub(crate) mod anonymizer;
pub(crate) mod common;
pub(crate) mod error;

pub use anonymizer::CryptoPan;
pub use common::Family;
pub use error::CryptoPanError;

pub mod reexports {
    pub use aes;
    pub use ct_codecs;
    #[cfg(feature = "random")]
    pub use rand;
    pub use zeroize;
}
