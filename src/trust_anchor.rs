// Copyright 2015 Brian Smith.
//
// Permission to use, copy, modify, and/or distribute this software for any
// purpose with or without fee is hereby granted, provided that the above
// copyright notice and this permission notice appear in all copies.
//
// THE SOFTWARE IS PROVIDED "AS IS" AND THE AUTHORS DISCLAIM ALL WARRANTIES
// WITH REGARD TO THIS SOFTWARE INCLUDING ALL IMPLIED WARRANTIES OF
// MERCHANTABILITY AND FITNESS. IN NO EVENT SHALL THE AUTHORS BE LIABLE FOR
// ANY SPECIAL, DIRECT, INDIRECT, OR CONSEQUENTIAL DAMAGES OR ANY DAMAGES
// WHATSOEVER RESULTING FROM LOSS OF USE, DATA OR PROFITS, WHETHER IN AN
// ACTION OF CONTRACT, NEGLIGENCE OR OTHER TORTIOUS ACTION, ARISING OUT OF
// OR IN CONNECTION WITH THE USE OR PERFORMANCE OF THIS SOFTWARE.

use crate::signed_data::{bytes_eq, PublicKey};
use core::fmt;

/// A trust anchor (a.k.a. root CA).
///
/// Traditionally, certificate verification libraries have represented trust
/// anchors as full X.509 root certificates. However, those certificates
/// contain a lot more data than is needed for verifying certificates. The
/// `TrustAnchor` representation stores just the essential elements: the
/// subject name and the public key. The `iotpki::trust_anchor_util` module
/// provides functions for converting X.509 certificates to the minimized
/// `TrustAnchor` representation, either at runtime or in a build script.
///
/// An anchor with `is_ca == false` pins a single end-entity certificate: it
/// can only terminate a chain consisting of exactly that certificate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrustAnchor<'a> {
    /// The DER encoding of the anchor's subject Name, tag and length
    /// included.
    pub subject: &'a [u8],

    /// The anchor's public key.
    pub public_key: PublicKey<'a>,

    /// Whether the anchor may issue certificates.
    pub is_ca: bool,
}

/// An ordered, immutable set of trust anchors.
///
/// The store is a plain shared slice: it can be built at compile time,
/// placed in a `static`, and read from any number of threads at once.
#[derive(Clone, Copy, Debug)]
pub struct TrustAnchorStore<'a> {
    anchors: &'a [TrustAnchor<'a>],
}

impl<'a> TrustAnchorStore<'a> {
    /// Constructs a store after checking it with [`Self::self_check`].
    pub fn new(anchors: &'a [TrustAnchor<'a>]) -> Result<Self, InvalidTrustAnchorStore> {
        let store = Self::new_unchecked(anchors);
        store.self_check()?;
        Ok(store)
    }

    /// Constructs a store without checking it.
    ///
    /// Use this for `static` stores and pair it with a compile-time call to
    /// [`Self::self_check`]:
    ///
    /// ```
    /// use iotpki::TrustAnchorStore;
    ///
    /// static STORE: TrustAnchorStore<'static> = TrustAnchorStore::new_unchecked(&[]);
    /// assert!(STORE.self_check().is_err());
    /// ```
    pub const fn new_unchecked(anchors: &'a [TrustAnchor<'a>]) -> Self {
        Self { anchors }
    }

    /// Checks that the store is non-empty, that every subject is a
    /// well-formed DER `Name` and every key is canonical, and that no two
    /// anchors with the same subject disagree about the key.
    ///
    /// This is a `const fn` so that a built-in store can be checked when the
    /// crate is compiled.
    pub const fn self_check(&self) -> Result<(), InvalidTrustAnchorStore> {
        let anchors = self.anchors;
        if anchors.is_empty() {
            return Err(InvalidTrustAnchorStore::Empty);
        }
        let mut i = 0;
        while i < anchors.len() {
            if !is_der_name(anchors[i].subject) {
                return Err(InvalidTrustAnchorStore::MalformedSubject { index: i });
            }
            if !anchors[i].public_key.is_well_formed() {
                return Err(InvalidTrustAnchorStore::MalformedPublicKey { index: i });
            }
            let mut j = 0;
            while j < i {
                if bytes_eq(anchors[j].subject, anchors[i].subject)
                    && !anchors[j].public_key.const_eq(&anchors[i].public_key)
                {
                    return Err(InvalidTrustAnchorStore::ConflictingKeys {
                        first: j,
                        second: i,
                    });
                }
                j += 1;
            }
            i += 1;
        }
        Ok(())
    }

    /// All anchors whose subject is byte-for-byte equal to `subject`, in
    /// store order.
    pub fn find_by_subject<'n>(
        &self,
        subject: &'n [u8],
    ) -> impl Iterator<Item = &'a TrustAnchor<'a>> + 'n
    where
        'a: 'n,
    {
        self.anchors
            .iter()
            .filter(move |anchor| anchor.subject == subject)
    }

    /// All anchors, in store order.
    pub fn all(&self) -> core::slice::Iter<'a, TrustAnchor<'a>> {
        self.anchors.iter()
    }

    /// The number of anchors.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Whether the store has no anchors.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

/// The reason [`TrustAnchorStore::self_check`] rejected a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidTrustAnchorStore {
    /// The store has no anchors.
    Empty,

    /// The subject of the anchor at `index` isn't a DER `Name`.
    MalformedSubject {
        /// Index of the offending anchor.
        index: usize,
    },

    /// The public key of the anchor at `index` isn't in canonical form.
    MalformedPublicKey {
        /// Index of the offending anchor.
        index: usize,
    },

    /// Two anchors share a subject but have different keys.
    ConflictingKeys {
        /// Index of the earlier anchor.
        first: usize,
        /// Index of the later anchor.
        second: usize,
    },
}

impl fmt::Display for InvalidTrustAnchorStore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidTrustAnchorStore::Empty => f.write_str("trust anchor store is empty"),
            InvalidTrustAnchorStore::MalformedSubject { index } => {
                write!(f, "trust anchor {} has a malformed subject", index)
            }
            InvalidTrustAnchorStore::MalformedPublicKey { index } => {
                write!(f, "trust anchor {} has a malformed public key", index)
            }
            InvalidTrustAnchorStore::ConflictingKeys { first, second } => write!(
                f,
                "trust anchors {} and {} have the same subject but different keys",
                first, second
            ),
        }
    }
}

/// Requires the `std` feature.
#[cfg(feature = "std")]
impl ::std::error::Error for InvalidTrustAnchorStore {}

// Name ::= SEQUENCE OF RelativeDistinguishedName, where each RDN is a SET.
// Only the framing is checked; attribute contents are opaque.
const fn is_der_name(name: &[u8]) -> bool {
    let (tag, start, end) = match read_tlv(name, 0) {
        Some(tlv) => tlv,
        None => return false,
    };
    if tag != 0x30 || end != name.len() {
        return false;
    }
    let mut offset = start;
    while offset < end {
        match read_tlv(name, offset) {
            Some((0x31, _, next)) => offset = next,
            _ => return false,
        }
    }
    true
}

// Returns the tag, the offset of the value, and the offset just past the
// value of the TLV starting at `offset`. Lengths follow the same rules as
// `der::read_tag_and_get_value`.
const fn read_tlv(bytes: &[u8], offset: usize) -> Option<(u8, usize, usize)> {
    if offset + 2 > bytes.len() {
        return None;
    }
    let tag = bytes[offset];
    if (tag & 0x1f) == 0x1f {
        return None;
    }
    let (length, header) = match bytes[offset + 1] {
        n if (n & 0x80) == 0 => (n as usize, 2),
        0x81 => {
            if offset + 3 > bytes.len() || bytes[offset + 2] < 0x80 {
                return None;
            }
            (bytes[offset + 2] as usize, 3)
        }
        0x82 => {
            if offset + 4 > bytes.len() {
                return None;
            }
            let length = ((bytes[offset + 2] as usize) << 8) | (bytes[offset + 3] as usize);
            if length < 0x100 {
                return None;
            }
            (length, 4)
        }
        _ => return None,
    };
    let start = offset + header;
    if length > bytes.len() - start {
        return None;
    }
    Some((tag, start, start + length))
}
