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

//! Compiled-in trust anchors and X.509 certificate chain validation for
//! TLS clients on constrained devices.
//!
//! The device trusts exactly one, immutable table of anchors
//! ([`BUILTIN_TRUST_ANCHORS`]). A [`ChainValidator`] walks a peer-supplied
//! chain from the leaf towards the root, checking every link, and accepts
//! the chain only if its last element is vouched for by an anchor in that
//! table.
//!
//! # Features
//!
//! | Feature | Description |
//! | ------- | ----------- |
//! | `alloc` | Enable features that require use of the heap: validating a chain of DER certificates and generating anchor tables. |
//! | `std` | Enable features that require libstd. Implies `alloc`. |

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]
#![warn(
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_qualifications
)]
#![deny(
    dead_code,
    non_camel_case_types,
    non_snake_case,
    non_upper_case_globals,
    unreachable_code,
    unused_imports,
    unused_must_use,
    unused_mut,
    unused_variables
)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[macro_use]
mod der;

mod cert;
mod error;
mod iot_roots;
mod name;
mod signed_data;
mod time;
mod trust_anchor;
pub mod trust_anchor_util;
mod verify_cert;

pub use {
    cert::{Cert, CertDecoder, Validity, X509Decoder},
    error::{DecodeError, Error},
    iot_roots::BUILTIN_TRUST_ANCHORS,
    name::{DnsNameRef, InvalidDnsNameError},
    signed_data::{
        EcCurve, PublicKey, RingVerifier, SignatureAlgorithm, SignatureVerifier, SignedData,
    },
    time::Time,
    trust_anchor::{InvalidTrustAnchorStore, TrustAnchor, TrustAnchorStore},
    verify_cert::{ChainValidator, MAX_CHAIN_LEN},
};
