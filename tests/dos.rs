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

//! The validator does a bounded amount of work: one signature check per link
//! plus at most one per matching anchor, however the chain is built.

use core::sync::atomic::{AtomicUsize, Ordering};

use iotpki::{
    Cert, ChainValidator, DnsNameRef, EcCurve, Error, PublicKey, SignatureAlgorithm,
    SignatureVerifier, SignedData, Time, TrustAnchor, TrustAnchorStore, MAX_CHAIN_LEN,
};

struct CountingVerifier {
    calls: AtomicUsize,
    result: bool,
}

impl CountingVerifier {
    fn new(result: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            result,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl SignatureVerifier for CountingVerifier {
    fn verify(&self, _: &SignedData, _: &PublicKey) -> bool {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.result
    }
}

const BOGUS_SUBJECT: &[u8] = b"\x30\x10\x31\x0e\x30\x0c\x06\x03\x55\x04\x0a\x0c\x05Bogus";

// Every certificate has the same name and claims to be a CA, so every
// certificate could have issued every other one.
fn degenerate_cert() -> Cert<'static> {
    Cert {
        subject: BOGUS_SUBJECT,
        issuer: BOGUS_SUBJECT,
        public_key: PublicKey::Ec {
            curve: EcCurve::P256,
            point: &[0x04, 0x01],
        },
        signed_data: SignedData {
            data: b"tbs",
            algorithm: SignatureAlgorithm::EcdsaSha256,
            signature: b"sig",
        },
        is_ca: true,
        path_len_constraint: None,
        validity: None,
        subject_alt_name: Some(&b"\x82\x0bexample.com"[..]),
    }
}

// Anchors with the same subject must share a key, so only one anchor can
// match the chain's names.
fn anchors() -> [TrustAnchor<'static>; 2] {
    [
        TrustAnchor {
            subject: BOGUS_SUBJECT,
            public_key: PublicKey::Ec {
                curve: EcCurve::P256,
                point: &[0x04, 0x02],
            },
            is_ca: true,
        },
        TrustAnchor {
            subject: b"\x30\x00",
            public_key: PublicKey::Ec {
                curve: EcCurve::P256,
                point: &[0x04, 0x03],
            },
            is_ca: true,
        },
    ]
}

fn dns_name() -> DnsNameRef<'static> {
    DnsNameRef::try_from_ascii_str("example.com").unwrap()
}

const NOW: Time = Time::from_seconds_since_unix_epoch(0x1fed_f00d);

#[test]
fn test_too_long_chain_checks_no_signatures() {
    let anchors = anchors();
    let store = TrustAnchorStore::new(&anchors).unwrap();
    let verifier = CountingVerifier::new(true);
    let validator = ChainValidator::new(&store, &verifier);

    let chain = vec![degenerate_cert(); MAX_CHAIN_LEN + 1];
    assert_eq!(
        validator.validate(&chain, dns_name(), NOW),
        Err(Error::ChainTooLong)
    );
    let chain = vec![degenerate_cert(); 1000];
    assert_eq!(
        validator.validate(&chain, dns_name(), NOW),
        Err(Error::ChainTooLong)
    );
    assert_eq!(verifier.calls(), 0);
}

#[test]
fn test_degenerate_chain_not_anchored() {
    let anchors = anchors();
    let store = TrustAnchorStore::new(&anchors).unwrap();
    let verifier = CountingVerifier::new(true);
    let validator = ChainValidator::new(&store, &verifier);

    // Every link verifies, but no anchor key is in the chain, so the anchor
    // with the right name is tried once against the last certificate.
    let chain = vec![degenerate_cert(); MAX_CHAIN_LEN];
    assert_eq!(validator.validate(&chain, dns_name(), NOW), Ok(()));
    assert_eq!(verifier.calls(), (MAX_CHAIN_LEN - 1) + 1);

    let verifier = CountingVerifier::new(false);
    let validator = ChainValidator::new(&store, &verifier);
    assert_eq!(
        validator.validate(&chain, dns_name(), NOW),
        Err(Error::BrokenChain(0))
    );
    assert_eq!(verifier.calls(), 1);

    let verifier = CountingVerifier::new(false);
    let validator = ChainValidator::new(&store, &verifier);
    assert_eq!(
        validator.validate(&chain[..1], dns_name(), NOW),
        Err(Error::UntrustedRoot)
    );
    assert_eq!(verifier.calls(), 1);
}

#[test]
fn test_configured_maximum() {
    let anchors = anchors();
    let store = TrustAnchorStore::new(&anchors).unwrap();
    let verifier = CountingVerifier::new(true);
    let validator = ChainValidator::new(&store, &verifier).with_max_chain_len(2);
    assert_eq!(validator.max_chain_len(), 2);

    let chain = vec![degenerate_cert(); 3];
    assert_eq!(
        validator.validate(&chain, dns_name(), NOW),
        Err(Error::ChainTooLong)
    );
    assert_eq!(verifier.calls(), 0);
    assert_eq!(validator.validate(&chain[..2], dns_name(), NOW), Ok(()));
}
