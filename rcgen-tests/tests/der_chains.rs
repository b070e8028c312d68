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

//! Real DER chains generated with rcgen, decoded with `X509Decoder` and
//! checked with `RingVerifier`.

// XXX: rcgen can only build on archs that *ring* 0.16 supports.
#![cfg(all(
    not(all(target_arch = "aarch64", target_os = "windows")),
    any(
        target_arch = "aarch64",
        target_arch = "arm",
        target_arch = "wasm32",
        target_arch = "x86",
        target_arch = "x86_64"
    )
))]

use iotpki::{
    trust_anchor_util, Cert, ChainValidator, DecodeError, DnsNameRef, EcCurve, Error, PublicKey,
    RingVerifier, SignatureAlgorithm, Time, TrustAnchorStore, X509Decoder,
};
use rcgen::{
    date_time_ymd, BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType,
    IsCa, SignatureAlgorithm as RcgenAlgorithm, PKCS_ECDSA_P256_SHA256, PKCS_ECDSA_P384_SHA384,
};

// 2023-01-01T00:00:00Z
const NOT_BEFORE: u64 = 1_672_531_200;
// 2025-01-01T00:00:00Z
const NOT_AFTER: u64 = 1_735_689_600;
// 2024-01-01T00:00:00Z
const NOW: Time = Time::from_seconds_since_unix_epoch(1_704_067_200);

fn dns_name() -> DnsNameRef<'static> {
    DnsNameRef::try_from_ascii_str("device.example.com").unwrap()
}

fn params(
    cn: &str,
    san: &[&str],
    is_ca: IsCa,
    alg: &'static RcgenAlgorithm,
) -> CertificateParams {
    let mut params =
        CertificateParams::new(san.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    params.distinguished_name = DistinguishedName::new();
    params.distinguished_name.push(DnType::CommonName, cn);
    params.is_ca = is_ca;
    params.alg = alg;
    params.not_before = date_time_ymd(2023, 1, 1);
    params.not_after = date_time_ymd(2025, 1, 1);
    params
}

fn ca(cn: &str, constraints: BasicConstraints, alg: &'static RcgenAlgorithm) -> Certificate {
    Certificate::from_params(params(cn, &[], IsCa::Ca(constraints), alg)).unwrap()
}

struct Chain {
    root: Vec<u8>,
    intermediate: Vec<u8>,
    leaf: Vec<u8>,
}

fn build_chain(root_alg: &'static RcgenAlgorithm, root_constraints: BasicConstraints) -> Chain {
    let root = ca("Test Root", root_constraints, root_alg);
    let intermediate = ca(
        "Test Intermediate",
        BasicConstraints::Unconstrained,
        &PKCS_ECDSA_P256_SHA256,
    );
    let leaf = Certificate::from_params(params(
        "device",
        &["device.example.com"],
        IsCa::ExplicitNoCa,
        &PKCS_ECDSA_P256_SHA256,
    ))
    .unwrap();

    Chain {
        root: root.serialize_der().unwrap(),
        intermediate: intermediate.serialize_der_with_signer(&root).unwrap(),
        leaf: leaf.serialize_der_with_signer(&intermediate).unwrap(),
    }
}

#[test]
fn decodes_generated_certificates() {
    let chain = build_chain(&PKCS_ECDSA_P384_SHA384, BasicConstraints::Constrained(1));

    let root = Cert::from_der(&chain.root).unwrap();
    assert!(root.is_ca);
    assert_eq!(root.path_len_constraint, Some(1));
    assert_eq!(root.subject, root.issuer);
    assert!(matches!(
        root.public_key,
        PublicKey::Ec {
            curve: EcCurve::P384,
            ..
        }
    ));
    assert_eq!(root.signed_data.algorithm, SignatureAlgorithm::EcdsaSha384);

    let intermediate = Cert::from_der(&chain.intermediate).unwrap();
    assert!(intermediate.is_ca);
    assert_eq!(intermediate.path_len_constraint, None);
    assert_eq!(intermediate.issuer, root.subject);
    assert_eq!(intermediate.signed_data.algorithm, SignatureAlgorithm::EcdsaSha384);

    let leaf = Cert::from_der(&chain.leaf).unwrap();
    assert!(!leaf.is_ca);
    assert_eq!(leaf.issuer, intermediate.subject);
    assert!(leaf.subject_alt_name.is_some());
    let validity = leaf.validity.unwrap();
    assert_eq!(
        validity.not_before,
        Time::from_seconds_since_unix_epoch(NOT_BEFORE)
    );
    assert_eq!(validity.not_after, Time::from_seconds_since_unix_epoch(NOT_AFTER));
}

#[test]
fn validates_generated_chains() {
    for root_alg in [&PKCS_ECDSA_P256_SHA256, &PKCS_ECDSA_P384_SHA384] {
        let chain = build_chain(root_alg, BasicConstraints::Unconstrained);
        let anchors = [trust_anchor_util::cert_der_as_trust_anchor(&chain.root, true).unwrap()];
        let store = TrustAnchorStore::new(&anchors).unwrap();
        let validator = ChainValidator::new(&store, RingVerifier);

        // Issued by the anchor.
        assert_eq!(
            validator.validate_der(
                X509Decoder,
                &[&chain.leaf[..], &chain.intermediate[..]],
                dns_name(),
                NOW
            ),
            Ok(())
        );
        // Ends in the anchor.
        assert_eq!(
            validator.validate_der(
                X509Decoder,
                &[&chain.leaf[..], &chain.intermediate[..], &chain.root[..]],
                dns_name(),
                NOW
            ),
            Ok(())
        );
    }
}

#[test]
fn rejects_generated_chains() {
    let chain = build_chain(&PKCS_ECDSA_P256_SHA256, BasicConstraints::Unconstrained);
    let anchors = [trust_anchor_util::cert_der_as_trust_anchor(&chain.root, true).unwrap()];
    let store = TrustAnchorStore::new(&anchors).unwrap();
    let validator = ChainValidator::new(&store, RingVerifier);
    let validate = |certs: &[&[u8]], dns_name, now| {
        validator.validate_der(X509Decoder, certs, dns_name, now)
    };

    let other_name = DnsNameRef::try_from_ascii_str("gateway.example.com").unwrap();
    assert_eq!(
        validate(&[&chain.leaf[..], &chain.intermediate[..]], other_name, NOW),
        Err(Error::IdentityMismatch)
    );

    // Validity is inclusive at both ends.
    for (secs, expected) in [
        (NOT_BEFORE - 1, Err(Error::NotYetValid)),
        (NOT_BEFORE, Ok(())),
        (NOT_AFTER, Ok(())),
        (NOT_AFTER + 1, Err(Error::Expired)),
    ] {
        assert_eq!(
            validate(
                &[&chain.leaf[..], &chain.intermediate[..]],
                dns_name(),
                Time::from_seconds_since_unix_epoch(secs)
            ),
            expected
        );
    }

    // The leaf's signature is at the end of its encoding.
    let mut tampered = chain.leaf.clone();
    let last = tampered.len() - 1;
    tampered[last] ^= 0x01;
    assert_eq!(
        validate(&[&tampered[..], &chain.intermediate[..]], dns_name(), NOW),
        Err(Error::BrokenChain(0))
    );

    assert_eq!(
        validate(&[&chain.leaf[..chain.leaf.len() - 1], &chain.intermediate[..]], dns_name(), NOW),
        Err(Error::Decode(DecodeError::BadDer))
    );

    // Out of order.
    assert_eq!(
        validate(&[&chain.intermediate[..], &chain.leaf[..]], dns_name(), NOW),
        Err(Error::BrokenChain(0))
    );
}

#[test]
fn same_name_different_root() {
    let chain = build_chain(&PKCS_ECDSA_P256_SHA256, BasicConstraints::Unconstrained);
    let impostor = build_chain(&PKCS_ECDSA_P256_SHA256, BasicConstraints::Unconstrained);
    let anchors = [trust_anchor_util::cert_der_as_trust_anchor(&impostor.root, true).unwrap()];
    let store = TrustAnchorStore::new(&anchors).unwrap();
    let validator = ChainValidator::new(&store, RingVerifier);

    assert_eq!(
        validator.validate_der(
            X509Decoder,
            &[&chain.leaf[..], &chain.intermediate[..]],
            dns_name(),
            NOW
        ),
        Err(Error::UntrustedRoot)
    );
    assert_eq!(
        validator.validate_der(
            X509Decoder,
            &[&chain.leaf[..], &chain.intermediate[..], &chain.root[..]],
            dns_name(),
            NOW
        ),
        Err(Error::UntrustedRoot)
    );
}

#[test]
fn path_len_constraint() {
    let chain = build_chain(&PKCS_ECDSA_P256_SHA256, BasicConstraints::Constrained(0));
    let anchors = [trust_anchor_util::cert_der_as_trust_anchor(&chain.root, true).unwrap()];
    let store = TrustAnchorStore::new(&anchors).unwrap();
    let validator = ChainValidator::new(&store, RingVerifier);

    assert_eq!(
        validator.validate_der(
            X509Decoder,
            &[&chain.leaf[..], &chain.intermediate[..], &chain.root[..]],
            dns_name(),
            NOW
        ),
        Err(Error::PathLenConstraintViolated)
    );
    assert_eq!(
        validator.validate_der(X509Decoder, &[&chain.intermediate[..], &chain.root[..]], dns_name(), NOW),
        Err(Error::IdentityMismatch)
    );
}

#[test]
fn pinned_leaf_without_san() {
    let leaf = Certificate::from_params(params(
        "legacy.example.com",
        &[],
        IsCa::NoCa,
        &PKCS_ECDSA_P256_SHA256,
    ))
    .unwrap();
    let leaf_der = leaf.serialize_der().unwrap();
    let anchors = [trust_anchor_util::cert_der_as_trust_anchor(&leaf_der, false).unwrap()];
    let store = TrustAnchorStore::new(&anchors).unwrap();
    let validator = ChainValidator::new(&store, RingVerifier);

    let legacy = DnsNameRef::try_from_ascii_str("legacy.example.com").unwrap();
    assert_eq!(
        validator.validate_der(X509Decoder, &[&leaf_der[..]], legacy, NOW),
        Ok(())
    );
    assert_eq!(
        validator.validate_der(X509Decoder, &[&leaf_der[..]], dns_name(), NOW),
        Err(Error::IdentityMismatch)
    );
}

#[test]
fn generated_anchor_code() {
    let chain = build_chain(&PKCS_ECDSA_P256_SHA256, BasicConstraints::Unconstrained);
    let anchor = trust_anchor_util::cert_der_as_trust_anchor(&chain.root, true).unwrap();
    let code = trust_anchor_util::generate_code_for_trust_anchors("TEST_ROOTS", &[anchor]);

    assert!(code.contains("curve: EcCurve::P256,"));
    assert!(code.contains("is_ca: true,"));
    let subject: String = anchor.subject.iter().map(|b| format!("\\x{:02x}", b)).collect();
    assert!(code.contains(&subject));
}
