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

use crate::{der, error::DecodeError};
use ring::signature;

/// A public key, tagged by algorithm.
///
/// RSA integers are unsigned big-endian with the DER sign-padding byte
/// removed, so two encodings of the same key always compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublicKey<'a> {
    /// An RSA public key.
    Rsa {
        /// The modulus `n`.
        modulus: &'a [u8],
        /// The public exponent `e`.
        exponent: &'a [u8],
    },

    /// An elliptic curve public key.
    Ec {
        /// The named curve.
        curve: EcCurve,
        /// The uncompressed SEC1 point (`0x04 || x || y`).
        point: &'a [u8],
    },
}

/// An elliptic curve supported for ECDSA.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EcCurve {
    /// NIST P-256 (secp256r1).
    P256,
    /// NIST P-384 (secp384r1).
    P384,
}

impl<'a> PublicKey<'a> {
    /// Byte-for-byte equality usable in constant evaluation.
    pub(crate) const fn const_eq(&self, other: &PublicKey) -> bool {
        match (*self, *other) {
            (
                PublicKey::Rsa { modulus, exponent },
                PublicKey::Rsa {
                    modulus: other_modulus,
                    exponent: other_exponent,
                },
            ) => bytes_eq(modulus, other_modulus) && bytes_eq(exponent, other_exponent),
            (
                PublicKey::Ec { curve, point },
                PublicKey::Ec {
                    curve: other_curve,
                    point: other_point,
                },
            ) => curve.const_eq(other_curve) && bytes_eq(point, other_point),
            _ => false,
        }
    }

    /// Whether the key fields are in the canonical form the store and the
    /// decoder agree on.
    pub(crate) const fn is_well_formed(&self) -> bool {
        match *self {
            PublicKey::Rsa { modulus, exponent } => {
                !modulus.is_empty() && modulus[0] != 0 && !exponent.is_empty() && exponent[0] != 0
            }
            PublicKey::Ec { point, .. } => !point.is_empty() && point[0] == 0x04,
        }
    }
}

impl EcCurve {
    const fn const_eq(self, other: EcCurve) -> bool {
        matches!(
            (self, other),
            (EcCurve::P256, EcCurve::P256) | (EcCurve::P384, EcCurve::P384)
        )
    }
}

pub(crate) const fn bytes_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// The algorithm a certificate was signed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// sha1WithRSAEncryption. Accepted only for legacy roots.
    RsaPkcs1Sha1,
    /// sha256WithRSAEncryption.
    RsaPkcs1Sha256,
    /// sha384WithRSAEncryption.
    RsaPkcs1Sha384,
    /// sha512WithRSAEncryption.
    RsaPkcs1Sha512,
    /// ecdsa-with-SHA256.
    EcdsaSha256,
    /// ecdsa-with-SHA384.
    EcdsaSha384,
}

/// The bytes that were signed, the algorithm, and the signature value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignedData<'a> {
    /// The signed bytes; for a certificate, the DER `tbsCertificate`.
    pub data: &'a [u8],
    /// The signature algorithm.
    pub algorithm: SignatureAlgorithm,
    /// The signature value.
    pub signature: &'a [u8],
}

/// The signature-verification primitive the chain validator calls for every
/// link it checks.
pub trait SignatureVerifier {
    /// Returns whether `signed_data.signature` is a valid signature over
    /// `signed_data.data` by `public_key`.
    fn verify(&self, signed_data: &SignedData, public_key: &PublicKey) -> bool;
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for &V {
    fn verify(&self, signed_data: &SignedData, public_key: &PublicKey) -> bool {
        (**self).verify(signed_data, public_key)
    }
}

/// Verifies signatures with *ring*.
///
/// RSA keys must be 2048 to 8192 bits long, and RSA signatures only verify
/// with the `alloc` feature enabled. ECDSA signatures are ASN.1-encoded, as
/// in X.509. Combinations of key and algorithm that don't fit together never
/// verify.
#[derive(Clone, Copy, Debug, Default)]
pub struct RingVerifier;

impl SignatureVerifier for RingVerifier {
    fn verify(&self, signed_data: &SignedData, public_key: &PublicKey) -> bool {
        match *public_key {
            PublicKey::Rsa { modulus, exponent } => verify_rsa(signed_data, modulus, exponent),
            PublicKey::Ec { curve, point } => {
                let alg = match (curve, signed_data.algorithm) {
                    (EcCurve::P256, SignatureAlgorithm::EcdsaSha256) => {
                        &signature::ECDSA_P256_SHA256_ASN1
                    }
                    (EcCurve::P256, SignatureAlgorithm::EcdsaSha384) => {
                        &signature::ECDSA_P256_SHA384_ASN1
                    }
                    (EcCurve::P384, SignatureAlgorithm::EcdsaSha256) => {
                        &signature::ECDSA_P384_SHA256_ASN1
                    }
                    (EcCurve::P384, SignatureAlgorithm::EcdsaSha384) => {
                        &signature::ECDSA_P384_SHA384_ASN1
                    }
                    _ => return false,
                };
                signature::UnparsedPublicKey::new(alg, point)
                    .verify(signed_data.data, signed_data.signature)
                    .is_ok()
            }
        }
    }
}

// *ring* only does RSA with the heap available.
#[cfg(feature = "alloc")]
fn verify_rsa(signed_data: &SignedData, modulus: &[u8], exponent: &[u8]) -> bool {
    let params = match signed_data.algorithm {
        SignatureAlgorithm::RsaPkcs1Sha1 => {
            &signature::RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY
        }
        SignatureAlgorithm::RsaPkcs1Sha256 => &signature::RSA_PKCS1_2048_8192_SHA256,
        SignatureAlgorithm::RsaPkcs1Sha384 => &signature::RSA_PKCS1_2048_8192_SHA384,
        SignatureAlgorithm::RsaPkcs1Sha512 => &signature::RSA_PKCS1_2048_8192_SHA512,
        SignatureAlgorithm::EcdsaSha256 | SignatureAlgorithm::EcdsaSha384 => return false,
    };
    let key = signature::RsaPublicKeyComponents {
        n: modulus,
        e: exponent,
    };
    key.verify(params, signed_data.data, signed_data.signature).is_ok()
}

#[cfg(not(feature = "alloc"))]
fn verify_rsa(_: &SignedData, _: &[u8], _: &[u8]) -> bool {
    false
}

// Parses the concatenation of tbs||signatureAlgorithm||signatureValue that is
// common in the X.509 certificate syntax:
//
// ```ASN.1
// Certificate (SEQUENCE) {
//     tbsCertificate TBSCertificate,
//     signatureAlgorithm AlgorithmIdentifier,
//     signatureValue BIT STRING
// }
// ```
//
// Note that this function does NOT parse the outermost `SEQUENCE`.
//
// The return value's first component is the contents of `tbsCertificate`;
// the second component is the `SignedData`, whose `data` is the whole
// `tbsCertificate` encoding; the third is the raw signature
// AlgorithmIdentifier contents, which the caller compares against the copy
// inside `tbsCertificate`.
pub(crate) fn parse_signed_data<'a>(
    der: &mut untrusted::Reader<'a>,
) -> Result<(untrusted::Input<'a>, SignedData<'a>, untrusted::Input<'a>), DecodeError> {
    let (data, tbs) = der.read_partial(|r| der::expect_tag_and_get_value(r, der::Tag::Sequence))?;
    let algorithm_id = der::expect_tag_and_get_value(der, der::Tag::Sequence)?;
    let algorithm = signature_algorithm(algorithm_id)?;
    let signature = der::bit_string_with_no_unused_bits(der)?;

    Ok((
        tbs,
        SignedData {
            data: data.as_slice_less_safe(),
            algorithm,
            signature: signature.as_slice_less_safe(),
        },
        algorithm_id,
    ))
}

// RFC 5758 Section 3.2 (ECDSA with SHA-2) says that parameters must be
// omitted. RFC 4055 Section 5 and RFC 3279 Section 2.2.1 both say that
// parameters for RSA must be encoded as NULL; we relax that requirement by
// allowing the NULL to be omitted, for compatibility.
fn signature_algorithm(algorithm_id: untrusted::Input) -> Result<SignatureAlgorithm, DecodeError> {
    algorithm_id.read_all(DecodeError::BadDer, |input| {
        let oid = der::expect_tag_and_get_value(input, der::Tag::OID)?;
        let oid = oid.as_slice_less_safe();
        let (algorithm, is_rsa) = if oid == RSA_PKCS1_SHA256_OID {
            (SignatureAlgorithm::RsaPkcs1Sha256, true)
        } else if oid == RSA_PKCS1_SHA384_OID {
            (SignatureAlgorithm::RsaPkcs1Sha384, true)
        } else if oid == RSA_PKCS1_SHA512_OID {
            (SignatureAlgorithm::RsaPkcs1Sha512, true)
        } else if oid == RSA_PKCS1_SHA1_OID {
            (SignatureAlgorithm::RsaPkcs1Sha1, true)
        } else if oid == ECDSA_SHA256_OID {
            (SignatureAlgorithm::EcdsaSha256, false)
        } else if oid == ECDSA_SHA384_OID {
            (SignatureAlgorithm::EcdsaSha384, false)
        } else {
            // Consume the parameters so the caller sees this error rather
            // than an incomplete read.
            let _ = input.read_bytes_to_end();
            return Err(DecodeError::UnsupportedSignatureAlgorithm);
        };
        if is_rsa && input.peek(der::Tag::Null.into()) {
            der::nested(input, der::Tag::Null, DecodeError::BadDer, |_| Ok(()))?;
        }
        Ok(algorithm)
    })
}

// Parses a SubjectPublicKeyInfo (the contents of the outer SEQUENCE):
//
// ```ASN.1
// SubjectPublicKeyInfo ::= SEQUENCE {
//     algorithm         AlgorithmIdentifier,
//     subjectPublicKey  BIT STRING }
// ```
//
// We only support rsaEncryption with a NULL parameter (RFC 3279 Section
// 2.3.1) and id-ecPublicKey with the named curve form (RFC 5480).
pub(crate) fn parse_spki<'a>(input: &mut untrusted::Reader<'a>) -> Result<PublicKey<'a>, DecodeError> {
    enum KeyAlgorithm {
        Rsa,
        Ec(EcCurve),
    }

    let key_algorithm = der::nested(input, der::Tag::Sequence, DecodeError::BadDer, |input| {
        let algorithm_oid = der::expect_tag_and_get_value(input, der::Tag::OID)?;
        let algorithm_oid = algorithm_oid.as_slice_less_safe();
        if algorithm_oid == RSA_ENCRYPTION_OID {
            der::nested(input, der::Tag::Null, DecodeError::BadDer, |_| Ok(()))?;
            Ok(KeyAlgorithm::Rsa)
        } else if algorithm_oid == EC_PUBLIC_KEY_OID {
            let curve_oid = der::expect_tag_and_get_value(input, der::Tag::OID)?;
            let curve_oid = curve_oid.as_slice_less_safe();
            let curve = if curve_oid == SECP256R1_OID {
                EcCurve::P256
            } else if curve_oid == SECP384R1_OID {
                EcCurve::P384
            } else {
                return Err(DecodeError::UnsupportedEllipticCurve);
            };
            Ok(KeyAlgorithm::Ec(curve))
        } else {
            let _ = input.read_bytes_to_end();
            Err(DecodeError::UnsupportedKeyAlgorithm)
        }
    })?;

    let key = der::bit_string_with_no_unused_bits(input)?;
    match key_algorithm {
        KeyAlgorithm::Rsa => key.read_all(DecodeError::BadDer, |input| {
            der::nested(input, der::Tag::Sequence, DecodeError::BadDer, |input| {
                let modulus = der::positive_integer(input)?;
                let exponent = der::positive_integer(input)?;
                Ok(PublicKey::Rsa {
                    modulus: modulus.as_slice_less_safe(),
                    exponent: exponent.as_slice_less_safe(),
                })
            })
        }),
        KeyAlgorithm::Ec(curve) => {
            let point = key.as_slice_less_safe();
            if point.first() != Some(&0x04) {
                return Err(DecodeError::BadDer); // Only uncompressed points.
            }
            Ok(PublicKey::Ec { curve, point })
        }
    }
}

const RSA_ENCRYPTION_OID: &[u8] = &oid_1_2_840_113549![1, 1, 1];
const EC_PUBLIC_KEY_OID: &[u8] = &oid_1_2_840_10045![2, 1];
const SECP256R1_OID: &[u8] = &oid_1_2_840_10045![3, 1, 7];
const SECP384R1_OID: &[u8] = &oid_1_3_132![0, 34];

const ECDSA_SHA256_OID: &[u8] = &oid_1_2_840_10045![4, 3, 2];
const ECDSA_SHA384_OID: &[u8] = &oid_1_2_840_10045![4, 3, 3];

const RSA_PKCS1_SHA1_OID: &[u8] = &oid_1_2_840_113549![1, 1, 5];
const RSA_PKCS1_SHA256_OID: &[u8] = &oid_1_2_840_113549![1, 1, 11];
const RSA_PKCS1_SHA384_OID: &[u8] = &oid_1_2_840_113549![1, 1, 12];
const RSA_PKCS1_SHA512_OID: &[u8] = &oid_1_2_840_113549![1, 1, 13];
