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

use crate::{
    der,
    error::DecodeError,
    signed_data::{self, PublicKey, SignedData},
    time::Time,
};

/// A decoded certificate: one element of a candidate chain.
///
/// Names are kept as complete DER encodings (tag and length included) and
/// are only ever compared byte for byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cert<'a> {
    /// The DER-encoded subject Name.
    pub subject: &'a [u8],

    /// The DER-encoded issuer Name.
    pub issuer: &'a [u8],

    /// The subject's public key.
    pub public_key: PublicKey<'a>,

    /// The signed TBSCertificate and its signature.
    pub signed_data: SignedData<'a>,

    /// Whether the certificate asserts that it is a CA (basicConstraints cA).
    pub is_ca: bool,

    /// The basicConstraints pathLenConstraint, if present.
    pub path_len_constraint: Option<usize>,

    /// The validity period, if known.
    pub validity: Option<Validity>,

    /// The contents of the subjectAltName extension's `GeneralNames`
    /// SEQUENCE, if present.
    pub subject_alt_name: Option<&'a [u8]>,
}

/// A certificate's validity period. Both ends are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Validity {
    /// notBefore.
    pub not_before: Time,
    /// notAfter.
    pub not_after: Time,
}

impl<'a> Cert<'a> {
    /// Decodes a DER X.509 certificate.
    pub fn from_der(cert_der: &'a [u8]) -> Result<Self, DecodeError> {
        parse_cert(untrusted::Input::from(cert_der))
    }
}

/// Turns the DER encoding of a certificate into a `Cert`.
pub trait CertDecoder {
    /// Decodes one certificate.
    fn decode<'a>(&self, cert_der: &'a [u8]) -> Result<Cert<'a>, DecodeError>;
}

impl<D: CertDecoder + ?Sized> CertDecoder for &D {
    fn decode<'a>(&self, cert_der: &'a [u8]) -> Result<Cert<'a>, DecodeError> {
        (**self).decode(cert_der)
    }
}

/// The built-in RFC 5280 decoder.
#[derive(Clone, Copy, Debug, Default)]
pub struct X509Decoder;

impl CertDecoder for X509Decoder {
    fn decode<'a>(&self, cert_der: &'a [u8]) -> Result<Cert<'a>, DecodeError> {
        Cert::from_der(cert_der)
    }
}

pub(crate) fn parse_cert(cert_der: untrusted::Input) -> Result<Cert<'_>, DecodeError> {
    let (tbs, signed_data, outer_algorithm) = cert_der.read_all(DecodeError::BadDer, |cert_der| {
        der::nested(
            cert_der,
            der::Tag::Sequence,
            DecodeError::BadDer,
            signed_data::parse_signed_data,
        )
    })?;

    tbs.read_all(DecodeError::BadDer, |tbs| {
        let version = version(tbs)?;

        // The serial number is not used for anything, but it must be an
        // INTEGER. Some real-world roots have zero or negative serial numbers
        // so they aren't rejected here.
        der::expect_tag_and_get_value(tbs, der::Tag::Integer)?;

        let signature = der::expect_tag_and_get_value(tbs, der::Tag::Sequence)?;
        // The inner and outer AlgorithmIdentifiers must be identical byte for
        // byte, so an RSA NULL parameter present in only one is a mismatch.
        if signature.as_slice_less_safe() != outer_algorithm.as_slice_less_safe() {
            return Err(DecodeError::SignatureAlgorithmMismatch);
        }

        let issuer = der::expect_tag_and_get_tlv(tbs, der::Tag::Sequence)?;
        let validity = der::nested(tbs, der::Tag::Sequence, DecodeError::BadDer, |value| {
            let not_before = der::time_choice(value)?;
            let not_after = der::time_choice(value)?;
            Ok(Validity {
                not_before,
                not_after,
            })
        })?;
        let subject = der::expect_tag_and_get_tlv(tbs, der::Tag::Sequence)?;
        let public_key = der::nested(
            tbs,
            der::Tag::Sequence,
            DecodeError::BadDer,
            signed_data::parse_spki,
        )?;

        // In theory there could be fields [1] issuerUniqueID and [2]
        // subjectUniqueID, but in practice there never are, and to keep the
        // code small and simple we don't accept any certificates that do
        // contain them.

        let mut cert = Cert {
            subject: subject.as_slice_less_safe(),
            issuer: issuer.as_slice_less_safe(),
            public_key,
            signed_data,
            is_ca: false,
            path_len_constraint: None,
            validity: Some(validity),
            subject_alt_name: None,
        };

        if tbs.at_end() {
            return Ok(cert);
        }
        if version != Version::V3 {
            return Err(DecodeError::UnsupportedCertVersion);
        }

        let mut extensions = Extensions::default();
        der::nested(
            tbs,
            der::Tag::ContextSpecificConstructed3,
            DecodeError::BadDer,
            |tagged| {
                der::nested(tagged, der::Tag::Sequence, DecodeError::BadDer, |extns| {
                    loop {
                        der::nested(extns, der::Tag::Sequence, DecodeError::BadDer, |extension| {
                            let extn_id = der::expect_tag_and_get_value(extension, der::Tag::OID)?;
                            let critical = der::optional_boolean(extension)?;
                            let extn_value =
                                der::expect_tag_and_get_value(extension, der::Tag::OctetString)?;
                            match extensions.remember(extn_id, extn_value)? {
                                Understood::No if critical => {
                                    Err(DecodeError::UnsupportedCriticalExtension)
                                }
                                _ => Ok(()),
                            }
                        })?;
                        if extns.at_end() {
                            break;
                        }
                    }
                    Ok(())
                })
            },
        )?;

        if let Some(basic_constraints) = extensions.basic_constraints {
            let (is_ca, path_len_constraint) = parse_basic_constraints(basic_constraints)?;
            cert.is_ca = is_ca;
            cert.path_len_constraint = path_len_constraint;
        }
        if let Some(san) = extensions.subject_alt_name {
            // GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName
            let general_names = san.read_all(DecodeError::ExtensionValueInvalid, |value| {
                der::expect_tag_and_get_value(value, der::Tag::Sequence)
                    .map_err(|_| DecodeError::ExtensionValueInvalid)
            })?;
            cert.subject_alt_name = Some(general_names.as_slice_less_safe());
        }

        Ok(cert)
    })
}

#[derive(Clone, Copy, PartialEq)]
enum Version {
    V1,
    V2,
    V3,
}

// mozilla::pkix supports v1, v2, v3, and v4, including both the implicit
// (correct) and explicit (incorrect) encoding of v1. Old roots are still v1,
// so we accept v1 and v2 too, but only v3 certificates may have extensions.
fn version(input: &mut untrusted::Reader) -> Result<Version, DecodeError> {
    if !input.peek(der::Tag::ContextSpecificConstructed0.into()) {
        return Ok(Version::V1);
    }
    der::nested(
        input,
        der::Tag::ContextSpecificConstructed0,
        DecodeError::UnsupportedCertVersion,
        |input| match der::small_nonnegative_integer(input)? {
            0 => Ok(Version::V1),
            1 => Ok(Version::V2),
            2 => Ok(Version::V3),
            _ => Err(DecodeError::UnsupportedCertVersion),
        },
    )
}

// https://tools.ietf.org/html/rfc5280#section-4.2.1.9
fn parse_basic_constraints(
    value: untrusted::Input,
) -> Result<(bool, Option<usize>), DecodeError> {
    value.read_all(DecodeError::ExtensionValueInvalid, |value| {
        der::nested(
            value,
            der::Tag::Sequence,
            DecodeError::ExtensionValueInvalid,
            |input| {
                let is_ca = der::optional_boolean(input)?;

                // https://bugzilla.mozilla.org/show_bug.cgi?id=985025: RFC
                // 5280 says that a certificate must not have
                // pathLenConstraint unless it is a CA certificate, but some
                // real-world end-entity certificates have pathLenConstraint.
                let path_len_constraint = if !input.at_end() {
                    let value = der::small_nonnegative_integer(input)?;
                    Some(usize::from(value))
                } else {
                    None
                };

                Ok((is_ca, path_len_constraint))
            },
        )
    })
}

enum Understood {
    Yes,
    No,
}

#[derive(Default)]
struct Extensions<'a> {
    basic_constraints: Option<untrusted::Input<'a>>,
    subject_alt_name: Option<untrusted::Input<'a>>,
    key_usage: Option<untrusted::Input<'a>>,
    ext_key_usage: Option<untrusted::Input<'a>>,
    subject_key_id: Option<untrusted::Input<'a>>,
    authority_key_id: Option<untrusted::Input<'a>>,
}

impl<'a> Extensions<'a> {
    fn remember(
        &mut self,
        extn_id: untrusted::Input<'a>,
        value: untrusted::Input<'a>,
    ) -> Result<Understood, DecodeError> {
        // We don't do anything with certificate policies so we can safely
        // ignore all policy-related stuff. We assume that the policy-related
        // extensions are not marked critical.
        const ID_CE_SUBJECT_KEY_ID: &[u8] = &oid![2, 5, 29, 14];
        const ID_CE_KEY_USAGE: &[u8] = &oid![2, 5, 29, 15];
        const ID_CE_SUBJECT_ALT_NAME: &[u8] = &oid![2, 5, 29, 17];
        const ID_CE_BASIC_CONSTRAINTS: &[u8] = &oid![2, 5, 29, 19];
        const ID_CE_AUTHORITY_KEY_ID: &[u8] = &oid![2, 5, 29, 35];
        const ID_CE_EXT_KEY_USAGE: &[u8] = &oid![2, 5, 29, 37];

        let out = match extn_id.as_slice_less_safe() {
            // id-ce-basicConstraints 2.5.29.19
            ID_CE_BASIC_CONSTRAINTS => &mut self.basic_constraints,

            // id-ce-subjectAltName 2.5.29.17
            ID_CE_SUBJECT_ALT_NAME => &mut self.subject_alt_name,

            // The remaining extensions are only checked for duplicates. For
            // CA certificates, BasicConstraints.cA makes KeyUsage redundant,
            // and this validator has no key-purpose policy of its own.
            ID_CE_KEY_USAGE => &mut self.key_usage,
            ID_CE_EXT_KEY_USAGE => &mut self.ext_key_usage,
            ID_CE_SUBJECT_KEY_ID => &mut self.subject_key_id,
            ID_CE_AUTHORITY_KEY_ID => &mut self.authority_key_id,

            _ => return Ok(Understood::No),
        };

        if out.is_some() {
            // The certificate contains more than one instance of this
            // extension.
            return Err(DecodeError::ExtensionValueInvalid);
        }
        *out = Some(value);

        Ok(Understood::Yes)
    }
}
