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

use core::fmt;

/// The reason a candidate chain was rejected.
///
/// Every variant is terminal for the validation attempt. The handshake layer
/// must treat all of them as fatal for the connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The chain contained no certificates.
    EmptyChain,

    /// The chain was longer than the validator's configured maximum. No
    /// signature was checked.
    ChainTooLong,

    /// The link between the certificate at the given index and its issuer
    /// at the next index is broken: the issuer name does not match, the
    /// issuer is not a CA, or the signature does not verify.
    BrokenChain(usize),

    /// No trust anchor vouches for the last certificate in the chain.
    UntrustedRoot,

    /// The leaf certificate is not valid for the expected peer name.
    IdentityMismatch,

    /// A certificate's notAfter time is before the validation time.
    Expired,

    /// A certificate's notBefore time is after the validation time.
    NotYetValid,

    /// A certificate's notBefore time is after its notAfter time.
    InvalidCertValidity,

    /// A CA certificate's pathLenConstraint is exceeded by the number of
    /// intermediates below it.
    PathLenConstraintViolated,

    /// A certificate could not be decoded. The decoder's error is passed
    /// through unchanged.
    Decode(DecodeError),
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Requires the `std` feature.
#[cfg(feature = "std")]
impl ::std::error::Error for Error {}

/// An error produced while decoding a DER certificate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The encoding is not valid DER or is truncated.
    BadDer,

    /// A validity time is not a valid UTCTime or GeneralizedTime in `Z`
    /// form, or is before 1970.
    BadDerTime,

    /// The certificate version is not v1, v2 or v3, or a v1/v2 certificate
    /// has extensions.
    UnsupportedCertVersion,

    /// The signature algorithm inside the TBSCertificate differs from the
    /// outer one.
    SignatureAlgorithmMismatch,

    /// The certificate is signed with an algorithm this crate can't check.
    UnsupportedSignatureAlgorithm,

    /// The SubjectPublicKeyInfo uses a key algorithm this crate can't use.
    UnsupportedKeyAlgorithm,

    /// The SubjectPublicKeyInfo names an elliptic curve other than P-256 or
    /// P-384.
    UnsupportedEllipticCurve,

    /// An extension appears more than once or its value is malformed.
    ExtensionValueInvalid,

    /// The certificate has a critical extension that isn't understood.
    UnsupportedCriticalExtension,
}

impl From<untrusted::EndOfInput> for DecodeError {
    fn from(_: untrusted::EndOfInput) -> Self {
        DecodeError::BadDer
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Requires the `std` feature.
#[cfg(feature = "std")]
impl ::std::error::Error for DecodeError {}
