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

//! Utilities for efficiently embedding trust anchors in programs.

use crate::{cert::Cert, error::DecodeError, trust_anchor::TrustAnchor};

#[cfg(feature = "alloc")]
use {
    crate::signed_data::{EcCurve, PublicKey},
    alloc::string::String,
    core::fmt::Write,
};

/// Interprets the given DER-encoded certificate as a `TrustAnchor`. The
/// certificate is not validated. In particular, there is no check that the
/// certificate is self-signed or even that the certificate has the cA basic
/// constraint; `is_ca` is taken from the caller.
pub fn cert_der_as_trust_anchor(
    cert_der: &[u8],
    is_ca: bool,
) -> Result<TrustAnchor<'_>, DecodeError> {
    let cert = Cert::from_der(cert_der)?;
    Ok(TrustAnchor {
        subject: cert.subject,
        public_key: cert.public_key,
        is_ca,
    })
}

/// Generates code for hard-coding the given trust anchors into a program.
/// This is designed to be used in a build script. `name` is the name of the
/// public static variable that will contain the `TrustAnchorStore`; the
/// anchors themselves go in a constant named `{name}_ANCHORS`.
///
/// The generated code refers to `TrustAnchor`, `TrustAnchorStore`,
/// `PublicKey` and `EcCurve`, which must be in scope, and checks the store
/// at compile time.
#[cfg(feature = "alloc")]
pub fn generate_code_for_trust_anchors(name: &str, trust_anchors: &[TrustAnchor]) -> String {
    let mut out = String::new();
    // Writing to a `String` never fails.
    let _ = writeln!(
        out,
        "pub static {0}: TrustAnchorStore<'static> = TrustAnchorStore::new_unchecked({0}_ANCHORS);\n",
        name
    );
    let _ = writeln!(
        out,
        "const _: () = match TrustAnchorStore::new_unchecked({}_ANCHORS).self_check() {{\n    \
         Ok(()) => (),\n    \
         Err(_) => panic!(\"malformed trust anchor\"),\n\
         }};\n",
        name
    );
    let _ = writeln!(out, "const {}_ANCHORS: &[TrustAnchor<'static>] = &[", name);
    for anchor in trust_anchors {
        out.push_str("    TrustAnchor {\n");
        let _ = writeln!(out, "        subject: {},", bytes_literal(anchor.subject));
        match anchor.public_key {
            PublicKey::Rsa { modulus, exponent } => {
                out.push_str("        public_key: PublicKey::Rsa {\n");
                let _ = writeln!(out, "            modulus: {},", bytes_literal(modulus));
                let _ = writeln!(out, "            exponent: {},", bytes_literal(exponent));
            }
            PublicKey::Ec { curve, point } => {
                let curve = match curve {
                    EcCurve::P256 => "P256",
                    EcCurve::P384 => "P384",
                };
                out.push_str("        public_key: PublicKey::Ec {\n");
                let _ = writeln!(out, "            curve: EcCurve::{},", curve);
                let _ = writeln!(out, "            point: {},", bytes_literal(point));
            }
        }
        out.push_str("        },\n");
        let _ = writeln!(out, "        is_ca: {},", anchor.is_ca);
        out.push_str("    },\n");
    }
    out.push_str("];\n");
    out
}

#[cfg(feature = "alloc")]
fn bytes_literal(bytes: &[u8]) -> String {
    let mut out = String::from("b\"");
    for b in bytes {
        let _ = write!(out, "\\x{:02x}", b);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_not_an_anchor() {
        assert_eq!(
            cert_der_as_trust_anchor(&[0x30, 0x00], true),
            Err(DecodeError::BadDer)
        );
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn generated_code_lists_every_anchor() {
        let anchors = [
            TrustAnchor {
                subject: &[0x30, 0x00],
                public_key: PublicKey::Rsa {
                    modulus: &[0xc5],
                    exponent: &[0x03],
                },
                is_ca: false,
            },
            TrustAnchor {
                subject: &[0x30, 0x02, 0x31, 0x00],
                public_key: PublicKey::Ec {
                    curve: EcCurve::P384,
                    point: &[0x04, 0xff],
                },
                is_ca: true,
            },
        ];
        let code = generate_code_for_trust_anchors("ROOTS", &anchors);
        assert!(code.starts_with(
            "pub static ROOTS: TrustAnchorStore<'static> = \
             TrustAnchorStore::new_unchecked(ROOTS_ANCHORS);\n"
        ));
        assert!(code.contains("const ROOTS_ANCHORS: &[TrustAnchor<'static>] = &[\n"));
        assert!(code.ends_with("];\n"));
        assert_eq!(code.matches("TrustAnchor {").count(), 2);
        assert!(code.contains("modulus: b\"\\xc5\","));
        assert!(code.contains("curve: EcCurve::P384,"));
        assert!(code.contains("point: b\"\\x04\\xff\","));
        assert!(code.contains("subject: b\"\\x30\\x02\\x31\\x00\","));
        assert!(code.contains(
            "const _: () = match TrustAnchorStore::new_unchecked(ROOTS_ANCHORS).self_check()"
        ));
    }
}
