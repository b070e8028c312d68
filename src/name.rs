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

use crate::{cert::Cert, der, error::DecodeError, Error};
use core::fmt;

/// A reference to a DNS Name suitable for use in the TLS Server Name
/// Indication (SNI) extension and/or for use as the reference hostname for
/// which verification of a certificate's identity is done.
///
/// A `DnsNameRef` is guaranteed to be syntactically valid. The validity rules
/// are specified in [RFC 5280 Section 7.2], except that underscores are also
/// allowed. Wildcards are not allowed.
///
/// [RFC 5280 Section 7.2]: https://tools.ietf.org/html/rfc5280#section-7.2
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DnsNameRef<'a>(&'a [u8]);

impl fmt::Debug for DnsNameRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("DnsNameRef").field(&self.as_str()).finish()
    }
}

/// An error indicating that a `DnsNameRef` could not built because the input
/// is not a syntactically-valid (reference) DNS Name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidDnsNameError;

impl fmt::Display for InvalidDnsNameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Requires the `std` feature.
#[cfg(feature = "std")]
impl ::std::error::Error for InvalidDnsNameError {}

impl<'a> DnsNameRef<'a> {
    /// Constructs a `DnsNameRef` from the given input if the input is a
    /// syntactically-valid DNS name.
    pub fn try_from_ascii(dns_name: &'a [u8]) -> Result<Self, InvalidDnsNameError> {
        if !is_valid_reference_dns_id(untrusted::Input::from(dns_name)) {
            return Err(InvalidDnsNameError);
        }

        Ok(Self(dns_name))
    }

    /// Constructs a `DnsNameRef` from the given input if the input is a
    /// syntactically-valid DNS name.
    pub fn try_from_ascii_str(dns_name: &'a str) -> Result<Self, InvalidDnsNameError> {
        Self::try_from_ascii(dns_name.as_bytes())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &'a str {
        // A valid `DnsNameRef` is always ASCII.
        core::str::from_utf8(self.0).unwrap_or_default()
    }
}

impl AsRef<[u8]> for DnsNameRef<'_> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.0
    }
}

// Checks that the leaf presents `dns_name`.
//
// The presented identifiers are the subjectAltName dNSNames. Only when the
// certificate has no dNSName at all are the subject's common names used
// instead, as legacy servers still rely on that.
pub(crate) fn verify_cert_dns_name(cert: &Cert, dns_name: DnsNameRef) -> Result<(), Error> {
    let reference = untrusted::Input::from(dns_name.0);

    if let Some(san) = cert.subject_alt_name {
        let mut found_dns_name = false;
        let matched = for_each_san_dns_name(untrusted::Input::from(san), |presented| {
            found_dns_name = true;
            presented_dns_id_matches_reference_dns_id(presented, reference)
        })?;
        if matched {
            return Ok(());
        }
        if found_dns_name {
            return Err(Error::IdentityMismatch);
        }
    }

    let matched = for_each_subject_common_name(untrusted::Input::from(cert.subject), |presented| {
        presented_dns_id_matches_reference_dns_id(presented, reference)
    })?;
    if matched {
        Ok(())
    } else {
        Err(Error::IdentityMismatch)
    }
}

// Calls `f` with every dNSName in the contents of a GeneralNames SEQUENCE
// until it returns `true`. Other GeneralName choices are skipped.
fn for_each_san_dns_name<'a>(
    general_names: untrusted::Input<'a>,
    mut f: impl FnMut(untrusted::Input<'a>) -> bool,
) -> Result<bool, DecodeError> {
    const DNS_NAME_TAG: u8 = der::CONTEXT_SPECIFIC | 2;

    general_names.read_all(DecodeError::BadDer, |input| {
        while !input.at_end() {
            let (tag, value) = der::read_tag_and_get_value(input)?;
            if tag == DNS_NAME_TAG && f(value) {
                // The rest must still be well-formed.
                while !input.at_end() {
                    der::read_tag_and_get_value(input)?;
                }
                return Ok(true);
            }
        }
        Ok(false)
    })
}

// Calls `f` with the value of every id-at-commonName attribute in `subject`
// whose value is a directory string holding ASCII-compatible text, until it
// returns `true`.
fn for_each_subject_common_name<'a>(
    subject: untrusted::Input<'a>,
    mut f: impl FnMut(untrusted::Input<'a>) -> bool,
) -> Result<bool, DecodeError> {
    const ID_AT_COMMON_NAME: &[u8] = &oid![2, 5, 4, 3];
    const DIRECTORY_STRING_TAGS: [der::Tag; 4] = [
        der::Tag::PrintableString,
        der::Tag::UTF8String,
        der::Tag::IA5String,
        der::Tag::TeletexString,
    ];

    let mut matched = false;
    subject.read_all(DecodeError::BadDer, |input| {
        der::nested(input, der::Tag::Sequence, DecodeError::BadDer, |rdns| {
            while !rdns.at_end() {
                der::nested(rdns, der::Tag::Set, DecodeError::BadDer, |rdn| {
                    while !rdn.at_end() {
                        der::nested(rdn, der::Tag::Sequence, DecodeError::BadDer, |atv| {
                            let attribute_type = der::expect_tag_and_get_value(atv, der::Tag::OID)?;
                            let (tag, value) = der::read_tag_and_get_value(atv)?;
                            if matched || attribute_type.as_slice_less_safe() != ID_AT_COMMON_NAME
                            {
                                return Ok(());
                            }
                            if DIRECTORY_STRING_TAGS.iter().any(|&t| u8::from(t) == tag)
                                && f(value)
                            {
                                matched = true;
                            }
                            Ok(())
                        })?;
                    }
                    Ok(())
                })?;
            }
            Ok(())
        })
    })?;
    Ok(matched)
}

// Compares a presented DNS identifier from a certificate with a reference
// identifier that has already been validated.
//
// A presented identifier that isn't syntactically valid never matches. A
// presented wildcard label must be exactly "*" and must be the leftmost
// label; it matches exactly one reference label. Comparison is ASCII
// case-insensitive, and a relative presented identifier matches an absolute
// reference identifier.
//
// Absolute presented identifiers such as "example.com." are not valid, as
// certificates are issued for relative names.
fn presented_dns_id_matches_reference_dns_id(
    presented_dns_id: untrusted::Input,
    reference_dns_id: untrusted::Input,
) -> bool {
    if !is_valid_dns_id(presented_dns_id, IdRole::Presented, AllowWildcards::Yes) {
        return false;
    }

    let mut presented = untrusted::Reader::new(presented_dns_id);
    let mut reference = untrusted::Reader::new(reference_dns_id);

    // Only allow wildcard labels that consist only of '*'.
    if presented.peek(b'*') {
        if presented.skip(1).is_err() {
            return false;
        }
        let mut label_length = 0;
        loop {
            match reference.read_byte() {
                Err(_) => return false,
                Ok(b'.') => break,
                Ok(_) => label_length += 1,
            }
        }
        // The wildcard stands for exactly one, non-empty label.
        if label_length == 0 {
            return false;
        }
        if presented.read_byte() != Ok(b'.') {
            return false;
        }
    }

    loop {
        match (presented.read_byte(), reference.read_byte()) {
            (Ok(p), Ok(r)) if p.eq_ignore_ascii_case(&r) => (),
            _ => return false,
        }
        if presented.at_end() {
            break;
        }
    }

    // Allow a relative presented DNS ID to match an absolute reference DNS ID.
    if !reference.at_end() {
        if reference.read_byte() != Ok(b'.') {
            return false;
        }
        if !reference.at_end() {
            return false;
        }
    }

    true
}

#[derive(PartialEq)]
enum AllowWildcards {
    No,
    Yes,
}

#[derive(Clone, Copy, PartialEq)]
enum IdRole {
    Reference,
    Presented,
}

fn is_valid_reference_dns_id(hostname: untrusted::Input) -> bool {
    is_valid_dns_id(hostname, IdRole::Reference, AllowWildcards::No)
}

// https://tools.ietf.org/html/rfc5280#section-4.2.1.6:
//
//   When the subjectAltName extension contains a domain name system
//   label, the domain name MUST be stored in the dNSName (an IA5String).
//   The name MUST be in the "preferred name syntax", as specified by
//   Section 3.5 of [RFC1034] and as modified by Section 2.1 of
//   [RFC1123].
//
// https://bugzilla.mozilla.org/show_bug.cgi?id=1136616: As an exception to the
// requirement above, underscores are also allowed in names for compatibility.
fn is_valid_dns_id(
    hostname: untrusted::Input,
    id_role: IdRole,
    allow_wildcards: AllowWildcards,
) -> bool {
    // https://devblogs.microsoft.com/oldnewthing/20120412-00/?p=7873
    if hostname.len() > 253 {
        return false;
    }

    let mut input = untrusted::Reader::new(hostname);

    let mut dot_count = 0;
    let mut label_length = 0;
    let mut label_is_all_numeric = false;
    let mut label_ends_with_hyphen = false;

    // Only presented IDs are allowed to have wildcard labels. And, like
    // Chromium, be stricter than RFC 6125 requires by insisting that a
    // wildcard label consist only of '*'.
    let is_wildcard = allow_wildcards == AllowWildcards::Yes && input.peek(b'*');
    if is_wildcard {
        if input.read_byte() != Ok(b'*') || input.read_byte() != Ok(b'.') {
            return false;
        }
        dot_count += 1;
    }

    loop {
        const MAX_LABEL_LENGTH: usize = 63;

        match input.read_byte() {
            Ok(b'-') => {
                if label_length == 0 {
                    return false; // Labels must not start with a hyphen.
                }
                label_is_all_numeric = false;
                label_ends_with_hyphen = true;
                label_length += 1;
                if label_length > MAX_LABEL_LENGTH {
                    return false;
                }
            }

            Ok(b'0'..=b'9') => {
                if label_length == 0 {
                    label_is_all_numeric = true;
                }
                label_ends_with_hyphen = false;
                label_length += 1;
                if label_length > MAX_LABEL_LENGTH {
                    return false;
                }
            }

            Ok(b'a'..=b'z') | Ok(b'A'..=b'Z') | Ok(b'_') => {
                label_is_all_numeric = false;
                label_ends_with_hyphen = false;
                label_length += 1;
                if label_length > MAX_LABEL_LENGTH {
                    return false;
                }
            }

            Ok(b'.') => {
                dot_count += 1;
                if label_length == 0 {
                    return false;
                }
                if label_ends_with_hyphen {
                    return false; // Labels must not end with a hyphen.
                }
                label_length = 0;
            }

            _ => {
                return false;
            }
        }

        if input.at_end() {
            break;
        }
    }

    // Only reference IDs, not presented IDs, may be absolute.
    if label_length == 0 && id_role != IdRole::Reference {
        return false;
    }

    if label_ends_with_hyphen {
        return false; // Labels must not end with a hyphen.
    }

    if label_is_all_numeric {
        return false; // Last label must not be all numeric.
    }

    if is_wildcard {
        // If the DNS ID ends with a dot, the last dot signifies an absolute ID.
        let label_count = if label_length == 0 {
            dot_count
        } else {
            dot_count + 1
        };

        // Like NSS, require at least two labels to follow the wildcard label.
        if label_count < 3 {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(presented: &[u8], reference: &str) -> bool {
        let reference = DnsNameRef::try_from_ascii_str(reference).unwrap();
        presented_dns_id_matches_reference_dns_id(
            untrusted::Input::from(presented),
            untrusted::Input::from(reference.as_ref()),
        )
    }

    #[test]
    fn presented_matches_reference() {
        assert!(matches(b"example.com", "example.com"));
        assert!(matches(b"example.com", "example.com."));
        assert!(matches(b"EXAMPLE.com", "example.COM"));
        assert!(!matches(b"example.com", "www.example.com"));
        assert!(!matches(b"www.example.com", "example.com"));
        assert!(!matches(b"example.com.", "example.com"));
        assert!(!matches(b"example.co", "example.com"));
    }

    #[test]
    fn wildcard_matches_exactly_one_label() {
        assert!(matches(b"*.example.com", "www.example.com"));
        assert!(matches(b"*.example.com", "WWW.Example.Com"));
        assert!(!matches(b"*.example.com", "example.com"));
        assert!(!matches(b"*.example.com", "a.b.example.com"));
        assert!(!matches(b"*.com", "example.com"));
        assert!(!matches(b"www.*.com", "www.example.com"));
        assert!(!matches(b"w*.example.com", "www.example.com"));
        assert!(matches(b"*.xn--exmple-cua.com", "a.xn--exmple-cua.com"));
    }

    #[test]
    fn invalid_presented_ids_never_match() {
        assert!(!matches(b"", "a.example"));
        assert!(!matches(b"a..example", "a.example"));
        assert!(!matches(b"a.example\0", "a.example"));
        assert!(!matches(b"1.2.3.4", "a.example"));
    }

    // SEQUENCE { SET { SEQUENCE { commonName, <tag> <cn> } } }
    fn subject_with_cn(tag: u8, cn: &[u8]) -> Vec<u8> {
        let mut atv = vec![0x06, 0x03, 0x55, 0x04, 0x03, tag, cn.len() as u8];
        atv.extend_from_slice(cn);
        let mut out = vec![0x30, (atv.len() + 4) as u8, 0x31, (atv.len() + 2) as u8];
        out.extend_from_slice(&[0x30, atv.len() as u8]);
        out.extend_from_slice(&atv);
        out
    }

    fn common_name_matches(subject: &[u8], reference: &str) -> Result<bool, DecodeError> {
        let reference = DnsNameRef::try_from_ascii_str(reference).unwrap();
        for_each_subject_common_name(untrusted::Input::from(subject), |presented| {
            presented_dns_id_matches_reference_dns_id(
                presented,
                untrusted::Input::from(reference.as_ref()),
            )
        })
    }

    #[test]
    fn subject_common_name_fallback() {
        let printable = subject_with_cn(0x13, b"amiselaytes.com");
        assert_eq!(common_name_matches(&printable, "amiselaytes.com"), Ok(true));
        assert_eq!(common_name_matches(&printable, "example.com"), Ok(false));

        let utf8 = subject_with_cn(0x0c, b"amiselaytes.com");
        assert_eq!(common_name_matches(&utf8, "amiselaytes.com"), Ok(true));

        // BMPString isn't considered.
        let bmp = subject_with_cn(0x1e, b"amiselaytes.com");
        assert_eq!(common_name_matches(&bmp, "amiselaytes.com"), Ok(false));

        let mut truncated = printable.clone();
        truncated.pop();
        assert_eq!(
            common_name_matches(&truncated, "amiselaytes.com"),
            Err(DecodeError::BadDer)
        );
    }

    #[test]
    fn san_dns_names() {
        // [1] rfc822Name, [2] dNSName, [2] dNSName
        let san = b"\x81\x03a@b\x82\x0bexample.com\x82\x0dwww.example.a";
        let mut seen = Vec::new();
        let matched = for_each_san_dns_name(untrusted::Input::from(&san[..]), |name| {
            seen.push(name.as_slice_less_safe().to_vec());
            false
        });
        assert_eq!(matched, Ok(false));
        assert_eq!(seen, vec![b"example.com".to_vec(), b"www.example.a".to_vec()]);

        // Trailing garbage after the matching name is still an error.
        let bad = b"\x82\x0bexample.com\x82\x05a";
        assert_eq!(
            for_each_san_dns_name(untrusted::Input::from(&bad[..]), |_| true),
            Err(DecodeError::BadDer)
        );
    }
}
