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
    cert::{Cert, Validity},
    name::{self, DnsNameRef},
    signed_data::SignatureVerifier,
    time::Time,
    trust_anchor::TrustAnchorStore,
    Error,
};
use tracing::{debug, trace};

#[cfg(feature = "alloc")]
use crate::cert::CertDecoder;

/// The default maximum number of certificates in a chain, leaf included.
pub const MAX_CHAIN_LEN: usize = 6;

/// Validates candidate chains against a trust anchor store.
///
/// A validator borrows its store and owns its verifier; `validate` takes
/// `&self`, performs no I/O and allocates nothing, so one validator can be
/// shared by any number of threads.
#[derive(Clone, Debug)]
pub struct ChainValidator<'a, V> {
    store: &'a TrustAnchorStore<'a>,
    verifier: V,
    max_chain_len: usize,
}

impl<'a, V: SignatureVerifier> ChainValidator<'a, V> {
    /// Constructs a validator that accepts chains of up to
    /// [`MAX_CHAIN_LEN`] certificates.
    pub fn new(store: &'a TrustAnchorStore<'a>, verifier: V) -> Self {
        Self {
            store,
            verifier,
            max_chain_len: MAX_CHAIN_LEN,
        }
    }

    /// Overrides the maximum chain length.
    pub fn with_max_chain_len(self, max_chain_len: usize) -> Self {
        Self {
            max_chain_len,
            ..self
        }
    }

    /// The maximum chain length.
    pub fn max_chain_len(&self) -> usize {
        self.max_chain_len
    }

    /// Decides whether `chain` is trustworthy for `dns_name` at `now`.
    ///
    /// `chain[0]` is the leaf and each following certificate is expected to
    /// have issued the one before it. The checks are done in this order,
    /// and the first failure is returned:
    ///
    /// 1. The chain is non-empty and no longer than the maximum. No
    ///    signature is checked for an over-long chain.
    /// 2. Every link `i` (child `i`, issuer `i + 1`): the child's issuer
    ///    name is the issuer's subject name, the issuer is a CA, and the
    ///    child's signature verifies under the issuer's key. Otherwise
    ///    `BrokenChain(i)`. A pathLenConstraint on the issuer must allow the
    ///    `i` intermediates below it.
    /// 3. The last certificate is either itself a trust anchor (same
    ///    subject and key; a non-CA anchor only terminates a
    ///    single-certificate chain), or is signed by a CA anchor whose
    ///    subject is its issuer name. Otherwise `UntrustedRoot`.
    /// 4. The leaf is valid for `dns_name`.
    /// 5. Every certificate is within its validity period. Both ends are
    ///    inclusive.
    pub fn validate(&self, chain: &[Cert], dns_name: DnsNameRef, now: Time) -> Result<(), Error> {
        let (leaf, last) = match (chain.first(), chain.last()) {
            (Some(leaf), Some(last)) => (leaf, last),
            _ => {
                debug!("rejecting empty chain");
                return Err(Error::EmptyChain);
            }
        };
        if chain.len() > self.max_chain_len {
            debug!(
                len = chain.len(),
                max = self.max_chain_len,
                "rejecting over-long chain"
            );
            return Err(Error::ChainTooLong);
        }

        for (i, link) in chain.windows(2).enumerate() {
            check_link(&self.verifier, i, &link[0], &link[1])?;
        }

        self.check_anchored(last, chain.len())?;

        name::verify_cert_dns_name(leaf, dns_name).map_err(|e| {
            debug!(dns_name = dns_name.as_str(), "leaf does not match expected name");
            e
        })?;

        for (i, cert) in chain.iter().enumerate() {
            if let Some(validity) = cert.validity {
                check_validity(validity, now).map_err(|e| {
                    debug!(index = i, error = ?e, "certificate outside its validity period");
                    e
                })?;
            }
        }

        Ok(())
    }

    /// Decodes `certs` (leaf first) with `decoder`, then validates them.
    ///
    /// The length bound is checked before anything is decoded.
    #[cfg(feature = "alloc")]
    pub fn validate_der<D: CertDecoder>(
        &self,
        decoder: D,
        certs: &[&[u8]],
        dns_name: DnsNameRef,
        now: Time,
    ) -> Result<(), Error> {
        if certs.is_empty() {
            return Err(Error::EmptyChain);
        }
        if certs.len() > self.max_chain_len {
            debug!(len = certs.len(), "rejecting over-long chain before decoding");
            return Err(Error::ChainTooLong);
        }
        let chain = certs
            .iter()
            .enumerate()
            .map(|(i, der)| {
                decoder.decode(der).map_err(|e| {
                    debug!(index = i, error = ?e, "failed to decode certificate");
                    Error::Decode(e)
                })
            })
            .collect::<Result<alloc::vec::Vec<_>, _>>()?;
        self.validate(&chain, dns_name, now)
    }

    fn check_anchored(&self, last: &Cert, chain_len: usize) -> Result<(), Error> {
        for anchor in self.store.find_by_subject(last.subject) {
            if anchor.public_key != last.public_key {
                continue;
            }
            if anchor.is_ca || chain_len == 1 {
                trace!(is_ca = anchor.is_ca, "last certificate is a trust anchor");
                return Ok(());
            }
            trace!("non-CA trust anchor can't terminate a longer chain");
        }

        for anchor in self.store.find_by_subject(last.issuer) {
            if !anchor.is_ca {
                trace!("skipping non-CA trust anchor as issuer");
                continue;
            }
            if self.verifier.verify(&last.signed_data, &anchor.public_key) {
                trace!("last certificate is signed by a trust anchor");
                return Ok(());
            }
            trace!("trust anchor key doesn't verify last certificate");
        }

        debug!("no trust anchor for the last certificate");
        Err(Error::UntrustedRoot)
    }
}

fn check_link<V: SignatureVerifier>(
    verifier: &V,
    index: usize,
    child: &Cert,
    issuer: &Cert,
) -> Result<(), Error> {
    if child.issuer != issuer.subject {
        debug!(index, "issuer name doesn't match");
        return Err(Error::BrokenChain(index));
    }
    if !issuer.is_ca {
        debug!(index, "issuer is not a CA");
        return Err(Error::BrokenChain(index));
    }
    if let Some(path_len_constraint) = issuer.path_len_constraint {
        // `index` is the number of intermediates between the leaf and
        // `issuer`.
        if path_len_constraint < index {
            debug!(index, path_len_constraint, "path length constraint violated");
            return Err(Error::PathLenConstraintViolated);
        }
    }
    if !verifier.verify(&child.signed_data, &issuer.public_key) {
        debug!(index, "signature doesn't verify");
        return Err(Error::BrokenChain(index));
    }
    Ok(())
}

// https://tools.ietf.org/html/rfc5280#section-4.1.2.5
fn check_validity(validity: Validity, time: Time) -> Result<(), Error> {
    if validity.not_before > validity.not_after {
        return Err(Error::InvalidCertValidity);
    }
    if time < validity.not_before {
        return Err(Error::NotYetValid);
    }
    if time > validity.not_after {
        return Err(Error::Expired);
    }
    Ok(())
}
