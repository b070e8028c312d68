// Copyright 2021 Brian Smith.
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

use base64::{engine::general_purpose, Engine as _};
use clap::Parser;
use iotpki::{
    trust_anchor_util, Cert, ChainValidator, DnsNameRef, EcCurve, PublicKey, RingVerifier, Time,
    TrustAnchor, TrustAnchorStore, X509Decoder, BUILTIN_TRUST_ANCHORS, MAX_CHAIN_LEN,
};
use std::convert::TryFrom;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::SystemTime;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, clap::Args)]
#[command(about = "List the built-in trust anchors")]
struct Anchors {}

#[derive(Debug, clap::Args)]
#[command(about = "Parse and print a certificate")]
struct PrintCert {
    /// A DER or PEM file. Every certificate in a PEM file is printed.
    filename: PathBuf,
}

#[derive(Debug, clap::Args)]
#[command(about = "Validate a certificate chain for a server name")]
struct VerifyChain {
    #[arg(long)]
    server_name: String,

    /// Seconds since the Unix epoch. Defaults to now.
    #[arg(long)]
    time: Option<u64>,

    #[arg(long, default_value_t = MAX_CHAIN_LEN)]
    max_chain_len: usize,

    /// Use the certificates in these files as CA anchors instead of the
    /// built-in ones.
    #[arg(long)]
    trusted_root: Vec<PathBuf>,

    /// DER or PEM files holding the chain, leaf first.
    #[arg(required = true)]
    certs: Vec<PathBuf>,
}

#[derive(Debug, clap::Args)]
#[command(about = "Generate Rust source for a trust anchor table")]
struct AnchorCode {
    /// The name of the generated static.
    #[arg(long, default_value = "TRUST_ANCHORS")]
    name: String,

    /// Make the anchors pinned server certificates rather than CAs.
    #[arg(long)]
    pinned: bool,

    /// DER or PEM files holding the anchor certificates.
    #[arg(required = true)]
    certs: Vec<PathBuf>,
}

#[derive(Parser)]
#[command(about = "Utility to inspect iotpki trust anchors and chains. Does not have a stable API.")]
enum Command {
    Anchors(Anchors),
    PrintCert(PrintCert),
    VerifyChain(VerifyChain),
    AnchorCode(AnchorCode),
}

fn print_error_and_exit(s: String) -> ! {
    let arg0 = env::args().next();
    let arg0 = arg0.as_deref().unwrap_or("iotpki");
    eprintln!("{}: {}", arg0, s);
    process::exit(1)
}

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

// Returns every certificate in the file, which is either one DER
// certificate or any number of PEM certificates.
fn read_certs(path: &Path) -> Vec<Vec<u8>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => print_error_and_exit(format!("could not read file {}: {}", path.display(), e)),
    };
    let text = match std::str::from_utf8(&bytes) {
        Ok(text) if text.contains(PEM_BEGIN) => text,
        _ => return vec![bytes],
    };

    let mut certs = Vec::new();
    let mut rest = text;
    while let Some(begin) = rest.find(PEM_BEGIN) {
        let body = &rest[begin + PEM_BEGIN.len()..];
        let end = match body.find(PEM_END) {
            Some(end) => end,
            None => print_error_and_exit(format!("unterminated PEM block in {}", path.display())),
        };
        let b64: String = body[..end].split_whitespace().collect();
        match general_purpose::STANDARD.decode(b64) {
            Ok(der) => certs.push(der),
            Err(e) => print_error_and_exit(format!("bad PEM in {}: {}", path.display(), e)),
        }
        rest = &body[end + PEM_END.len()..];
    }
    debug!(path = %path.display(), count = certs.len(), "read PEM certificates");
    certs
}

fn read_all_certs(paths: &[PathBuf]) -> Vec<(PathBuf, Vec<u8>)> {
    paths
        .iter()
        .flat_map(|path| read_certs(path).into_iter().map(move |der| (path.clone(), der)))
        .collect()
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

fn describe_key(key: &PublicKey) -> String {
    match key {
        PublicKey::Rsa { modulus, .. } => format!("RSA-{}", modulus.len() * 8),
        PublicKey::Ec {
            curve: EcCurve::P256,
            ..
        } => "ECDSA P-256".to_string(),
        PublicKey::Ec {
            curve: EcCurve::P384,
            ..
        } => "ECDSA P-384".to_string(),
    }
}

fn anchors(_: Anchors) {
    for (i, anchor) in BUILTIN_TRUST_ANCHORS.all().enumerate() {
        println!(
            "{}: {} {} subject={}",
            i,
            if anchor.is_ca { "ca" } else { "pinned" },
            describe_key(&anchor.public_key),
            hex(anchor.subject)
        );
    }
}

fn print_cert(args: PrintCert) {
    for der in read_certs(&args.filename) {
        let cert = match Cert::from_der(&der) {
            Ok(cert) => cert,
            Err(e) => print_error_and_exit(format!(
                "failed to parse a cert {}: {}",
                args.filename.display(),
                e
            )),
        };
        println!("subject: {}", hex(cert.subject));
        println!("issuer: {}", hex(cert.issuer));
        println!("key: {}", describe_key(&cert.public_key));
        println!("signature: {:?}", cert.signed_data.algorithm);
        println!("ca: {}", cert.is_ca);
        if let Some(path_len_constraint) = cert.path_len_constraint {
            println!("path length constraint: {}", path_len_constraint);
        }
        if let Some(validity) = cert.validity {
            println!(
                "valid: {} to {}",
                validity.not_before.as_seconds_since_unix_epoch(),
                validity.not_after.as_seconds_since_unix_epoch()
            );
        }
        if let Some(san) = cert.subject_alt_name {
            println!("subjectAltName: {}", hex(san));
        }
        println!();
    }
}

fn verify_chain(args: VerifyChain) {
    let server_name = match DnsNameRef::try_from_ascii_str(&args.server_name) {
        Ok(name) => name,
        Err(e) => print_error_and_exit(format!("invalid server name {}: {}", args.server_name, e)),
    };

    let certs = read_all_certs(&args.certs);
    let certs: Vec<&[u8]> = certs.iter().map(|(_, der)| der.as_slice()).collect();

    let roots = read_all_certs(&args.trusted_root);
    let custom_anchors: Vec<TrustAnchor> = roots
        .iter()
        .map(|(path, der)| {
            match trust_anchor_util::cert_der_as_trust_anchor(der, true) {
                Ok(anchor) => anchor,
                Err(e) => print_error_and_exit(format!(
                    "failed to parse trust anchor from {}: {}",
                    path.display(),
                    e
                )),
            }
        })
        .collect();
    let custom_store;
    let store = if custom_anchors.is_empty() {
        &BUILTIN_TRUST_ANCHORS
    } else {
        custom_store = match TrustAnchorStore::new(&custom_anchors) {
            Ok(store) => store,
            Err(e) => print_error_and_exit(format!("invalid trust anchors: {}", e)),
        };
        &custom_store
    };

    let time = match args.time {
        Some(secs) => Time::from_seconds_since_unix_epoch(secs),
        None => match Time::try_from(SystemTime::now()) {
            Ok(time) => time,
            Err(e) => print_error_and_exit(format!("system clock is before 1970: {}", e)),
        },
    };

    info!(
        anchors = store.len(),
        certs = certs.len(),
        server_name = server_name.as_str(),
        "validating chain"
    );
    let validator =
        ChainValidator::new(store, RingVerifier).with_max_chain_len(args.max_chain_len);
    if let Err(e) = validator.validate_der(X509Decoder, &certs, server_name, time) {
        print_error_and_exit(format!("chain validation failed: {}", e));
    }

    println!("chain is valid for {}", server_name.as_str());
}

fn anchor_code(args: AnchorCode) {
    let certs = read_all_certs(&args.certs);
    let anchors: Vec<TrustAnchor> = certs
        .iter()
        .map(|(path, der)| {
            match trust_anchor_util::cert_der_as_trust_anchor(der, !args.pinned) {
                Ok(anchor) => anchor,
                Err(e) => print_error_and_exit(format!(
                    "failed to parse trust anchor from {}: {}",
                    path.display(),
                    e
                )),
            }
        })
        .collect();
    if let Err(e) = TrustAnchorStore::new(&anchors) {
        print_error_and_exit(format!("invalid trust anchors: {}", e));
    }
    print!(
        "{}",
        trust_anchor_util::generate_code_for_trust_anchors(&args.name, &anchors)
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Command::parse() {
        Command::Anchors(args) => anchors(args),
        Command::PrintCert(args) => print_cert(args),
        Command::VerifyChain(args) => verify_chain(args),
        Command::AnchorCode(args) => anchor_code(args),
    }
}
