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

use crate::{error::DecodeError, time};

pub(crate) const CONSTRUCTED: u8 = 0x20;
pub(crate) const CONTEXT_SPECIFIC: u8 = 0x80;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub(crate) enum Tag {
    Boolean = 0x01,
    Integer = 0x02,
    BitString = 0x03,
    OctetString = 0x04,
    Null = 0x05,
    OID = 0x06,
    UTF8String = 0x0C,
    Sequence = CONSTRUCTED | 0x10, // 0x30
    Set = CONSTRUCTED | 0x11,      // 0x31
    PrintableString = 0x13,
    TeletexString = 0x14,
    IA5String = 0x16,
    UTCTime = 0x17,
    GeneralizedTime = 0x18,

    ContextSpecificConstructed0 = CONTEXT_SPECIFIC | CONSTRUCTED,
    ContextSpecificConstructed3 = CONTEXT_SPECIFIC | CONSTRUCTED | 3,
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}

pub(crate) fn read_tag_and_get_value<'a>(
    input: &mut untrusted::Reader<'a>,
) -> Result<(u8, untrusted::Input<'a>), DecodeError> {
    let tag = input.read_byte()?;
    if (tag & 0x1F) == 0x1F {
        return Err(DecodeError::BadDer); // High tag number form is not allowed.
    }

    // If the high order bit of the first byte is set to zero then the length
    // is encoded in the seven remaining bits of that byte. Otherwise, those
    // seven bits represent the number of bytes used to encode the length.
    let length = match input.read_byte()? {
        n if (n & 0x80) == 0 => usize::from(n),
        0x81 => {
            let second_byte = input.read_byte()?;
            if second_byte < 128 {
                return Err(DecodeError::BadDer); // Not the canonical encoding.
            }
            usize::from(second_byte)
        }
        0x82 => {
            let second_byte = usize::from(input.read_byte()?);
            let third_byte = usize::from(input.read_byte()?);
            let combined = (second_byte << 8) | third_byte;
            if combined < 256 {
                return Err(DecodeError::BadDer); // Not the canonical encoding.
            }
            combined
        }
        _ => {
            return Err(DecodeError::BadDer); // We don't support longer lengths.
        }
    };

    let inner = input.read_bytes(length)?;
    Ok((tag, inner))
}

pub(crate) fn expect_tag_and_get_value<'a>(
    input: &mut untrusted::Reader<'a>,
    tag: Tag,
) -> Result<untrusted::Input<'a>, DecodeError> {
    let (actual_tag, inner) = read_tag_and_get_value(input)?;
    if u8::from(tag) != actual_tag {
        return Err(DecodeError::BadDer);
    }
    Ok(inner)
}

/// Like `expect_tag_and_get_value`, but returns the whole encoding, tag and
/// length included.
pub(crate) fn expect_tag_and_get_tlv<'a>(
    input: &mut untrusted::Reader<'a>,
    tag: Tag,
) -> Result<untrusted::Input<'a>, DecodeError> {
    let (tlv, _) = input.read_partial(|input| expect_tag_and_get_value(input, tag))?;
    Ok(tlv)
}

// TODO: investigate taking decoder as a reference to reduce generated code
// size.
pub(crate) fn nested<'a, F, R, E: Copy>(
    input: &mut untrusted::Reader<'a>,
    tag: Tag,
    error: E,
    decoder: F,
) -> Result<R, E>
where
    F: FnOnce(&mut untrusted::Reader<'a>) -> Result<R, E>,
{
    let inner = expect_tag_and_get_value(input, tag).map_err(|_| error)?;
    inner.read_all(error, decoder)
}

pub(crate) fn bit_string_with_no_unused_bits<'a>(
    input: &mut untrusted::Reader<'a>,
) -> Result<untrusted::Input<'a>, DecodeError> {
    nested(input, Tag::BitString, DecodeError::BadDer, |value| {
        let unused_bits_at_end = value.read_byte()?;
        if unused_bits_at_end != 0 {
            return Err(DecodeError::BadDer);
        }
        Ok(value.read_bytes_to_end())
    })
}

// Like mozilla::pkix, we accept the the non-conformant explicit encoding of
// the default value (false) for compatibility with real-world certificates.
pub(crate) fn optional_boolean(input: &mut untrusted::Reader) -> Result<bool, DecodeError> {
    if !input.peek(Tag::Boolean.into()) {
        return Ok(false);
    }
    nested(input, Tag::Boolean, DecodeError::BadDer, |input| {
        match input.read_byte() {
            Ok(0xff) => Ok(true),
            Ok(0x00) => Ok(false),
            _ => Err(DecodeError::BadDer),
        }
    })
}

/// Reads a positive INTEGER and returns its big-endian value with the DER
/// sign-padding byte, if any, removed. Zero and negative values are
/// rejected.
pub(crate) fn positive_integer<'a>(
    input: &mut untrusted::Reader<'a>,
) -> Result<untrusted::Input<'a>, DecodeError> {
    let value = expect_tag_and_get_value(input, Tag::Integer)?;
    value.read_all(DecodeError::BadDer, |value| {
        if value.peek(0) {
            value.skip(1)?;
            // The leading zero must be there only to clear the sign bit.
            if value.at_end() || !next_byte_has_high_bit_set(value) {
                return Err(DecodeError::BadDer);
            }
        } else if value.at_end() || next_byte_has_high_bit_set(value) {
            return Err(DecodeError::BadDer); // Empty or negative.
        }
        Ok(value.read_bytes_to_end())
    })
}

fn next_byte_has_high_bit_set(value: &untrusted::Reader) -> bool {
    (0x80..=0xff).any(|b| value.peek(b))
}

pub(crate) fn small_nonnegative_integer(input: &mut untrusted::Reader) -> Result<u8, DecodeError> {
    let value = expect_tag_and_get_value(input, Tag::Integer)?;
    value.read_all(DecodeError::BadDer, |value| {
        let first_byte = value.read_byte()?;
        if value.at_end() {
            if (first_byte & 0x80) != 0 {
                return Err(DecodeError::BadDer); // Negative.
            }
            return Ok(first_byte);
        }
        let second_byte = value.read_byte()?;
        if first_byte != 0 || (second_byte & 0x80) == 0 || !value.at_end() {
            return Err(DecodeError::BadDer);
        }
        Ok(second_byte)
    })
}

pub(crate) fn time_choice(input: &mut untrusted::Reader) -> Result<time::Time, DecodeError> {
    let is_utc_time = input.peek(Tag::UTCTime.into());
    let expected_tag = if is_utc_time {
        Tag::UTCTime
    } else {
        Tag::GeneralizedTime
    };

    fn read_digit(inner: &mut untrusted::Reader) -> Result<u64, DecodeError> {
        let b = inner.read_byte().map_err(|_| DecodeError::BadDerTime)?;
        if !(b'0'..=b'9').contains(&b) {
            return Err(DecodeError::BadDerTime);
        }
        Ok(u64::from(b - b'0'))
    }

    fn read_two_digits(inner: &mut untrusted::Reader, min: u64, max: u64) -> Result<u64, DecodeError> {
        let hi = read_digit(inner)?;
        let lo = read_digit(inner)?;
        let value = (hi * 10) + lo;
        if value < min || value > max {
            return Err(DecodeError::BadDerTime);
        }
        Ok(value)
    }

    nested(input, expected_tag, DecodeError::BadDer, |value| {
        let (year_hi, year_lo) = if is_utc_time {
            let lo = read_two_digits(value, 0, 99)?;
            let hi = if lo >= 50 { 19 } else { 20 };
            (hi, lo)
        } else {
            let hi = read_two_digits(value, 0, 99)?;
            let lo = read_two_digits(value, 0, 99)?;
            (hi, lo)
        };

        let year = (year_hi * 100) + year_lo;
        let month = read_two_digits(value, 1, 12)?;
        let days_in_month = time::days_in_month(year, month);
        let day_of_month = read_two_digits(value, 1, days_in_month)?;
        let hours = read_two_digits(value, 0, 23)?;
        let minutes = read_two_digits(value, 0, 59)?;
        let seconds = read_two_digits(value, 0, 59)?;

        let time_zone = value.read_byte().map_err(|_| DecodeError::BadDerTime)?;
        if time_zone != b'Z' {
            return Err(DecodeError::BadDerTime);
        }

        time::time_from_ymdhms_utc(year, month, day_of_month, hours, minutes, seconds)
    })
}

macro_rules! oid {
    ( $first:expr, $second:expr, $( $tail:expr ),* ) =>
    (
        [(40 * $first) + $second, $( $tail ),*]
    )
}

macro_rules! oid_1_2_840_10045 {
    ( $( $tail:expr ),* ) =>
    (
        oid![1, 2,
             0x86, 0x48, // 840
             0xce, 0x3d, // 10045
             $( $tail ),*]
    )
}

macro_rules! oid_1_2_840_113549 {
    ( $( $tail:expr ),* ) =>
    (
        oid![1, 2,
             0x86, 0x48, // 840
             0x86, 0xf7, 0x0d, // 113549
             $( $tail ),* ]
    )
}

macro_rules! oid_1_3_132 {
    ( $( $tail:expr ),* ) =>
    (
        oid![1, 3,
             0x81, 0x04, // 132
             $( $tail ),* ]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read<'a, R>(
        bytes: &'a [u8],
        f: impl FnOnce(&mut untrusted::Reader<'a>) -> Result<R, DecodeError>,
    ) -> Result<R, DecodeError> {
        untrusted::Input::from(bytes).read_all(DecodeError::BadDer, f)
    }

    #[test]
    fn test_long_form_lengths() {
        let mut long = [0u8; 4 + 300];
        long[..4].copy_from_slice(&[0x04, 0x82, 0x01, 0x2c]);
        let value = read(&long, |input| expect_tag_and_get_value(input, Tag::OctetString)).unwrap();
        assert_eq!(value.len(), 300);

        // Non-canonical long forms.
        assert_eq!(
            read(&[0x04, 0x81, 0x01, 0x00], |input| {
                expect_tag_and_get_value(input, Tag::OctetString)
            })
            .map(|_| ()),
            Err(DecodeError::BadDer)
        );
        assert_eq!(
            read(&[0x04, 0x82, 0x00, 0x01, 0x00], |input| {
                expect_tag_and_get_value(input, Tag::OctetString)
            })
            .map(|_| ()),
            Err(DecodeError::BadDer)
        );
    }

    #[test]
    fn test_truncated_value() {
        assert_eq!(
            read(&[0x30, 0x03, 0x01, 0x01], |input| {
                expect_tag_and_get_value(input, Tag::Sequence)
            })
            .map(|_| ()),
            Err(DecodeError::BadDer)
        );
    }

    #[test]
    fn test_tlv_keeps_header() {
        let der = [0x30, 0x03, 0x02, 0x01, 0x05];
        let tlv = read(&der, |input| expect_tag_and_get_tlv(input, Tag::Sequence)).unwrap();
        assert_eq!(tlv.as_slice_less_safe(), &der[..]);
    }

    #[test]
    fn test_positive_integer() {
        let stripped = read(&[0x02, 0x02, 0x00, 0xc5], positive_integer).unwrap();
        assert_eq!(stripped.as_slice_less_safe(), &[0xc5]);

        let plain = read(&[0x02, 0x03, 0x01, 0x00, 0x01], positive_integer).unwrap();
        assert_eq!(plain.as_slice_less_safe(), &[0x01, 0x00, 0x01]);

        // Zero, negative, and unnecessary padding.
        assert!(read(&[0x02, 0x01, 0x00], positive_integer).is_err());
        assert!(read(&[0x02, 0x01, 0x80], positive_integer).is_err());
        assert!(read(&[0x02, 0x02, 0x00, 0x01], positive_integer).is_err());
    }

    #[test]
    fn test_small_nonnegative_integer() {
        assert_eq!(read(&[0x02, 0x01, 0x02], small_nonnegative_integer), Ok(2));
        assert_eq!(read(&[0x02, 0x02, 0x00, 0xff], small_nonnegative_integer), Ok(255));
        assert!(read(&[0x02, 0x01, 0xff], small_nonnegative_integer).is_err());
        assert!(read(&[0x02, 0x02, 0x01, 0x00], small_nonnegative_integer).is_err());
    }

    #[test]
    fn test_optional_boolean() {
        assert_eq!(read(&[], optional_boolean), Ok(false));
        assert_eq!(read(&[0x01, 0x01, 0xff], optional_boolean), Ok(true));
        assert_eq!(read(&[0x01, 0x01, 0x00], optional_boolean), Ok(false));
        assert_eq!(read(&[0x01, 0x01, 0x01], optional_boolean), Err(DecodeError::BadDer));
    }

    #[test]
    fn test_time_choice() {
        let utc = b"\x17\x0d000101000000Z";
        assert_eq!(
            read(utc, time_choice),
            Ok(time::Time::from_seconds_since_unix_epoch(946_684_800))
        );

        let generalized = b"\x18\x0f20240229120000Z";
        assert_eq!(
            read(generalized, time_choice),
            Ok(time::Time::from_seconds_since_unix_epoch(1_709_208_000))
        );

        // UTCTime years 50..=99 are in the 20th century.
        let utc_1970 = b"\x17\x0d700101000000Z";
        assert_eq!(
            read(utc_1970, time_choice),
            Ok(time::Time::from_seconds_since_unix_epoch(0))
        );
    }

    #[test]
    fn test_time_choice_rejects_bad_times() {
        // Not a leap year.
        assert_eq!(read(b"\x18\x0f20230229120000Z", time_choice), Err(DecodeError::BadDerTime));
        // Local time.
        assert_eq!(read(b"\x17\x0d000101000000+", time_choice), Err(DecodeError::BadDerTime));
        // Before the Unix epoch.
        assert_eq!(read(b"\x18\x0f19691231235959Z", time_choice), Err(DecodeError::BadDerTime));
        // Non-digit.
        assert_eq!(read(b"\x17\x0d0001010000a0Z", time_choice), Err(DecodeError::BadDerTime));
    }
}
