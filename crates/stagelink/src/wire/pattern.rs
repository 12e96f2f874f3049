// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Template matcher for fixed-length ASCII command tokens.
//!
//! Every Panasonic AW message class is described by a *signature*: a byte
//! template in which printable bytes match themselves and five control
//! symbols stand for character classes:
//!
//! | Byte   | Accepts |
//! |--------|---------|
//! | `\x00` | alphanumeric or `:` |
//! | `\x01` | uppercase hex digit |
//! | `\x02` | decimal digit |
//! | `\x03` | `e` or `E` |
//! | `\x04` | any printable ASCII |
//! | `\x7F` | any suffix from here on (final position only) |
//!
//! Without `\x7F` the candidate must be exactly template-length; with it the
//! candidate may be one byte shorter than the template or longer by any
//! amount. The same tables classify messages on dispatch and validate them
//! before field decoding, so decoders downstream never see a byte outside
//! their field alphabet.
//!
//! [`generate`] is the inverse direction: a deterministic candidate for a
//! template and seed, used by the registry property tests.

use super::charset::{self, CharSet};

/// Template symbol: alphanumeric or colon.
pub const SYM_TOKEN: u8 = 0x00;
/// Template symbol: uppercase hex digit.
pub const SYM_HEX: u8 = 0x01;
/// Template symbol: decimal digit.
pub const SYM_DEC: u8 = 0x02;
/// Template symbol: the letter `e` or `E`.
pub const SYM_EXP: u8 = 0x03;
/// Template symbol: any printable ASCII byte.
pub const SYM_ANY: u8 = 0x04;
/// Template symbol: accept any suffix of length >= 0 from this position.
pub const SYM_SUFFIX: u8 = 0x7F;

fn class_set(sym: u8) -> Option<&'static CharSet> {
    match sym {
        SYM_TOKEN => Some(&charset::TOKEN_ALPHABET),
        SYM_HEX => Some(&charset::HEX_UPPER),
        SYM_DEC => Some(&charset::DECIMAL),
        SYM_EXP => Some(&charset::E_MARK),
        SYM_ANY => Some(&charset::PRINTABLE),
        _ => None,
    }
}

/// Match `candidate` against `template`.
///
/// Linear scan, no backtracking. Returns true the moment [`SYM_SUFFIX`] is
/// reached with every prior byte matched; otherwise every template position
/// must accept the corresponding candidate byte and the lengths must be
/// equal. A template byte that is neither printable nor a known symbol
/// aborts with false.
#[must_use]
pub fn matches(template: &[u8], candidate: &[u8]) -> bool {
    for (i, &t) in template.iter().enumerate() {
        if t == SYM_SUFFIX {
            return true;
        }
        let c = match candidate.get(i) {
            Some(&c) => c,
            None => return false,
        };
        let ok = match class_set(t) {
            Some(set) => set.contains(c),
            None => charset::PRINTABLE.contains(t) && t == c,
        };
        if !ok {
            return false;
        }
    }
    candidate.len() == template.len()
}

/// Convenience wrapper for string-typed callers.
#[must_use]
pub fn matches_str(template: &[u8], candidate: &str) -> bool {
    matches(template, candidate.as_bytes())
}

/// Fixed filler appended for [`SYM_SUFFIX`] positions by [`generate`].
///
/// Two token-alphabet bytes: long enough to exercise the open tail, short
/// enough that a generated error flag still fits its three-character field.
const SUFFIX_FILL: &[u8] = b"Z0";

/// Produce a concrete candidate for `template`, deterministically for a
/// given `seed`.
///
/// Printable template bytes are copied through. Class symbols pick the first
/// member of their set for seed 0, the last member for seed -1, and an
/// RNG-selected member otherwise. [`SYM_SUFFIX`] appends [`SUFFIX_FILL`].
///
/// For every well-formed template and seed, `matches(template,
/// generate(template, seed))` holds; the registry tests lean on this.
#[must_use]
pub fn generate(template: &[u8], seed: i64) -> String {
    #[allow(clippy::cast_sign_loss)] // the seed is an identity, not a quantity
    let mut rng = fastrand::Rng::with_seed(seed as u64);
    let mut out = Vec::with_capacity(template.len() + SUFFIX_FILL.len());
    for &t in template {
        if t == SYM_SUFFIX {
            out.extend_from_slice(SUFFIX_FILL);
            break;
        }
        match class_set(t) {
            Some(set) => {
                let b = match seed {
                    0 => set.first(),
                    -1 => set.last(),
                    _ => set.nth_wrapped(rng.u32(..)),
                };
                // The predefined sets are all non-empty.
                out.push(b.unwrap_or(b'0'));
            }
            None => out.push(t),
        }
    }
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_template() {
        assert!(matches(b"", b""));
        assert!(!matches(b"", b"x"));
    }

    #[test]
    fn test_length_must_agree() {
        assert!(!matches(b"ab", b"abc"));
        assert!(!matches(b"abc", b"ab"));
        assert!(matches(b"abc", b"abc"));
    }

    #[test]
    fn test_literal_case_sensitive() {
        assert!(!matches(b"abc", b"aBc"));
        assert!(matches(b"aBc", b"aBc"));
    }

    #[test]
    fn test_token_class() {
        assert!(matches(b"\x00\x00\x00", b"aB0"));
        assert!(matches(b"\x00\x00\x00", b"a:0"));
        assert!(!matches(b"a\x00c", b"a-d"));
    }

    #[test]
    fn test_hex_and_dec_classes() {
        assert!(matches(b"#AXZ\x01\x01\x01", b"#AXZ5F0"));
        assert!(!matches(b"#AXZ\x01\x01\x01", b"#AXZ5f0"));
        assert!(matches(b"p\x02", b"p1"));
        assert!(!matches(b"p\x02", b"pA"));
    }

    #[test]
    fn test_exp_class() {
        assert!(matches(b"x\x03", b"xe"));
        assert!(matches(b"x\x03", b"xE"));
        assert!(!matches(b"x\x03", b"xf"));
    }

    #[test]
    fn test_suffix_symbol() {
        assert!(matches(b"A\x00C\x01E\x7F", b"ABCDEFGHIJKL"));
        // Candidate may stop one byte short of the template.
        assert!(matches(b"ab\x7F", b"ab"));
        assert!(matches(b"ab\x7F", b"abZZZZ"));
        assert!(!matches(b"ab\x7F", b"a"));
        assert!(!matches(b"ab\x7F", b"aX"));
    }

    #[test]
    fn test_invalid_control_bytes_abort() {
        assert!(!matches(b"\x05", b"a"));
        assert!(!matches(b"a\x1Fb", b"axb"));
        assert!(!matches(b"\x80", b"\x80"));
    }

    #[test]
    fn test_generate_seed_extremes() {
        assert_eq!(generate(b"p\x02", 0), "p0");
        assert_eq!(generate(b"p\x02", -1), "p9");
        assert_eq!(generate(b"#AXZ\x01\x01\x01", 0), "#AXZ000");
        assert_eq!(generate(b"#AXZ\x01\x01\x01", -1), "#AXZFFF");
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = generate(b"#APC\x01\x01\x01\x01\x01\x01\x01\x01", 42);
        let b = generate(b"#APC\x01\x01\x01\x01\x01\x01\x01\x01", 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_always_matches() {
        let templates: &[&[u8]] = &[
            b"",
            b"#O\x02",
            b"p\x02",
            b"eR\x02:\x04\x7F",
            b"qSV\x04\x7F",
            b"\x00\x01\x02\x03\x04",
        ];
        for template in templates {
            for seed in [-1, 0, 1, 7, 1000, i64::MAX] {
                let candidate = generate(template, seed);
                assert!(
                    matches(template, candidate.as_bytes()),
                    "template {template:?} seed {seed} candidate {candidate:?}"
                );
            }
        }
    }
}
