//! HTML character reference decoding for exchange names.
//!
//! PeeringDB escapes names like `AMS-IX` fine but anything with `&`, quotes
//! or non-ASCII comes through as `&amp;`, `&#39;`, `&eacute;` and so on.
//! Decoding follows the HTML5 rules browsers apply to text content:
//!
//! - named references resolve against the HTML5 table from `quick-xml`;
//!   the legacy Latin-1 names (`&amp`, `&eacute`, `&copy`, ...) also
//!   resolve without the trailing `;`, including as a prefix of a longer
//!   run (`&notit;` is `¬it;`),
//! - numeric references accept `&#N`, `&#xN` and `&#XN`, with or without
//!   `;`. `0x80..=0x9F` are remapped through Windows-1252, NUL, surrogates
//!   and values past U+10FFFF become U+FFFD, other non-characters and C0/C1
//!   controls are dropped,
//! - anything else, bare ampersands included, is kept as it is.

use quick_xml::escape::resolve_html5_entity;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// HTML5 names that resolve without a terminating `;`.
const LEGACY_NAMES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren",
    "deg", "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34",
    "gt", "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr",
    "micro", "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm",
    "oslash", "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy",
    "sup1", "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Windows-1252 meaning of numeric references `&#x80;` to `&#x9F;`.
/// Unassigned slots keep their C1 code point.
const WINDOWS_1252: [char; 32] = [
    '\u{20AC}', '\u{81}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{8D}', '\u{017D}', '\u{8F}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{9D}', '\u{017E}', '\u{0178}',
];

fn reference_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[^\t\n\f <&#;]{1,32};?)")
            .expect("character reference regex is valid")
    })
}

/// Decode every character reference in `text` exactly once.
///
/// The output of one replacement is never rescanned, so `&amp;lt;` becomes
/// `&lt;`, not `<`.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    reference_regex().replace_all(text, |caps: &regex::Captures<'_>| {
        let body = &caps[1];
        match body.strip_prefix('#') {
            Some(number) => decode_numeric(number),
            None => decode_named(body),
        }
    })
}

/// `number` is the reference after `&#`: decimal digits or `x`/`X` + hex,
/// optionally followed by `;`.
fn decode_numeric(number: &str) -> String {
    let number = number.strip_suffix(';').unwrap_or(number);
    let parsed = match number.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => number.parse::<u32>(),
    };
    // Only overflow can fail here; treat it like any other out-of-range value.
    let code = parsed.unwrap_or(u32::MAX);

    match code {
        0x00 => '\u{FFFD}'.to_string(),
        0x0D => '\r'.to_string(),
        0x80..=0x9F => WINDOWS_1252[(code - 0x80) as usize].to_string(),
        0xD800..=0xDFFF | 0x110000.. => '\u{FFFD}'.to_string(),
        c if is_dropped_code_point(c) => String::new(),
        c => char::from_u32(c).map(String::from).unwrap_or_default(),
    }
}

fn is_dropped_code_point(code: u32) -> bool {
    matches!(code, 0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F..=0x9F | 0xFDD0..=0xFDEF)
        || (code & 0xFFFE) == 0xFFFE
}

/// `body` is the reference after `&`: a run of name characters, optionally
/// followed by `;`.
fn decode_named(body: &str) -> String {
    match body.strip_suffix(';') {
        Some(name) => {
            if let Some(value) = resolve_html5_entity(name) {
                return value.to_string();
            }
        }
        None => {
            if let Some(value) = resolve_legacy(body) {
                return value.to_string();
            }
        }
    }

    // Longest legacy name that is a strict prefix of the run.
    for (end, _) in body.char_indices().rev().filter(|&(end, _)| end > 0) {
        if let Some(value) = resolve_legacy(&body[..end]) {
            return format!("{value}{}", &body[end..]);
        }
    }

    format!("&{body}")
}

fn resolve_legacy(name: &str) -> Option<&'static str> {
    if LEGACY_NAMES.contains(&name) {
        resolve_html5_entity(name)
    } else {
        None
    }
}
