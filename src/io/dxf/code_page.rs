//! `$DWGCODEPAGE` to encoding mapping
//!
//! Files older than AC1021 store text in the single- or double-byte code
//! page named by `$DWGCODEPAGE`. Names follow the AutoCAD spelling
//! (`ANSI_1252`, `DOS850`, `ISO8859-2`, `GB2312`, ...).

use encoding_rs::Encoding;

/// Look up the `encoding_rs` encoding for a DXF code page name
///
/// Matching ignores case. Returns `None` for names that are not recognized,
/// letting the caller pick its fallback.
pub fn encoding_from_code_page(code_page: &str) -> Option<&'static Encoding> {
    let name = code_page.trim().to_ascii_lowercase();

    if let Some(number) = name.strip_prefix("ansi_") {
        return match number {
            "932" => Some(encoding_rs::SHIFT_JIS),
            "936" => Some(encoding_rs::GBK),
            "949" => Some(encoding_rs::EUC_KR),
            "950" => Some(encoding_rs::BIG5),
            _ => Encoding::for_label(format!("windows-{number}").as_bytes()),
        };
    }

    if let Some(part) = name
        .strip_prefix("iso8859-")
        .or_else(|| name.strip_prefix("iso_8859-"))
    {
        return Encoding::for_label(format!("iso-8859-{part}").as_bytes());
    }

    if let Some(number) = name.strip_prefix("dos") {
        // OEM pages mapped to the closest encoding available
        return match number {
            "852" => Some(encoding_rs::WINDOWS_1250),
            "855" | "866" => Some(encoding_rs::IBM866),
            "857" => Some(encoding_rs::WINDOWS_1254),
            "869" => Some(encoding_rs::WINDOWS_1253),
            "437" | "850" | "860" | "861" | "863" | "865" => Some(encoding_rs::WINDOWS_1252),
            _ => None,
        };
    }

    match name.as_str() {
        "gb2312" => Some(encoding_rs::GBK),
        "big5" => Some(encoding_rs::BIG5),
        "korean" | "johab" => Some(encoding_rs::EUC_KR),
        "koi8-r" => Some(encoding_rs::KOI8_R),
        "koi8-u" => Some(encoding_rs::KOI8_U),
        "ascii" | "utf-8" | "utf8" | "unicode" => Some(encoding_rs::UTF_8),
        _ => None,
    }
}

/// Decode bytes in a legacy encoding
///
/// Returns the text and whether any byte sequence was malformed and replaced.
pub fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> (String, bool) {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    (text.into_owned(), had_errors)
}
