//! Character-set normalization of stored entry paths to the host's native
//! string form. On every platform this crate targets, "native" is UTF-8, so
//! these functions all collapse to "produce a `String`" — but each keeps its
//! own conversion table/algorithm so a caller can see exactly which
//! on-disk encoding it came from.
//!
//! UTF-16LE (7z's filename encoding) has no adapter here: `sevenz-rust2`
//! decodes entry names to `String` itself, so there's no raw code-unit
//! sequence left for this module to convert by the time an entry reaches
//! `container::sevenzip`.

/// Code page 437 (the original IBM PC OEM charset) to UTF-8. Bytes 0x00-0x7f
/// are ASCII; 0x80-0xff map through this table. Index `byte - 0x80`.
const CP437_HIGH: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å', 'É', 'æ', 'Æ',
    'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ', 'á', 'í', 'ó', 'ú', 'ñ', 'Ñ',
    'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»', '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕',
    '╣', '║', '╗', '╝', '╜', '╛', '┐', '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦',
    '╠', '═', '╬', '╧', '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐',
    '▀', 'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩', '≡', '±',
    '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{00a0}',
];

/// Decode a byte string stored as CP437 into a native (UTF-8) string.
pub(crate) fn from_cp437(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b < 0x80 {
                b as char
            } else {
                CP437_HIGH[(b - 0x80) as usize]
            }
        })
        .collect()
}

/// Decode a byte string stored as UTF-8 into a native (UTF-8) string,
/// replacing any ill-formed sequences rather than failing outright —
/// archives with mislabeled encodings are common in the wild, and a lossy
/// path beats refusing to list the entry at all.
pub(crate) fn from_utf8(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
