use std::borrow::Cow;

use percent_encoding::percent_decode;

/// Decodes one side of a `key=value` pair, applying the following:
/// - Replaces `+` with a space
/// - Decodes percent-encoded bytes; malformed escapes (`%:`, a trailing `%`)
///   are kept literally
/// - Converts the result to UTF-8, replacing invalid sequences with U+FFFD
///
/// Decoding never fails. Input without `+` or `%` is returned borrowed.
pub fn decode(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    if !bytes.iter().any(|&b| b == b'+' || b == b'%') {
        return Cow::Borrowed(input);
    }

    // `+` must become a space before unescaping, so that `%2B` survives as `+`
    let spaced: Vec<u8> = bytes
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    let decoded: Cow<'_, [u8]> = percent_decode(&spaced).into();
    Cow::Owned(String::from_utf8_lossy(&decoded).into_owned())
}
