/// Returns `true` if every byte is an ASCII digit or a lowercase hex letter (`a`..=`f`).
///
/// An empty slice yields `true`; callers check the length separately.
pub(super) fn is_lowercase_hex(src: &[u8]) -> bool {
    src.iter().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
