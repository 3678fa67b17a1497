// SPDX-License-Identifier: MIT

/// Decodes the octal escapes (`\040`, `\011`, ...) used by `/etc/fstab` and
/// `/proc/mounts` for whitespace inside a field.
pub(crate) fn unescape_octal(field: &str) -> String {
    if !field.contains('\\') {
        return field.to_string();
    }

    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && is_octal_triplet(&bytes[i + 1..]) {
            let value = (bytes[i + 1] - b'0') * 64 + (bytes[i + 2] - b'0') * 8 + (bytes[i + 3] - b'0');
            out.push(value);
            i += 4;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn is_octal_triplet(rest: &[u8]) -> bool {
    rest.len() >= 3
        && matches!(rest[0], b'0'..=b'3')
        && rest[1..3].iter().all(|b| matches!(b, b'0'..=b'7'))
}
