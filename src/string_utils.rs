use memchr::{memchr, memchr2};

/// Find the end of a quoted literal starting at position `i` (which must
/// point to the opening delimiter). A doubled closing delimiter is an
/// escaped delimiter; with `backslash_escapes` a backslash escapes the next
/// byte as well.
/// Returns the position after the closing delimiter, or `None` when the
/// literal is unterminated.
pub(crate) fn scan_quoted(bytes: &[u8], i: usize, close: u8, backslash_escapes: bool) -> Option<usize> {
    let mut j = i + 1;
    while j < bytes.len() {
        let offset = if backslash_escapes {
            memchr2(close, b'\\', &bytes[j..])?
        } else {
            memchr(close, &bytes[j..])?
        };
        let end = j + offset;
        if bytes[end] == b'\\' {
            j = end + 2;
            continue;
        }
        if bytes.get(end + 1) == Some(&close) {
            j = end + 2;
            continue;
        }
        return Some(end + 1);
    }
    None
}

/// Find the end of a dollar-quoted body `$tag$ ... $tag$` whose opening tag
/// spans `i..body_start`. Returns the position after the closing tag.
pub(crate) fn scan_dollar_quoted(source: &str, i: usize, body_start: usize) -> Option<usize> {
    let tag = &source[i..body_start];
    source[body_start..]
        .find(tag)
        .map(|offset| body_start + offset + tag.len())
}

/// Find the end of a `/* ... */` comment starting at `i`. When `nested` is
/// set, inner `/*` markers must be balanced.
pub(crate) fn scan_block_comment(bytes: &[u8], i: usize, nested: bool) -> Option<usize> {
    let mut depth = 1usize;
    let mut j = i + 2;
    while j < bytes.len() {
        let offset = memchr2(b'*', b'/', &bytes[j..])?;
        let pos = j + offset;
        if bytes[pos] == b'*' && bytes.get(pos + 1) == Some(&b'/') {
            depth -= 1;
            if depth == 0 {
                return Some(pos + 2);
            }
            j = pos + 2;
        } else if nested && bytes[pos] == b'/' && bytes.get(pos + 1) == Some(&b'*') {
            depth += 1;
            j = pos + 2;
        } else {
            j = pos + 1;
        }
    }
    None
}

/// Position of the next newline at or after `i`, or the end of input.
pub(crate) fn line_end(bytes: &[u8], i: usize) -> usize {
    memchr(b'\n', &bytes[i..]).map_or(bytes.len(), |offset| i + offset)
}
