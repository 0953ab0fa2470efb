//! Plain-text helpers shared by the front ends and the formatter

/// Replace tabs with spaces up to the next multiple of `tab_size`
///
/// Columns restart at 0 after every newline, so the result never mixes tabs
/// and spaces.
pub fn expand_tabs(s: &str, tab_size: usize) -> String {
    let tab_size = tab_size.max(1);
    let mut buf = String::with_capacity(s.len());
    let mut col = 0usize;
    for c in s.chars() {
        match c {
            '\n' => {
                col = 0;
                buf.push(c);
            }
            '\t' => {
                let n = tab_size - col % tab_size;
                col += n;
                buf.extend(std::iter::repeat(' ').take(n));
            }
            _ => {
                col += 1;
                buf.push(c);
            }
        }
    }
    buf
}

#[inline]
pub fn spaces(n: usize) -> String {
    " ".repeat(n)
}

/// Occurrences of `x` in `s`
#[inline]
pub fn count(s: &str, x: char) -> usize {
    s.chars().filter(|&c| c == x).count()
}
