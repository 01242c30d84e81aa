use regex::{Captures, Regex};

/// Forward substring search starting at byte offset `from`.
/// `from` is clamped to the text and moved up to the next char boundary.
pub fn find_from(text: &str, pat: &str, from: usize) -> Option<usize> {
    let mut start = from.min(text.len());
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].find(pat).map(|i| start + i)
}

/// Slice `text[start..end]`, yielding "" when the bounds are inverted.
pub fn slice(text: &str, start: usize, end: usize) -> &str {
    if end <= start {
        return "";
    }
    &text[start..end.min(text.len())]
}

/// Byte offset just past the first char at `at`, or None at end of text.
fn one_char_past(text: &str, at: usize) -> Option<usize> {
    text[at..].chars().next().map(|c| at + c.len_utf8())
}

/// Capture the non-empty text after `head`, up to the first `stop` match or end of text.
///
/// Shape of `head([\s\S]+?)(?=stop|$)` without look-around.
pub fn capture_until<'a>(text: &'a str, head: &Regex, stop: &Regex) -> Option<&'a str> {
    let h = head.find(text)?;
    let min_end = one_char_past(text, h.end())?;
    let end = stop.find_at(text, min_end).map_or(text.len(), |m| m.start());
    Some(&text[h.end()..end])
}

/// One header match plus the body that follows it.
pub struct Entry<'a> {
    pub caps: Captures<'a>,
    pub body: &'a str,
}

/// Walk `text` header by header. Each body runs from the end of its header to the
/// next `stop` match or end of text, and scanning resumes where the body ended.
pub fn entries<'a>(text: &'a str, header: &Regex, stop: &Regex) -> Vec<Entry<'a>> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let Some(caps) = header.captures_at(text, pos) else {
            break;
        };
        let body_start = caps.get(0).map_or(pos, |m| m.end());
        let Some(min_end) = one_char_past(text, body_start) else {
            break;
        };
        let body_end = stop.find_at(text, min_end).map_or(text.len(), |m| m.start());
        out.push(Entry {
            caps,
            body: &text[body_start..body_end],
        });
        pos = body_end;
    }
    out
}

/// First capture group of `re` in `text`, trimmed.
pub fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_from_respects_cursor() {
        let text = "PROBLEM 1.1 ... PROBLEM 1.1";
        assert_eq!(find_from(text, "PROBLEM", 0), Some(0));
        assert_eq!(find_from(text, "PROBLEM", 1), Some(16));
        assert_eq!(find_from(text, "PROBLEM", 500), None);
    }

    #[test]
    fn find_from_mid_char_offset() {
        // "é" is two bytes; offset 1 lands inside it
        let text = "é CHAPTER";
        assert_eq!(find_from(text, "CHAPTER", 1), Some(3));
    }

    #[test]
    fn slice_inverted_is_empty() {
        assert_eq!(slice("abcdef", 4, 2), "");
        assert_eq!(slice("abcdef", 1, 3), "bc");
        assert_eq!(slice("abcdef", 2, 99), "cdef");
    }

    #[test]
    fn capture_until_stop_or_end() {
        let head = Regex::new(r"Symptom:\n").unwrap();
        let stop = Regex::new(r"\n\nWhy").unwrap();
        assert_eq!(
            capture_until("Symptom:\nit broke\n\nWhy: reasons", &head, &stop),
            Some("it broke")
        );
        assert_eq!(capture_until("Symptom:\nto the end", &head, &stop), Some("to the end"));
        assert_eq!(capture_until("Symptom:\n", &head, &stop), None);
        assert_eq!(capture_until("nothing here", &head, &stop), None);
    }

    #[test]
    fn entries_split_on_headers() {
        let header = Regex::new(r"ITEM (\d+)\n").unwrap();
        let stop = Regex::new(r"ITEM").unwrap();
        let text = "preamble\nITEM 1\nalpha\nITEM 2\nbeta";
        let found = entries(text, &header, &stop);
        assert_eq!(found.len(), 2);
        assert_eq!(&found[0].caps[1], "1");
        assert_eq!(found[0].body, "alpha\n");
        assert_eq!(found[1].body, "beta");
    }

    #[test]
    fn entries_header_at_end_is_dropped() {
        let header = Regex::new(r"ITEM (\d+)\n").unwrap();
        let stop = Regex::new(r"ITEM").unwrap();
        assert!(entries("ITEM 1\n", &header, &stop).is_empty());
    }
}
