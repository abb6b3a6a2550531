//! Markup stripping for free-text notes.

/// Elements whose whole content is dropped, not just their tags.
const DROP_CONTENT: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "textarea",
];

/// How the text following a `<` should be handled.
enum TagScan<'a> {
    /// Plain text `<`.
    NotATag,
    /// Tag without a closing `>`.
    Unterminated,
    /// Tag whose remainder after the `<` is `len` bytes, with the element
    /// name for opening tags.
    Tag { len: usize, opening: Option<&'a str> },
}

/// Strip markup and executable content from user notes.
///
/// Tags are removed and their text kept, except for elements such as
/// `script` and `style` whose content is dropped entirely. A `<` kept as
/// text is never followed by anything that starts a tag, so the result is
/// stable under a second pass. Runs in a single pass over the input.
pub fn sanitize_notes(raw: &str) -> String {
    let text: String = raw
        .chars()
        .filter(|&c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect();

    strip_markup(&text).trim().to_string()
}

fn strip_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while !rest.is_empty() {
        // A `<` kept as text joins the following input once a tag between
        // them is gone.
        let joined = if out.ends_with('<') {
            match scan_tag(rest) {
                TagScan::NotATag => None,
                scan => {
                    out.pop();
                    Some((scan, rest))
                }
            }
        } else {
            None
        };

        let (scan, after) = match joined {
            Some(found) => found,
            None => {
                let Some(pos) = rest.find('<') else {
                    out.push_str(rest);
                    break;
                };
                out.push_str(&rest[..pos]);
                let after = &rest[pos + 1..];
                (scan_tag(after), after)
            }
        };

        match scan {
            TagScan::NotATag => {
                out.push('<');
                rest = after;
            }
            TagScan::Unterminated => break,
            TagScan::Tag { len, opening } => {
                rest = &after[len..];
                if let Some(name) = opening
                    && DROP_CONTENT.iter().any(|d| d.eq_ignore_ascii_case(name))
                {
                    rest = skip_element_body(rest, name);
                }
            }
        }
    }

    out
}

/// Classify the text that follows a `<`.
fn scan_tag(after: &str) -> TagScan<'_> {
    if let Some(comment) = after.strip_prefix("!--") {
        return match comment.find("-->") {
            Some(end) => TagScan::Tag {
                len: 3 + end + 3,
                opening: None,
            },
            None => TagScan::Unterminated,
        };
    }

    let opening = match after.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => {
            let name_len = after
                .find(|c: char| !c.is_ascii_alphanumeric())
                .unwrap_or(after.len());
            Some(&after[..name_len])
        }
        Some('/' | '!' | '?') => None,
        _ => return TagScan::NotATag,
    };

    match find_tag_close(after) {
        Some(end) => TagScan::Tag {
            len: end + 1,
            opening,
        },
        None => TagScan::Unterminated,
    }
}

/// Byte offset of the `>` closing a tag, ignoring `>` inside quoted values.
fn find_tag_close(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;

    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(i),
            (None, _) => {}
        }
    }

    None
}

/// Skip past `</name ...>`, or drop everything if the element never closes.
fn skip_element_body<'a>(rest: &'a str, name: &str) -> &'a str {
    let bytes = rest.as_bytes();

    for (start, _) in rest.match_indices("</") {
        let name_start = start + 2;
        let name_end = name_start + name.len();

        let Some(candidate) = bytes.get(name_start..name_end) else {
            break;
        };
        if !candidate.eq_ignore_ascii_case(name.as_bytes())
            || bytes.get(name_end).is_some_and(|b| b.is_ascii_alphanumeric())
        {
            continue;
        }

        // The name is ASCII, so `name_end` is a char boundary.
        return match rest[name_end..].find('>') {
            Some(end) => &rest[name_end + end + 1..],
            None => "",
        };
    }

    ""
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_script_and_keeps_text() {
        assert_eq!(sanitize_notes("<script>x</script>great"), "great");
        assert_eq!(
            sanitize_notes("<p>Loved <b>every</b> page</p>"),
            "Loved every page"
        );
    }

    #[test]
    fn drop_content_is_case_insensitive() {
        assert_eq!(
            sanitize_notes("<SCRIPT type=\"text/javascript\">alert(1)</Script >ok"),
            "ok"
        );
        assert_eq!(sanitize_notes("a<style>p{}</style>b"), "ab");
        assert_eq!(sanitize_notes("a<iframe src=x></iframe>b"), "ab");
    }

    #[test]
    fn similar_element_names_are_not_confused() {
        // `<scripts>` is an unknown tag, not a script element.
        assert_eq!(sanitize_notes("<scripts>kept</scripts>"), "kept");
        assert_eq!(sanitize_notes("<script>a</scripts>b</script>c"), "c");
    }

    #[test]
    fn unclosed_script_drops_rest() {
        assert_eq!(sanitize_notes("safe <script>alert(1)"), "safe");
    }

    #[test]
    fn unterminated_tag_drops_rest() {
        assert_eq!(sanitize_notes("hello <img src=x onerror=alert(1)"), "hello");
    }

    #[test]
    fn comments_and_declarations_removed() {
        assert_eq!(sanitize_notes("a<!-- hidden -->b"), "ab");
        assert_eq!(sanitize_notes("<!DOCTYPE html>text"), "text");
        assert_eq!(sanitize_notes("<?xml version=\"1.0\"?>text"), "text");
    }

    #[test]
    fn quoted_gt_stays_inside_tag() {
        assert_eq!(sanitize_notes("<a title=\"1 > 0\">link</a>"), "link");
    }

    #[test]
    fn plain_less_than_is_text() {
        assert_eq!(sanitize_notes("3 < 5 and 5 > 3"), "3 < 5 and 5 > 3");
        assert_eq!(sanitize_notes("ends with <"), "ends with <");
    }

    #[test]
    fn reassembled_tags_are_removed() {
        assert_eq!(sanitize_notes("<<b>b>"), "");
        assert_eq!(
            sanitize_notes("<scr<script>x</script>ipt>alert(1)</script>"),
            "xipt>alert(1)"
        );
    }

    #[test]
    fn deeply_nested_tags_are_removed_in_one_pass() {
        let k = 100_000;
        let nested = "<".repeat(k) + &"b>".repeat(k);
        let scripts = "<script></script>".repeat(20_000) + "end";

        let started = std::time::Instant::now();
        assert_eq!(sanitize_notes(&nested), "");
        assert_eq!(sanitize_notes(&scripts), "end");
        assert!(
            started.elapsed() < std::time::Duration::from_secs(5),
            "took {:?}",
            started.elapsed()
        );
    }

    #[test]
    fn joined_less_than_starts_comment_or_script() {
        assert_eq!(sanitize_notes("a<<!-- x -->!-- y -->b"), "ab");
        assert_eq!(sanitize_notes("<<b>script>alert(1)</script>after"), "after");
        assert_eq!(sanitize_notes("keep <<b>b"), "keep");
    }

    #[test]
    fn control_characters_removed() {
        assert_eq!(sanitize_notes("line\u{0}one\nline two"), "lineone\nline two");
    }

    #[test]
    fn empty_and_whitespace() {
        assert_eq!(sanitize_notes(""), "");
        assert_eq!(sanitize_notes("   "), "");
        assert_eq!(sanitize_notes("  <br>  "), "");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "",
            "plain text",
            "<script>x</script>great",
            "<<b>b>",
            "<<<i>i>i>",
            "a < b <c",
            "<scr<script>x</script>ipt>alert(1)</script>",
            "<a href='x>'>y</a> <!-- c",
            "  <p> spaced </p>  ",
            "<<!-- -->!-- x -->",
            "tab\tand\u{7}bell",
            "<\u{0}b>x",
            "<<<script>x</script>script>y</script>z",
        ];

        for s in samples {
            let once = sanitize_notes(s);
            assert_eq!(sanitize_notes(&once), once, "input {:?}", s);
            assert!(!once.to_ascii_lowercase().contains("<script"), "input {:?}", s);
        }
    }
}
