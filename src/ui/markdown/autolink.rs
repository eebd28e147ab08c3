//! Detection of bare URLs in plain text (`https://...`, `www....`).

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Segment<'a> {
    Text(&'a str),
    Url { text: &'a str, href: String },
}

const PREFIXES: [&str; 3] = ["https://", "http://", "www."];
const TRAILING_PUNCTUATION: &[char] = &['?', '!', '.', ',', ':', ';', '*', '_', '~', '\'', '"'];

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

fn is_boundary(previous: Option<char>) -> bool {
    match previous {
        None => true,
        Some(ch) => ch.is_whitespace() || matches!(ch, '(' | '*' | '_' | '~' | '"' | '\''),
    }
}

/// Strip trailing punctuation and unbalanced closing parentheses.
fn trim_url(candidate: &str) -> &str {
    let mut url = candidate;
    loop {
        let before = url.len();
        url = url.trim_end_matches(TRAILING_PUNCTUATION);
        if url.ends_with(')') && url.matches('(').count() < url.matches(')').count() {
            url = &url[..url.len() - 1];
        }
        if url.len() == before {
            return url;
        }
    }
}

fn match_url_at(text: &str) -> Option<(&str, String)> {
    let prefix = PREFIXES
        .iter()
        .find(|prefix| starts_with_ignore_case(text, prefix))?;
    let end = text
        .find(|ch: char| ch.is_whitespace() || ch == '<')
        .unwrap_or(text.len());
    let url = trim_url(&text[..end]);

    let rest = &url[prefix.len().min(url.len())..];
    if rest.is_empty() {
        return None;
    }

    let href = if *prefix == "www." {
        format!("http://{url}")
    } else {
        url.to_string()
    };
    Some((url, href))
}

/// Split `text` into plain runs and URL runs.
pub(super) fn split_autolinks(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut plain_start = 0usize;
    let mut cursor = 0usize;
    let mut previous: Option<char> = None;

    while cursor < text.len() {
        if is_boundary(previous) {
            if let Some((url, href)) = match_url_at(&text[cursor..]) {
                if plain_start < cursor {
                    segments.push(Segment::Text(&text[plain_start..cursor]));
                }
                segments.push(Segment::Url { text: url, href });
                cursor += url.len();
                plain_start = cursor;
                previous = url.chars().last();
                continue;
            }
        }

        let Some(ch) = text[cursor..].chars().next() else {
            break;
        };
        previous = Some(ch);
        cursor += ch.len_utf8();
    }

    if plain_start < text.len() {
        segments.push(Segment::Text(&text[plain_start..]));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_single_segment() {
        assert_eq!(
            split_autolinks("no links here"),
            vec![Segment::Text("no links here")]
        );
    }

    #[test]
    fn finds_urls_and_strips_trailing_punctuation() {
        let segments = split_autolinks("See https://example.com/docs. Then stop.");
        assert_eq!(
            segments,
            vec![
                Segment::Text("See "),
                Segment::Url {
                    text: "https://example.com/docs",
                    href: "https://example.com/docs".into()
                },
                Segment::Text(". Then stop."),
            ]
        );
    }

    #[test]
    fn www_links_get_http_scheme() {
        let segments = split_autolinks("(www.rust-lang.org)");
        assert_eq!(
            segments[1],
            Segment::Url {
                text: "www.rust-lang.org",
                href: "http://www.rust-lang.org".into()
            }
        );
        assert_eq!(segments[2], Segment::Text(")"));
    }

    #[test]
    fn balanced_parentheses_are_kept() {
        let segments = split_autolinks("https://en.wikipedia.org/wiki/Rust_(language)");
        assert_eq!(
            segments,
            vec![Segment::Url {
                text: "https://en.wikipedia.org/wiki/Rust_(language)",
                href: "https://en.wikipedia.org/wiki/Rust_(language)".into()
            }]
        );
    }

    #[test]
    fn scheme_inside_a_word_is_not_a_link() {
        assert_eq!(
            split_autolinks("xhttps://example.com"),
            vec![Segment::Text("xhttps://example.com")]
        );
        assert_eq!(split_autolinks("https://"), vec![Segment::Text("https://")]);
    }
}
