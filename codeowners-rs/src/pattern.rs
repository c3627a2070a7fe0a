use memchr::memchr2;

/// Translate a CODEOWNERS pattern into an anchored regular expression that
/// matches slash-separated paths relative to the repository root.
pub(crate) fn pattern_to_regex(pattern: &str) -> String {
    // A leading slash forces left-anchoring, so remember whether it was there.
    let (pattern, leading_slash) = match pattern.strip_prefix('/') {
        Some(pattern) => (pattern, true),
        None => (pattern, false),
    };

    // A trailing slash matches everything under the directory, but not the
    // directory itself.
    let (pattern, trailing_slash) = match pattern.strip_suffix('/') {
        Some(pattern) => (pattern, true),
        None => (pattern, false),
    };

    // CODEOWNERS files use Unix path separators.
    let segments = pattern.split('/').collect::<Vec<_>>();
    let last = segments.len() - 1;

    let mut regex = String::from(r"\A");

    // All patterns are left-anchored unless they're a single component with
    // no leading slash (but a trailing slash is permitted).
    if !leading_slash && segments.len() == 1 && segments[0] != "**" {
        regex.push_str("(?:.*/)?");
    }

    for (idx, segment) in segments.iter().enumerate() {
        match *segment {
            "**" if idx == last => regex.push_str(".+"),
            // Zero or more whole directories; swallows the separator too.
            "**" => {
                regex.push_str("(?:.*/)?");
                continue;
            }
            "*" => regex.push_str("[^/]+"),
            _ => push_segment(&mut regex, segment),
        }
        if idx != last {
            regex.push('/');
        }
    }

    if trailing_slash {
        regex.push_str("/.+");
    } else if !matches!(segments[last], "*" | "**") {
        // Everything else is prefix-matched, as if it ended in /**. Patterns
        // ending in a single wildcard only match direct children, which is a
        // discrepancy between the CODEOWNERS globbing rules and .gitignore.
        regex.push_str("(?:/.*)?");
    }

    regex.push_str(r"\z");
    regex
}

fn push_segment(regex: &mut String, segment: &str) {
    if memchr2(b'*', b'?', segment.as_bytes()).is_none() {
        regex.push_str(&regex::escape(segment));
        return;
    }

    for c in segment.chars() {
        match c {
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            _ => {
                if regex_syntax::is_meta_character(c) {
                    regex.push('\\');
                }
                regex.push(c);
            }
        }
    }
}
