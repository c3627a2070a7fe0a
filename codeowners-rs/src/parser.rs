use std::{fs, path::Path};

use crate::ruleset::{self, Owner};

/// Parse a CODEOWNERS file from a string, returning a `ParseResult` containing
/// the parsed rules and any errors encountered.
pub fn parse(source: &str) -> ParseResult {
    let mut rules = Vec::new();
    let mut errors = Vec::new();
    let mut leading_comments = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        let mut parser = LineParser::new(line, idx + 1);
        parser.skip_whitespace();
        match parser.peek() {
            None => {}
            Some('#') => leading_comments.push(parser.rest().to_owned()),
            Some(_) => {
                if let Some(mut rule) = parser.parse_rule(&mut errors) {
                    rule.leading_comments = std::mem::take(&mut leading_comments);
                    rules.push(rule);
                } else {
                    leading_comments.clear();
                }
            }
        }
    }

    ParseResult { rules, errors }
}

/// Parse a CODEOWNERS file from a file path, reading the contents of the file
/// and returning a `ParseResult`.
pub fn parse_file(path: &Path) -> std::io::Result<ParseResult> {
    let source = fs::read_to_string(path)?;
    Ok(parse(&source))
}

/// The result of parsing a CODEOWNERS file. If `errors` is non-empty, `rules`
/// may be incomplete: lines that failed to parse are skipped, and owners that
/// failed to parse are dropped from their rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub rules: Vec<Rule>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Convert the `ParseResult` into a `RuleSet`. Any parse errors are
    /// ignored.
    pub fn into_ruleset(self) -> Result<ruleset::RuleSet, regex::Error> {
        ruleset::RuleSet::new(self.rules.into_iter().map(|r| r.into()).collect())
    }
}

/// A parsed CODEOWNERS rule, along with the line it was declared on and any
/// comments found before or after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub pattern: String,
    pub owners: Vec<Owner>,
    pub line: usize,
    pub leading_comments: Vec<String>,
    pub trailing_comment: Option<String>,
}

impl From<Rule> for ruleset::Rule {
    fn from(rule: Rule) -> Self {
        ruleset::Rule {
            pattern: rule.pattern,
            owners: rule.owners,
        }
    }
}

/// An error encountered while parsing a CODEOWNERS file, with the 1-based
/// line number it occurred on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, line: usize) -> ParseError {
        ParseError {
            message: message.into(),
            line,
        }
    }
}

struct LineParser<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> LineParser<'a> {
    fn new(source: &'a str, line: usize) -> Self {
        Self {
            source,
            pos: 0,
            line,
        }
    }

    fn parse_rule(&mut self, errors: &mut Vec<ParseError>) -> Option<Rule> {
        let pattern = self.parse_pattern(errors);
        if pattern.is_empty() {
            errors.push(ParseError::new("expected pattern", self.line));
            return None;
        }

        let mut owners = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some('#') => break,
                Some(_) => {}
            }
            let owner = self.parse_owner();
            match Owner::try_from(owner) {
                Ok(owner) => owners.push(owner),
                Err(err) => errors.push(ParseError::new(err.to_string(), self.line)),
            }
        }

        let trailing_comment = match self.peek() {
            Some('#') => Some(self.rest().to_owned()),
            _ => None,
        };

        Some(Rule {
            pattern,
            owners,
            line: self.line,
            leading_comments: Vec::new(),
            trailing_comment,
        })
    }

    fn parse_pattern(&mut self, errors: &mut Vec<ParseError>) -> String {
        let mut pattern = String::new();
        let mut escaped = false;
        while let Some(c) = self.peek() {
            match c {
                '\\' if !escaped => escaped = true,
                ' ' | '\t' | '#' if !escaped => break,
                _ => {
                    if c == '\0' {
                        errors.push(ParseError::new(
                            "patterns cannot contain null bytes",
                            self.line,
                        ));
                    }
                    pattern.push(c);
                    escaped = false;
                }
            }
            self.next();
        }
        pattern
    }

    fn parse_owner(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, ' ' | '\t' | '#') {
                break;
            }
            self.next();
        }
        self.source[start..self.pos].to_owned()
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t') = self.peek() {
            self.next();
        }
    }

    fn rest(&self) -> &'a str {
        self.source[self.pos..].trim_end()
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::ruleset::OwnerKind;
    use super::*;

    fn rule(pattern: &str, owners: Vec<Owner>, line: usize) -> Rule {
        Rule {
            pattern: pattern.to_owned(),
            owners,
            line,
            leading_comments: Vec::new(),
            trailing_comment: None,
        }
    }

    fn owner(value: &str, kind: OwnerKind) -> Owner {
        Owner::new(value.to_owned(), kind)
    }

    #[test]
    fn test_parser() {
        let examples = vec![
            ("foo", vec![rule("foo", vec![], 1)], vec![]),
            ("foo\\  ", vec![rule("foo ", vec![], 1)], vec![]),
            (" foo ", vec![rule("foo", vec![], 1)], vec![]),
            (
                "foo\nbar\r\n \nbaz",
                vec![
                    rule("foo", vec![], 1),
                    rule("bar", vec![], 2),
                    rule("baz", vec![], 4),
                ],
                vec![],
            ),
            (
                "f\0oo",
                vec![rule("f\0oo", vec![], 1)],
                vec![ParseError::new("patterns cannot contain null bytes", 1)],
            ),
            (
                "foo bar",
                vec![rule("foo", vec![], 1)],
                vec![ParseError::new("invalid owner: bar", 1)],
            ),
            (
                "foo#abc",
                vec![Rule {
                    trailing_comment: Some("#abc".to_owned()),
                    ..rule("foo", vec![], 1)
                }],
                vec![],
            ),
            (
                "foo @bar",
                vec![rule("foo", vec![owner("@bar", OwnerKind::User)], 1)],
                vec![],
            ),
            (
                "a/b @c/d e@f.co",
                vec![rule(
                    "a/b",
                    vec![
                        owner("@c/d", OwnerKind::Team),
                        owner("e@f.co", OwnerKind::Email),
                    ],
                    1,
                )],
                vec![],
            ),
            (
                "\n foo @bar# baz \n",
                vec![Rule {
                    trailing_comment: Some("# baz".to_owned()),
                    ..rule("foo", vec![owner("@bar", OwnerKind::User)], 2)
                }],
                vec![],
            ),
            (
                "# a\nfoo # b\n# c\n# d\n\nbar\n",
                vec![
                    Rule {
                        leading_comments: vec!["# a".to_owned()],
                        trailing_comment: Some("# b".to_owned()),
                        ..rule("foo", vec![], 2)
                    },
                    Rule {
                        leading_comments: vec!["# c".to_owned(), "# d".to_owned()],
                        ..rule("bar", vec![], 6)
                    },
                ],
                vec![],
            ),
            (
                "\\",
                vec![],
                vec![ParseError::new("expected pattern", 1)],
            ),
        ];

        for (source, rules, errors) in examples {
            assert_eq!(
                parse(source),
                ParseResult { rules, errors },
                "result mismatch for `{}`",
                source
            );
        }
    }

    #[test]
    fn test_into_ruleset() {
        let ruleset = parse("/src/ @team-a\n/src/vendor/\n")
            .into_ruleset()
            .unwrap();

        assert_eq!(ruleset.rules().len(), 2);
        assert!(ruleset.owners("src/main.rs").is_some());
        assert!(ruleset.owners("src/vendor/lib.rs").is_none());
    }
}
