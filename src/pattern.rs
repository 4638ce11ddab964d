use regex_lite::Regex;

/// Compile-time accessor the rewriter looks for.
pub const ACCESS_PREFIX: &str = "import.meta.env.";

/// One eligible `import.meta.env.NAME` occurrence, as byte offsets into the scanned text.
///
/// `start` points at the `i` of `import`; the boundary character before it is not part
/// of the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan<'t> {
    pub start: usize,
    pub end: usize,
    pub name: &'t str,
}

/// Matches read access to a fixed set of declared variables.
///
/// The regex itself carries the boundaries:
/// `(^|[^\w$])import\.meta\.env\.(A|B|...)\b`. The "not an assignment target" check
/// runs on the text after each candidate since regex-lite has no lookaround.
#[derive(Debug, Clone)]
pub struct EnvPattern {
    regex: Regex,
}

impl EnvPattern {
    /// Build the pattern for `names`. Returns `None` for an empty set, which the
    /// session treats as "nothing to rewrite".
    pub fn new<S: AsRef<str>>(names: &[S]) -> Option<Self> {
        if names.is_empty() {
            return None;
        }
        let alternatives = names
            .iter()
            .map(|n| regex_lite::escape(n.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let source = format!(
            r"(^|[^\w$]){}({alternatives})\b",
            regex_lite::escape(ACCESS_PREFIX)
        );
        Regex::new(&source).ok().map(|regex| Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// All eligible occurrences in `text`, ascending and non-overlapping.
    ///
    /// Every call walks `text` from the beginning; nothing is carried over between
    /// calls, so one pattern can be shared across threads.
    pub fn find_spans<'t>(&self, text: &'t str) -> Vec<MatchSpan<'t>> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let leading = caps.get(1).map_or(0, |m| m.as_str().len());
                let name = caps.get(2)?;
                if is_assignment_target(&text[name.end()..]) {
                    return None;
                }
                Some(MatchSpan {
                    start: whole.start() + leading,
                    end: name.end(),
                    name: name.as_str(),
                })
            })
            .collect()
    }
}

/// True when `rest` opens with optional whitespace, a `=`, and then some character
/// other than `=`. Comparisons (`==`, `===`) stay eligible; a trailing `=` at end of
/// input does not count as an assignment. U+FEFF counts as whitespace, as it does
/// for `\s` in JavaScript.
fn is_assignment_target(rest: &str) -> bool {
    let mut chars = rest
        .trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .chars();
    match (chars.next(), chars.next()) {
        (Some('='), Some(next)) => next != '=',
        _ => false,
    }
}
