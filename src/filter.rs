use std::path::Path;

use anyhow::{bail, Context, Result};
use glob::{MatchOptions, Pattern};
use regex_lite::Regex;

/// Exclusion applied when none is configured.
pub const DEFAULT_EXCLUDE: &str = "/node_modules/";

/// A single include/exclude entry: `/regex/` or a glob.
#[derive(Debug, Clone)]
pub enum FilterPattern {
    Regex(Regex),
    Glob(Pattern),
}

impl FilterPattern {
    /// Parse one configured entry. Strings wrapped in slashes are regular expressions,
    /// optionally followed by flags (`/app\.ts$/i`); everything else is a glob.
    /// Relative globs that do not start with `**` are anchored at `base`.
    pub fn parse(raw: &str, base: &Path) -> Result<Self> {
        let raw = raw.trim();
        if let Some((source, flags)) = split_regex(raw) {
            let mut inline = String::new();
            for flag in flags.chars() {
                match flag {
                    'i' | 'm' | 's' if !inline.contains(flag) => inline.push(flag),
                    'i' | 'm' | 's' => {}
                    // no effect on a single yes/no match
                    'g' | 'u' => {}
                    other => bail!("Unsupported flag '{other}' in filter regex '{raw}'"),
                }
            }
            let source = if inline.is_empty() {
                source.to_string()
            } else {
                format!("(?{inline}){source}")
            };
            let re = Regex::new(&source)
                .with_context(|| format!("Invalid filter regex '{raw}'"))?;
            return Ok(Self::Regex(re));
        }

        let anchored = if raw.starts_with("**") || Path::new(raw).is_absolute() {
            raw.to_string()
        } else {
            let base = normalize_id(&base.to_string_lossy());
            format!(
                "{}/{}",
                Pattern::escape(base.trim_end_matches('/')),
                raw.trim_start_matches("./")
            )
        };
        let glob = Pattern::new(&anchored)
            .with_context(|| format!("Invalid filter glob '{raw}'"))?;
        Ok(Self::Glob(glob))
    }

    pub fn matches(&self, id: &str) -> bool {
        match self {
            Self::Regex(re) => re.is_match(id),
            Self::Glob(glob) => glob.matches_with(
                id,
                MatchOptions {
                    case_sensitive: true,
                    require_literal_separator: true,
                    require_literal_leading_dot: false,
                },
            ),
        }
    }
}

/// Include/exclude predicate over file identifiers.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    include: Vec<FilterPattern>,
    exclude: Vec<FilterPattern>,
}

impl Filter {
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S], base: &Path) -> Result<Self> {
        let parse_all = |raw: &[S]| -> Result<Vec<FilterPattern>> {
            raw.iter()
                .map(|p| p.as_ref())
                .filter(|p| !p.trim().is_empty())
                .map(|p| FilterPattern::parse(p, base))
                .collect()
        };
        Ok(Self {
            include: parse_all(include)?,
            exclude: parse_all(exclude)?,
        })
    }

    /// A file is eligible when it matches no exclude entry and at least one include
    /// entry (or no include entries are configured). Virtual ids containing a NUL byte
    /// are never eligible.
    pub fn is_eligible(&self, id: &str) -> bool {
        if id.contains('\0') {
            return false;
        }
        let id = normalize_id(id);
        if self.exclude.iter().any(|p| p.matches(&id)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| p.matches(&id))
    }
}

/// Split `/source/flags` into its parts. Only JavaScript flag letters count as
/// flags, so an absolute glob such as `/src/main` stays a glob.
fn split_regex(raw: &str) -> Option<(&str, &str)> {
    let (source, flags) = raw.strip_prefix('/')?.rsplit_once('/')?;
    let is_flags = flags.chars().all(|c| "dgimsuvy".contains(c));
    (!source.is_empty() && is_flags).then_some((source, flags))
}

fn normalize_id(id: &str) -> String {
    id.replace('\\', "/")
}
