use std::fmt;
use std::str::FromStr;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder syntax written into the generated script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TemplateEngine {
    /// `${NAME}`, for `envsubst` and compatible tools
    #[default]
    Envsubst,
    /// `{{env "NAME"}}`, for Caddy's `templates` directive
    Caddy,
}

impl TemplateEngine {
    pub fn placeholder(self, name: &str) -> String {
        match self {
            Self::Envsubst => format!("${{{name}}}"),
            Self::Caddy => format!("{{{{env \"{name}\"}}}}"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Envsubst => "envsubst",
            Self::Caddy => "caddy",
        }
    }
}

impl fmt::Display for TemplateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateEngine {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "envsubst" => Ok(Self::Envsubst),
            "caddy" => Ok(Self::Caddy),
            other => anyhow::bail!("Unknown template engine '{other}' (expected envsubst or caddy)"),
        }
    }
}

/// Where in the document a tag goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InjectTo {
    /// Right before `</head>`
    Head,
    /// Right after the opening `<head>` tag
    HeadPrepend,
}

/// Tag insertion descriptor handed to the HTML entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlTag {
    pub tag: String,
    pub children: String,
    pub inject_to: InjectTo,
}

impl HtmlTag {
    pub fn script(children: String) -> Self {
        Self {
            tag: "script".into(),
            children,
            inject_to: InjectTo::HeadPrepend,
        }
    }

    pub fn render(&self) -> String {
        format!("<{tag}>{}</{tag}>", self.children, tag = self.tag)
    }
}

/// Build the runtime initializer: a guard creating `<global>.env`, then one
/// placeholder assignment per variable in declaration order.
pub fn build_script<S: AsRef<str>>(global_object: &str, names: &[S], engine: TemplateEngine) -> String {
    let ns = format!("{global_object}.env");
    let mut script = format!("{ns} = {ns} || {{}};");
    for name in names {
        let name = name.as_ref();
        script.push_str(&format!("{ns}.{name} = \"{}\";", engine.placeholder(name)));
    }
    script
}

/// Splice rendered `tags` into an HTML document.
///
/// `head-prepend` tags land right after `<head ...>`, `head` tags right before
/// `</head>`. Without a head element both fall back to after `<html ...>` and then to
/// the very start of the document.
pub fn inject_tags(html: &str, tags: &[HtmlTag]) -> String {
    let prepend: String = tags
        .iter()
        .filter(|t| t.inject_to == InjectTo::HeadPrepend)
        .map(HtmlTag::render)
        .collect();
    let append: String = tags
        .iter()
        .filter(|t| t.inject_to == InjectTo::Head)
        .map(HtmlTag::render)
        .collect();

    let mut out = html.to_string();
    if !append.is_empty() {
        match find_end(&out, r"(?i)</head\s*>", false) {
            Some(at) => out.insert_str(at, &append),
            None => insert_fallback(&mut out, &append),
        }
    }
    if !prepend.is_empty() {
        match find_end(&out, r"(?i)<head(\s[^>]*)?>", true) {
            Some(at) => out.insert_str(at, &prepend),
            None => insert_fallback(&mut out, &prepend),
        }
    }
    out
}

fn insert_fallback(out: &mut String, content: &str) {
    let at = find_end(out, r"(?i)<html(\s[^>]*)?>", true).unwrap_or(0);
    out.insert_str(at, content);
}

/// Offset right after (`after = true`) or right before the first match of `pattern`.
fn find_end(haystack: &str, pattern: &str, after: bool) -> Option<usize> {
    let re = Regex::new(pattern).ok()?;
    re.find(haystack)
        .map(|m| if after { m.end() } else { m.start() })
}
