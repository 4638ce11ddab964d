use regex_lite::Regex;

/// Name of the interface Vite's client types augment with project variables.
pub const ENV_INTERFACE: &str = "ImportMetaEnv";

/// Extract the declared variable names from an `ImportMetaEnv` interface body.
///
/// Only `readonly NAME: ...` fields are collected. When `prefixes` is non-empty a
/// name must start with any one of them (matched literally) followed by at least
/// one word character. Names come back in first-appearance order with duplicates
/// collapsed. A missing or malformed interface yields an empty list.
pub fn parse_env_types<S: AsRef<str>>(content: &str, prefixes: &[S]) -> Vec<String> {
    let Some(body) = interface_body(content) else {
        return Vec::new();
    };

    let field_re = match Regex::new(&field_pattern(prefixes)) {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    let mut names: Vec<String> = Vec::new();
    for caps in field_re.captures_iter(body) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Body of the first `interface ImportMetaEnv { ... }` block, up to the first `}`.
fn interface_body(content: &str) -> Option<&str> {
    let re = Regex::new(&format!(r"interface\s+{ENV_INTERFACE}\s*\{{([^}}]*)\}}")).ok()?;
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn field_pattern<S: AsRef<str>>(prefixes: &[S]) -> String {
    let prefix_group = if prefixes.is_empty() {
        String::new()
    } else {
        let alternatives = prefixes
            .iter()
            .map(|p| regex_lite::escape(p.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        format!("(?:{alternatives})")
    };
    format!(r"readonly\s+({prefix_group}\w+)\s*:")
}
