use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;

use crate::declarations::parse_env_types;
use crate::filter::Filter;
use crate::inject::{build_script, HtmlTag, TemplateEngine};
use crate::pattern::EnvPattern;
use crate::rewrite::{rewrite, Rewrite};

/// Why a session resolved to the inactive state. None of these abort a build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisabledReason {
    #[error("{} not found", .0.display())]
    MissingDeclarations(PathBuf),
    #[error("No applicable environmental variables found in {}", .0.display())]
    NoVariables(PathBuf),
}

#[derive(Debug, Clone)]
enum State {
    Active { pattern: EnvPattern },
    Inactive { reason: DisabledReason },
}

/// Inputs a session is resolved from.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub root: PathBuf,
    pub declaration_file: PathBuf,
    pub env_prefix: Vec<String>,
    pub global_object: String,
    pub template_engine: TemplateEngine,
    pub filter: Filter,
}

/// Per-build transform state. Resolved once, then only read.
#[derive(Debug, Clone)]
pub struct BuildSession {
    variables: Vec<String>,
    global_object: String,
    template_engine: TemplateEngine,
    filter: Filter,
    state: State,
}

impl BuildSession {
    /// Read the declaration file and settle the session state.
    ///
    /// A missing or unreadable file, or a file declaring nothing under the configured
    /// prefixes, produces an inactive session rather than an error.
    pub fn resolve(options: SessionOptions) -> Self {
        let path = if options.declaration_file.is_absolute() {
            options.declaration_file.clone()
        } else {
            options.root.join(&options.declaration_file)
        };
        let content = std::fs::read_to_string(&path).ok();
        Self::from_declarations(options, content.as_deref(), &path)
    }

    /// Same as [`BuildSession::resolve`] for declaration text already in memory.
    /// `content = None` means the file does not exist.
    pub fn from_declarations(options: SessionOptions, content: Option<&str>, path: &Path) -> Self {
        let variables = content
            .map(|text| parse_env_types(text, options.env_prefix.as_slice()))
            .unwrap_or_default();

        let state = match (content, EnvPattern::new(variables.as_slice())) {
            (None, _) => State::Inactive {
                reason: DisabledReason::MissingDeclarations(path.to_path_buf()),
            },
            (Some(_), None) => State::Inactive {
                reason: DisabledReason::NoVariables(path.to_path_buf()),
            },
            (Some(_), Some(pattern)) => State::Active { pattern },
        };

        Self {
            variables,
            global_object: options.global_object,
            template_engine: options.template_engine,
            filter: options.filter,
            state,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active { .. })
    }

    pub fn disabled_reason(&self) -> Option<&DisabledReason> {
        match &self.state {
            State::Active { .. } => None,
            State::Inactive { reason } => Some(reason),
        }
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn template_engine(&self) -> TemplateEngine {
        self.template_engine
    }

    /// `<global>.env.`, the prefix rewritten references get.
    pub fn replacement_prefix(&self) -> String {
        format!("{}.env.", self.global_object)
    }

    pub fn is_eligible(&self, id: &str) -> bool {
        self.filter.is_eligible(id)
    }

    /// Rewrite one module. `Ok(None)` means "no transformation": the session is
    /// inactive, `id` is filtered out, or nothing in `code` qualified.
    pub fn transform(&self, code: &str, id: &str) -> Result<Option<Rewrite>> {
        let State::Active { pattern } = &self.state else {
            return Ok(None);
        };
        if !self.filter.is_eligible(id) {
            return Ok(None);
        }
        rewrite(code, pattern, &self.replacement_prefix())
    }

    /// The initializer script, or `None` while inactive.
    pub fn script(&self) -> Option<String> {
        if !self.is_active() {
            return None;
        }
        Some(build_script(
            &self.global_object,
            self.variables.as_slice(),
            self.template_engine,
        ))
    }

    /// Tags for an HTML entry point, or `None` while inactive.
    pub fn transform_index_html(&self) -> Option<Vec<HtmlTag>> {
        self.script().map(|script| vec![HtmlTag::script(script)])
    }
}
