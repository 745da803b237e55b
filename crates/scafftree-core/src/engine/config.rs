use crate::core::scaffold::rules::RuleSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Immutable configuration for one tree-generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    pub title: String,
    pub comment: Option<String>,
    /// `None` selects the built-in rule order.
    pub ruleset: Option<RuleSet>,
    pub deglycosilate: bool,
}

#[derive(Default)]
pub struct GeneratorOptionsBuilder {
    title: Option<String>,
    comment: Option<String>,
    ruleset: Option<RuleSet>,
    deglycosilate: Option<bool>,
}

impl GeneratorOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn ruleset(mut self, ruleset: RuleSet) -> Self {
        self.ruleset = Some(ruleset);
        self
    }

    pub fn deglycosilate(mut self, enabled: bool) -> Self {
        self.deglycosilate = Some(enabled);
        self
    }

    pub fn build(self) -> Result<GeneratorOptions, ConfigError> {
        Ok(GeneratorOptions {
            title: self.title.ok_or(ConfigError::MissingParameter("title"))?,
            comment: self.comment,
            ruleset: self.ruleset,
            deglycosilate: self.deglycosilate.unwrap_or(false),
        })
    }
}
