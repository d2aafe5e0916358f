use crate::error::{PipelineError, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The hand-curated cleaning rule set for the layoffs dataset.
///
/// These are data-specific lookup rules, not general algorithms: each rule
/// names an observed artifact in the source data and the canonical value it
/// collapses to, so the rule set can be audited and extended without touching
/// pipeline code. Loaded from TOML, with a compiled-in default covering the
/// artifacts known to exist in the published dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct CleaningRules {
    /// Case-insensitive substring keyword -> canonical industry label.
    #[serde(default)]
    pub industry_keywords: Vec<KeywordRule>,
    /// Exact corrupted location spelling -> correct Unicode spelling.
    #[serde(default)]
    pub location_fixes: Vec<ReplaceRule>,
    /// Characters stripped from the end of country values.
    #[serde(default = "default_country_trailing")]
    pub country_trailing: String,
    /// Manual industry overrides for companies whose industry cannot be
    /// recovered from sibling records, keyed by company-name prefix.
    #[serde(default)]
    pub industry_overrides: Vec<PrefixRule>,
    /// The date pattern the source file uses.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub canonical: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceRule {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrefixRule {
    pub prefix: String,
    pub industry: String,
}

fn default_country_trailing() -> String {
    ".".to_string()
}

fn default_date_format() -> String {
    "%m/%d/%Y".to_string()
}

/// Default rules for the published layoffs dataset: the Crypto/crypto
/// industry label collapse, the "United States." trailing-period variant,
/// and the three locations whose UTF-8 was mis-decoded upstream.
static DEFAULT_RULES: Lazy<CleaningRules> = Lazy::new(|| CleaningRules {
    industry_keywords: vec![KeywordRule {
        keyword: "crypto".to_string(),
        canonical: "Crypto".to_string(),
    }],
    location_fixes: vec![
        ReplaceRule {
            from: "DÃ¼sseldorf".to_string(),
            to: "Düsseldorf".to_string(),
        },
        ReplaceRule {
            from: "FlorianÃ³polis".to_string(),
            to: "Florianópolis".to_string(),
        },
        ReplaceRule {
            from: "MalmÃ¶".to_string(),
            to: "Malmö".to_string(),
        },
    ],
    country_trailing: default_country_trailing(),
    industry_overrides: Vec::new(),
    date_format: default_date_format(),
});

impl Default for CleaningRules {
    fn default() -> Self {
        DEFAULT_RULES.clone()
    }
}

impl CleaningRules {
    /// Load rules from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read rules file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let rules: CleaningRules = toml::from_str(&content)?;
        Ok(rules)
    }

    /// Canonical industry label for a value matching a keyword rule, if any.
    pub fn canonical_industry(&self, value: &str) -> Option<&str> {
        let lower = value.to_lowercase();
        self.industry_keywords
            .iter()
            .find(|rule| lower.contains(&rule.keyword.to_lowercase()))
            .map(|rule| rule.canonical.as_str())
    }

    /// Corrected spelling for a mis-encoded location value, if any.
    pub fn fix_location(&self, value: &str) -> Option<&str> {
        self.location_fixes
            .iter()
            .find(|rule| rule.from == value)
            .map(|rule| rule.to.as_str())
    }

    /// Strips trailing stray characters from a country value.
    pub fn normalize_country<'a>(&self, value: &'a str) -> &'a str {
        value.trim_end_matches(|c| self.country_trailing.contains(c))
    }

    /// Manual industry override for a company, matched by name prefix.
    pub fn override_industry(&self, company: &str) -> Option<&str> {
        let lower = company.to_lowercase();
        self.industry_overrides
            .iter()
            .find(|rule| lower.starts_with(&rule.prefix.to_lowercase()))
            .map(|rule| rule.industry.as_str())
    }
}
