// src/services/categorize.rs

//! Categorization engine.
//!
//! Maps show titles to a category via ordered regex rules (first match
//! wins) and normalizes tag lists against a case-insensitive alias table.

use std::collections::{BTreeSet, HashMap};

use regex::{Regex, RegexBuilder};

use crate::error::{AppError, Result};
use crate::models::Config;

/// Category assigned when no rule matches or the title is empty.
pub const DEFAULT_CATEGORY: &str = "Sans catégorie";

/// A compiled categorization rule.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// Category name for matching titles
    pub name: String,

    /// Case-insensitive pattern searched anywhere in the title
    pub pattern: Regex,

    /// Additional tags for matching shows
    pub extra_tags: Vec<String>,
}

/// Ordered rule set plus tag alias table, built once per run.
#[derive(Debug)]
pub struct Categorizer {
    rules: Vec<CompiledRule>,
    // lowercased alias -> canonical tag
    aliases: HashMap<String, String>,
}

impl Categorizer {
    /// Compile the configured rule set and alias table.
    ///
    /// An unparsable regex is a fatal configuration error. A rule entry
    /// that is not an object or lacks a name or pattern is skipped with a
    /// warning; a non-array `extra_tags` is coerced to empty with a
    /// warning.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut rules = Vec::new();

        for (idx, entry) in config.shows.iter().enumerate() {
            let Some(obj) = entry.as_object() else {
                log::warn!("Skipping invalid show rule at index {idx}: not an object");
                continue;
            };

            let name = obj.get("name").and_then(|v| v.as_str()).unwrap_or("");
            let pattern = obj.get("regex").and_then(|v| v.as_str()).unwrap_or("");
            if name.is_empty() || pattern.is_empty() {
                log::warn!("Skipping show rule at index {idx}: missing 'name' or 'regex'");
                continue;
            }

            let compiled = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| AppError::config(format!("Invalid regex for '{name}': {e}")))?;

            let extra_tags = match obj.get("extra_tags") {
                None => Vec::new(),
                Some(serde_json::Value::Array(items)) => items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
                Some(other) => {
                    log::warn!(
                        "Invalid extra_tags for '{name}': expected array, got {other}. \
                         Using empty list."
                    );
                    Vec::new()
                }
            };

            rules.push(CompiledRule {
                name: name.to_string(),
                pattern: compiled,
                extra_tags,
            });
        }

        let aliases = config
            .tag_mappings
            .iter()
            .map(|(alias, canonical)| (alias.to_lowercase(), canonical.clone()))
            .collect();

        log::debug!("Compiled {} categorization rules", rules.len());

        Ok(Self { rules, aliases })
    }

    /// Determine category and extra tags for a show title.
    ///
    /// Rules are evaluated in configured order; the first whose pattern is
    /// found anywhere in the title wins. An empty title short-circuits to
    /// the default category without evaluating any rule.
    pub fn categorize(&self, title: &str) -> (&str, &[String]) {
        if title.is_empty() {
            return (DEFAULT_CATEGORY, &[]);
        }

        for rule in &self.rules {
            if rule.pattern.is_match(title) {
                return (&rule.name, &rule.extra_tags);
            }
        }

        (DEFAULT_CATEGORY, &[])
    }

    /// Normalize a single tag via the alias table.
    ///
    /// Returns the canonical value on a case-insensitive match, otherwise
    /// the input unchanged.
    pub fn normalize_tag(&self, tag: &str) -> String {
        match self.aliases.get(&tag.to_lowercase()) {
            Some(canonical) => canonical.clone(),
            None => tag.to_string(),
        }
    }

    /// Normalize a list of tags: each through `normalize_tag`, then
    /// deduplicated and lexicographically sorted.
    pub fn normalize_tags<I>(&self, tags: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let set: BTreeSet<String> = tags
            .into_iter()
            .map(|tag| self.normalize_tag(tag.as_ref()))
            .collect();
        set.into_iter().collect()
    }
}
