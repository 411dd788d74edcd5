//! Fast path: ordered, language-partitioned pattern rules
//!
//! A match yields a single-step plan with a fixed high confidence and
//! never consults the slow path. Partition order: the detected (or hinted)
//! language first, then every partition in fallback order with the
//! configured default language at the front.

pub mod normalize;
pub mod rules;

use crate::core::error::{AgentError, Result};
use crate::core::types::Language;
use crate::plan::{Plan, Step};
use crate::session::SessionSnapshot;

pub use normalize::{normalize, Normalized};
pub use rules::{Anchor, Matched, Rule, RuleDef};

/// Confidence of every fast-path step
pub const FAST_PATH_CONFIDENCE: f32 = 0.95;

/// A successful fast-path match
#[derive(Debug, Clone)]
pub struct FastMatch {
    pub plan: Plan,
    /// Name of the rule that fired
    pub rule: &'static str,
    /// Partition the rule belongs to
    pub partition: Language,
}

#[derive(Debug)]
struct Partition {
    language: Language,
    /// Sorted by anchor class, declaration order kept within a class
    rules: Vec<Rule>,
}

/// Language-aware rule matcher
#[derive(Debug)]
pub struct PatternMatcher {
    partitions: Vec<Partition>,
    default_language: Language,
}

impl PatternMatcher {
    /// Matcher over the built-in English and Arabic tables
    pub fn new(default_language: Language) -> Result<Self> {
        let tables = Language::ALL
            .iter()
            .map(|&lang| (lang, rules::table(lang)))
            .collect();
        Self::with_tables(default_language, tables)
    }

    /// Matcher over explicit rule tables
    pub fn with_tables(
        default_language: Language,
        tables: Vec<(Language, Vec<RuleDef>)>,
    ) -> Result<Self> {
        let mut partitions = Vec::with_capacity(tables.len());
        for (language, defs) in tables {
            let mut compiled = defs
                .into_iter()
                .map(|def| {
                    Rule::compile(language, def).map_err(|e| {
                        AgentError::Config(format!("rule {} ({}): {}", def.name, language, e))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            // Stable: declaration order survives within each anchor class
            compiled.sort_by_key(|r| r.anchor);
            tracing::debug!("Compiled {} {} rules", compiled.len(), language);
            partitions.push(Partition {
                language,
                rules: compiled,
            });
        }
        Ok(Self {
            partitions,
            default_language,
        })
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    pub fn rule_count(&self) -> usize {
        self.partitions.iter().map(|p| p.rules.len()).sum()
    }

    /// Partitions in the order they are tried for an input in `primary`
    fn order(&self, primary: Language) -> Vec<&Partition> {
        let mut langs = vec![primary, self.default_language];
        langs.extend(Language::ALL);
        let mut seen = Vec::new();
        for lang in langs {
            if !seen.contains(&lang) {
                seen.push(lang);
            }
        }
        seen.iter()
            .filter_map(|lang| self.partitions.iter().find(|p| p.language == *lang))
            .collect()
    }

    /// Try the rule tables against `text`
    ///
    /// `None` is the no-match outcome; it is not an error.
    pub fn match_command(
        &self,
        text: &str,
        hint: Option<Language>,
        session: &SessionSnapshot,
    ) -> Option<FastMatch> {
        let normalized = Normalized::new(text);
        if normalized.is_empty() {
            return None;
        }
        let language = hint.unwrap_or_else(|| Language::detect(normalized.as_str()));

        for partition in self.order(language) {
            for rule in &partition.rules {
                let Some(params) = rule.apply(&normalized, session) else {
                    continue;
                };
                tracing::debug!(
                    "Fast path: rule {}/{} -> {}",
                    partition.language,
                    rule.name,
                    rule.capability
                );
                let step = Step::new(1, rule.capability, params)
                    .with_description(text.trim())
                    .with_confidence(FAST_PATH_CONFIDENCE);
                return Some(FastMatch {
                    plan: Plan::single(step, language),
                    rule: rule.name,
                    partition: partition.language,
                });
            }
        }
        tracing::debug!("Fast path: no rule matched");
        None
    }
}
