use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::ProtectedMark;
use crate::similarity::normalize::normalize;

/// Root configuration structure, deserialized from `.markwatch/config.toml`.
///
/// Every field is optional in the file; missing fields take the built-in
/// defaults from [`Config::default`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Marks being defended, in the order findings are reported.
    pub marks: Vec<MarkConfig>,
    /// International classes a filing must touch to earn any class relevance.
    pub monitored_classes: Vec<u32>,
    /// Goods/services terms that raise relevance when present.
    pub priority_keywords: Vec<String>,
    /// JSON store for seen filings and conflicts. `--store` overrides it.
    pub store_path: Option<PathBuf>,
    pub scoring: ScoringConfig,
}

/// One protected mark as written in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkConfig {
    pub name: String,
    #[serde(default)]
    pub serial_numbers: Vec<String>,
    #[serde(default)]
    pub classes: Vec<u32>,
    /// Regular expressions matched case-insensitively against the normalized candidate.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Thresholds, weights and per-method constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Final scores below this produce no finding.
    pub min_score: f64,
    pub mark_weight: f64,
    pub relevance_weight: f64,
    /// Added per distinct priority keyword found in the goods/services text.
    pub keyword_boost: f64,
    pub keyword_boost_cap: f64,
    pub severity: SeverityBounds,
    pub methods: MethodScores,
}

/// Lower bounds (inclusive) of the upper severity tiers. Low starts at `min_score`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeverityBounds {
    pub high: f64,
    pub medium: f64,
}

/// Fixed scores awarded by the match-or-not primitives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MethodScores {
    pub prefix: f64,
    pub suffix: f64,
    pub contains: f64,
    pub phonetic: f64,
    pub pattern: f64,
    pub variation_exact: f64,
    pub variation_partial: f64,
    /// Edit-distance ratios below this contribute nothing.
    pub edit_distance_floor: f64,
    /// Shortest candidate allowed to match as a prefix *of* the protected mark.
    pub reverse_prefix_min_len: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            min_score: 65.0,
            mark_weight: 0.7,
            relevance_weight: 0.3,
            keyword_boost: 10.0,
            keyword_boost_cap: 20.0,
            severity: SeverityBounds::default(),
            methods: MethodScores::default(),
        }
    }
}

impl Default for SeverityBounds {
    fn default() -> Self {
        SeverityBounds {
            high: 85.0,
            medium: 75.0,
        }
    }
}

impl Default for MethodScores {
    fn default() -> Self {
        MethodScores {
            prefix: 85.0,
            suffix: 80.0,
            contains: 70.0,
            phonetic: 75.0,
            pattern: 75.0,
            variation_exact: 80.0,
            variation_partial: 70.0,
            edit_distance_floor: 60.0,
            reverse_prefix_min_len: 4,
        }
    }
}

impl Default for Config {
    /// Built-in watchlist used when no config file is found: TOPO and TOPOLOGY in
    /// classes 9 (software) and 42 (SaaS).
    fn default() -> Self {
        Config {
            marks: vec![
                MarkConfig {
                    name: "TOPO".to_string(),
                    serial_numbers: vec!["99634122".to_string(), "99634130".to_string()],
                    classes: vec![9, 42],
                    patterns: vec!["^topo".to_string(), "topo$".to_string()],
                },
                MarkConfig {
                    name: "TOPOLOGY".to_string(),
                    serial_numbers: vec!["99634140".to_string(), "99634135".to_string()],
                    classes: vec![9, 42],
                    patterns: vec![
                        "^topology".to_string(),
                        "topol".to_string(),
                        "topo.*logy".to_string(),
                    ],
                },
            ],
            monitored_classes: vec![9, 42],
            priority_keywords: [
                "software",
                "mobile",
                "application",
                "app",
                "social",
                "networking",
                "platform",
                "downloadable",
                "online",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            store_path: None,
            scoring: ScoringConfig::default(),
        }
    }
}

/// Load the watchlist configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `./.markwatch/config.toml`
/// 3. `~/.config/markwatch/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = Path::new(".markwatch").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("markwatch").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    tracing::debug!("no config file found, using built-in watchlist");
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Validated, compiled view of a [`Config`] that the engine reads during a scan.
#[derive(Debug, Clone)]
pub struct Watchlist {
    pub marks: Vec<ProtectedMark>,
    pub monitored_classes: BTreeSet<u32>,
    /// Normalized and deduplicated, in configuration order.
    pub priority_keywords: Vec<PriorityKeyword>,
    pub scoring: ScoringConfig,
}

/// A priority keyword and its compiled matcher.
#[derive(Debug, Clone)]
pub struct PriorityKeyword {
    pub term: String,
    /// Matches `term` at a word boundary, optionally followed by a plural `s`/`es`.
    pub matcher: Regex,
}

impl PriorityKeyword {
    fn compile(term: String) -> Result<Self, ConfigError> {
        let matcher = Regex::new(&format!(r"\b{}(?:e?s)?\b", regex::escape(&term))).map_err(
            |source| ConfigError::InvalidKeyword {
                keyword: term.clone(),
                source,
            },
        )?;
        Ok(PriorityKeyword { term, matcher })
    }
}

impl Watchlist {
    /// Validate `config` and compile its marks and patterns.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        if config.marks.is_empty() {
            return Err(ConfigError::NoProtectedMarks);
        }
        validate_scoring(&config.scoring)?;

        let marks = config
            .marks
            .iter()
            .map(compile_mark)
            .collect::<Result<Vec<_>, _>>()?;

        let mut priority_keywords: Vec<PriorityKeyword> = Vec::new();
        for keyword in &config.priority_keywords {
            let keyword = normalize(keyword);
            if !keyword.is_empty() && !priority_keywords.iter().any(|k| k.term == keyword) {
                priority_keywords.push(PriorityKeyword::compile(keyword)?);
            }
        }

        Ok(Watchlist {
            marks,
            monitored_classes: config.monitored_classes.iter().copied().collect(),
            priority_keywords,
            scoring: config.scoring.clone(),
        })
    }
}

fn compile_mark(mark: &MarkConfig) -> Result<ProtectedMark, ConfigError> {
    let normalized = normalize(&mark.name);
    if normalized.is_empty() {
        return Err(ConfigError::EmptyMarkName(mark.name.clone()));
    }

    let patterns = mark
        .patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| ConfigError::InvalidPattern {
                    mark: mark.name.clone(),
                    pattern: pattern.clone(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ProtectedMark {
        name: mark.name.clone(),
        normalized,
        serial_numbers: mark.serial_numbers.clone(),
        classes: mark.classes.iter().copied().collect(),
        patterns,
    })
}

fn validate_scoring(scoring: &ScoringConfig) -> Result<(), ConfigError> {
    let methods = &scoring.methods;
    let bounded = [
        ("min_score", scoring.min_score),
        ("severity.high", scoring.severity.high),
        ("severity.medium", scoring.severity.medium),
        ("keyword_boost", scoring.keyword_boost),
        ("keyword_boost_cap", scoring.keyword_boost_cap),
        ("methods.prefix", methods.prefix),
        ("methods.suffix", methods.suffix),
        ("methods.contains", methods.contains),
        ("methods.phonetic", methods.phonetic),
        ("methods.pattern", methods.pattern),
        ("methods.variation_exact", methods.variation_exact),
        ("methods.variation_partial", methods.variation_partial),
        ("methods.edit_distance_floor", methods.edit_distance_floor),
    ];
    for (field, value) in bounded {
        if !(0.0..=100.0).contains(&value) {
            return Err(ConfigError::ScoreOutOfRange { field, value });
        }
    }

    let (mark, relevance) = (scoring.mark_weight, scoring.relevance_weight);
    if !(mark >= 0.0 && relevance >= 0.0 && (mark + relevance - 1.0).abs() <= 1e-6) {
        return Err(ConfigError::InvalidWeights { mark, relevance });
    }

    let severity = &scoring.severity;
    if !(scoring.min_score <= severity.medium && severity.medium <= severity.high) {
        return Err(ConfigError::SeverityOrder {
            min_score: scoring.min_score,
            medium: severity.medium,
            high: severity.high,
        });
    }

    Ok(())
}
