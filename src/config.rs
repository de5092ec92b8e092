use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::constants::*;
use crate::error::{DatasetError, Result};
use crate::types::Column;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    pub sources: Vec<SourceConfig>,
}

/// Static retrieval parameters handed to the page fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub client: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            client: "firefox-b-d".to_string(),
            user_agent: "kalesreg".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// One streaming service's listing page and how its sections line up with its tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub id: String,
    pub service: String,
    pub url: String,
    /// Headings from this one onward carry no current programming
    pub end_heading: String,
    #[serde(default = "default_mapper")]
    pub mapper: String,
    /// Ordered section rules; `include = false` entries each drop one heading occurrence
    #[serde(default)]
    pub sections: Vec<SectionRule>,
    /// Source header text -> canonical column header
    #[serde(default)]
    pub renames: BTreeMap<String, String>,
    /// Canonical column header -> value written into every record
    #[serde(default)]
    pub constants: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRule {
    pub heading: String,
    pub include: bool,
}

fn default_mapper() -> String {
    COLUMNS_MAPPER.to_string()
}

impl SourceConfig {
    pub fn excluded_headings(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .filter(|s| !s.include)
            .map(|s| s.heading.as_str())
    }

    pub fn included_headings(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .filter(|s| s.include)
            .map(|s| s.heading.as_str())
    }

    /// Canonical header for a source header, after service-specific renames
    pub fn rename_target<'a>(&'a self, header: &'a str) -> &'a str {
        self.renames.get(header).map(String::as_str).unwrap_or(header)
    }

    /// Constant columns resolved to canonical columns; unknown headers are skipped
    /// here because `Config::validate` rejects them up front.
    pub fn constant_columns(&self) -> Vec<(Column, &str)> {
        self.constants
            .iter()
            .filter_map(|(header, value)| Column::from_header(header).map(|c| (c, value.as_str())))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(DatasetError::Config("Source id must not be empty".to_string()));
        }
        if self.end_heading.trim().is_empty() {
            return Err(DatasetError::Config(format!(
                "Source '{}' must declare an end heading",
                self.id
            )));
        }
        if ![COLUMNS_MAPPER, NETFLIX_ENDED_MAPPER].contains(&self.mapper.as_str()) {
            return Err(DatasetError::Config(format!(
                "Source '{}' uses unknown mapper '{}'",
                self.id, self.mapper
            )));
        }
        for (from, to) in &self.renames {
            if Column::from_header(to).is_none() {
                return Err(DatasetError::Config(format!(
                    "Source '{}' renames '{}' to '{}', which is not an output column",
                    self.id, from, to
                )));
            }
        }
        for header in self.constants.keys() {
            match Column::from_header(header) {
                None | Some(Column::CurService) => {
                    return Err(DatasetError::Config(format!(
                        "Source '{}' sets a constant for '{}', which is not an assignable column",
                        self.id, header
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            DatasetError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to the built-in source table
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(DatasetError::Config("At least one source is required".to_string()));
        }
        let mut seen = HashSet::new();
        for source in &self.sources {
            source.validate()?;
            if !seen.insert(source.id.as_str()) {
                return Err(DatasetError::Config(format!(
                    "Duplicate source id '{}'",
                    source.id
                )));
            }
        }
        Ok(())
    }

    /// Sources to run, in configured order. `None` selects every source.
    pub fn select(&self, ids: Option<&[String]>) -> Result<Vec<&SourceConfig>> {
        let Some(ids) = ids else {
            return Ok(self.sources.iter().collect());
        };
        for id in ids {
            if !self.sources.iter().any(|s| &s.id == id) {
                return Err(DatasetError::Config(format!("Unknown source '{}'", id)));
            }
        }
        Ok(self
            .sources
            .iter()
            .filter(|s| ids.contains(&s.id))
            .collect())
    }

    /// The eight listing pages with the section layout they had when the dataset was first built.
    pub fn builtin() -> Self {
        const UPCOMING: &str = "Upcoming original programming";
        const ORIGINAL: &str = "Original programming";
        const ANIMATION: &str = "Animation";
        const NON_ENGLISH_SCRIPTED: &str = "Non-English language scripted";
        const NON_ENGLISH: &str = "Non-English language";
        const UNSCRIPTED: &str = "Unscripted";
        const SPECIALS: &str = "Specials";
        const REGIONAL: &str = "Regional original programming";

        let sources = vec![
            builtin_source(
                NETFLIX_SOURCE,
                NETFLIX_SERVICE,
                "https://en.wikipedia.org/wiki/List_of_Netflix_original_programming",
                UPCOMING,
                &[ANIMATION, NON_ENGLISH_SCRIPTED, UNSCRIPTED, SPECIALS],
            ),
            SourceConfig {
                mapper: NETFLIX_ENDED_MAPPER.to_string(),
                ..builtin_source(
                    NETFLIX_ENDED_SOURCE,
                    NETFLIX_SERVICE,
                    "https://en.wikipedia.org/wiki/List_of_ended_Netflix_original_programming",
                    "Notes",
                    &[
                        ANIMATION,
                        NON_ENGLISH_SCRIPTED,
                        UNSCRIPTED,
                        SPECIALS,
                        REGIONAL,
                        ANIMATION,
                        NON_ENGLISH_SCRIPTED,
                        UNSCRIPTED,
                    ],
                )
            },
            SourceConfig {
                renames: BTreeMap::from([("Length".to_string(), "Runtime".to_string())]),
                ..builtin_source(
                    HULU_SOURCE,
                    HULU_SERVICE,
                    "https://en.wikipedia.org/wiki/List_of_Hulu_original_programming",
                    UPCOMING,
                    &[ORIGINAL, ANIMATION, UNSCRIPTED, "Hotstar"],
                )
            },
            SourceConfig {
                renames: BTreeMap::from([
                    ("Seasons/episodes".to_string(), "Seasons".to_string()),
                    ("Previous channel".to_string(), "Prev. network(s)".to_string()),
                ]),
                constants: BTreeMap::from([(
                    "Runtime".to_string(),
                    RUNTIME_NOT_REPORTED.to_string(),
                )]),
                ..builtin_source(
                    AMAZON_SOURCE,
                    AMAZON_SERVICE,
                    "https://en.wikipedia.org/wiki/List_of_Amazon_Prime_Video_original_programming",
                    UPCOMING,
                    &[ORIGINAL, ANIMATION, NON_ENGLISH_SCRIPTED, UNSCRIPTED, REGIONAL],
                )
            },
            builtin_source(
                APPLE_SOURCE,
                APPLE_SERVICE,
                "https://en.wikipedia.org/wiki/List_of_Apple_TV%2B_original_programming",
                UPCOMING,
                &[ORIGINAL, ANIMATION, UNSCRIPTED],
            ),
            builtin_source(
                PARAMOUNT_SOURCE,
                PARAMOUNT_SERVICE,
                "https://en.wikipedia.org/wiki/List_of_Paramount%2B_original_programming",
                UPCOMING,
                &[ORIGINAL, ANIMATION, UNSCRIPTED, REGIONAL, NON_ENGLISH],
            ),
            builtin_source(
                DISNEY_SOURCE,
                DISNEY_SERVICE,
                "https://en.wikipedia.org/wiki/List_of_Disney%2B_original_programming",
                UPCOMING,
                &[ORIGINAL, NON_ENGLISH, UNSCRIPTED, SPECIALS],
            ),
            builtin_source(
                HBO_SOURCE,
                HBO_SERVICE,
                "https://en.wikipedia.org/wiki/List_of_HBO_Max_original_programming",
                "Original podcasts",
                &[ORIGINAL, ANIMATION, NON_ENGLISH_SCRIPTED, UNSCRIPTED],
            ),
        ];

        Self {
            fetch: FetchConfig::default(),
            sources,
        }
    }
}

fn builtin_source(
    id: &str,
    service: &str,
    url: &str,
    end_heading: &str,
    excluded: &[&str],
) -> SourceConfig {
    SourceConfig {
        id: id.to_string(),
        service: service.to_string(),
        url: url.to_string(),
        end_heading: end_heading.to_string(),
        mapper: default_mapper(),
        sections: excluded
            .iter()
            .map(|heading| SectionRule {
                heading: heading.to_string(),
                include: false,
            })
            .collect(),
        renames: BTreeMap::new(),
        constants: BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_config_is_valid_and_ordered() {
        let config = Config::builtin();
        config.validate().unwrap();
        let ids: Vec<&str> = config.sources.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, get_supported_sources());
    }

    #[test]
    fn test_builtin_amazon_synthesizes_runtime() {
        let config = Config::builtin();
        let amazon = config.select(Some(&["amazon".to_string()][..])).unwrap()[0];
        assert_eq!(amazon.rename_target("Seasons/episodes"), "Seasons");
        assert_eq!(amazon.rename_target("Title"), "Title");
        assert_eq!(amazon.constant_columns(), vec![(Column::Runtime, "na")]);
    }

    #[test]
    fn test_parse_toml_source() {
        let toml_text = r#"
            [fetch]
            client = "test"
            user_agent = "test-agent"
            timeout_seconds = 5

            [[sources]]
            id = "hulu"
            service = "Hulu"
            url = "https://example.org/hulu"
            end_heading = "Upcoming original programming"
            renames = { "Length" = "Runtime" }
            sections = [
                { heading = "Animation", include = false },
                { heading = "Drama", include = true },
            ]
        "#;
        let config: Config = toml::from_str(toml_text).unwrap();
        config.validate().unwrap();
        let hulu = &config.sources[0];
        assert_eq!(hulu.mapper, COLUMNS_MAPPER);
        assert_eq!(hulu.excluded_headings().collect::<Vec<_>>(), vec!["Animation"]);
        assert_eq!(hulu.included_headings().collect::<Vec<_>>(), vec!["Drama"]);
    }

    #[test]
    fn test_validate_rejects_unknown_rename_target() {
        let mut config = Config::builtin();
        config.sources[0]
            .renames
            .insert("Length".to_string(), "Duration".to_string());
        assert!(matches!(config.validate(), Err(DatasetError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let mut config = Config::builtin();
        let copy = config.sources[0].clone();
        config.sources.push(copy);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_select_unknown_source_fails() {
        let config = Config::builtin();
        assert!(config.select(Some(&["peacock".to_string()][..])).is_err());
    }
}
