use super::classify::{FieldError, Vocabulary};
use super::text::first_token;
use crate::constants::{ONE_SEASON, UNKNOWN};

const UNKNOWN_EPISODES: Vocabulary = Vocabulary::exact("Episodes", &["", "nan", "None", "TBA"]);
const UNKNOWN_SEASONS: Vocabulary = Vocabulary::exact("Seasons", &["", "nan", "TBA"]);

const COMBINED_SEPARATOR: &str = ", ";
const MINISERIES_MARKER: &str = "episode";

/// Cleaned season and episode counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counts {
    pub seasons: String,
    pub episodes: String,
}

/// Split "3 seasons, 24 episodes" into its parts. Without a separator the
/// existing episodes value is kept.
pub fn split_combined<'a>(
    seasons: Option<&'a str>,
    episodes: Option<&'a str>,
) -> (Option<&'a str>, Option<&'a str>) {
    match seasons.and_then(|s| s.split_once(COMBINED_SEPARATOR)) {
        Some((seasons, episodes)) => (Some(seasons), Some(episodes)),
        None => (seasons, episodes),
    }
}

pub fn clean_counts(seasons: Option<&str>, episodes: Option<&str>) -> Result<Counts, FieldError> {
    let (mut seasons, mut episodes) = split_combined(seasons, episodes);

    // Miniseries report their episode count where the season count goes
    if seasons.map_or(false, |s| s.contains(MINISERIES_MARKER)) {
        episodes = seasons;
        seasons = Some(ONE_SEASON);
    }

    let episodes = first_token(episodes.unwrap_or(""));
    let episodes = UNKNOWN_EPISODES.classify_or_fail(episodes, UNKNOWN.to_string(), parse_count)?;

    let seasons = first_token(seasons.unwrap_or(""));
    let seasons = UNKNOWN_SEASONS.classify_or_fail(seasons, UNKNOWN.to_string(), parse_count)?;

    Ok(Counts { seasons, episodes })
}

/// Counts are whole numbers; anything else is unrecognized
fn parse_count(token: &str) -> Option<String> {
    token.parse::<u32>().ok().map(|n| n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(seasons: &str, episodes: &str) -> Counts {
        Counts {
            seasons: seasons.to_string(),
            episodes: episodes.to_string(),
        }
    }

    #[test]
    fn test_combined_text_is_split() {
        assert_eq!(clean_counts(Some("3 seasons, 24 episodes"), None), Ok(counts("3", "24")));
    }

    #[test]
    fn test_miniseries_becomes_one_season() {
        assert_eq!(clean_counts(Some("6 episodes"), None), Ok(counts("1", "6")));
        assert_eq!(clean_counts(Some("1 episode"), None), Ok(counts("1", "1")));
    }

    #[test]
    fn test_unstated_counts_are_unknown() {
        assert_eq!(clean_counts(None, None), Ok(counts("Unknown", "Unknown")));
        assert_eq!(clean_counts(Some("TBA"), None), Ok(counts("Unknown", "Unknown")));
        assert_eq!(clean_counts(Some("2 seasons, TBA"), None), Ok(counts("2", "Unknown")));
    }

    #[test]
    fn test_split_without_separator_keeps_episodes() {
        assert_eq!(split_combined(Some("4"), Some("40")), (Some("4"), Some("40")));
        assert_eq!(split_combined(Some("4 seasons, 40 episodes"), Some("1")), (Some("4 seasons"), Some("40 episodes")));
    }

    #[test]
    fn test_non_numeric_seasons_fail() {
        let err = clean_counts(Some("Miniseries"), Some("10 episodes")).unwrap_err();
        assert_eq!(err.field, "Seasons");
        assert_eq!(err.value, "Miniseries");

        let err = clean_counts(Some("Limited series"), None).unwrap_err();
        assert_eq!(err.value, "Limited");
    }

    #[test]
    fn test_non_numeric_episodes_fail() {
        let err = clean_counts(Some("2"), Some("10+ episodes")).unwrap_err();
        assert_eq!(err.field, "Episodes");
        assert_eq!(err.value, "10+");

        let err = clean_counts(Some("Limited series, Varies"), None).unwrap_err();
        assert_eq!(err.field, "Episodes");
        assert_eq!(err.value, "Varies");
    }

    #[test]
    fn test_cleaned_counts_are_stable() {
        let first = clean_counts(Some("2 seasons, 16 episodes"), None).unwrap();
        let again = clean_counts(Some(first.seasons.as_str()), Some(first.episodes.as_str())).unwrap();
        assert_eq!(first, again);
    }
}
