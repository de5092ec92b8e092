/// Source id constants to ensure consistency across the codebase.
/// Ids are the user-facing names accepted by `--sources` and used for snapshot file names.
pub const NETFLIX_SOURCE: &str = "netflix";
pub const NETFLIX_ENDED_SOURCE: &str = "netflix_ended";
pub const HULU_SOURCE: &str = "hulu";
pub const AMAZON_SOURCE: &str = "amazon";
pub const APPLE_SOURCE: &str = "apple";
pub const PARAMOUNT_SOURCE: &str = "paramount";
pub const DISNEY_SOURCE: &str = "disney";
pub const HBO_SOURCE: &str = "hbo";

// Service names as written into the "Cur. service" column
pub const NETFLIX_SERVICE: &str = "Netflix";
pub const HULU_SERVICE: &str = "Hulu";
pub const AMAZON_SERVICE: &str = "Amazon Prime";
pub const APPLE_SERVICE: &str = "Apple TV+";
pub const PARAMOUNT_SERVICE: &str = "Paramount+";
pub const DISNEY_SERVICE: &str = "Disney+";
pub const HBO_SERVICE: &str = "HBO Max";

// Mapper kinds selectable from configuration
pub const COLUMNS_MAPPER: &str = "columns";
pub const NETFLIX_ENDED_MAPPER: &str = "netflix_ended";

/// Placeholder left in unfilled wiki table cells
pub const AWAITING_RELEASE: &str = "Awaiting release";
pub const UNKNOWN: &str = "Unknown";
pub const CONTINUING: &str = "Continuing";
pub const ENDED: &str = "Ended";
pub const ONE_SEASON: &str = "1 season";
/// Sentinel for premiere text that is not a calendar date
pub const UNPARSED_DATE: &str = "nan";
/// Sentinel for sources that never report a runtime
pub const RUNTIME_NOT_REPORTED: &str = "na";

pub const DEFAULT_OUTPUT_FILE: &str = "original_tv_streaming.csv";
pub const LOG_DIR: &str = "logs";
pub const LOG_FILE: &str = "dataset.log";

/// Get all built-in source ids, in merge order
pub fn get_supported_sources() -> Vec<&'static str> {
    vec![
        NETFLIX_SOURCE,
        NETFLIX_ENDED_SOURCE,
        HULU_SOURCE,
        AMAZON_SOURCE,
        APPLE_SOURCE,
        PARAMOUNT_SOURCE,
        DISNEY_SOURCE,
        HBO_SOURCE,
    ]
}
