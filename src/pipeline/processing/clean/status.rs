use super::classify::{FieldError, Vocabulary};
use super::text::strip_footnotes;
use crate::constants::CONTINUING;

/// Wording that means the title is still in production
const IN_PRODUCTION: Vocabulary = Vocabulary::contains(
    "Status",
    &[
        "due to premiere",
        "ongoing",
        "renewed",
        "release",
        "pre-production",
        "series order",
        "post-production",
        "filming",
    ],
);

/// Collapse in-production wording to "Continuing"; any other text passes
/// through without its footnotes.
pub fn clean_status(raw: Option<&str>) -> Result<Option<String>, FieldError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    IN_PRODUCTION
        .classify_or_fail(&strip_footnotes(raw), CONTINUING.to_string(), |t| {
            Some(t.to_string())
        })
        .map(Some)
}
