//! Run counters grouped by pipeline phase.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding program installs a recorder.

macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("streaming_originals_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("streaming_originals_", $phase, "_", $name)
    };
}

/// Page retrieval
pub struct FetchMetrics;

impl FetchMetrics {
    pub fn record_success(payload_bytes: usize, duration_secs: f64) {
        ::metrics::counter!(phase_metric!(counter, "fetch", "pages_success")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "fetch", "payload_bytes"))
            .record(payload_bytes as f64);
        ::metrics::histogram!(phase_metric!(histogram, "fetch", "duration_seconds"))
            .record(duration_secs);
    }

    pub fn record_error() {
        ::metrics::counter!(phase_metric!(counter, "fetch", "pages_error")).increment(1);
    }
}

/// Table extraction and schema mapping
pub struct MapperMetrics;

impl MapperMetrics {
    pub fn record_source(tables_used: usize, records: usize) {
        ::metrics::counter!(phase_metric!(counter, "mapper", "tables_used"))
            .increment(tables_used as u64);
        ::metrics::counter!(phase_metric!(counter, "mapper", "records"))
            .increment(records as u64);
    }

    pub fn record_mismatch() {
        ::metrics::counter!(phase_metric!(counter, "mapper", "configuration_mismatches")).increment(1);
    }
}

/// Field cleaning
pub struct CleanerMetrics;

impl CleanerMetrics {
    pub fn record_batch(cleaned: usize, dropped: usize) {
        ::metrics::counter!(phase_metric!(counter, "cleaner", "records_cleaned"))
            .increment(cleaned as u64);
        ::metrics::counter!(phase_metric!(counter, "cleaner", "records_dropped"))
            .increment(dropped as u64);
    }

    pub fn record_unrecognized(_field: &'static str) {
        ::metrics::counter!(phase_metric!(counter, "cleaner", "unrecognized_values")).increment(1);
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_metric_names_are_prefixed() {
        assert_eq!(
            phase_metric!(counter, "fetch", "pages_success"),
            "streaming_originals_fetch_pages_success_total"
        );
        assert_eq!(
            phase_metric!(histogram, "fetch", "payload_bytes"),
            "streaming_originals_fetch_payload_bytes"
        );
    }

    #[test]
    fn test_recording_without_recorder_is_a_no_op() {
        super::CleanerMetrics::record_batch(3, 1);
        super::FetchMetrics::record_error();
    }
}
