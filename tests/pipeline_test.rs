use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tempfile::tempdir;

use streaming_originals::apis::snapshot::save_snapshot;
use streaming_originals::apis::{PageFetcher, SnapshotPageFetcher};
use streaming_originals::config::{Config, SourceConfig};
use streaming_originals::error::DatasetError;
use streaming_originals::pipeline::{write_report, Pipeline};

const CONFIG: &str = r#"
[[sources]]
id = "hulu"
service = "Hulu"
url = "https://example.org/hulu"
end_heading = "Upcoming original programming"
renames = { "Length" = "Runtime" }
sections = [ { heading = "Animation", include = false } ]

[[sources]]
id = "netflix_ended"
service = "Netflix"
url = "https://example.org/netflix_ended"
end_heading = "Notes"
mapper = "netflix_ended"
"#;

const HULU_PAGE: &str = r#"<html><body>
<h2><span class="mw-headline">Drama</span></h2>
<table class="wikitable plainrowheaders sortable">
  <tr><th>Title</th><th>Genre</th><th>Premiere</th><th>Seasons</th><th>Length</th><th>Status</th><th>Prev. network(s)</th></tr>
  <tr><th scope="row">Castle Rock<sup>[1]</sup></th><td>Psychological horror</td><td>July 25, 2018</td><td>2 seasons, 20 episodes</td><td>47–62 min</td><td>Ended</td><td></td></tr>
  <tr><th scope="row">Awaiting release</th><td>Drama</td><td>TBA</td><td>TBA</td><td>TBA</td><td>Pending</td><td></td></tr>
</table>
<h2><span class="mw-headline">Animation</span></h2>
<p>See the list of animated originals.</p>
<h2><span class="mw-headline">Docuseries</span></h2>
<table class="wikitable sortable">
  <tr><th>Title</th><th>Premiere</th><th>Seasons</th><th>Length</th><th>Status</th><th>Language</th></tr>
  <tr><td>Hip Hop Uncovered</td><td>TBA</td><td>6 episodes</td><td>~45 min</td><td>Renewed for season 2[5]</td><td>English</td></tr>
</table>
<h2><span class="mw-headline">Upcoming original programming</span></h2>
<table class="wikitable sortable"><tr><th>Title</th></tr><tr><td>Future Show</td></tr></table>
</body></html>"#;

const NETFLIX_ENDED_PAGE: &str = r#"<html><body>
<div class="mw-heading mw-heading2"><h2 id="Drama">Drama</h2></div>
<table class="wikitable sortable">
  <tr><th>Title</th><th>Genre</th><th>Premiere</th><th>Finale</th><th>Seasons</th><th>Episodes</th><th>Status</th></tr>
  <tr><td>House of Cards</td><td>Political drama</td><td>February 1, 2013</td><td>November 2, 2018</td><td>6 seasons</td><td>73 episodes</td><td>Renewed</td></tr>
</table>
<div class="mw-heading mw-heading2"><h2 id="Notes">Notes</h2></div>
</body></html>"#;

const EXPECTED_CSV: &str = "\
Cur. service,Title,Genre,Premiere,Seasons,Status,Language,Runtime,Episodes,Prev. network(s)
Hulu,Castle Rock,Psychological horror,2018-07-25,2,Ended,,<60 min,20,
Hulu,Hip Hop Uncovered,Docuseries,nan,1,Continuing,English,<60 min,6,
Netflix,House of Cards,Political drama,2013-02-01,6,Ended,,Unknown,73,
";

/// Serves inline pages keyed by source id
struct FakeFetcher {
    pages: HashMap<String, String>,
}

impl FakeFetcher {
    fn new(pages: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            pages: pages
                .iter()
                .map(|(id, html)| (id.to_string(), html.to_string()))
                .collect(),
        })
    }
}

#[async_trait::async_trait]
impl PageFetcher for FakeFetcher {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn fetch_page(&self, source: &SourceConfig) -> streaming_originals::error::Result<Vec<u8>> {
        self.pages
            .get(&source.id)
            .map(|html| html.as_bytes().to_vec())
            .ok_or_else(|| DatasetError::Fetch {
                source_id: source.id.clone(),
                message: "no page".to_string(),
            })
    }
}

fn load_config(dir: &Path) -> Result<Config> {
    let path = dir.join("sources.toml");
    std::fs::write(&path, CONFIG)?;
    Ok(Config::load(&path)?)
}

#[tokio::test]
async fn test_run_writes_merged_clean_dataset() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = load_config(temp_dir.path())?;
    let fetcher = FakeFetcher::new(&[("hulu", HULU_PAGE), ("netflix_ended", NETFLIX_ENDED_PAGE)]);
    let output = temp_dir.path().join("original_tv_streaming.csv");

    let report = Pipeline::new(config, fetcher).run(None, &output).await?;

    assert_eq!(std::fs::read_to_string(&output)?, EXPECTED_CSV);
    assert_eq!(report.sources.len(), 2);
    assert_eq!(report.sources[0].genres, vec!["Drama", "Docuseries"]);
    assert_eq!(report.sources[0].records, 3);
    assert_eq!(report.sources[1].tables_used, 1);
    assert_eq!(report.merged, 4);
    assert_eq!(report.dropped, 1);
    assert_eq!(report.cleaned, 3);
    assert_eq!(report.output_file.as_deref(), Some(output.display().to_string().as_str()));

    let report_path = temp_dir.path().join("report.json");
    write_report(&report, &report_path)?;
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report_path)?)?;
    assert_eq!(json["sources"][1]["service"], "Netflix");
    Ok(())
}

#[tokio::test]
async fn test_source_selection_keeps_only_requested_sources() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = load_config(temp_dir.path())?;
    // Only the selected page is ever requested
    let fetcher = FakeFetcher::new(&[("netflix_ended", NETFLIX_ENDED_PAGE)]);

    let ids = vec!["netflix_ended".to_string()];
    let dataset = Pipeline::new(config, fetcher).build(Some(ids.as_slice())).await?;
    assert_eq!(dataset.records.len(), 1);
    assert_eq!(dataset.records[0].title, "House of Cards");
    assert_eq!(dataset.records[0].status.as_deref(), Some("Ended"));
    Ok(())
}

#[tokio::test]
async fn test_table_under_excluded_heading_is_a_configuration_mismatch() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = load_config(temp_dir.path())?;
    let page = HULU_PAGE.replace(
        "<p>See the list of animated originals.</p>",
        r#"<table class="wikitable sortable"><tr><th>Title</th></tr><tr><td>Solar Opposites</td></tr></table>"#,
    );
    let fetcher = FakeFetcher::new(&[("hulu", page.as_str()), ("netflix_ended", NETFLIX_ENDED_PAGE)]);
    let output = temp_dir.path().join("out.csv");

    let err = Pipeline::new(config, fetcher)
        .run(None, &output)
        .await
        .unwrap_err();
    assert!(matches!(err, DatasetError::ConfigurationMismatch { ref source_id, .. } if source_id == "hulu"));
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_unrecognized_premiere_aborts_without_output() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = load_config(temp_dir.path())?;
    let page = NETFLIX_ENDED_PAGE.replace("February 1, 2013", "Spring 2013");
    let fetcher = FakeFetcher::new(&[("hulu", HULU_PAGE), ("netflix_ended", page.as_str())]);
    let output = temp_dir.path().join("out.csv");

    let err = Pipeline::new(config, fetcher)
        .run(None, &output)
        .await
        .unwrap_err();
    match err {
        DatasetError::UnrecognizedFormat { service, title, field, value } => {
            assert_eq!(service, "Netflix");
            assert_eq!(title, "House of Cards");
            assert_eq!(field, "Premiere");
            assert_eq!(value, "Spring 2013");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_page_fails_the_run() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = load_config(temp_dir.path())?;
    let fetcher = FakeFetcher::new(&[("hulu", HULU_PAGE)]);

    let result = Pipeline::new(config, fetcher).build(None).await;
    assert!(matches!(result, Err(DatasetError::Fetch { .. })));
    Ok(())
}

#[tokio::test]
async fn test_snapshots_replay_offline() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = load_config(temp_dir.path())?;
    let html_dir = temp_dir.path().join("html");

    let live = Pipeline::new(
        config.clone(),
        FakeFetcher::new(&[("hulu", HULU_PAGE), ("netflix_ended", NETFLIX_ENDED_PAGE)]),
    );
    let saved = live.snapshot(None, &html_dir).await?;
    assert_eq!(saved.len(), 2);
    assert!(saved[0].ends_with("hulu.html"));

    let offline = Pipeline::new(config.clone(), Arc::new(SnapshotPageFetcher::new(&html_dir)));
    let output = temp_dir.path().join("offline.csv");
    offline.run(None, &output).await?;
    assert_eq!(std::fs::read_to_string(&output)?, EXPECTED_CSV);

    // Overwriting one snapshot changes only that source's rows
    save_snapshot(&html_dir, &config.sources[1], NETFLIX_ENDED_PAGE.replace("House of Cards", "Hemlock Grove").as_bytes()).await?;
    let dataset = offline.build(None).await?;
    assert_eq!(dataset.records[2].title, "Hemlock Grove");
    Ok(())
}
