//! CSV export of the tables shown by each view.

use anyhow::{Context, Result};
use serde::Serialize;
use shared::{AnimeSummary, DataPaths};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub const RANKINGS_FILE: &str = "top_anime_rankings.csv";
pub const COMPARISON_FILE: &str = "anime_comparison.csv";

const NOT_AVAILABLE: &str = "N/A";

#[derive(Serialize)]
struct RankingRow<'a> {
    title: &'a str,
    score: Option<f64>,
    members: Option<u64>,
    rank: Option<u32>,
    #[serde(rename = "type")]
    anime_type: &'a str,
    episodes: Option<u32>,
    status: Option<&'a str>,
    year: Option<u32>,
    image_url: Option<&'a str>,
}

#[derive(Serialize)]
struct SearchRow<'a> {
    title: &'a str,
    image: Option<&'a str>,
    description: Option<&'a str>,
    score: Option<f64>,
    #[serde(rename = "type")]
    anime_type: &'a str,
    episodes: Option<u32>,
    members: Option<u64>,
}

/// Default export file name for a search, e.g. `anime_search_attack_on_titan.csv`
pub fn search_file_name(query: &str) -> String {
    let slug = DataPaths::title_to_slug(query);
    if slug.is_empty() {
        "anime_search.csv".to_string()
    } else {
        format!("anime_search_{}.csv", slug)
    }
}

/// Write the rankings table
pub fn write_rankings<W: Write>(writer: W, anime: &[AnimeSummary]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for a in anime {
        csv.serialize(RankingRow {
            title: &a.title,
            score: a.score,
            members: a.members,
            rank: a.rank,
            anime_type: a.type_label(),
            episodes: a.episodes,
            status: a.status.as_deref(),
            year: a.year,
            image_url: a.image_url.as_deref(),
        })
        .context("Failed to write rankings row")?;
    }
    if anime.is_empty() {
        csv.write_record([
            "title", "score", "members", "rank", "type", "episodes", "status", "year", "image_url",
        ])?;
    }
    csv.flush().context("Failed to flush rankings CSV")?;
    Ok(())
}

/// Write the search results table
pub fn write_search_results<W: Write>(writer: W, anime: &[AnimeSummary]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for a in anime {
        csv.serialize(SearchRow {
            title: &a.title,
            image: a.image_url.as_deref(),
            description: a.synopsis.as_deref(),
            score: a.score,
            anime_type: a.type_label(),
            episodes: a.episodes,
            members: a.members,
        })
        .context("Failed to write search row")?;
    }
    if anime.is_empty() {
        csv.write_record(["title", "image", "description", "score", "type", "episodes", "members"])?;
    }
    csv.flush().context("Failed to flush search CSV")?;
    Ok(())
}

/// Write the side-by-side comparison table
pub fn write_comparison<W: Write>(writer: W, left: &AnimeSummary, right: &AnimeSummary) -> Result<()> {
    fn or_na<T: ToString>(value: Option<T>) -> String {
        value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
    }

    // Scores keep their decimal point, matching the serde-written tables
    let score = |value: Option<f64>| or_na(value.map(|s| format!("{:?}", s)));

    let rows: [(&str, String, String); 5] = [
        ("Score", score(left.score), score(right.score)),
        ("Episodes", or_na(left.episodes), or_na(right.episodes)),
        ("Members", or_na(left.members), or_na(right.members)),
        ("Type", or_na(left.anime_type.as_deref()), or_na(right.anime_type.as_deref())),
        ("Status", or_na(left.status.as_deref()), or_na(right.status.as_deref())),
    ];

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Metric", left.title.as_str(), right.title.as_str()])?;
    for (metric, l, r) in rows {
        csv.write_record([metric, l.as_str(), r.as_str()])?;
    }
    csv.flush().context("Failed to flush comparison CSV")?;
    Ok(())
}

/// Create `path` (and its parent directory) and hand the file to `write`
pub fn to_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> Result<()>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export directory: {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    write(file).with_context(|| format!("Failed to write export file: {}", path.display()))?;

    info!(path = %path.display(), "CSV exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn naruto() -> AnimeSummary {
        AnimeSummary {
            mal_id: 20,
            title: "Naruto".to_string(),
            score: Some(8.0),
            members: Some(2_900_000),
            rank: Some(660),
            anime_type: Some("TV".to_string()),
            episodes: Some(220),
            status: Some("Finished Airing".to_string()),
            year: Some(2002),
            image_url: Some("https://cdn.example/naruto.jpg".to_string()),
            synopsis: Some("A ninja, \"believe it\".".to_string()),
            ..Default::default()
        }
    }

    fn movie() -> AnimeSummary {
        AnimeSummary {
            mal_id: 1,
            title: "Some Movie, Part 2".to_string(),
            anime_type: Some("Movie".to_string()),
            ..Default::default()
        }
    }

    fn render<F: FnOnce(&mut Vec<u8>) -> Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_rankings_csv() {
        let out = render(|buf| write_rankings(buf, &[naruto(), movie()]));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "title,score,members,rank,type,episodes,status,year,image_url");
        assert_eq!(
            lines[1],
            "Naruto,8.0,2900000,660,TV,220,Finished Airing,2002,https://cdn.example/naruto.jpg"
        );
        // Missing values are empty and commas in titles are quoted
        assert_eq!(lines[2], "\"Some Movie, Part 2\",,,,Movie,,,,");
    }

    #[test]
    fn test_empty_rankings_still_has_header() {
        let out = render(|buf| write_rankings(buf, &[]));
        assert_eq!(out.trim_end(), "title,score,members,rank,type,episodes,status,year,image_url");
    }

    #[test]
    fn test_search_csv_quotes_description() {
        let out = render(|buf| write_search_results(buf, &[naruto()]));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "title,image,description,score,type,episodes,members");
        assert!(lines[1].contains("\"A ninja, \"\"believe it\"\".\""));
    }

    #[test]
    fn test_comparison_csv() {
        let out = render(|buf| write_comparison(buf, &naruto(), &movie()));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Metric,Naruto,\"Some Movie, Part 2\"");
        assert_eq!(lines[1], "Score,8.0,N/A");
        assert_eq!(lines[2], "Episodes,220,N/A");
        assert_eq!(lines[3], "Members,2900000,N/A");
        assert_eq!(lines[4], "Type,TV,Movie");
        assert_eq!(lines[5], "Status,Finished Airing,N/A");
    }

    #[test]
    fn test_scores_match_across_exports() {
        let mut left = naruto();
        left.score = Some(8.25);

        let rankings = render(|buf| write_rankings(buf, &[naruto(), left.clone()]));
        let comparison = render(|buf| write_comparison(buf, &naruto(), &left));

        assert!(rankings.lines().nth(1).unwrap().starts_with("Naruto,8.0,"));
        assert!(rankings.lines().nth(2).unwrap().starts_with("Naruto,8.25,"));
        assert_eq!(comparison.lines().nth(1), Some("Score,8.0,8.25"));
    }

    #[test]
    fn test_search_file_name() {
        assert_eq!(search_file_name("Attack on Titan"), "anime_search_attack_on_titan.csv");
        assert_eq!(search_file_name("進撃の巨人"), "anime_search.csv");
    }

    #[test]
    fn test_to_file_creates_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("exports").join(RANKINGS_FILE);

        to_file(&path, |file| write_rankings(file, &[naruto()]))?;

        let content = std::fs::read_to_string(&path)?;
        assert_eq!(content.lines().count(), 2);
        Ok(())
    }
}
