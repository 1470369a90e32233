//! Derived statistics over result sets.
//!
//! Everything here is pure and works on [`AnimeSummary`] slices, so the views
//! and the CLI can compute insights without touching the network.

use shared::AnimeSummary;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Upper bound of the score scale
pub const MAX_SCORE: f64 = 10.0;

/// Mean over the entries that carry a score
pub fn mean_score(anime: &[AnimeSummary]) -> Option<f64> {
    let scores: Vec<f64> = anime.iter().filter_map(|a| a.score).collect();
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Sum of member counts
pub fn total_members(anime: &[AnimeSummary]) -> u64 {
    anime.iter().filter_map(|a| a.members).sum()
}

/// Count of each format, most frequent first, ties broken by name
pub fn type_distribution(anime: &[AnimeSummary]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for a in anime {
        *counts.entry(a.type_label()).or_default() += 1;
    }

    let mut distribution: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    distribution
}

/// Most frequent format and its count
///
/// On a tie the format encountered first in `anime` wins.
pub fn most_common_type(anime: &[AnimeSummary]) -> Option<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for a in anime {
        let label = a.type_label();
        let count = counts.entry(label).or_default();
        if *count == 0 {
            order.push(label);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for label in order {
        let count = counts[label];
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((label, count));
        }
    }
    best.map(|(label, count)| (label.to_string(), count))
}

/// One bucket of a score histogram
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Histogram of scores over [0, 10] in `bins` equal buckets
///
/// Buckets are half-open except the last, which includes 10.0. Unscored
/// entries are left out.
pub fn score_histogram(anime: &[AnimeSummary], bins: usize) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let width = MAX_SCORE / bins as f64;

    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: i as f64 * width,
            upper: (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for score in anime.iter().filter_map(|a| a.score) {
        let score = score.clamp(0.0, MAX_SCORE);
        let idx = ((score / width) as usize).min(bins - 1);
        histogram[idx].count += 1;
    }
    histogram
}

/// Parse a Jikan duration string into minutes per episode
///
/// Accepts forms such as "24 min per ep", "1 hr 55 min" and "30 sec".
/// Returns `None` when no unit can be recognised.
pub fn parse_episode_minutes(duration: &str) -> Option<u32> {
    let mut seconds: u32 = 0;
    let mut matched = false;
    let mut tokens = duration.split_whitespace().peekable();

    while let Some(token) = tokens.next() {
        let Ok(value) = token.parse::<u32>() else {
            continue;
        };
        let unit = tokens.peek().map(|u| u.trim_end_matches('.').to_ascii_lowercase());
        let factor = match unit.as_deref() {
            Some("hr") | Some("hrs") | Some("hour") | Some("hours") => 3600,
            Some("min") | Some("mins") | Some("minute") | Some("minutes") => 60,
            Some("sec") | Some("secs") | Some("second") | Some("seconds") => 1,
            _ => continue,
        };
        seconds = seconds.saturating_add(value.saturating_mul(factor));
        matched = true;
        tokens.next();
    }

    if !matched {
        return None;
    }
    // Sub-minute runtimes still count as one minute
    Some(seconds.div_ceil(60).max(1))
}

/// Estimated total time to watch a series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewingTime {
    pub total_minutes: u64,
}

impl ViewingTime {
    pub fn hours(&self) -> u64 {
        self.total_minutes / 60
    }

    pub fn minutes(&self) -> u64 {
        self.total_minutes % 60
    }
}

impl fmt::Display for ViewingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{}h {}m", self.hours(), self.minutes())
    }
}

/// Episodes times episode length
///
/// Episode length comes from the record's duration when parsable, else
/// `fallback_minutes`. Unknown episode counts yield `None`.
pub fn viewing_time(anime: &AnimeSummary, fallback_minutes: u32) -> Option<ViewingTime> {
    let episodes = anime.episodes?;
    let per_episode = anime
        .duration
        .as_deref()
        .and_then(parse_episode_minutes)
        .unwrap_or(fallback_minutes);
    Some(ViewingTime {
        total_minutes: u64::from(episodes) * u64::from(per_episode),
    })
}

/// A metric shown side by side in the comparison view
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub name: &'static str,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

impl MetricRow {
    fn new(name: &'static str, left: Option<f64>, right: Option<f64>) -> Self {
        Self { name, left, right }
    }

    /// Each side as a fraction of the larger value (divisor 1 when both are 0)
    pub fn ratios(&self) -> (f64, f64) {
        let left = self.left.unwrap_or(0.0);
        let right = self.right.unwrap_or(0.0);
        let max = left.max(right);
        let divisor = if max > 0.0 { max } else { 1.0 };
        (left / divisor, right / divisor)
    }
}

/// Head-to-head comparison of two anime
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Title with the strictly higher score
    pub higher_rated: Option<String>,
    pub shared_genres: Vec<String>,
    pub metrics: Vec<MetricRow>,
    /// Present only when both episode counts are known
    pub viewing_times: Option<(ViewingTime, ViewingTime)>,
}

pub fn compare(left: &AnimeSummary, right: &AnimeSummary, fallback_minutes: u32) -> Comparison {
    let (left_score, right_score) = (left.score_or_zero(), right.score_or_zero());
    let higher_rated = if left_score > right_score {
        Some(left.title.clone())
    } else if right_score > left_score {
        Some(right.title.clone())
    } else {
        None
    };

    let left_genres: BTreeSet<&String> = left.genres.iter().collect();
    let shared_genres = right
        .genres
        .iter()
        .filter(|g| left_genres.contains(g))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect();

    let metrics = vec![
        MetricRow::new("Score", left.score, right.score),
        MetricRow::new(
            "Popularity",
            left.members.map(|m| m as f64),
            right.members.map(|m| m as f64),
        ),
        MetricRow::new(
            "Episodes",
            left.episodes.map(f64::from),
            right.episodes.map(f64::from),
        ),
    ];

    let viewing_times = viewing_time(left, fallback_minutes)
        .zip(viewing_time(right, fallback_minutes));

    Comparison {
        higher_rated,
        shared_genres,
        metrics,
        viewing_times,
    }
}
