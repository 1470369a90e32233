//! Plain-text rendering of view results for the terminal.

use anime_dashboard::dashboard::{Insights, Matchup, ResultSet};
use anime_dashboard::stats::{HistogramBin, MetricRow};
use shared::{AnimeSummary, Suggestion};

const BAR_WIDTH: usize = 30;
const SYNOPSIS_PREVIEW: usize = 200;

/// Format an integer with thousands separators
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

fn bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn print_warning(warning: &Option<String>) -> bool {
    if let Some(message) = warning {
        println!("Warning: {}", message);
        return true;
    }
    false
}

fn print_distribution(insights: &Insights) {
    println!();
    println!("Format distribution:");
    for (label, count) in &insights.type_distribution {
        println!("  {:<10} {}", label, count);
    }

    println!();
    println!("Score distribution:");
    let max = insights.histogram.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for HistogramBin { lower, upper, count } in insights.histogram.iter().filter(|b| b.count > 0) {
        println!(
            "  {:>4.1}-{:<4.1} {} {}",
            lower,
            upper,
            bar(*count as f64 / max as f64),
            count
        );
    }
}

/// Render the search view
pub fn search(query: &str, result: &ResultSet) {
    if print_warning(&result.warning) {
        return;
    }
    let Some(insights) = &result.insights else {
        return;
    };

    println!("Results for \"{}\"", query);
    println!();
    for anime in &result.anime {
        println!("{}", anime.title);
        println!(
            "  Score: {} | Type: {} | Episodes: {}",
            or_dash(anime.score),
            anime.type_label(),
            or_dash(anime.episodes)
        );
        if let Some(synopsis) = &anime.synopsis {
            println!("  {}", truncate_chars(synopsis, SYNOPSIS_PREVIEW));
        }
    }

    println!();
    println!("Search insights");
    if let Some(mean) = insights.mean_score {
        println!("  Average Rating:        {:.1}/10", mean);
    }
    if let Some((label, count)) = &insights.most_common_type {
        println!("  Most Common Format:    {} ({} titles)", label, count);
    }
    println!(
        "  Total Community Size:  {}",
        group_thousands(insights.total_members)
    );
    print_distribution(insights);
}

/// Render the rankings view
pub fn top(category: &str, result: &ResultSet) {
    if print_warning(&result.warning) {
        return;
    }
    let Some(insights) = &result.insights else {
        return;
    };

    println!("{}", category);
    println!();
    println!(
        "{:>6}  {:<50} {:>6}  {:<8} {:>8}  {}",
        "Rank", "Title", "Score", "Format", "Episodes", "Status"
    );
    for anime in &result.anime {
        println!(
            "{:>6}  {:<50} {:>6}  {:<8} {:>8}  {}",
            or_dash(anime.rank),
            truncate_chars(&anime.title, 47),
            anime.score.map_or_else(|| "-".to_string(), |s| format!("{:.2}", s)),
            anime.type_label(),
            or_dash(anime.episodes),
            anime.status.as_deref().unwrap_or("Unknown")
        );
    }

    println!();
    println!("Key insights");
    if let Some(mean) = insights.mean_score {
        println!("  Average Score:       {:.2}", mean);
    }
    println!("  Total Entries:       {}", insights.entries);
    if let Some((label, _)) = &insights.most_common_type {
        println!("  Most Common Format:  {}", label);
    }
    print_distribution(insights);
}

/// Render autosuggest results for one term
pub fn suggestions(term: &str, suggestions: &[Suggestion]) {
    println!("Suggestions for \"{}\"", term);
    if suggestions.is_empty() {
        println!("  No matches found. Try a different search term.");
        return;
    }
    for s in suggestions {
        println!(
            "  [{}] {} (English: {}, Japanese: {})",
            s.mal_id,
            s.title,
            s.title_english.as_deref().unwrap_or("N/A"),
            s.title_japanese.as_deref().unwrap_or("N/A")
        );
    }
}

fn print_details(anime: &AnimeSummary) {
    println!("{}", anime.title);
    println!("  Type:    {}", anime.type_label());
    println!("  Status:  {}", anime.status.as_deref().unwrap_or("Unknown"));
    println!("  Aired:   {}", anime.aired.as_deref().unwrap_or("Unknown"));
    println!("  Genres:  {}", anime.genres.join(", "));
    println!("  Studios: {}", anime.studios.join(", "));
    let synopsis = anime.synopsis.as_deref().unwrap_or("No synopsis available.");
    println!("  {}", truncate_chars(synopsis, SYNOPSIS_PREVIEW));
}

fn print_metric(row: &MetricRow, left: &str, right: &str) {
    let (left_ratio, right_ratio) = row.ratios();
    println!("{}", row.name);
    println!("  {} {:<30} {}", bar(left_ratio), left, format_metric(row.left));
    println!("  {} {:<30} {}", bar(right_ratio), right, format_metric(row.right));
}

fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v >= 0.0 => group_thousands(v as u64),
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    }
}

/// Render the comparison view
pub fn comparison(matchup: &Matchup) {
    let (left, right) = (&matchup.left, &matchup.right);
    let comparison = &matchup.comparison;
    let left_title = truncate_chars(&left.title, 27);
    let right_title = truncate_chars(&right.title, 27);

    println!("Head-to-head overview");
    println!();
    print_details(left);
    println!();
    print_details(right);

    println!();
    println!("Statistical analysis");
    for row in &comparison.metrics {
        print_metric(row, &left_title, &right_title);
    }

    println!();
    println!("Quick insights");
    if let Some(title) = &comparison.higher_rated {
        println!(
            "  Higher Rated: {} ({} vs {})",
            title,
            or_dash(left.score),
            or_dash(right.score)
        );
    }
    if !comparison.shared_genres.is_empty() {
        println!("  Shared Genres: {}", comparison.shared_genres.join(", "));
    }
    if let Some((left_time, right_time)) = &comparison.viewing_times {
        println!("  Time Investment:");
        println!("    - {}: {}", left.title, left_time);
        println!("    - {}: {}", right.title, right_time);
    }
}
