//! CLI output formatting utilities.

use crate::rag::excerpt;
use crate::recommend::{watch_url, Recommendation};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Characters of a reading recommendation shown on its card.
const CARD_EXCERPT_CHARS: usize = 100;

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print one retrieval hit.
    pub fn search_result(rank: usize, title: &str, id: &str, score: f32, content: &str) {
        println!(
            "\n{} {} {} (score: {:.3})",
            style(format!("{}.", rank)).green(),
            style(title).bold(),
            style(id).dim(),
            score
        );
        println!("   {}", excerpt(content, 200));
    }

    /// Print the wall-clock time of a turn.
    pub fn response_time(secs: f64) {
        println!("{}", style(format!("Response time: {:.2} seconds", secs)).dim());
    }

    /// Print the recommendation cards for a turn.
    pub fn recommendations(recs: &[Recommendation]) {
        if recs.is_empty() {
            return;
        }
        let heading = match recs[0] {
            Recommendation::Reading { .. } => "Recommended Reading",
            Recommendation::Video { .. } => "Recommended Videos",
        };
        Output::header(heading);
        for rec in recs {
            Output::recommendation(rec);
        }
    }

    fn recommendation(rec: &Recommendation) {
        match rec {
            Recommendation::Reading { title, content } => {
                println!("\n  {} {}", style("*").cyan(), style(title).bold());
                println!("    {}", excerpt(content, CARD_EXCERPT_CHARS));
            }
            Recommendation::Video {
                title,
                video_id,
                thumbnail_url,
            } => {
                println!("\n  {} {}", style("*").cyan(), style(title).bold());
                println!("    {}", watch_url(video_id));
                if !thumbnail_url.is_empty() {
                    println!("    {}", style(thumbnail_url).dim());
                }
            }
        }
    }

    /// Create a progress bar.
    pub fn progress_bar(len: u64, msg: &str) -> ProgressBar {
        let pb = ProgressBar::new(len);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("#>-"));
        }
        pb.set_message(msg.to_string());
        pb
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}
