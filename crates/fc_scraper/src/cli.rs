use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::Local;
use clap::{Args, ValueEnum};
use fc_core::{Result, ScrapeStatus};

use crate::config::{ScraperConfig, DEFAULT_USER_AGENT};
use crate::export::{export_stem, save_combined_csv, save_csv, save_json, summary};
use crate::manager::{BatchReport, ScraperManager};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumanDuration(pub Duration);

fn add_millis(total: u64, num: u64, unit_millis: u64) -> std::result::Result<u64, String> {
    num.checked_mul(unit_millis)
        .and_then(|millis| total.checked_add(millis))
        .ok_or_else(|| "Duration is too large".to_string())
}

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_millis = 0u64;
        let mut current_number = String::new();
        let mut has_number = false;
        let mut chars = s.chars().peekable();

        while let Some(c) = chars.next() {
            if c.is_ascii_digit() {
                current_number.push(c);
                continue;
            }
            if c.is_whitespace() {
                continue;
            }
            let num = current_number
                .parse::<u64>()
                .map_err(|_| format!("Invalid character in duration: {}", c))?;
            let unit_millis = match c {
                'm' if chars.peek() == Some(&'s') => {
                    chars.next();
                    1
                }
                's' => 1000,
                'm' => 60_000,
                'h' => 3_600_000,
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            total_millis = add_millis(total_millis, num, unit_millis)?;
            current_number.clear();
            has_number = true;
        }

        // A trailing bare number is seconds
        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_millis = add_millis(total_millis, num, 1000)?;
            has_number = true;
        }

        if !has_number {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_millis(total_millis)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Both,
}

impl OutputFormat {
    fn json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }

    fn csv(self) -> bool {
        matches!(self, OutputFormat::Csv | OutputFormat::Both)
    }
}

#[derive(Args, Debug)]
pub struct ScraperArgs {
    /// Article URLs; https:// is assumed when no scheme is given
    #[arg(required = true)]
    pub urls: Vec<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Both)]
    pub format: OutputFormat,
    /// Directory receiving the exported files
    #[arg(long, default_value = ".")]
    pub output: PathBuf,
    /// Pause between two fetches (e.g. 2s, 500ms, 1m)
    #[arg(long, default_value = "2s")]
    pub delay: HumanDuration,
    /// Page fetch timeout
    #[arg(long, default_value = "30s")]
    pub timeout: HumanDuration,
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
    /// Print summaries without writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl ScraperArgs {
    pub fn config(&self) -> ScraperConfig {
        ScraperConfig::new()
            .with_user_agent(self.user_agent.clone())
            .with_timeout(self.timeout.0)
            .with_request_delay(self.delay.0)
    }

    pub fn normalized_urls(&self) -> Vec<String> {
        self.urls.iter().map(|url| normalize_input_url(url)).collect()
    }
}

/// Prepends `https://` to inputs typed without a scheme.
pub fn normalize_input_url(input: &str) -> String {
    let input = input.trim();
    if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    }
}

/// Writes the requested files for a batch and returns their paths.
pub fn export_report(report: &BatchReport, format: OutputFormat, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let exportable: Vec<_> = report
        .results
        .iter()
        .filter(|result| result.status() != ScrapeStatus::FetchError)
        .collect();
    let single = report.results.len() == 1;

    if format.json() {
        for (index, result) in exportable.iter().enumerate() {
            let name = if single {
                stem.to_string()
            } else {
                format!("{}_{:02}", stem, index + 1)
            };
            written.push(save_json(result, dir, &name)?);
        }
    }

    if format.csv() && !exportable.is_empty() {
        if single {
            written.push(save_csv(exportable[0], dir, stem)?);
        } else {
            let results: Vec<_> = exportable.into_iter().cloned().collect();
            written.push(save_combined_csv(&results, dir, &format!("{}_combined", stem))?);
        }
    }

    Ok(written)
}

pub async fn handle_command(args: ScraperArgs) -> Result<BatchReport> {
    let manager = ScraperManager::new(&args.config())?;
    let report = manager.scrape_urls(&args.normalized_urls()).await;

    for result in &report.results {
        println!("{}\n", summary(result));
    }

    if !args.dry_run {
        for path in export_report(&report, args.format, &args.output, &export_stem(Local::now()))? {
            println!("💾 {}", path.display());
        }
    }

    println!(
        "✅ {} article(s): {} with comments, {} without, {} failed, {} interventions",
        report.results.len(),
        report.succeeded,
        report.empty,
        report.failed,
        report.total_comments()
    );
    Ok(report)
}
