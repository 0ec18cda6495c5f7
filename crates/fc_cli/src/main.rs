use std::path::{Path, PathBuf};

use clap::Parser;
use fc_core::Result;
use fc_inference::{
    advanced_stats, create_model, engagement_rate, sentiment_trend, top_authors, word_frequency,
    SentimentAnalyzer,
};
use fc_scraper::export::CommentDocument;
use fc_scraper::{handle_command, init_logging, ScraperArgs};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "News comment scraper and sentiment reporter", long_about = None)]
pub struct Cli {
    /// Debug-level logs (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Scrape the comment forums of one or more articles
    Scrape(ScraperArgs),
    /// Sentiment and engagement report for an exported JSON document
    Analyze {
        input: PathBuf,
        #[arg(long, default_value = "lexicon", help = "Sentiment model. Available models: lexicon (default), http")]
        model: String,
        /// Classification endpoint for the http model
        #[arg(long)]
        endpoint: Option<String>,
        /// Number of top words and authors to show
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

async fn analysis_report(document: &CommentDocument, analyzer: &SentimentAnalyzer, top: usize) -> Vec<String> {
    let comments = &document.comments;
    let title = document
        .metadata
        .as_ref()
        .map(|m| m.title.as_str())
        .unwrap_or(fc_core::NOT_FOUND);

    let summary = analyzer.summarize(comments).await;
    let mut lines = vec![
        format!("📰 {}", title),
        format!(
            "💬 {} interventions ({} comments, {} replies)",
            document.statistics.total_interventions,
            document.statistics.total_primary,
            document.statistics.total_replies
        ),
        format!(
            "😊 positive {:.1}% | 😠 negative {:.1}% | 😐 neutral {:.1}%",
            summary.positive, summary.negative, summary.neutral
        ),
        format!("📈 Mean score: {:.1}/100, trend: {}", summary.mean, sentiment_trend(&summary)),
        format!("🔥 Engagement: {:.1}%", engagement_rate(comments)),
    ];

    if let Some(stats) = advanced_stats(comments) {
        lines.push(format!(
            "✍️ Average length {:.1} chars, {} authors (diversity {:.2}), most active: {}",
            stats.average_length, stats.active_authors, stats.author_diversity, stats.main_author
        ));
    }

    let words = word_frequency(comments, top);
    if !words.is_empty() {
        let words: Vec<_> = words.iter().map(|(w, n)| format!("{} ({})", w, n)).collect();
        lines.push(format!("🔤 Top words: {}", words.join(", ")));
    }

    let authors = top_authors(comments, top);
    if !authors.is_empty() {
        let authors: Vec<_> = authors.iter().map(|(a, n)| format!("{} ({})", a, n)).collect();
        lines.push(format!("👥 Top authors: {}", authors.join(", ")));
    }

    lines
}

async fn analyze(input: &Path, model: &str, endpoint: Option<&str>, top: usize) -> Result<()> {
    let document = CommentDocument::load(input)?;
    let model = create_model(model, endpoint)?;
    info!("🧠 Analyzing {} with the {} model", input.display(), model.name());

    let analyzer = SentimentAnalyzer::new(model);
    for line in analysis_report(&document, &analyzer, top).await {
        println!("{}", line);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Scrape(args) => {
            let report = handle_command(args).await?;
            if report.succeeded + report.empty == 0 {
                anyhow::bail!("No article could be fetched");
            }
        }
        Commands::Analyze {
            input,
            model,
            endpoint,
            top,
        } => analyze(&input, &model, endpoint.as_deref(), top).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::{ArticleMetadata, Comment, CommentKind, ScrapeResult};

    #[test]
    fn test_parse_scrape_command() {
        let cli = Cli::try_parse_from([
            "fc", "--verbose", "scrape", "lefaso.net/spip.php?article1", "--format", "csv", "--delay", "500ms",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Scrape(args) => {
                assert_eq!(args.normalized_urls(), vec!["https://lefaso.net/spip.php?article1"]);
                assert_eq!(args.config().request_delay, std::time::Duration::from_millis(500));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_scrape_requires_url() {
        assert!(Cli::try_parse_from(["fc", "scrape"]).is_err());
    }

    #[test]
    fn test_parse_analyze_command() {
        let cli = Cli::try_parse_from(["fc", "analyze", "out.json", "--top", "5"]).unwrap();
        match cli.command {
            Commands::Analyze { input, model, endpoint, top } => {
                assert_eq!(input, PathBuf::from("out.json"));
                assert_eq!(model, "lexicon");
                assert!(endpoint.is_none());
                assert_eq!(top, 5);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_analysis_report_from_saved_document() {
        let url = "https://lefaso.net/spip.php?article7";
        let mut metadata = ArticleMetadata::not_found(url);
        metadata.title = "Saison des pluies".to_string();
        let comments = vec![
            Comment::new(1, "Awa", "hier", "Bravo, excellent reportage sur la saison", CommentKind::Primary)
                .with_replies(vec![Comment::new(1, "Paul", "hier", "Merci pour la saison", CommentKind::Reply)]),
        ];
        let result = ScrapeResult::with_comments(url, metadata, comments);

        let dir = tempfile::tempdir().unwrap();
        let path = fc_scraper::export::save_json(&result, dir.path(), "comments_test").unwrap();
        let document = CommentDocument::load(&path).unwrap();

        let analyzer = SentimentAnalyzer::new(create_model("lexicon", None).unwrap());
        let lines = analysis_report(&document, &analyzer, 3).await;

        assert_eq!(lines[0], "📰 Saison des pluies");
        assert!(lines.iter().any(|l| l.starts_with("😊 positive 100.0%")));
        assert!(lines.iter().any(|l| l.contains("saison (2)")));
        assert!(lines.iter().any(|l| l.contains("Awa (1)")));
    }
}
