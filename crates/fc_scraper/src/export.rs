use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use fc_core::{ArticleMetadata, Comment, Result, ScrapeResult, Statistics, NOT_FOUND};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const EXPORT_SOURCE: &str = "LeFaso.net";
pub const EXPORT_VERSION: &str = "1.0";

const ARTICLE_ID_MAX_LENGTH: usize = 50;
const SUMMARY_PREVIEW_COUNT: usize = 3;
const SUMMARY_PREVIEW_LENGTH: usize = 100;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w]").expect("valid non-word regex");
}

/// Stable article key derived from its URL.
pub fn article_id(url: &str) -> String {
    NON_WORD.replace_all(url, "_").chars().take(ARTICLE_ID_MAX_LENGTH).collect()
}

pub fn primary_row_id(article_id: &str, sequence_id: u32) -> String {
    format!("{}_C{:03}", article_id, sequence_id)
}

pub fn reply_row_id(article_id: &str, parent_sequence_id: u32, sequence_id: u32) -> String {
    format!("{}R{:02}", primary_row_id(article_id, parent_sequence_id), sequence_id)
}

/// One comment or reply flattened next to its article fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRow {
    pub comment_id: String,
    pub parent_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub author: String,
    pub date: String,
    pub content: String,
    pub length: usize,
    pub word_count: usize,
    pub reply_count: usize,
    pub extraction_timestamp: String,
    pub article_id: String,
    pub title: String,
    pub url: String,
    pub article_date: String,
    pub category: String,
    pub scrape_date: String,
}

pub const CSV_COLUMNS: [&str; 16] = [
    "commentId",
    "parentId",
    "type",
    "author",
    "date",
    "content",
    "length",
    "wordCount",
    "replyCount",
    "extractionTimestamp",
    "articleId",
    "title",
    "url",
    "articleDate",
    "category",
    "scrapeDate",
];

impl CommentRow {
    fn fields(&self) -> [String; 16] {
        [
            self.comment_id.clone(),
            self.parent_id.clone().unwrap_or_default(),
            self.kind.clone(),
            self.author.clone(),
            self.date.clone(),
            self.content.clone(),
            self.length.to_string(),
            self.word_count.to_string(),
            self.reply_count.to_string(),
            self.extraction_timestamp.clone(),
            self.article_id.clone(),
            self.title.clone(),
            self.url.clone(),
            self.article_date.clone(),
            self.category.clone(),
            self.scrape_date.clone(),
        ]
    }
}

struct ArticleFields {
    article_id: String,
    title: String,
    url: String,
    article_date: String,
    category: String,
    scrape_date: String,
}

impl ArticleFields {
    fn new(result: &ScrapeResult) -> Self {
        let metadata = result.metadata.as_ref();
        let field = |get: fn(&ArticleMetadata) -> String| metadata.map(get).unwrap_or_else(|| NOT_FOUND.to_string());
        Self {
            article_id: article_id(&result.url),
            title: field(|m| m.title.clone()),
            url: result.url.clone(),
            article_date: field(|m| m.publication_date_raw.clone()),
            category: field(|m| m.category.clone()),
            scrape_date: field(|m| m.scrape_timestamp.to_rfc3339()),
        }
    }

    fn row(&self, comment: &Comment, comment_id: String, parent_id: Option<String>) -> CommentRow {
        CommentRow {
            comment_id,
            parent_id,
            kind: comment.kind.to_string(),
            author: comment.author.clone(),
            date: comment.publication_date_raw.clone(),
            content: comment.content.clone(),
            length: comment.content_length,
            word_count: comment.word_count,
            reply_count: comment.reply_count,
            extraction_timestamp: comment.extraction_timestamp.to_rfc3339(),
            article_id: self.article_id.clone(),
            title: self.title.clone(),
            url: self.url.clone(),
            article_date: self.article_date.clone(),
            category: self.category.clone(),
            scrape_date: self.scrape_date.clone(),
        }
    }
}

/// Flattens the comment tree: each primary row is followed by its reply rows.
pub fn flatten(result: &ScrapeResult) -> Vec<CommentRow> {
    let article = ArticleFields::new(result);
    let mut rows = Vec::with_capacity(result.statistics.total_interventions);

    for comment in &result.comments {
        let parent_id = primary_row_id(&article.article_id, comment.sequence_id);
        rows.push(article.row(comment, parent_id.clone(), None));
        for reply in &comment.replies {
            let reply_id = reply_row_id(&article.article_id, comment.sequence_id, reply.sequence_id);
            rows.push(article.row(reply, reply_id, Some(parent_id.clone())));
        }
    }
    rows
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(writer: &mut W, row: &[String]) -> std::io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(writer, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(writer, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(writer, "{}", cell)?;
        }
    }
    write!(writer, "\r\n")
}

/// Writes rows as RFC 4180 CSV, header first.
pub fn write_csv<W: Write>(rows: &[CommentRow], mut writer: W) -> Result<()> {
    let header: Vec<String> = CSV_COLUMNS.iter().map(|c| c.to_string()).collect();
    write_row(&mut writer, &header)?;
    for row in rows {
        write_row(&mut writer, &row.fields())?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInfo {
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub version: String,
}

/// Nested export of one scrape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentDocument {
    pub export: ExportInfo,
    pub metadata: Option<ArticleMetadata>,
    pub statistics: Statistics,
    pub comments: Vec<Comment>,
}

impl CommentDocument {
    pub fn from_result(result: &ScrapeResult) -> Self {
        Self {
            export: ExportInfo {
                source: EXPORT_SOURCE.to_string(),
                generated_at: Utc::now(),
                version: EXPORT_VERSION.to_string(),
            },
            metadata: result.metadata.clone(),
            statistics: result.statistics.clone(),
            comments: result.comments.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Every primary comment and reply in document order.
    pub fn all_comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter().flat_map(Comment::thread)
    }
}

/// `comments_YYYYmmdd_HHMMSS`, in local time.
pub fn export_stem(now: DateTime<Local>) -> String {
    format!("comments_{}", now.format("%Y%m%d_%H%M%S"))
}

pub fn save_json(result: &ScrapeResult, dir: &Path, stem: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", stem));
    std::fs::write(&path, CommentDocument::from_result(result).to_json()?)?;
    info!("💾 JSON saved: {}", path.display());
    Ok(path)
}

fn save_rows(rows: &[CommentRow], dir: &Path, stem: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.csv", stem));
    write_csv(rows, BufWriter::new(File::create(&path)?))?;
    info!("💾 CSV saved: {} ({} rows)", path.display(), rows.len());
    Ok(path)
}

pub fn save_csv(result: &ScrapeResult, dir: &Path, stem: &str) -> Result<PathBuf> {
    save_rows(&flatten(result), dir, stem)
}

/// One CSV holding the rows of every result of a batch.
pub fn save_combined_csv(results: &[ScrapeResult], dir: &Path, stem: &str) -> Result<PathBuf> {
    let rows: Vec<CommentRow> = results.iter().flat_map(flatten).collect();
    save_rows(&rows, dir, stem)
}

fn preview(content: &str) -> String {
    if content.chars().count() > SUMMARY_PREVIEW_LENGTH {
        format!("{}...", content.chars().take(SUMMARY_PREVIEW_LENGTH).collect::<String>())
    } else {
        content.to_string()
    }
}

/// Human-readable digest of a scrape.
pub fn summary(result: &ScrapeResult) -> String {
    let mut lines = vec![
        "=".repeat(80),
        "📊 SCRAPE SUMMARY".to_string(),
        "=".repeat(80),
    ];

    if let Some(error) = &result.error {
        lines.push(format!("❌ Error: {}", error));
        return lines.join("\n");
    }

    if let Some(metadata) = &result.metadata {
        lines.push(format!("📰 Article: {}", metadata.title));
        lines.push(format!("🔗 URL: {}", metadata.url));
        lines.push(format!("📅 Published: {}", metadata.publication_date_raw));
        lines.push(format!("📂 Category: {}", metadata.category));
        lines.push(format!("⏰ Scraped: {}", metadata.scrape_timestamp.to_rfc3339()));
    }

    let stats = &result.statistics;
    lines.push(format!("💬 Comments: {}", stats.total_primary));
    lines.push(format!("↩️ Replies: {}", stats.total_replies));
    lines.push(format!("📈 Total interventions: {}", stats.total_interventions));
    lines.push(format!("📋 Status: {}", stats.status));

    if result.comments.is_empty() {
        lines.push("ℹ️ No comments to show".to_string());
    } else {
        lines.push(String::new());
        lines.push("👁️ PREVIEW".to_string());
        for (index, comment) in result.comments.iter().take(SUMMARY_PREVIEW_COUNT).enumerate() {
            lines.push(format!(
                "#{} - {} ({})",
                index + 1,
                comment.author,
                comment.publication_date_raw
            ));
            lines.push(format!("   {}", preview(&comment.content)));
            if comment.reply_count > 0 {
                lines.push(format!("   📨 {} reply(ies)", comment.reply_count));
            }
        }
    }

    lines.join("\n")
}
