//! Website Content Crawler: turn a site into clean text and markdown for LLM pipelines.

use serde_json::{json, Value};

use super::{print_config, run_actor};
use crate::client::ApifyClient;
use crate::parse::{extract_headings, extract_title};
use crate::render::{
    banner, field, group_thousands, str_field, summary, text_field, truncate, Column, Panel, Table,
};
use crate::{Result, CONSOLE_URL};

pub const ACTOR_ID: &str = "apify/website-content-crawler";

#[derive(Debug, Clone, clap::Args)]
pub struct CrawlerOptions {
    /// Page the crawl starts from
    #[arg(long, default_value = "https://docs.apify.com/academy/web-scraping-for-beginners")]
    pub start_url: String,
    /// Maximum number of pages to crawl
    #[arg(long, default_value_t = 5)]
    pub max_pages: u32,
    /// `playwright:firefox` for JavaScript-heavy sites, `cheerio` for static ones
    #[arg(long, default_value = "playwright:firefox")]
    pub crawler_type: String,
    /// Also store the raw HTML of every page
    #[arg(long)]
    pub save_html: bool,
}

pub fn run_input(opts: &CrawlerOptions) -> Value {
    json!({
        "startUrls": [{ "url": opts.start_url }],
        "maxCrawlPages": opts.max_pages,
        "crawlerType": opts.crawler_type,
        "includeUrlGlobs": [],
        "excludeUrlGlobs": [],
        "saveMarkdown": true,
        "saveHtml": opts.save_html,
        "saveScreenshots": false,
    })
}

fn page_title(item: &Value) -> String {
    if let Some(title) = item.get("metadata").and_then(|m| str_field(m, &["title"])) {
        return title.to_string();
    }
    str_field(item, &["html"])
        .and_then(|html| extract_title(html).ok().flatten())
        .unwrap_or_else(|| "No title".to_string())
}

fn text_len(item: &Value, key: &str) -> usize {
    str_field(item, &[key]).map(|t| t.chars().count()).unwrap_or(0)
}

pub fn pages_table(items: &[Value]) -> Table {
    let mut table = Table::new()
        .column(Column::new("#").width(3))
        .column(Column::new("URL").max_width(50))
        .column(Column::new("Title").max_width(40))
        .column(Column::new("Text Length").right());
    for (i, item) in items.iter().enumerate() {
        table.add_row([
            (i + 1).to_string(),
            truncate(&text_field(item, &["url"], "Unknown"), 47),
            truncate(&page_title(item), 37),
            format!("{} chars", group_thousands(text_len(item, "text") as i64)),
        ]);
    }
    table
}

/// Metadata, content preview and headings of the first crawled page.
pub fn first_page_details(item: &Value) -> String {
    let empty = json!({});
    let metadata = field(item, &["metadata"]).unwrap_or(&empty);
    let mut out = String::new();

    out.push_str(&format!("  Title: {}\n", page_title(item)));
    out.push_str(&format!(
        "  Description: {}\n",
        truncate(&text_field(metadata, &["description"], "N/A"), 100)
    ));
    out.push_str(&format!(
        "  Language: {}\n",
        text_field(metadata, &["languageCode"], "N/A")
    ));

    if let Some(text) = str_field(item, &["text"]).filter(|t| !t.is_empty()) {
        out.push_str("\n  Content Preview:\n");
        out.push_str(&Panel::new(truncate(text, 500)).width(70).to_string());
        out.push('\n');
    }

    let markdown_len = text_len(item, "markdown");
    if markdown_len > 0 {
        out.push_str(&format!(
            "\n  Markdown available: {} characters\n",
            group_thousands(markdown_len as i64)
        ));
    }

    if let Some(html) = str_field(item, &["html"]) {
        if let Ok(headings) = extract_headings(html) {
            if !headings.is_empty() {
                out.push_str(&format!("\n  Headings ({}):\n", headings.len()));
                for h in headings.iter().take(10) {
                    out.push_str(&format!("    [{}] {}\n", h.level, truncate(&h.text, 60)));
                }
            }
        }
    }
    out
}

pub async fn run(client: &ApifyClient, opts: &CrawlerOptions) -> Result<()> {
    println!("{}", banner("02 - Website Content Crawler"));

    let input = run_input(opts);
    print_config(
        "Configuration",
        &[
            ("Actor", ACTOR_ID.to_string()),
            ("Start URL", opts.start_url.clone()),
            ("Max Pages", opts.max_pages.to_string()),
        ],
    );

    let output = run_actor(client, ACTOR_ID, &input, "1-2 minutes depending on the website").await?;
    let items = &output.items;
    println!("  Pages crawled: {}", items.len());

    if let Some(first) = items.first() {
        println!("\nCrawled Pages:\n");
        println!("{}", pages_table(items));
        println!("\nSample Content (first page):\n");
        print!("{}", first_page_details(first));
    }

    println!(
        "{}",
        summary(
            "Website Crawler Complete",
            &format!(
                "Crawl Complete!\n\n\
                 Pages crawled: {}\n\
                 Dataset ID: {id}\n\n\
                 View results in Apify Console:\n\
                 {CONSOLE_URL}/storage/datasets/{id}\n\n\
                 Common use cases for this data:\n  \
                 • Feed to an LLM for Q&A\n  \
                 • Store in a vector database\n  \
                 • Create embeddings for semantic search\n  \
                 • Build RAG pipelines",
                items.len(),
                id = output.dataset_id,
            ),
        )
    );
    Ok(())
}
