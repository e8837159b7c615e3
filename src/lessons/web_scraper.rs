//! Web Scraper with a custom page function executed in the browser for every page.

use serde_json::{json, Value};

use super::{print_config, run_actor};
use crate::client::ApifyClient;
use crate::render::{banner, summary, text_field, truncate, Column, Table};
use crate::Result;

pub const ACTOR_ID: &str = "apify/web-scraper";

/// JavaScript run by the actor in the page context. Extracts title, description,
/// headings, links and image counts.
pub const PAGE_FUNCTION: &str = r#"async function pageFunction(context) {
    const { request, log, jQuery: $ } = context;

    log.info(`Processing ${request.url}`);

    const title = $('h1').first().text().trim() || $('title').text().trim();
    const description = $('meta[name="description"]').attr('content') || '';

    const links = [];
    $('a[href]').each((i, el) => {
        const href = $(el).attr('href');
        const text = $(el).text().trim();
        if (href && text && !href.startsWith('#')) {
            links.push({ href, text: text.substring(0, 100) });
        }
    });

    const headings = [];
    $('h1, h2, h3').each((i, el) => {
        headings.push({
            level: el.tagName.toLowerCase(),
            text: $(el).text().trim()
        });
    });

    const images = [];
    $('img[src]').each((i, el) => {
        const src = $(el).attr('src');
        const alt = $(el).attr('alt') || '';
        if (src) {
            images.push({ src, alt });
        }
    });

    return {
        url: request.url,
        title,
        description,
        headingsCount: headings.length,
        headings: headings.slice(0, 10),
        linksCount: links.length,
        sampleLinks: links.slice(0, 5),
        imagesCount: images.length,
        timestamp: new Date().toISOString()
    };
}"#;

#[derive(Debug, Clone, clap::Args)]
pub struct WebScraperOptions {
    /// Page the crawl starts from
    #[arg(long, default_value = "https://news.ycombinator.com/")]
    pub start_url: String,
    /// Pseudo-URL of the pages to scrape
    #[arg(long, default_value = "https://news.ycombinator.com/item?id=[.*]")]
    pub pseudo_url: String,
    #[arg(long, default_value_t = 10)]
    pub max_requests: u32,
}

pub fn run_input(opts: &WebScraperOptions) -> Value {
    json!({
        "startUrls": [{ "url": opts.start_url }],
        "linkSelector": "a[href]",
        "pseudoUrls": [{ "purl": opts.pseudo_url }],
        "pageFunction": PAGE_FUNCTION,
        "maxRequestsPerCrawl": opts.max_requests,
        "maxConcurrency": 5,
        "proxyConfiguration": { "useApifyProxy": false },
    })
}

/// Source listing with right-aligned line numbers.
pub fn numbered_source(source: &str) -> String {
    let lines: Vec<&str> = source.trim().lines().collect();
    let width = lines.len().to_string().len();
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$} │ {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn count(item: &Value, key: &str) -> String {
    item.get(key)
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "0".to_string())
}

pub fn pages_table(items: &[Value]) -> Table {
    let mut table = Table::with_title("Scraped Pages")
        .column(Column::new("#").width(3))
        .column(Column::new("Title").max_width(40))
        .column(Column::new("Headings").right())
        .column(Column::new("Links").right())
        .column(Column::new("Images").right());
    for (i, item) in items.iter().enumerate() {
        table.add_row([
            (i + 1).to_string(),
            truncate(&text_field(item, &["title"], "Unknown"), 37),
            count(item, "headingsCount"),
            count(item, "linksCount"),
            count(item, "imagesCount"),
        ]);
    }
    table
}

pub fn first_page_details(item: &Value) -> String {
    let mut out = String::new();
    out.push_str(&format!("  URL: {}\n", text_field(item, &["url"], "N/A")));
    out.push_str(&format!("  Title: {}\n", text_field(item, &["title"], "N/A")));

    let headings = item.get("headings").and_then(Value::as_array);
    if let Some(headings) = headings.filter(|h| !h.is_empty()) {
        out.push_str("\n  Headings (first 5):\n");
        for h in headings.iter().take(5) {
            out.push_str(&format!(
                "    [{}] {}\n",
                text_field(h, &["level"], "?"),
                truncate(&text_field(h, &["text"], ""), 60)
            ));
        }
    }

    let links = item.get("sampleLinks").and_then(Value::as_array);
    if let Some(links) = links.filter(|l| !l.is_empty()) {
        out.push_str("\n  Sample Links:\n");
        for link in links.iter().take(3) {
            out.push_str(&format!(
                "    • {} → {}\n",
                truncate(&text_field(link, &["text"], "No text"), 40),
                truncate(&text_field(link, &["href"], ""), 40)
            ));
        }
    }
    out
}

pub async fn run(client: &ApifyClient, opts: &WebScraperOptions) -> Result<()> {
    println!("{}", banner("03 - Custom Web Scraper with Page Functions"));

    println!("\nCustom Page Function:");
    println!("This JavaScript runs in the browser for each page:\n");
    println!("{}", numbered_source(PAGE_FUNCTION));

    let input = run_input(opts);
    print_config(
        "Configuration",
        &[
            ("Actor", ACTOR_ID.to_string()),
            ("Start URL", opts.start_url.clone()),
            ("Max Requests", opts.max_requests.to_string()),
        ],
    );

    let output = run_actor(client, ACTOR_ID, &input, "1-2 minutes").await?;
    let items = &output.items;
    println!("  Pages scraped: {}", items.len());

    if let Some(first) = items.first() {
        println!("\n{}", pages_table(items));
        println!("\nSample Extracted Data (first page):\n");
        print!("{}", first_page_details(first));
    }

    println!(
        "{}",
        summary(
            "Custom Web Scraper Complete",
            &format!(
                "Scraping Complete!\n\n\
                 Pages scraped: {}\n\
                 Dataset ID: {}\n\n\
                 Key Concepts Learned:\n  \
                 • pageFunction runs in browser context\n  \
                 • Use jQuery-style selectors ($)\n  \
                 • Return structured data objects\n  \
                 • linkSelector + pseudoUrls control crawling",
                items.len(),
                output.dataset_id
            ),
        )
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> WebScraperOptions {
        WebScraperOptions {
            start_url: "https://news.ycombinator.com/".into(),
            pseudo_url: "https://news.ycombinator.com/item?id=[.*]".into(),
            max_requests: 10,
        }
    }

    #[test]
    fn input_carries_page_function_verbatim() {
        let input = run_input(&opts());
        assert_eq!(input["pageFunction"], PAGE_FUNCTION);
        assert_eq!(input["linkSelector"], "a[href]");
        assert_eq!(input["pseudoUrls"][0]["purl"], "https://news.ycombinator.com/item?id=[.*]");
        assert_eq!(input["maxRequestsPerCrawl"], 10);
        assert_eq!(input["maxConcurrency"], 5);
        assert_eq!(input["proxyConfiguration"]["useApifyProxy"], false);
    }

    #[test]
    fn source_is_numbered() {
        let out = numbered_source("a\nb\nc\nd\ne\nf\ng\nh\ni\nj");
        assert!(out.starts_with(" 1 │ a"));
        assert!(out.ends_with("10 │ j"));
    }

    #[test]
    fn table_and_details_handle_missing_fields() {
        let items = vec![json!({ "title": "Hacker News", "headingsCount": 2 }), json!({})];
        let out = pages_table(&items).to_string();
        assert!(out.contains("Hacker News"));
        assert!(out.contains("Unknown"));
        assert_eq!(pages_table(&[]).len(), 0);

        let details = first_page_details(&json!({
            "url": "https://news.ycombinator.com/item?id=1",
            "headings": [{ "level": "h1", "text": "Ask HN" }],
            "sampleLinks": []
        }));
        assert!(details.contains("[h1] Ask HN"));
        assert!(!details.contains("Sample Links"));
    }
}
