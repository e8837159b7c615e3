//! Instagram Scraper: posts of a profile with engagement numbers.

use serde_json::{json, Value};

use super::{print_config, run_actor};
use crate::client::ApifyClient;
use crate::render::{
    banner, cut, display, field, group_thousands, grouped_field, int_field, str_field, summary, text_field,
    truncate, Column, Panel, Table,
};
use crate::Result;

pub const ACTOR_ID: &str = "apify/instagram-scraper";

const LIKES: &[&str] = &["likesCount", "likes"];
const COMMENTS: &[&str] = &["commentsCount", "comments"];

#[derive(Debug, Clone, clap::Args)]
pub struct InstagramOptions {
    /// Profile, hashtag or post URLs
    #[arg(long = "url", default_value = "https://www.instagram.com/natgeo/")]
    pub urls: Vec<String>,
    /// `posts`, `comments` or `details`
    #[arg(long, default_value = "posts")]
    pub results_type: String,
    #[arg(long, default_value_t = 10)]
    pub limit: u32,
}

pub fn run_input(opts: &InstagramOptions) -> Value {
    json!({
        "directUrls": opts.urls,
        "resultsType": opts.results_type,
        "resultsLimit": opts.limit,
        "addParentData": true,
    })
}

pub fn posts_table(items: &[Value]) -> Table {
    let mut table = Table::with_title("Instagram Posts")
        .column(Column::new("#").width(3))
        .column(Column::new("Type").width(8))
        .column(Column::new("Caption").max_width(35))
        .column(Column::new("Likes").right())
        .column(Column::new("Comments").right())
        .column(Column::new("Date").width(12));
    for (i, post) in items.iter().enumerate() {
        let caption = str_field(post, &["caption"]).unwrap_or("");
        let caption = if caption.is_empty() {
            "No caption".to_string()
        } else {
            truncate(caption, 32)
        };
        let date = field(post, &["timestamp", "taken_at"])
            .map(|t| cut(&display(t), 10))
            .unwrap_or_else(|| "N/A".to_string());

        table.add_row([
            (i + 1).to_string(),
            text_field(post, &["type"], "post"),
            caption,
            grouped_field(post, LIKES),
            grouped_field(post, COMMENTS),
            date,
        ]);
    }
    table
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engagement {
    pub total_likes: i64,
    pub total_comments: i64,
    pub avg_likes: i64,
}

/// Sums integer counters as reported, so a hidden like count (`-1`) is included.
/// Non-integer values count as zero and the average is floored.
pub fn engagement(items: &[Value]) -> Engagement {
    let total_likes: i64 = items.iter().map(|p| int_field(p, LIKES)).sum();
    let total_comments: i64 = items.iter().map(|p| int_field(p, COMMENTS)).sum();
    let avg_likes = if items.is_empty() {
        0
    } else {
        total_likes.div_euclid(items.len() as i64)
    };
    Engagement {
        total_likes,
        total_comments,
        avg_likes,
    }
}

pub fn post_details(post: &Value) -> String {
    let mut out = String::new();
    out.push_str(&format!("  Post URL: {}\n", text_field(post, &["url", "shortCode"], "N/A")));
    out.push_str(&format!("  Type: {}\n", text_field(post, &["type"], "post")));
    let owner = str_field(post, &["ownerUsername"])
        .or_else(|| post.get("owner").and_then(|o| str_field(o, &["username"])))
        .unwrap_or("N/A");
    out.push_str(&format!("  Owner: {owner}\n"));

    if let Some(caption) = str_field(post, &["caption"]).filter(|c| !c.is_empty()) {
        out.push_str("\n  Caption:\n");
        out.push_str(&Panel::new(truncate(caption, 200)).width(60).to_string());
        out.push('\n');
    }

    let hashtags: Vec<String> = post
        .get("hashtags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .take(10)
                .map(|t| format!("#{t}"))
                .collect()
        })
        .unwrap_or_default();
    if !hashtags.is_empty() {
        out.push_str(&format!("\n  Hashtags: {}\n", hashtags.join(" ")));
    }

    let location = str_field(post, &["locationName"])
        .or_else(|| post.get("location").and_then(|l| str_field(l, &["name"])));
    if let Some(location) = location {
        out.push_str(&format!("  Location: {location}\n"));
    }

    if let Some(media) = str_field(post, &["displayUrl", "image_url"]) {
        out.push_str(&format!("  Media URL: {}...\n", cut(media, 60)));
    }
    out
}

pub async fn run(client: &ApifyClient, opts: &InstagramOptions) -> Result<()> {
    println!("{}", banner("05 - Instagram Scraper"));

    let input = run_input(opts);
    print_config(
        "Configuration",
        &[
            ("Actor", ACTOR_ID.to_string()),
            ("Scrape Type", opts.results_type.clone()),
            ("Targets", opts.urls.join(", ")),
            ("Results Limit", opts.limit.to_string()),
        ],
    );

    let output = run_actor(client, ACTOR_ID, &input, "1-3 minutes").await?;
    let items = &output.items;
    println!("  Items scraped: {}", items.len());

    if let Some(first) = items.first() {
        println!("\n{}", posts_table(items));

        let stats = engagement(items);
        println!("\nEngagement Summary:");
        println!("  Total Likes: {}", group_thousands(stats.total_likes));
        println!("  Total Comments: {}", group_thousands(stats.total_comments));
        println!("  Avg Likes/Post: {}", group_thousands(stats.avg_likes));

        println!("\nSample Post Details:\n");
        print!("{}", post_details(first));
    }

    println!(
        "{}",
        summary(
            "Instagram Scraper Complete",
            &format!(
                "Instagram Scraping Complete!\n\n\
                 Posts scraped: {}\n\
                 Dataset ID: {}\n\n\
                 Other Scrape Types:\n  \
                 • 'details' - Full profile info\n  \
                 • 'comments' - Post comments\n\n\
                 Note: Always respect rate limits and ToS",
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

    #[test]
    fn input_shape() {
        let opts = InstagramOptions {
            urls: vec!["https://www.instagram.com/natgeo/".into()],
            results_type: "posts".into(),
            limit: 10,
        };
        assert_eq!(
            run_input(&opts),
            json!({
                "directUrls": ["https://www.instagram.com/natgeo/"],
                "resultsType": "posts",
                "resultsLimit": 10,
                "addParentData": true
            })
        );
    }

    #[test]
    fn engagement_sums_integer_counters() {
        let items = vec![
            json!({ "likesCount": 1200, "commentsCount": 30 }),
            json!({ "likesCount": -1, "likes": 5 }),
            json!({ "likesCount": "hidden" }),
        ];
        let stats = engagement(&items);
        assert_eq!(stats.total_likes, 1199);
        assert_eq!(stats.total_comments, 30);
        assert_eq!(stats.avg_likes, 399);
        assert_eq!(engagement(&[]).avg_likes, 0);
    }

    #[test]
    fn average_likes_round_down() {
        let items = vec![json!({ "likesCount": -1 }), json!({ "likesCount": 0 })];
        assert_eq!(engagement(&items).avg_likes, -1);
    }

    #[test]
    fn table_rows() {
        let items = vec![
            json!({ "type": "Video", "caption": "c".repeat(50), "likesCount": 45210,
                    "timestamp": "2024-03-01T12:00:00.000Z" }),
            json!({}),
        ];
        let out = posts_table(&items).to_string();
        assert!(out.contains("45,210"));
        assert!(out.contains("2024-03-01"));
        assert!(out.contains("No caption"));
        assert!(out.contains(&format!("{}...", "c".repeat(32))));
    }

    #[test]
    fn details_use_owner_fallback() {
        let out = post_details(&json!({
            "shortCode": "C4abc",
            "owner": { "username": "natgeo" },
            "hashtags": ["nature", "wildlife"]
        }));
        assert!(out.contains("Post URL: C4abc"));
        assert!(out.contains("Owner: natgeo"));
        assert!(out.contains("Hashtags: #nature #wildlife"));
    }
}
