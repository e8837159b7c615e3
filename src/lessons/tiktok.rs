//! TikTok Scraper: videos of profiles or hashtags with view and engagement counters.

use serde_json::{json, Value};

use super::{print_config, run_actor};
use crate::client::ApifyClient;
use crate::render::{
    banner, check, display, field, format_number, int_field, str_field, summary, text_field,
    truncate, Column, Panel, Table,
};
use crate::Result;

pub const ACTOR_ID: &str = "clockworks/free-tiktok-scraper";

const VIEWS: &[&str] = &["playCount", "plays"];
const LIKES: &[&str] = &["diggCount", "likes"];
const COMMENTS: &[&str] = &["commentCount", "comments"];
const SHARES: &[&str] = &["shareCount", "shares"];
const DESCRIPTION: &[&str] = &["text", "desc"];

#[derive(Debug, Clone, clap::Args)]
pub struct TiktokOptions {
    /// Profile usernames to scrape
    #[arg(long = "profile", default_value = "tiktok")]
    pub profiles: Vec<String>,
    /// Hashtags to search, without `#`
    #[arg(long = "hashtag")]
    pub hashtags: Vec<String>,
    /// Results per profile or hashtag
    #[arg(long, default_value_t = 10)]
    pub results_per_page: u32,
}

pub fn run_input(opts: &TiktokOptions) -> Value {
    json!({
        "profiles": opts.profiles,
        "hashtags": opts.hashtags,
        "resultsPerPage": opts.results_per_page,
        "shouldDownloadVideos": false,
        "shouldDownloadCovers": false,
    })
}

fn counter(video: &Value, keys: &[&str]) -> String {
    field(video, keys)
        .map(format_number)
        .unwrap_or_else(|| "0".to_string())
}

pub fn videos_table(items: &[Value]) -> Table {
    let mut table = Table::with_title("TikTok Videos")
        .column(Column::new("#").width(3))
        .column(Column::new("Description").max_width(30))
        .column(Column::new("Views").right())
        .column(Column::new("Likes").right())
        .column(Column::new("Comments").right())
        .column(Column::new("Shares").right());
    for (i, video) in items.iter().enumerate() {
        let desc = str_field(video, DESCRIPTION).unwrap_or("");
        let desc = if desc.is_empty() {
            "No description".to_string()
        } else {
            truncate(desc, 27)
        };
        table.add_row([
            (i + 1).to_string(),
            desc,
            counter(video, VIEWS),
            counter(video, LIKES),
            counter(video, COMMENTS),
            counter(video, SHARES),
        ]);
    }
    table
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Performance {
    pub total_views: i64,
    pub total_likes: i64,
    /// Likes per view in percent, zero without views.
    pub engagement_rate: f64,
}

pub fn performance(items: &[Value]) -> Performance {
    let total_views: i64 = items.iter().map(|v| int_field(v, VIEWS)).sum();
    let total_likes: i64 = items.iter().map(|v| int_field(v, LIKES)).sum();
    let engagement_rate = if total_views > 0 {
        total_likes as f64 / total_views as f64 * 100.0
    } else {
        0.0
    };
    Performance {
        total_views,
        total_likes,
        engagement_rate,
    }
}

/// Hashtags come either as plain strings or as `{ "name": ... }` objects.
fn hashtags(video: &Value) -> Vec<String> {
    let Some(tags) = video.get("hashtags").and_then(Value::as_array) else {
        return Vec::new();
    };
    tags.iter()
        .take(10)
        .filter_map(|t| match t {
            Value::String(s) => Some(s.as_str()),
            other => str_field(other, &["name"]),
        })
        .filter(|t| !t.is_empty())
        .map(|t| format!("#{t}"))
        .collect()
}

pub fn video_details(video: &Value) -> String {
    let mut out = String::new();
    let author = video.get("authorMeta").filter(|a| a.is_object());

    out.push_str(&format!("  Video ID: {}\n", text_field(video, &["id"], "N/A")));
    let author_name = author
        .and_then(|a| field(a, &["name"]))
        .or_else(|| field(video, &["author"]))
        .map(display)
        .unwrap_or_else(|| "N/A".to_string());
    out.push_str(&format!("  Author: @{author_name}\n"));

    if let Some(author) = author {
        let followers = field(author, &["fans", "followers"])
            .map(format_number)
            .unwrap_or_else(|| "0".to_string());
        out.push_str(&format!("  Author Followers: {followers}\n"));
        let verified = author.get("verified").and_then(Value::as_bool).unwrap_or(false);
        out.push_str(&format!("  Author Verified: {}\n", check(verified)));
    }

    if let Some(desc) = str_field(video, DESCRIPTION).filter(|d| !d.is_empty()) {
        out.push_str("\n  Description:\n");
        out.push_str(&Panel::new(truncate(desc, 200)).width(60).to_string());
        out.push('\n');
    }

    let tags = hashtags(video);
    if !tags.is_empty() {
        out.push_str(&format!("\n  Hashtags: {}\n", tags.join(" ")));
    }

    if let Some(music) = field(video, &["musicMeta", "music"]).filter(|m| m.is_object()) {
        out.push_str(&format!(
            "\n  Music: {} by {}\n",
            text_field(music, &["musicName", "title"], "N/A"),
            text_field(music, &["musicAuthor", "author"], "N/A")
        ));
    }

    let duration = video
        .get("videoMeta")
        .and_then(|m| field(m, &["duration"]))
        .or_else(|| field(video, &["duration"]))
        .map(display)
        .unwrap_or_else(|| "N/A".to_string());
    out.push_str(&format!("\n  Duration: {duration}s\n"));
    out.push_str(&format!(
        "  Created: {}\n",
        text_field(video, &["createTime", "created"], "N/A")
    ));
    if let Some(url) = str_field(video, &["webVideoUrl", "url"]) {
        out.push_str(&format!("  URL: {url}\n"));
    }
    out
}

pub async fn run(client: &ApifyClient, opts: &TiktokOptions) -> Result<()> {
    println!("{}", banner("06 - TikTok Scraper"));

    let input = run_input(opts);
    let mut config = vec![("Actor", ACTOR_ID.to_string())];
    if !opts.profiles.is_empty() {
        config.push(("Profiles", opts.profiles.join(", ")));
    }
    if !opts.hashtags.is_empty() {
        let tags: Vec<String> = opts.hashtags.iter().map(|h| format!("#{h}")).collect();
        config.push(("Hashtags", tags.join(", ")));
    }
    config.push(("Results Limit", opts.results_per_page.to_string()));
    print_config("Configuration", &config);

    let output = run_actor(client, ACTOR_ID, &input, "1-2 minutes").await?;
    let items = &output.items;
    println!("  Videos scraped: {}", items.len());

    if let Some(first) = items.first() {
        println!("\n{}", videos_table(items));

        let perf = performance(items);
        println!("\nPerformance Summary:");
        println!("  Total Views: {}", format_number(&json!(perf.total_views)));
        println!("  Total Likes: {}", format_number(&json!(perf.total_likes)));
        println!("  Engagement Rate: {:.2}%", perf.engagement_rate);

        println!("\nSample Video Details:\n");
        print!("{}", video_details(first));
    }

    println!(
        "{}",
        summary(
            "TikTok Scraper Complete",
            &format!(
                "TikTok Scraping Complete!\n\n\
                 Videos scraped: {}\n\
                 Dataset ID: {}\n\n\
                 Data Extracted:\n  \
                 • Video descriptions and hashtags\n  \
                 • Views, likes, comments, shares\n  \
                 • Author info and follower counts\n  \
                 • Music/sound information\n  \
                 • Video URLs and duration\n\n\
                 Great for trend analysis and influencer research!",
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
        let opts = TiktokOptions {
            profiles: vec!["tiktok".into()],
            hashtags: vec![],
            results_per_page: 10,
        };
        assert_eq!(
            run_input(&opts),
            json!({
                "profiles": ["tiktok"],
                "hashtags": [],
                "resultsPerPage": 10,
                "shouldDownloadVideos": false,
                "shouldDownloadCovers": false
            })
        );
    }

    #[test]
    fn counters_are_abbreviated() {
        let items = vec![json!({
            "text": "Behind the scenes",
            "playCount": 2_500_000,
            "diggCount": 120_400,
            "commentCount": 950,
            "shares": "n/a"
        })];
        let out = videos_table(&items).to_string();
        assert!(out.contains("2.5M"));
        assert!(out.contains("120.4K"));
        assert!(out.contains("950"));
        assert!(out.contains("n/a"));
    }

    #[test]
    fn engagement_rate() {
        let items = vec![
            json!({ "playCount": 1000, "diggCount": 50 }),
            json!({ "plays": 1000, "likes": 150 }),
        ];
        let perf = performance(&items);
        assert_eq!(perf.total_views, 2000);
        assert_eq!(perf.total_likes, 200);
        assert!((perf.engagement_rate - 10.0).abs() < f64::EPSILON);

        let perf = performance(&[json!({ "diggCount": 10 })]);
        assert_eq!(perf.engagement_rate, 0.0);
    }

    #[test]
    fn details_accept_both_hashtag_shapes() {
        let out = video_details(&json!({
            "id": "7301",
            "authorMeta": { "name": "tiktok", "fans": 81_000_000, "verified": true },
            "hashtags": [{ "name": "fyp" }, { "name": "" }, { "name": "news" }],
            "musicMeta": { "musicName": "original sound", "musicAuthor": "TikTok" },
            "videoMeta": { "duration": 15 }
        }));
        assert!(out.contains("Author: @tiktok"));
        assert!(out.contains("Author Followers: 81.0M"));
        assert!(out.contains("Author Verified: ✓"));
        assert!(out.contains("Hashtags: #fyp #news"));
        assert!(out.contains("Music: original sound by TikTok"));
        assert!(out.contains("Duration: 15s"));

        let out = video_details(&json!({ "hashtags": ["dance"] }));
        assert!(out.contains("Author: @N/A"));
        assert!(out.contains("Hashtags: #dance"));
        assert!(out.contains("Duration: N/As"));
    }
}
