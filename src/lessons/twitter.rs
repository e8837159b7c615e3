//! Twitter (X) Scraper: search tweets and summarize their engagement.

use serde_json::{json, Value};

use super::{print_config, run_actor};
use crate::client::ApifyClient;
use crate::render::{
    banner, check, cut, display, field, format_number, int_field, str_field, summary, text_field,
    truncate, Column, Panel, Table,
};
use crate::Result;

pub const ACTOR_ID: &str = "apidojo/twitter-scraper-lite";

const TABLE_ROWS: usize = 15;

const LIKES: &[&str] = &["favorite_count", "likes"];
const RETWEETS: &[&str] = &["retweet_count", "retweets"];
const REPLIES: &[&str] = &["reply_count", "replies"];
const TEXT: &[&str] = &["full_text", "text"];

#[derive(Debug, Clone, clap::Args)]
pub struct TwitterOptions {
    /// Search query, Twitter search operators are supported
    #[arg(long, default_value = "artificial intelligence")]
    pub query: String,
    #[arg(long, default_value_t = 20)]
    pub max_tweets: u32,
    /// `live` for recent tweets, `top` for popular ones
    #[arg(long, default_value = "live")]
    pub search_mode: String,
}

pub fn run_input(opts: &TwitterOptions) -> Value {
    json!({
        "searchTerms": [opts.query],
        "maxTweets": opts.max_tweets,
        "searchMode": opts.search_mode,
        "tweetLanguage": "en",
        "addUserInfo": true,
    })
}

fn user(tweet: &Value) -> Option<&Value> {
    tweet.get("user").filter(|u| u.is_object())
}

fn username(tweet: &Value) -> Option<String> {
    user(tweet)
        .and_then(|u| field(u, &["screen_name"]))
        .or_else(|| field(tweet, &["author"]))
        .map(display)
}

fn metric(tweet: &Value, keys: &[&str]) -> String {
    field(tweet, keys)
        .map(format_number)
        .unwrap_or_else(|| "0".to_string())
}

pub fn tweets_table(items: &[Value], query: &str) -> Table {
    let mut table = Table::with_title(format!("Tweets about '{query}'"))
        .column(Column::new("#").width(3))
        .column(Column::new("Author").width(15))
        .column(Column::new("Tweet").max_width(35))
        .column(Column::new("Likes").right())
        .column(Column::new("RTs").right())
        .column(Column::new("Replies").right());
    for (i, tweet) in items.iter().take(TABLE_ROWS).enumerate() {
        let text = str_field(tweet, TEXT).unwrap_or("");
        let text = if text.is_empty() {
            "No text".to_string()
        } else {
            truncate(text, 32)
        };
        let author = username(tweet).unwrap_or_else(|| "Unknown".to_string());
        table.add_row([
            (i + 1).to_string(),
            format!("@{}", cut(&author, 13)),
            text,
            metric(tweet, LIKES),
            metric(tweet, RETWEETS),
            metric(tweet, REPLIES),
        ]);
    }
    table
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engagement {
    pub total_likes: i64,
    pub total_retweets: i64,
    /// Likes plus retweets per tweet, rounded down.
    pub avg_per_tweet: i64,
}

pub fn engagement(items: &[Value]) -> Engagement {
    let total_likes: i64 = items.iter().map(|t| int_field(t, LIKES)).sum();
    let total_retweets: i64 = items.iter().map(|t| int_field(t, RETWEETS)).sum();
    let avg_per_tweet = if items.is_empty() {
        0
    } else {
        (total_likes + total_retweets).div_euclid(items.len() as i64)
    };
    Engagement {
        total_likes,
        total_retweets,
        avg_per_tweet,
    }
}

/// Canonical tweet URL, when both the author handle and the tweet id are known.
pub fn tweet_url(tweet: &Value) -> Option<String> {
    let handle = user(tweet).and_then(|u| str_field(u, &["screen_name"]))?;
    let id = field(tweet, &["id_str", "id"]).map(display)?;
    if handle.is_empty() || id.is_empty() {
        return None;
    }
    Some(format!("https://twitter.com/{handle}/status/{id}"))
}

fn entity_list(tweet: &Value, kind: &str, key: &str, prefix: char) -> Vec<String> {
    tweet
        .get("entities")
        .and_then(|e| e.get(kind))
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|e| str_field(e, &[key]))
                .filter(|s| !s.is_empty())
                .map(|s| format!("{prefix}{s}"))
                .collect()
        })
        .unwrap_or_default()
}

pub fn tweet_details(tweet: &Value) -> String {
    let empty = json!({});
    let author = user(tweet).unwrap_or(&empty);
    let mut out = String::new();

    out.push_str(&format!(
        "  Author: @{}\n",
        username(tweet).unwrap_or_else(|| "N/A".to_string())
    ));
    out.push_str(&format!("  Name: {}\n", text_field(author, &["name"], "N/A")));
    out.push_str(&format!(
        "  Followers: {}\n",
        metric(author, &["followers_count"])
    ));
    let verified = author.get("verified").and_then(Value::as_bool).unwrap_or(false);
    out.push_str(&format!("  Verified: {}\n", check(verified)));

    if let Some(text) = str_field(tweet, TEXT).filter(|t| !t.is_empty()) {
        out.push_str("\n  Tweet:\n");
        out.push_str(&Panel::new(text).width(60).to_string());
        out.push('\n');
    }

    out.push_str("\n  Engagement:\n");
    out.push_str(&format!("    Likes: {}\n", metric(tweet, &["favorite_count"])));
    out.push_str(&format!("    Retweets: {}\n", metric(tweet, &["retweet_count"])));
    out.push_str(&format!("    Replies: {}\n", metric(tweet, &["reply_count"])));
    let views = field(tweet, &["views_count", "views"])
        .map(format_number)
        .unwrap_or_else(|| "N/A".to_string());
    out.push_str(&format!("    Views: {views}\n"));

    if let Some(posted) = field(tweet, &["created_at", "timestamp"]).map(display) {
        if !posted.is_empty() {
            out.push_str(&format!("\n  Posted: {posted}\n"));
        }
    }
    if let Some(url) = tweet_url(tweet) {
        out.push_str(&format!("  URL: {url}\n"));
    }

    let hashtags = entity_list(tweet, "hashtags", "text", '#');
    if !hashtags.is_empty() {
        out.push_str(&format!("\n  Hashtags: {}\n", hashtags.join(" ")));
    }
    let mentions = entity_list(tweet, "user_mentions", "screen_name", '@');
    if !mentions.is_empty() {
        out.push_str(&format!("  Mentions: {}\n", mentions.join(" ")));
    }
    out
}

pub async fn run(client: &ApifyClient, opts: &TwitterOptions) -> Result<()> {
    println!("{}", banner("07 - Twitter (X) Scraper"));

    let input = run_input(opts);
    print_config(
        "Configuration",
        &[
            ("Actor", ACTOR_ID.to_string()),
            ("Search Query", opts.query.clone()),
            ("Max Tweets", opts.max_tweets.to_string()),
            ("Mode", opts.search_mode.clone()),
        ],
    );

    let output = run_actor(client, ACTOR_ID, &input, "1-2 minutes").await?;
    let items = &output.items;
    println!("  Tweets found: {}", items.len());

    if let Some(first) = items.first() {
        println!("\n{}", tweets_table(items, &opts.query));

        let stats = engagement(items);
        println!("\nEngagement Summary:");
        println!("  Total Likes: {}", format_number(&json!(stats.total_likes)));
        println!("  Total Retweets: {}", format_number(&json!(stats.total_retweets)));
        println!(
            "  Avg Engagement/Tweet: {}",
            format_number(&json!(stats.avg_per_tweet))
        );

        println!("\nSample Tweet Details:\n");
        print!("{}", tweet_details(first));
    }

    println!(
        "{}",
        summary(
            "Twitter Scraper Complete",
            &format!(
                "Twitter Scraping Complete!\n\n\
                 Tweets found: {}\n\
                 Dataset ID: {}\n\n\
                 Search Tips:\n  \
                 • 'from:username' - tweets from user\n  \
                 • '#hashtag' - tweets with hashtag\n  \
                 • 'keyword filter:links' - with links\n  \
                 • 'keyword -filter:retweets' - no RTs\n\n\
                 Great for sentiment analysis and social listening!",
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

    fn opts() -> TwitterOptions {
        TwitterOptions {
            query: "artificial intelligence".into(),
            max_tweets: 20,
            search_mode: "live".into(),
        }
    }

    #[test]
    fn input_shape() {
        assert_eq!(
            run_input(&opts()),
            json!({
                "searchTerms": ["artificial intelligence"],
                "maxTweets": 20,
                "searchMode": "live",
                "tweetLanguage": "en",
                "addUserInfo": true
            })
        );
    }

    #[test]
    fn table_shows_first_fifteen() {
        let items: Vec<Value> = (0..20)
            .map(|i| json!({ "user": { "screen_name": format!("user{i}") }, "full_text": "hi" }))
            .collect();
        let table = tweets_table(&items, &opts().query);
        assert_eq!(table.len(), 15);
        assert!(table.to_string().contains("@user14"));
        assert!(!table.to_string().contains("@user15"));
    }

    #[test]
    fn engagement_average_is_floored() {
        let items = vec![
            json!({ "favorite_count": 10, "retweet_count": 1 }),
            json!({ "likes": 4 }),
        ];
        let stats = engagement(&items);
        assert_eq!(stats.total_likes, 14);
        assert_eq!(stats.total_retweets, 1);
        assert_eq!(stats.avg_per_tweet, 7);
        assert_eq!(engagement(&[]).avg_per_tweet, 0);
    }

    #[test]
    fn details_with_entities() {
        let tweet = json!({
            "id_str": "1790000000000000000",
            "full_text": "Shipping the new model today #AI #ML with @openai",
            "favorite_count": 1500,
            "user": { "screen_name": "apify", "name": "Apify", "followers_count": 25_000, "verified": false },
            "entities": {
                "hashtags": [{ "text": "AI" }, { "text": "ML" }],
                "user_mentions": [{ "screen_name": "openai" }]
            }
        });
        let out = tweet_details(&tweet);
        assert!(out.contains("Author: @apify"));
        assert!(out.contains("Followers: 25.0K"));
        assert!(out.contains("Verified: ✗"));
        assert!(out.contains("Likes: 1.5K"));
        assert!(out.contains("Views: N/A"));
        assert!(out.contains("URL: https://twitter.com/apify/status/1790000000000000000"));
        assert!(out.contains("Hashtags: #AI #ML"));
        assert!(out.contains("Mentions: @openai"));
    }

    #[test]
    fn url_needs_handle_and_id() {
        assert_eq!(tweet_url(&json!({ "id": 5, "author": "someone" })), None);
        assert_eq!(
            tweet_url(&json!({ "id": 5, "user": { "screen_name": "x" } })),
            Some("https://twitter.com/x/status/5".to_string())
        );
    }
}
