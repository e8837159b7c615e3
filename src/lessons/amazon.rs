//! Amazon Product Scraper: search results with prices, ratings and a price analysis.

use serde_json::{json, Value};

use super::{print_config, run_actor};
use crate::client::ApifyClient;
use crate::render::{
    banner, cut, display, field, grouped_field, str_field, summary, text_field, truncate, Column,
    Table,
};
use crate::Result;

pub const ACTOR_ID: &str = "junglee/amazon-crawler";

#[derive(Debug, Clone, clap::Args)]
pub struct AmazonOptions {
    #[arg(long, default_value = "wireless earbuds")]
    pub keyword: String,
    /// Marketplace, e.g. `amazon.co.uk` or `amazon.de`
    #[arg(long, default_value = "amazon.com")]
    pub domain: String,
    #[arg(long, default_value_t = 10)]
    pub max_items: u32,
}

pub fn run_input(opts: &AmazonOptions) -> Value {
    json!({
        "keyword": opts.keyword,
        "domain": opts.domain,
        "maxItems": opts.max_items,
        "proxyConfiguration": { "useApifyProxy": true },
    })
}

/// Numeric price of a product. The actor reports either `{ "value": 19.99, ... }` or a
/// bare scalar.
pub fn price_value(product: &Value) -> Option<f64> {
    match product.get("price")? {
        Value::Object(price) => price.get("value").and_then(Value::as_f64),
        other => other.as_f64(),
    }
}

/// Price cell: `$19.99` for numeric object prices, the raw text otherwise.
pub fn price_label(product: &Value) -> String {
    match product.get("price") {
        Some(price @ Value::Object(_)) => {
            let currency = str_field(price, &["currency"]).unwrap_or("$");
            match field(price, &["value", "raw"]) {
                Some(v) => match v.as_f64() {
                    Some(n) => format!("{currency}{n:.2}"),
                    None => display(v),
                },
                None => "N/A".to_string(),
            }
        }
        Some(Value::Null) | None => "N/A".to_string(),
        Some(Value::String(s)) if s.is_empty() => "N/A".to_string(),
        Some(other) => display(other),
    }
}

pub fn products_table(items: &[Value], keyword: &str) -> Table {
    let mut table = Table::with_title(format!("Amazon Products: '{keyword}'"))
        .column(Column::new("#").width(3))
        .column(Column::new("Product").max_width(35))
        .column(Column::new("Price").width(10).right())
        .column(Column::new("Rating").width(8).center())
        .column(Column::new("Reviews").width(8).right());
    for (i, product) in items.iter().enumerate() {
        table.add_row([
            (i + 1).to_string(),
            truncate(&text_field(product, &["title"], "Unknown"), 32),
            price_label(product),
            text_field(product, &["stars", "rating"], "N/A"),
            grouped_field(product, &["reviewsCount", "reviews"]),
        ]);
    }
    table
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    pub lowest: f64,
    pub highest: f64,
    pub average: f64,
}

/// Statistics over the products with a numeric price, `None` when there are none.
pub fn price_stats(items: &[Value]) -> Option<PriceStats> {
    let prices: Vec<f64> = items.iter().filter_map(price_value).collect();
    if prices.is_empty() {
        return None;
    }
    let lowest = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let average = prices.iter().sum::<f64>() / prices.len() as f64;
    Some(PriceStats {
        lowest,
        highest,
        average,
    })
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

pub fn product_details(product: &Value) -> String {
    let mut out = String::new();
    out.push_str(&format!("  Title: {}\n", text_field(product, &["title"], "N/A")));
    out.push_str(&format!("  ASIN: {}\n", text_field(product, &["asin"], "N/A")));
    out.push_str(&format!("  Brand: {}\n", text_field(product, &["brand"], "N/A")));

    if let Some(price) = product.get("price").filter(|p| p.is_object()) {
        out.push_str(&format!(
            "  Price: {}\n",
            text_field(price, &["raw", "value"], "N/A")
        ));
        if let Some(before) = field(price, &["before"]).filter(|b| truthy(b)) {
            out.push_str(&format!("  Original: {} (discounted)\n", display(before)));
        }
    }

    out.push_str(&format!(
        "\n  Rating: {} / 5\n",
        text_field(product, &["stars"], "N/A")
    ));
    let reviews = if field(product, &["reviewsCount"]).is_some() {
        grouped_field(product, &["reviewsCount"])
    } else {
        "N/A".to_string()
    };
    out.push_str(&format!("  Reviews: {reviews}\n"));

    if let Some(availability) = field(product, &["availability", "inStock"]).filter(|a| truthy(a)) {
        out.push_str(&format!("  Availability: {}\n", display(availability)));
    }
    if field(product, &["isPrime", "prime"]).is_some_and(truthy) {
        out.push_str("  Prime: ✓ Prime Eligible\n");
    }

    let features = field(product, &["features", "bullets"]).and_then(Value::as_array);
    if let Some(features) = features.filter(|f| !f.is_empty()) {
        out.push_str("\n  Key Features:\n");
        for feature in features.iter().take(3) {
            out.push_str(&format!("    • {}...\n", cut(&display(feature), 60)));
        }
    }

    if let Some(url) = str_field(product, &["url", "link"]) {
        out.push_str(&format!("\n  URL: {}...\n", cut(url, 60)));
    }
    let images = field(product, &["images", "thumbnails"]).and_then(Value::as_array);
    if let Some(images) = images.filter(|i| !i.is_empty()) {
        out.push_str(&format!("  Images: {} available\n", images.len()));
    }
    out
}

pub async fn run(client: &ApifyClient, opts: &AmazonOptions) -> Result<()> {
    println!("{}", banner("08 - Amazon Product Scraper"));

    let input = run_input(opts);
    print_config(
        "Configuration",
        &[
            ("Actor", ACTOR_ID.to_string()),
            ("Search", opts.keyword.clone()),
            ("Domain", opts.domain.clone()),
            ("Max Products", opts.max_items.to_string()),
        ],
    );

    let output = run_actor(client, ACTOR_ID, &input, "2-3 minutes").await?;
    let items = &output.items;
    println!("  Products found: {}", items.len());

    if let Some(first) = items.first() {
        println!("\n{}", products_table(items, &opts.keyword));

        if let Some(stats) = price_stats(items) {
            println!("\nPrice Analysis:");
            println!("  Lowest: ${:.2}", stats.lowest);
            println!("  Highest: ${:.2}", stats.highest);
            println!("  Average: ${:.2}", stats.average);
        }

        println!("\nSample Product Details:\n");
        print!("{}", product_details(first));
    }

    println!(
        "{}",
        summary(
            "Amazon Scraper Complete",
            &format!(
                "Amazon Scraping Complete!\n\n\
                 Products found: {}\n\
                 Dataset ID: {}\n\n\
                 Use Cases:\n  \
                 • Price tracking and alerts\n  \
                 • Competitor monitoring\n  \
                 • Product research/sourcing\n  \
                 • Market analysis",
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
        let opts = AmazonOptions {
            keyword: "wireless earbuds".into(),
            domain: "amazon.com".into(),
            max_items: 10,
        };
        assert_eq!(
            run_input(&opts),
            json!({
                "keyword": "wireless earbuds",
                "domain": "amazon.com",
                "maxItems": 10,
                "proxyConfiguration": { "useApifyProxy": true }
            })
        );
    }

    #[test]
    fn prices_from_objects_and_scalars() {
        assert_eq!(price_value(&json!({ "price": { "value": 19.99 } })), Some(19.99));
        assert_eq!(price_value(&json!({ "price": 25 })), Some(25.0));
        assert_eq!(price_value(&json!({ "price": "$9.99" })), None);
        assert_eq!(price_value(&json!({})), None);

        assert_eq!(
            price_label(&json!({ "price": { "value": 19.5, "currency": "£" } })),
            "£19.50"
        );
        assert_eq!(price_label(&json!({ "price": { "raw": "$12.00" } })), "$12.00");
        assert_eq!(price_label(&json!({ "price": "$9.99" })), "$9.99");
        assert_eq!(price_label(&json!({ "price": "" })), "N/A");
        assert_eq!(price_label(&json!({})), "N/A");
    }

    #[test]
    fn stats_skip_unparseable_prices() {
        let items = vec![
            json!({ "price": { "value": 10.0 } }),
            json!({ "price": 30 }),
            json!({ "price": "call for price" }),
            json!({}),
        ];
        let stats = price_stats(&items).unwrap();
        assert_eq!(stats.lowest, 10.0);
        assert_eq!(stats.highest, 30.0);
        assert_eq!(stats.average, 20.0);
        assert!(price_stats(&[json!({})]).is_none());
    }

    #[test]
    fn table_and_details() {
        let product = json!({
            "title": "Soundcore by Anker P20i True Wireless Earbuds, 10mm Drivers",
            "asin": "B0BTYCRJSS",
            "price": { "value": 19.99, "currency": "$", "raw": "$19.99", "before": "$29.99" },
            "stars": 4.4,
            "reviewsCount": 51234,
            "isPrime": true,
            "features": ["Powerful Bass"],
            "url": "https://www.amazon.com/dp/B0BTYCRJSS"
        });
        let out = products_table(std::slice::from_ref(&product), "earbuds").to_string();
        assert!(out.contains("$19.99"));
        assert!(out.contains("51,234"));

        let details = product_details(&product);
        assert!(details.contains("ASIN: B0BTYCRJSS"));
        assert!(details.contains("Original: $29.99 (discounted)"));
        assert!(details.contains("Reviews: 51,234"));
        assert!(details.contains("Prime: ✓ Prime Eligible"));
        assert!(details.contains("• Powerful Bass..."));

        let sparse = product_details(&json!({}));
        assert!(sparse.contains("Reviews: N/A"));
        assert!(!sparse.contains("Prime"));
    }
}
