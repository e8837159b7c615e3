//! Google Maps Scraper: business listings, ratings and reviews for a search and location.

use serde_json::{json, Value};

use super::{print_config, run_actor};
use crate::client::ApifyClient;
use crate::render::{banner, cut, display, field, stars, summary, text_field, Column, Table};
use crate::Result;

pub const ACTOR_ID: &str = "compass/crawler-google-places";

#[derive(Debug, Clone, clap::Args)]
pub struct GoogleMapsOptions {
    /// What kind of business to find
    #[arg(long, default_value = "coffee shops")]
    pub query: String,
    /// Where to search
    #[arg(long, default_value = "San Francisco, CA")]
    pub location: String,
    /// Places per search, results are billed
    #[arg(long, default_value_t = 10)]
    pub max_results: u32,
}

pub fn run_input(opts: &GoogleMapsOptions) -> Value {
    json!({
        "searchStringsArray": [opts.query],
        "locationQuery": opts.location,
        "maxCrawledPlacesPerSearch": opts.max_results,
        "includeReviews": true,
        "maxReviews": 5,
        "includeImages": false,
        "language": "en",
        "maxConcurrency": 5,
    })
}

/// `4.5 ⭐⭐⭐⭐` for numeric ratings, the raw value otherwise.
pub fn rating_label(rating: Option<&Value>) -> String {
    match rating {
        Some(v) => match v.as_f64() {
            Some(r) => format!("{} {}", v, stars(r)),
            None => display(v),
        },
        None => "N/A".to_string(),
    }
}

pub fn places_table(items: &[Value], opts: &GoogleMapsOptions) -> Table {
    let mut table = Table::with_title(format!("'{}' in {}", opts.query, opts.location))
        .column(Column::new("#").width(3))
        .column(Column::new("Name").max_width(25))
        .column(Column::new("Rating").center())
        .column(Column::new("Reviews").right())
        .column(Column::new("Address").max_width(30));
    for (i, place) in items.iter().enumerate() {
        table.add_row([
            (i + 1).to_string(),
            cut(&text_field(place, &["title", "name"], "Unknown"), 22),
            rating_label(field(place, &["totalScore", "rating"])),
            text_field(place, &["reviewsCount", "reviews"], "0"),
            cut(&text_field(place, &["address", "street"], "N/A"), 27),
        ]);
    }
    table
}

pub fn place_details(place: &Value) -> String {
    let mut out = String::new();
    let line = |out: &mut String, label: &str, keys: &[&str]| {
        out.push_str(&format!("  {label}: {}\n", text_field(place, keys, "N/A")));
    };
    line(&mut out, "Name", &["title", "name"]);
    line(&mut out, "Category", &["categoryName", "category"]);
    line(&mut out, "Address", &["address"]);
    line(&mut out, "Phone", &["phone"]);
    line(&mut out, "Website", &["website"]);

    if let Some(location) = place.get("location").filter(|l| l.is_object()) {
        out.push_str(&format!(
            "  Coordinates: {}, {}\n",
            field(location, &["lat"])
                .or_else(|| field(place, &["latitude"]))
                .map(|v| v.to_string())
                .unwrap_or_else(|| "N/A".into()),
            field(location, &["lng"])
                .or_else(|| field(place, &["longitude"]))
                .map(|v| v.to_string())
                .unwrap_or_else(|| "N/A".into()),
        ));
    }

    if let Some(rating) = field(place, &["totalScore", "rating"]) {
        let reviews = field(place, &["reviewsCount"])
            .map(|v| v.to_string())
            .unwrap_or_else(|| "0".into());
        out.push_str(&format!("  Rating: {rating}/5 ({reviews} reviews)\n"));
    }

    let hours = field(place, &["openingHours", "hours"]).and_then(Value::as_array);
    if let Some(hours) = hours.filter(|h| !h.is_empty()) {
        out.push_str("\n  Opening Hours:\n");
        for h in hours.iter().take(3) {
            if h.is_object() {
                out.push_str(&format!(
                    "    {}: {}\n",
                    text_field(h, &["day"], "?"),
                    text_field(h, &["hours"], "N/A")
                ));
            } else {
                out.push_str(&format!("    {}\n", display(h)));
            }
        }
    }

    let reviews = place.get("reviews").and_then(Value::as_array);
    if let Some(reviews) = reviews.filter(|r| !r.is_empty()) {
        out.push_str("\n  Sample Reviews:\n");
        for review in reviews.iter().filter(|r| r.is_object()).take(3) {
            out.push_str(&format!(
                "    ⭐{} by {}\n",
                text_field(review, &["stars", "rating"], "?"),
                text_field(review, &["name", "author"], "Anonymous")
            ));
            out.push_str(&format!(
                "    \"{}...\"\n\n",
                cut(&text_field(review, &["text", "review"], ""), 100)
            ));
        }
    }
    out
}

pub async fn run(client: &ApifyClient, opts: &GoogleMapsOptions) -> Result<()> {
    println!("{}", banner("04 - Google Maps Scraper"));

    let input = run_input(opts);
    print_config(
        "Search Configuration",
        &[
            ("Query", opts.query.clone()),
            ("Location", opts.location.clone()),
            ("Max Results", opts.max_results.to_string()),
            ("Include Reviews", "Yes (up to 5 per place)".to_string()),
        ],
    );

    let output = run_actor(client, ACTOR_ID, &input, "2-3 minutes depending on result count").await?;
    let items = &output.items;
    println!("  Businesses found: {}", items.len());

    if let Some(first) = items.first() {
        println!("\n{}", places_table(items, opts));
        println!("\nDetailed View (first result):\n");
        print!("{}", place_details(first));
    }

    println!(
        "{}",
        summary(
            "Google Maps Scraper Complete",
            &format!(
                "Google Maps Scraping Complete!\n\n\
                 Businesses found: {}\n\
                 Location: {}\n\
                 Dataset ID: {}\n\n\
                 Extracted Data Includes:\n  \
                 • Business name, category, address\n  \
                 • Phone, website, coordinates\n  \
                 • Ratings and review counts\n  \
                 • Opening hours\n  \
                 • Customer reviews",
                items.len(),
                opts.location,
                output.dataset_id
            ),
        )
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> GoogleMapsOptions {
        GoogleMapsOptions {
            query: "coffee shops".into(),
            location: "San Francisco, CA".into(),
            max_results: 10,
        }
    }

    #[test]
    fn input_shape() {
        let input = run_input(&opts());
        assert_eq!(input["searchStringsArray"], json!(["coffee shops"]));
        assert_eq!(input["locationQuery"], "San Francisco, CA");
        assert_eq!(input["maxCrawledPlacesPerSearch"], 10);
        assert_eq!(input["includeReviews"], true);
        assert_eq!(input["maxReviews"], 5);
        assert_eq!(input["includeImages"], false);
        assert_eq!(input["language"], "en");
    }

    #[test]
    fn ratings() {
        assert_eq!(rating_label(Some(&json!(4.6))), "4.6 ⭐⭐⭐⭐");
        assert_eq!(rating_label(Some(&json!("new"))), "new");
        assert_eq!(rating_label(None), "N/A");
    }

    #[test]
    fn details_of_a_sparse_place() {
        let out = place_details(&json!({ "name": "Sightglass" }));
        assert!(out.contains("Name: Sightglass"));
        assert!(out.contains("Phone: N/A"));
        assert!(!out.contains("Opening Hours"));
        assert!(places_table(&[], &opts()).is_empty());
    }

    #[test]
    fn details_with_hours_and_reviews() {
        let out = place_details(&json!({
            "title": "Blue Bottle",
            "location": { "lat": 37.77, "lng": -122.42 },
            "totalScore": 4.5,
            "reviewsCount": 812,
            "openingHours": [{ "day": "Monday", "hours": "7 AM-5 PM" }, "Tuesday closed"],
            "reviews": [{ "name": "Ana", "stars": 5, "text": "Great pour-over" }]
        }));
        assert!(out.contains("Coordinates: 37.77, -122.42"));
        assert!(out.contains("Rating: 4.5/5 (812 reviews)"));
        assert!(out.contains("Monday: 7 AM-5 PM"));
        assert!(out.contains("Tuesday closed"));
        assert!(out.contains("⭐5 by Ana"));
    }
}
