//! First contact with the API: who am I, and which actors do I have.

use crate::client::ApifyClient;
use crate::config::Config;
use crate::model::{Actor, User};
use crate::render::{banner, short_id, summary, Column, Table};
use crate::{step, Result};

const ACTORS_LIMIT: u32 = 5;

pub fn user_table(user: &User) -> Table {
    let or = |v: &Option<String>, default: &str| v.clone().unwrap_or_else(|| default.to_string());

    let mut table = Table::with_title("Your Apify Account")
        .column(Column::new("Property"))
        .column(Column::new("Value"));
    table.add_row(["Username".to_string(), or(&user.username, "N/A")]);
    table.add_row(["Email".to_string(), or(&user.email, "N/A")]);
    table.add_row(["User ID".to_string(), or(&user.id, "N/A")]);
    table.add_row(["Name".to_string(), or(&user.profile.name, "Not set")]);
    table.add_row(["Plan".to_string(), or(&user.plan.description, "Unknown")]);
    table.add_row([
        "Monthly Credits".to_string(),
        format!("${:.2}", user.plan.monthly_usage_credits_usd),
    ]);
    table
}

pub fn actors_table(actors: &[Actor]) -> Table {
    let mut table = Table::with_title("Sample Actors")
        .column(Column::new("Name"))
        .column(Column::new("Username"))
        .column(Column::new("ID"));
    for actor in actors.iter().take(ACTORS_LIMIT as usize) {
        table.add_row([
            actor.name.clone().unwrap_or_else(|| "Unknown".into()),
            actor.username.clone().unwrap_or_else(|| "Unknown".into()),
            short_id(&actor.id),
        ]);
    }
    table
}

pub async fn run(client: &ApifyClient, config: &Config) -> Result<()> {
    println!("{}", banner("01 - Hello World: Getting Started"));

    step!(1, "Getting API Token...");
    println!("  Token found: {}", config.masked_token());

    step!(2, "Initializing the client...");
    println!("  ✓ Client initialized for {}", config.base_url);

    step!(3, "Fetching user information...");
    let user = match client.me().await {
        Ok(user) => user,
        Err(e) => {
            println!("Error fetching user info: {e}");
            return Err(e);
        }
    };
    println!("{}", user_table(&user));

    step!(4, "Listing available actors...");
    match client.list_actors(ACTORS_LIMIT).await {
        Ok(page) if page.items.is_empty() => println!("  No actors found in your account"),
        Ok(page) => println!("{}", actors_table(&page.items)),
        Err(e) => println!("  Note: Couldn't list actors: {e}"),
    }

    println!(
        "{}",
        summary(
            "Hello World Complete",
            "Success! You're connected to Apify.\n\n\
             Next steps:\n  \
             • Run `apify-lab crawler` to crawl a website\n  \
             • Explore the Apify Store at https://apify.com/store\n  \
             • Check the API docs at https://docs.apify.com/api/v2",
        )
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::client::test_support::{client_for, TOKEN};

    fn config_for(server: &MockServer) -> Config {
        Config::new(Some(TOKEN.into()), Some(server.uri())).unwrap()
    }

    #[test]
    fn user_table_defaults() {
        let out = user_table(&User::default()).to_string();
        assert!(out.contains("Not set"));
        assert!(out.contains("Unknown"));
        assert!(out.contains("$0.00"));
    }

    #[test]
    fn actor_ids_are_shortened() {
        let actors = vec![Actor {
            id: "moJRLRc85AitArpNN".into(),
            name: Some("web-scraper".into()),
            username: Some("apify".into()),
            title: None,
        }];
        let out = actors_table(&actors).to_string();
        assert!(out.contains("moJRLRc85Ait..."));
        assert_eq!(actors_table(&[]).len(), 0);
    }

    #[tokio::test]
    async fn actor_listing_failure_is_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "username": "lab" } })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/acts"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        run(&client_for(&server), &config_for(&server)).await.unwrap();
    }

    #[tokio::test]
    async fn user_failure_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/acts"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = run(&client_for(&server), &config_for(&server)).await.unwrap_err();
        assert!(err.is_status(StatusCode::UNAUTHORIZED));
    }
}
