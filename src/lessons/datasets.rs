//! Dataset operations: list, create, push, read back with pagination, inspect and clean up.

use serde::Serialize;
use serde_json::Value;

use super::demo_name;
use crate::client::{ApifyClient, ListItemsOptions};
use crate::model::Dataset;
use crate::render::{banner, check, cut, date, short_id, summary, timestamp, Column, Panel, Table};
use crate::{step, Result, CONSOLE_URL};

const LIST_LIMIT: u32 = 5;

#[derive(Debug, Clone, clap::Args)]
pub struct DatasetsOptions {
    /// Delete the demo dataset at the end instead of keeping it
    #[arg(long)]
    pub cleanup: bool,
}

/// Sample record pushed into the demo dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: u32,
    pub name: &'static str,
    pub category: &'static str,
    pub price: f64,
    pub in_stock: bool,
    pub tags: [&'static str; 3],
}

pub fn sample_books() -> Vec<Book> {
    let book = |id, name, category, price, in_stock, tags| Book {
        id,
        name,
        category,
        price,
        in_stock,
        tags,
    };
    vec![
        book(1, "Python Programming", "Programming", 29.99, true, ["python", "coding", "beginner"]),
        book(2, "Data Science Handbook", "Data Science", 49.99, true, ["data", "ml", "statistics"]),
        book(3, "Web Scraping Mastery", "Web Development", 34.99, false, ["scraping", "automation", "apify"]),
        book(4, "API Design Patterns", "Programming", 39.99, true, ["api", "rest", "design"]),
        book(5, "Machine Learning Basics", "Data Science", 54.99, true, ["ml", "ai", "tensorflow"]),
    ]
}

pub fn datasets_table(datasets: &[Dataset]) -> Table {
    let mut table = Table::with_title("Recent Datasets")
        .column(Column::new("Name"))
        .column(Column::new("ID"))
        .column(Column::new("Items").right())
        .column(Column::new("Modified"));
    for ds in datasets.iter().take(LIST_LIMIT as usize) {
        let name = ds.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("[unnamed]");
        table.add_row([
            cut(name, 20),
            short_id(&ds.id),
            ds.item_count.to_string(),
            date(ds.modified_at),
        ]);
    }
    table
}

pub fn books_table(books: &[Book]) -> Table {
    let mut table = Table::with_title("Items Pushed")
        .column(Column::new("ID"))
        .column(Column::new("Name"))
        .column(Column::new("Category"))
        .column(Column::new("Price").right())
        .column(Column::new("In Stock").center());
    for b in books {
        table.add_row([
            b.id.to_string(),
            b.name.to_string(),
            b.category.to_string(),
            format!("${}", b.price),
            check(b.in_stock).to_string(),
        ]);
    }
    table
}

/// Pretty-printed JSON of `items`, as shown in the export sample panel.
pub fn json_sample(items: &[Value]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

pub fn dataset_info(info: &Dataset) -> String {
    format!(
        "  Name: {}\n  ID: {}\n  Item Count: {}\n  Created: {}\n  Modified: {}\n  Accessed: {}\n",
        info.name.as_deref().unwrap_or("N/A"),
        info.id,
        info.item_count,
        timestamp(info.created_at),
        timestamp(info.modified_at),
        timestamp(info.accessed_at),
    )
}

pub async fn run(client: &ApifyClient, opts: &DatasetsOptions) -> Result<()> {
    println!("{}", banner("09 - Dataset Operations"));

    step!(1, "List Existing Datasets");
    let existing = client.list_datasets(LIST_LIMIT).await?;
    println!("  Found {} datasets in your account", existing.total);
    if !existing.items.is_empty() {
        println!("{}", datasets_table(&existing.items));
    }

    step!(2, "Create a New Dataset");
    let dataset_name = demo_name("learning-lab-demo");
    let dataset = client.get_or_create_dataset(&dataset_name).await?;
    let dataset_id = dataset.id;
    println!("  ✓ Created dataset: {dataset_name}");
    println!("    ID: {dataset_id}");

    step!(3, "Push Items to Dataset");
    let books = sample_books();
    client.push_items(&dataset_id, &books).await?;
    println!("  ✓ Pushed {} items to dataset", books.len());
    println!("{}", books_table(&books));

    step!(4, "Read Items from Dataset");
    println!("\n  Method 1: List with pagination");
    let page = client
        .list_items(
            &dataset_id,
            &ListItemsOptions {
                offset: Some(0),
                limit: Some(3),
                ..Default::default()
            },
        )
        .await?;
    println!("    Total items: {}", page.total);
    println!("    Retrieved: {} (offset: {})", page.count, page.offset);

    println!("\n  Method 2: Iterate all items");
    let all_items = client.iterate_items(&dataset_id).await?;
    println!("    Iterated over {} items", all_items.len());

    println!("\n  Method 3: Filter specific fields");
    let filtered = client
        .list_items(
            &dataset_id,
            &ListItemsOptions {
                fields: vec!["name".into(), "price".into()],
                ..Default::default()
            },
        )
        .await?;
    for item in filtered.items.iter().take(2) {
        println!("    {item}");
    }

    step!(5, "Export Data Formats");
    println!("  Available export formats:");
    for format in ["json", "csv", "xlsx", "xml"] {
        println!("    • {format}: GET /datasets/{dataset_id}/items?format={format}");
    }
    println!("\n  JSON Export Sample:");
    let sample = client
        .list_items(
            &dataset_id,
            &ListItemsOptions {
                limit: Some(2),
                ..Default::default()
            },
        )
        .await?;
    println!(
        "{}",
        Panel::new(json_sample(&sample.items)?).title("First 2 items as JSON")
    );

    step!(6, "Dataset Statistics");
    let info = client.get_dataset(&dataset_id).await?;
    print!("{}", dataset_info(&info));

    step!(7, "Clean Up");
    println!("\n  Demo dataset: {dataset_name}");
    if opts.cleanup {
        client.delete_dataset(&dataset_id).await?;
        println!("  ✓ Deleted dataset {dataset_id}");
    } else {
        println!("  Note: In real applications, you'd keep your datasets!");
        println!("  Keeping dataset for your reference (pass --cleanup to delete it).");
        println!("  View at: {CONSOLE_URL}/storage/datasets/{dataset_id}");
    }

    println!(
        "{}",
        summary(
            "Dataset Operations Complete",
            &format!(
                "Dataset Operations Complete!\n\n\
                 Dataset: {dataset_name}\n\
                 ID: {dataset_id}\n\
                 Items: {}\n\n\
                 Key Points:\n  \
                 • Datasets are append-only (no updates)\n  \
                 • Items can be any JSON objects\n  \
                 • Auto-cleanup after 7 days (unnamed)\n  \
                 • Named datasets persist indefinitely",
                books.len()
            ),
        )
    );
    Ok(())
}
