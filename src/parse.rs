use scraper::{Html, Selector};

use crate::{Error, Result};

/// A heading found in a crawled page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// `h1`, `h2` or `h3`.
    pub level: String,
    pub text: String,
}

/// Collects the `h1`-`h3` headings of a page in document order, skipping empty ones.
pub fn extract_headings(html: &str) -> Result<Vec<Heading>> {
    let doc = Html::parse_document(html);
    let heading_selector = create_selector("h1, h2, h3")?;

    let headings = doc
        .select(&heading_selector)
        .filter_map(|el| {
            let text = el.text().collect::<Vec<_>>().join(" ");
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                return None;
            }
            Some(Heading {
                level: el.value().name().to_lowercase(),
                text,
            })
        })
        .collect();
    Ok(headings)
}

/// Text of the first `<title>` element, if any.
pub fn extract_title(html: &str) -> Result<Option<String>> {
    let doc = Html::parse_document(html);
    let title_selector = create_selector("title")?;
    Ok(doc
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty()))
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}
