//! Digest content generator.
//!
//! Builds the HTML email body from a [`CategoryDigest`].

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt::Write;

use super::{sort_newest_first, CategoryDigest};
use crate::config::DEFAULT_TITLE;

const STYLESHEET: &str = r"
        body { font-family: Arial, sans-serif; font-size: 15px; }
        h1 { font-size: 22px; }
        h2 { font-size: 19px; border-bottom: 1px solid #ccc; padding-bottom: 5px; }
        ul { list-style-type: disc; padding-left: 25px; }
        li { margin-bottom: 12px; }
        a, a:visited { color: #007BFF; text-decoration: none; font-size: 16px; }
        a:hover { text-decoration: underline; }
        .published-time { color: #888; font-size: 0.9em; }
";

/// Headings used for well-known category keys unless the config overrides them.
const DEFAULT_DISPLAY_NAMES: [(&str, &str); 2] = [("blogs", "Blog Posts"), ("papers", "Papers")];

/// Renders a digest as an HTML document.
#[derive(Debug, Clone)]
pub struct DigestRenderer {
    title: String,
    display_names: HashMap<String, String>,
}

impl Default for DigestRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

impl DigestRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            display_names: DEFAULT_DISPLAY_NAMES
                .iter()
                .map(|(key, name)| ((*key).to_string(), (*name).to_string()))
                .collect(),
        }
    }

    /// Override category headings. Built-in headings for other keys are kept.
    #[must_use]
    pub fn with_display_names(mut self, display_names: HashMap<String, String>) -> Self {
        self.display_names.extend(display_names);
        self
    }

    /// `"{title} / YYYY-MM-DD"`, used for the top heading and the subject.
    pub fn heading(&self, date: NaiveDate) -> String {
        format!("{} / {}", self.title, date.format("%Y-%m-%d"))
    }

    /// Heading for a category: the configured override or the title-cased key.
    pub fn display_name(&self, category: &str) -> String {
        self.display_names
            .get(category)
            .cloned()
            .unwrap_or_else(|| title_case(category))
    }

    /// Render the digest. Empty categories are left out.
    #[must_use]
    pub fn render(&self, digest: &CategoryDigest, date: NaiveDate) -> String {
        let mut body = String::new();

        for (category, articles) in digest.sections() {
            if articles.is_empty() {
                continue;
            }

            let mut articles = articles.to_vec();
            sort_newest_first(&mut articles);

            let _ = write!(
                body,
                "<h2>{}</h2><ul>",
                html_escape(&self.display_name(category))
            );
            for article in &articles {
                let _ = write!(
                    body,
                    r#"<li><a href="{link}" target="_blank">{title}</a> <span class="published-time">({published})</span></li>"#,
                    link = html_escape(article.link()),
                    title = html_escape(article.title()),
                    published = article.published_display(),
                );
            }
            body.push_str("</ul>");
        }

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <style>{STYLESHEET}    </style>
</head>
<body><h1>{heading}</h1>
{body}
</body>
</html>"#,
            heading = html_escape(&self.heading(date)),
        )
    }
}

/// Capitalize the first letter of every alphabetic run and lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Simple HTML escaping for feed content.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
