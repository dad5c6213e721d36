use super::error::BuddyError;
use super::messages::Message;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub id: i64,
    pub subject_id: Option<i64>,
    pub subject_name: Option<String>,
    pub title: String,
    pub url: String,
    pub tags: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewResource {
    pub title: String,
    pub url: String,
    pub subject_id: Option<i64>,
    pub tags: Vec<String>,
}

impl NewResource {
    pub fn new(title: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            subject_id: None,
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: &str) -> Self {
        self.tags = parse_tags(tags);
        self
    }

    /// A blank title falls back to the URL itself.
    pub fn validated(self) -> anyhow::Result<Self> {
        let url = self.url.trim().to_string();
        if url.is_empty() {
            return Err(BuddyError::invalid(Message::UrlRequired));
        }
        if !is_web_url(&url) {
            return Err(BuddyError::invalid(Message::InvalidUrl(url)));
        }
        let title = match self.title.trim() {
            "" => url.clone(),
            title => title.to_string(),
        };

        Ok(Self {
            title,
            url,
            subject_id: self.subject_id,
            tags: normalize_tags(self.tags),
        })
    }
}

/// Only `http(s)` links are rendered as clickable hrefs.
pub fn is_web_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Splits comma-separated input into normalised tags.
pub fn parse_tags(input: &str) -> Vec<String> {
    normalize_tags(input.split(',').map(str::to_string).collect())
}

/// Trims, lower-cases, drops empties and duplicates, and sorts.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut tags: Vec<String> = tags.iter().map(|t| normalize_tag(t)).filter(|t| !t.is_empty()).collect();
    tags.sort();
    tags.dedup();
    tags
}

pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(" DSA, graphs,,dsa , Graphs "), vec!["dsa", "graphs"]);
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn test_validated() {
        let resource = NewResource::new("  ", " https://cp-algorithms.com ").with_tags("Algo").validated().unwrap();
        assert_eq!(resource.title, "https://cp-algorithms.com");
        assert_eq!(resource.tags, vec!["algo"]);

        assert!(NewResource::new("Notes", "").validated().is_err());
        assert!(NewResource::new("Notes", "ftp://example.com").validated().is_err());
        assert!(NewResource::new("Notes", "javascript:alert(1)").validated().is_err());
    }

    #[test]
    fn test_is_web_url() {
        assert!(is_web_url("HTTPS://Example.com"));
        assert!(is_web_url(" http://example.com"));
        assert!(!is_web_url("javascript:alert(1)"));
        assert!(!is_web_url("//example.com"));
    }
}
