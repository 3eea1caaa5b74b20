use reqwest::header::RANGE;
use reqwest::{Client, RequestBuilder};

use crate::http::items::ItemLocation;

/// The part of the file content to download.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Range {
    /// The whole file. No `Range` header is sent.
    #[default]
    Full,
    /// From the offset to the end of the file.
    From(u64),
    /// From `first` to `last`, both inclusive.
    Between(u64, u64),
    /// The final `n` bytes.
    Last(u64),
}

impl Range {
    pub(crate) fn header_value(&self) -> Option<String> {
        match self {
            Range::Full => None,
            Range::From(first) => Some(format!("bytes={first}-")),
            Range::Between(first, last) => Some(format!("bytes={first}-{last}")),
            Range::Last(n) => Some(format!("bytes=-{n}")),
        }
    }
}

/// The content endpoint answers with a redirect to a pre-authenticated url, which reqwest follows.
pub(crate) fn build(base_url: &str, client: &Client, item: &ItemLocation, range: &Range) -> RequestBuilder {
    let builder = client.get(item.url_with(base_url, "content"));
    match range.header_value() {
        Some(value) => builder.header(RANGE, value),
        None => builder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value() {
        assert_eq!(Range::default(), Range::Full);
        assert_eq!(Range::Full.header_value(), None);
        assert_eq!(Range::From(2000).header_value().as_deref(), Some("bytes=2000-"));
        assert_eq!(Range::Between(0, 1999).header_value().as_deref(), Some("bytes=0-1999"));
        assert_eq!(Range::Last(2000).header_value().as_deref(), Some("bytes=-2000"));
    }

    #[test]
    fn test_build_without_range() {
        let request = build(
            "https://graph.microsoft.com/v1.0",
            &Client::new(),
            &ItemLocation::id("F"),
            &Range::Full,
        )
        .build()
        .unwrap();
        assert_eq!(request.url().as_str(), "https://graph.microsoft.com/v1.0/me/drive/items/F/content");
        assert!(request.headers().get(RANGE).is_none());
    }
}
