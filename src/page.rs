//! Parsed page tree and structural path evaluation.
//!
//! Pages are parsed with `scraper` (html5ever underneath), which recovers from
//! unclosed tags and bad nesting the same way a browser does. Parsing never
//! fails: garbage in yields a sparse tree, and queries against it simply come
//! back empty.

use std::borrow::Cow;
use std::fmt;

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractionError;

/// Read-only document tree for one fetched page.
pub struct Page {
    document: Html,
}

/// What a path yields from each element its selector matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The element itself.
    Node,
    /// Every non-blank descendant text node, in document order.
    Text,
    /// The value of the named attribute, when present.
    Attribute(String),
    /// Direct text of the sibling `span`s (the element included) that hold
    /// no `a` or `i` child.
    SiblingText,
}

/// A structural path expression: a CSS selector plus what to read from the
/// elements it selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub selector: String,
    pub target: Target,
}

/// One match produced by evaluating a [`Path`].
#[derive(Debug, Clone)]
pub enum QueryResult<'a> {
    Node(ElementRef<'a>),
    Text(Cow<'a, str>),
    Attribute(Cow<'a, str>),
}

impl Path {
    pub fn new(selector: impl Into<String>, target: Target) -> Self {
        Self {
            selector: selector.into(),
            target,
        }
    }

    pub fn nodes(selector: impl Into<String>) -> Self {
        Self::new(selector, Target::Node)
    }

    pub fn text(selector: impl Into<String>) -> Self {
        Self::new(selector, Target::Text)
    }

    pub fn attribute(selector: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(selector, Target::Attribute(name.into()))
    }

    pub fn sibling_text(selector: impl Into<String>) -> Self {
        Self::new(selector, Target::SiblingText)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Target::Node => write!(f, "{}", self.selector),
            Target::Text => write!(f, "{} ::text", self.selector),
            Target::Attribute(name) => write!(f, "{} @{}", self.selector, name),
            Target::SiblingText => write!(f, "{} ::sibling-text", self.selector),
        }
    }
}

impl<'a> QueryResult<'a> {
    /// Textual form of the match. Elements collapse to their trimmed
    /// descendant text.
    pub fn coerce_to_string(&self) -> String {
        match self {
            QueryResult::Node(element) => element_text(element),
            QueryResult::Text(text) | QueryResult::Attribute(text) => text.to_string(),
        }
    }

    /// Convert in place to a `Text` match.
    pub fn into_text(self) -> QueryResult<'a> {
        match self {
            QueryResult::Node(element) => QueryResult::Text(Cow::Owned(element_text(&element))),
            QueryResult::Attribute(text) => QueryResult::Text(text),
            text @ QueryResult::Text(_) => text,
        }
    }

    pub fn as_node(&self) -> Option<ElementRef<'a>> {
        match self {
            QueryResult::Node(element) => Some(*element),
            _ => None,
        }
    }
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Evaluate `path`, returning matches in document order.
    pub fn evaluate(&self, path: &Path) -> Result<Vec<QueryResult<'_>>, ExtractionError> {
        let selector =
            Selector::parse(&path.selector).map_err(|_| ExtractionError::InvalidSelector {
                selector: path.selector.clone(),
            })?;

        let mut results = Vec::new();
        for element in self.document.select(&selector) {
            match &path.target {
                Target::Node => results.push(QueryResult::Node(element)),
                Target::Text => results.extend(
                    element
                        .text()
                        .filter(|text| !text.trim().is_empty())
                        .map(|text| QueryResult::Text(Cow::Borrowed(text))),
                ),
                Target::Attribute(name) => {
                    if let Some(value) = element.value().attr(name) {
                        results.push(QueryResult::Attribute(Cow::Borrowed(value)));
                    }
                }
                Target::SiblingText => results.extend(
                    sibling_texts(element).map(|text| QueryResult::Text(Cow::Borrowed(text))),
                ),
            }
        }

        Ok(results)
    }
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn sibling_texts<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    element
        .parent()
        .into_iter()
        .flat_map(|parent| parent.children())
        .filter_map(ElementRef::wrap)
        .filter(|sibling| sibling.value().name() == "span")
        .filter(|sibling| {
            !sibling
                .children()
                .filter_map(ElementRef::wrap)
                .any(|child| matches!(child.value().name(), "a" | "i"))
        })
        .flat_map(|sibling| sibling.children())
        .filter_map(|child| child.value().as_text().map(|text| &**text))
        .filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_markup_still_parses() {
        let page = Page::parse("<div class='x'><p>unclosed <b>bold<span>nested</div></p>");
        let texts = page.evaluate(&Path::text("div.x")).unwrap();
        let joined: Vec<String> = texts.iter().map(QueryResult::coerce_to_string).collect();
        assert_eq!(joined, vec!["unclosed ", "bold", "nested"]);
    }

    #[test]
    fn test_empty_input_yields_no_matches() {
        let page = Page::parse("");
        assert!(page.evaluate(&Path::nodes("a")).unwrap().is_empty());
    }

    #[test]
    fn test_attribute_target_skips_elements_without_it() {
        let page = Page::parse(r#"<a>none</a><a href="/one">1</a><a href="/two">2</a>"#);
        let hrefs: Vec<String> = page
            .evaluate(&Path::attribute("a", "href"))
            .unwrap()
            .iter()
            .map(QueryResult::coerce_to_string)
            .collect();
        assert_eq!(hrefs, vec!["/one", "/two"]);
    }

    #[test]
    fn test_sibling_text_skips_spans_with_links_or_icons() {
        let html = r#"
            <div class="meta">
                <span class="flipnote-id"><i class="fa fa-hashtag"></i></span>
                <span><a href="/x">linked</a></span>
                <span>CADVLX</span>
            </div>
        "#;
        let page = Page::parse(html);
        let texts = page
            .evaluate(&Path::sibling_text(r#"span[class*="flipnote-id"]"#))
            .unwrap();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].coerce_to_string(), "CADVLX");
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let page = Page::parse("<p>hi</p>");
        let err = page.evaluate(&Path::nodes("p[")).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidSelector { .. }));
    }

    #[test]
    fn test_node_coerces_to_trimmed_text() {
        let page = Page::parse("<p>  hello <b>world</b>  </p>");
        let nodes = page.evaluate(&Path::nodes("p")).unwrap();
        assert_eq!(nodes[0].coerce_to_string(), "hello world");
        assert!(matches!(nodes[0].clone().into_text(), QueryResult::Text(_)));
    }
}
