//! The "query the tree, then apply a policy" primitive every field goes
//! through.

use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::page::{Page, Path, QueryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Single,
    Multiple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Node,
    String,
}

/// Whether an empty result aborts the extraction or just gets logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Required,
    Optional,
}

/// A path plus the field name used in diagnostics and its result policy.
///
/// Defaults to multiple node results that are required; narrow with the
/// builder methods.
#[derive(Debug, Clone)]
pub struct Query<'n> {
    pub path: Path,
    pub name: &'n str,
    pub arity: Arity,
    pub form: Form,
    pub policy: Policy,
}

/// Outcome of a query once its policy has been applied.
#[derive(Debug, Clone)]
pub enum Found<'a> {
    Single(Option<QueryResult<'a>>),
    Multiple(Vec<QueryResult<'a>>),
}

impl<'n> Query<'n> {
    pub fn new(path: Path, name: &'n str) -> Self {
        Self {
            path,
            name,
            arity: Arity::Multiple,
            form: Form::Node,
            policy: Policy::Required,
        }
    }

    pub fn single(mut self) -> Self {
        self.arity = Arity::Single;
        self
    }

    pub fn strings(mut self) -> Self {
        self.form = Form::String;
        self
    }

    pub fn optional(mut self) -> Self {
        self.policy = Policy::Optional;
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Run against `page`.
    ///
    /// An empty result is an [`ExtractionError::MissingField`] for a
    /// required query; an optional one logs a warning and yields `None` or
    /// an empty list depending on arity.
    pub fn run<'a>(&self, page: &'a Page) -> Result<Found<'a>, ExtractionError> {
        let mut results = page.evaluate(&self.path)?;

        if results.is_empty() {
            debug!(path = %self.path, "No results for query");
            match self.policy {
                Policy::Required => return Err(ExtractionError::missing(self.name)),
                Policy::Optional => {
                    warn!("unable to parse {} from webpage - continuing", self.name)
                }
            }
        }

        if self.form == Form::String {
            results = results.into_iter().map(QueryResult::into_text).collect();
        }

        Ok(match self.arity {
            Arity::Single => Found::Single(results.into_iter().next()),
            Arity::Multiple => Found::Multiple(results),
        })
    }
}

impl<'a> Found<'a> {
    /// First match, whatever the arity was.
    pub fn first(self) -> Option<QueryResult<'a>> {
        match self {
            Found::Single(result) => result,
            Found::Multiple(results) => results.into_iter().next(),
        }
    }

    pub fn into_vec(self) -> Vec<QueryResult<'a>> {
        match self {
            Found::Single(result) => result.into_iter().collect(),
            Found::Multiple(results) => results,
        }
    }

    pub fn into_string(self) -> Option<String> {
        self.first().map(|result| result.coerce_to_string())
    }
}

/// Read `<meta property="og:{property}" content="...">`.
///
/// `name` defaults to `og:{property}` in diagnostics.
pub fn og_property(
    page: &Page,
    property: &str,
    name: Option<&str>,
    policy: Policy,
) -> Result<Option<String>, ExtractionError> {
    let default_name = format!("og:{property}");
    let query = Query::new(
        Path::attribute(format!(r#"meta[property="og:{property}"]"#), "content"),
        name.unwrap_or(&default_name),
    )
    .single()
    .strings()
    .with_policy(policy);

    Ok(query.run(page)?.into_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <html>
        <head>
            <meta property="og:title" content="first">
            <meta property="og:title" content="second">
            <meta property="og:video:width" content="256">
        </head>
        <body>
            <ul><li>one</li><li>two</li><li>three</li></ul>
        </body>
        </html>
    "#;

    #[test]
    fn test_required_miss_names_the_field() {
        let page = Page::parse(HTML);
        let err = Query::new(Path::nodes("table"), "table").run(&page).unwrap_err();
        assert_eq!(err, ExtractionError::missing("table"));
        assert_eq!(err.to_string(), "Unable to parse table from webpage");
    }

    #[test]
    fn test_optional_miss_single_is_none() {
        let page = Page::parse(HTML);
        let found = Query::new(Path::nodes("table"), "table")
            .single()
            .optional()
            .run(&page)
            .unwrap();
        assert!(matches!(found, Found::Single(None)));
    }

    #[test]
    fn test_optional_miss_multiple_is_empty() {
        let page = Page::parse(HTML);
        let found = Query::new(Path::nodes("table"), "table")
            .optional()
            .run(&page)
            .unwrap();
        assert!(found.into_vec().is_empty());
    }

    #[test]
    fn test_single_takes_first_in_document_order() {
        let page = Page::parse(HTML);
        let found = Query::new(Path::text("li"), "item").single().run(&page).unwrap();
        assert_eq!(found.into_string().as_deref(), Some("one"));
    }

    #[test]
    fn test_multiple_string_results_coerce_nodes() {
        let page = Page::parse(HTML);
        let items: Vec<String> = Query::new(Path::nodes("li"), "items")
            .strings()
            .run(&page)
            .unwrap()
            .into_vec()
            .into_iter()
            .map(|result| {
                assert!(matches!(result, QueryResult::Text(_)));
                result.coerce_to_string()
            })
            .collect();
        assert_eq!(items, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_og_property_reads_first_content() {
        let page = Page::parse(HTML);
        let title = og_property(&page, "title", None, Policy::Optional).unwrap();
        assert_eq!(title.as_deref(), Some("first"));

        let width = og_property(&page, "video:width", None, Policy::Required).unwrap();
        assert_eq!(width.as_deref(), Some("256"));
    }

    #[test]
    fn test_og_property_missing() {
        let page = Page::parse(HTML);
        assert_eq!(og_property(&page, "image", None, Policy::Optional).unwrap(), None);

        let err = og_property(&page, "video:secure_url", Some("video URL"), Policy::Required)
            .unwrap_err();
        assert_eq!(err, ExtractionError::missing("video URL"));
    }
}
