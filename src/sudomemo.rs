//! Sudomemo / flipnot.es flipnote pages.
//!
//! A flipnote is reachable either as `sudomemo.net/watch/<file id>` or through
//! the short link `flipnot.es/<flipnote id>`. Both serve the same watch page,
//! which exposes the video through Open Graph tags.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{Error, ExtractionError, Result};
use crate::extractor::Extractor;
use crate::fetch::Fetch;
use crate::page::{Page, Path};
use crate::query::{og_property, Policy, Query};
use crate::types::{Format, Metadata, Thumbnail};
use crate::utils::{int_or_none, urljoin};

pub const IE_NAME: &str = "sudomemo";

pub const VALID_URL: &str = r"(?x)
    (?:https?:)?//
    (?:
        (?:www\.)?sudomemo\.net/watch/(?P<id_sudomemo>[0-9A-F_]+)
        |flipnot\.es/(?P<id_flipnotes>[0-9A-Z]+)
    )";

/// Creator links are relative to this root, whichever host served the page.
pub const SITE_ROOT: &str = "https://sudomemo.net/";
const TITLE_SUFFIX: &str = " - Sudomemo";

// The page never states these; they were determined by probing the served files.
pub const FORMAT_EXT: &str = "mp4";
pub const VIDEO_CODEC: &str = "h264";
pub const AUDIO_CODEC: &str = "aac";
pub const FRAME_RATE: u32 = 30;

static VALID_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^(?:{VALID_URL})")).expect("VALID_URL is a valid pattern")
});

/// Identifier captured from a matching URL. Exactly one slot is filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMatch {
    /// File id from a `sudomemo.net/watch/...` URL.
    pub sudomemo_id: Option<String>,
    /// Flipnote id from a `flipnot.es/...` URL.
    pub flipnotes_id: Option<String>,
}

impl UrlMatch {
    /// Whichever id the URL carried.
    pub fn display_id(&self) -> &str {
        self.flipnotes_id
            .as_deref()
            .or(self.sudomemo_id.as_deref())
            .unwrap_or_default()
    }
}

pub fn match_url(url: &str) -> Option<UrlMatch> {
    let caps = VALID_URL_RE.captures(url)?;
    Some(UrlMatch {
        sudomemo_id: caps.name("id_sudomemo").map(|m| m.as_str().to_string()),
        flipnotes_id: caps.name("id_flipnotes").map(|m| m.as_str().to_string()),
    })
}

/// Build the info record from an already fetched watch page.
pub fn extract_from_html(url_match: &UrlMatch, html: &str) -> Result<Metadata, ExtractionError> {
    let page = Page::parse(html);

    let video_url = og_property(&page, "video:secure_url", Some("video URL"), Policy::Required)?
        .ok_or_else(|| ExtractionError::missing("video URL"))?;

    let id = match &url_match.flipnotes_id {
        Some(id) => id.clone(),
        None => Query::new(
            Path::sibling_text(r#"span[class*="flipnote-id"]"#),
            "flipnote ID",
        )
        .single()
        .strings()
        .optional()
        .run(&page)?
        .into_string()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .or_else(|| url_match.sudomemo_id.clone())
        .ok_or_else(|| ExtractionError::missing("flipnote ID"))?,
    };

    let title = extract_title(&page)?;

    let format = Format {
        format_id: FORMAT_EXT.to_string(),
        url: video_url,
        ext: FORMAT_EXT.to_string(),
        width: int_or_none(og_property(&page, "video:width", None, Policy::Optional)?.as_deref()),
        height: int_or_none(og_property(&page, "video:height", None, Policy::Optional)?.as_deref()),
        vcodec: VIDEO_CODEC.to_string(),
        acodec: AUDIO_CODEC.to_string(),
        fps: FRAME_RATE,
    };

    let mut metadata = Metadata {
        id,
        title,
        formats: vec![format],
        webpage_url: og_property(&page, "url", None, Policy::Optional)?,
        thumbnails: None,
        channel: None,
        creators: None,
        channel_url: None,
    };

    if let Some(thumbnail_url) = og_property(&page, "image", None, Policy::Optional)?
        .filter(|url| !url.is_empty())
    {
        metadata.thumbnails = Some(vec![Thumbnail { url: thumbnail_url }]);
    }

    let creator_link = Query::new(Path::nodes(r#"div[class*="profile-right"] a"#), "creator")
        .single()
        .optional()
        .run(&page)?
        .first()
        .and_then(|result| result.as_node());

    if let Some(link) = creator_link {
        let name = link.text().collect::<String>().trim().to_string();
        if name.is_empty() {
            warn!("creator link has no text - leaving channel unset");
        } else {
            metadata.channel = Some(name.clone());
            metadata.creators = Some(vec![name]);
        }
        metadata.channel_url = urljoin(SITE_ROOT, link.value().attr("href"));
    }

    debug!(id = %metadata.id, title = %metadata.title, "Extracted flipnote metadata");
    Ok(metadata)
}

fn extract_title(page: &Page) -> Result<String, ExtractionError> {
    let entry_title = Query::new(Path::text(r#"a[class*="entry-title"]"#), "title")
        .single()
        .strings()
        .optional()
        .run(page)?
        .into_string()
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty());

    if let Some(title) = entry_title {
        return Ok(title);
    }

    // A present og:title is used as-is once the suffix is gone, even if that leaves it empty
    og_property(page, "title", None, Policy::Optional)?
        .map(|title| {
            title
                .strip_suffix(TITLE_SUFFIX)
                .unwrap_or(title.as_str())
                .to_string()
        })
        .ok_or_else(|| ExtractionError::missing("title"))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SudomemoExtractor;

#[async_trait]
impl Extractor for SudomemoExtractor {
    fn name(&self) -> &'static str {
        IE_NAME
    }

    fn suitable(&self, url: &str) -> bool {
        match_url(url).is_some()
    }

    async fn extract(&self, url: &str, fetcher: &dyn Fetch) -> Result<Metadata> {
        let url_match = match_url(url).ok_or_else(|| Error::NoMatch {
            url: url.to_string(),
        })?;

        info!(id = url_match.display_id(), "[{}] Downloading webpage", IE_NAME);
        let html = fetcher.fetch_page(url).await?;

        Ok(extract_from_html(&url_match, &html)?)
    }
}
