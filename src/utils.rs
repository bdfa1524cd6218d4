use url::Url;

// Parse an integer attribute such as og:video:width, ignoring junk
pub fn int_or_none(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.trim().parse::<u32>().ok())
}

// Resolve `path` against `base`. An empty or missing path resolves to nothing.
pub fn urljoin(base: &str, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    Url::parse(base)
        .and_then(|base| base.join(path))
        .ok()
        .map(String::from)
}

// Protocol-relative URLs ("//host/...") get an https scheme so they can be fetched
pub fn absolute_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        url.to_string()
    }
}

// Build a file name that cannot escape the output directory
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let cleaned = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if cleaned.is_empty() {
        "video".to_string()
    } else {
        cleaned.to_string()
    }
}
