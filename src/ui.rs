use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})";
const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {bytes} {msg}";

// Progress display for a download whose size is not known yet
pub fn download_bar() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
        bar.set_style(style);
    }
    bar
}

// Switch to a proper bar once the response reports its size
pub fn set_total(bar: &ProgressBar, len: u64) {
    bar.set_length(len);
    if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
        bar.set_style(style.progress_chars("#>-"));
    }
}

// Bar used when progress output is disabled
pub fn hidden_bar() -> ProgressBar {
    ProgressBar::hidden()
}
