use crate::error::Result;

/// Fetches a page body. Anything other than HTTP 200 is an error; callers
/// decide whether that aborts the pass or becomes a sentinel field.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Inserted between consecutive detail requests to bound the request rate.
pub trait Pacer {
    /// Sleep for some duration within `min_secs..=max_secs`, returning the
    /// seconds actually waited.
    fn pause(&mut self, min_secs: f64, max_secs: f64) -> f64;
}
