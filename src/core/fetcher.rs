//! Metadata fetching

use crate::core::VideoMetadata;
use crate::error::FetchError;
use crate::extractor::Extractor;
use tracing::{info, warn};

/// Probe `url` without downloading and normalize what the extractor reports.
///
/// No local URL validation happens beyond rejecting an empty string; whether
/// the URL is usable is decided by the extractor.
pub async fn fetch_metadata(extractor: &dyn Extractor, url: &str) -> Result<VideoMetadata, FetchError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(FetchError::EmptyUrl);
    }

    match extractor.probe(url, None).await {
        Ok(probe) => {
            let metadata = VideoMetadata::from_probe(probe);
            info!(title = %metadata.title, formats = metadata.formats.len(), "Fetched video metadata");
            Ok(metadata)
        }
        Err(e) => {
            warn!(error = %e, "Metadata probe failed");
            Err(FetchError::Extractor(e))
        }
    }
}
