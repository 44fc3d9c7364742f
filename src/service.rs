//! Validation and business rules for managing short links

use chrono::Utc;
use tracing::info;
use url::Url;

use crate::error::LinkError;
use crate::model::{Link, MAX_PATH_LEN};
use crate::resolver::is_reserved_segment;
use crate::store::LinkStore;

/// Result of a successful [`LinkService::create_link`]
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub link: Link,
    pub short_url: String,
}

#[derive(Clone)]
pub struct LinkService {
    store: LinkStore,
    base_url: String,
}

impl LinkService {
    pub fn new(store: LinkStore, base_url: &str) -> Self {
        LinkService {
            store,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn store(&self) -> &LinkStore {
        &self.store
    }

    /// Fully-qualified short URL for a path, e.g. `https://example.com/promo1`
    pub fn short_url(&self, short_path: &str) -> String {
        format!("{}/{}", self.base_url, short_path)
    }

    /// Validates the input and stores a new link.
    ///
    /// The lookup before the insert only saves a write transaction in the
    /// common case. The store's path index is what rejects concurrent
    /// creators, and both routes end in [`LinkError::DuplicatePath`].
    pub fn create_link(&self, long_url: &str, custom_path: &str) -> Result<CreatedLink, LinkError> {
        let custom_path = custom_path.trim();
        let long_url = long_url.trim();

        validate_path(custom_path)?;
        validate_destination(long_url)?;

        if self.store.find_by_path(custom_path).is_ok() {
            return Err(LinkError::DuplicatePath);
        }

        let link = self.store.insert(custom_path, long_url, Utc::now())?;
        info!(id = link.id, short_path = %link.short_path, "short link created");

        Ok(CreatedLink {
            short_url: self.short_url(&link.short_path),
            link,
        })
    }

    /// Every link, newest first, with `clicks` reported as zero.
    pub fn list_links(&self) -> Result<Vec<Link>, LinkError> {
        let mut links = self.store.list_all()?;
        for link in &mut links {
            link.clicks = 0;
        }
        Ok(links)
    }

    /// Changes the destination only; path, id and creation time stay as they were.
    pub fn update_link(&self, id: u64, long_url: &str) -> Result<Link, LinkError> {
        let long_url = long_url.trim();
        validate_destination(long_url)?;

        let link = self.store.update_destination(id, long_url)?;
        info!(id, short_path = %link.short_path, "short link destination updated");
        Ok(link)
    }

    pub fn delete_link(&self, id: u64) -> Result<(), LinkError> {
        let link = self.store.delete(id)?;
        info!(id, short_path = %link.short_path, "short link deleted");
        Ok(())
    }
}

/// Checks a requested short path against the namespace rules:
/// non-empty, at most [`MAX_PATH_LEN`] characters of `[A-Za-z0-9-]`, and not reserved.
pub fn validate_path(path: &str) -> Result<(), LinkError> {
    if path.is_empty() {
        return Err(LinkError::validation("Custom path is required"));
    }
    if !is_path_charset(path) {
        return Err(LinkError::validation("Invalid custom path format"));
    }
    if path.len() > MAX_PATH_LEN {
        return Err(LinkError::validation(format!(
            "Custom path must be at most {} characters",
            MAX_PATH_LEN
        )));
    }
    if is_reserved_segment(path) {
        return Err(LinkError::validation("Custom path is reserved"));
    }
    Ok(())
}

pub fn is_path_charset(path: &str) -> bool {
    !path.is_empty()
        && path
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// A destination must be an absolute URL with a host once its scheme is normalized.
/// The submitted text is what gets stored.
pub fn validate_destination(long_url: &str) -> Result<(), LinkError> {
    if long_url.is_empty() {
        return Err(LinkError::validation("Destination URL is required"));
    }

    match Url::parse(&normalize_destination(long_url)) {
        Ok(parsed) if parsed.host_str().is_some_and(|host| !host.is_empty()) => Ok(()),
        _ => Err(LinkError::validation("Invalid destination URL")),
    }
}

/// Prepends `https://` unless the URL already starts with `http://` or `https://`
/// (case-insensitive).
pub fn normalize_destination(long_url: &str) -> String {
    let has_scheme = ["http://", "https://"].iter().any(|scheme| {
        long_url
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });

    if has_scheme {
        long_url.to_string()
    } else {
        format!("https://{}", long_url)
    }
}

/// `Location` value for a stored destination.
///
/// Destinations made only of visible ASCII go out exactly as normalized.
/// Anything with spaces or non-ASCII characters is re-serialized through
/// [`Url`], which percent-encodes it.
pub fn redirect_location(long_url: &str) -> Option<String> {
    let destination = normalize_destination(long_url);
    if destination.bytes().all(|b| b.is_ascii_graphic()) {
        return Some(destination);
    }

    Url::parse(&destination).ok().map(String::from)
}
