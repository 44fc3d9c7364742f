//! Stateless URL helpers offered next to the shortener: a UTM campaign URL
//! builder and the request URL for the third-party QR image renderer.

use url::Url;

use crate::model::{QrFormat, UtmRequest};

/// Edge length requested from the QR renderer
const QR_SIZE: &str = "1000x1000";

/// Sets each non-empty campaign field as its `utm_*` query parameter.
///
/// Existing `utm_*` values are replaced; any other query parameters are kept
/// in their original order.
pub fn build_utm_url(params: &UtmRequest) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(params.base_url.trim())?;

    let campaign = [
        ("utm_source", params.source.trim()),
        ("utm_medium", params.medium.trim()),
        ("utm_campaign", params.campaign.trim()),
        ("utm_term", params.term.trim()),
        ("utm_content", params.content.trim()),
    ];

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    for &(key, value) in &campaign {
        if value.is_empty() {
            continue;
        }
        match pairs.iter().position(|(existing, _)| existing == key) {
            Some(first) => {
                pairs[first].1 = value.to_string();
                let mut index = 0;
                pairs.retain(|(existing, _)| {
                    let keep = index == first || existing != key;
                    index += 1;
                    keep
                });
            }
            None => pairs.push((key.to_string(), value.to_string())),
        }
    }

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    Ok(url)
}

/// Builds the image URL a client loads to render `data` as a QR code.
///
/// `data` must itself be an absolute URL; the image is never fetched here.
pub fn qr_image_url(api_url: &str, data: &str, format: QrFormat) -> Result<Url, url::ParseError> {
    let data = data.trim();
    Url::parse(data)?;
    let mut image_url = Url::parse(api_url)?;

    image_url
        .query_pairs_mut()
        .clear()
        .append_pair("data", data)
        .append_pair("size", QR_SIZE)
        .append_pair("format", format.as_str())
        .append_pair("qzone", "4")
        .append_pair("margin", "0");

    Ok(image_url)
}
