//! Tile URL template substitution.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::types::ProviderConfig;

/// Characters left as-is in a token: alphanumerics plus `-_.!~*'()`.
const TOKEN_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Builds the URL of tile `(zoom, x, y)` for `provider`.
///
/// `x` and `y` must already be normalized. The `{s}` subdomain is picked as
/// `(x + y) mod n`, which spreads requests over the subdomains
/// reproducibly. The access token is percent-encoded as a URI component,
/// so it is safe in a path segment as well as in the query.
///
/// # Example
///
/// ```
/// use mapsheet::provider::{build_tile_url, provider_config};
///
/// let osm = provider_config("osm").unwrap();
/// let url = build_tile_url(osm, "", 3, 4, 2);
/// assert_eq!(url, "https://a.tile.openstreetmap.org/3/4/2.png");
/// ```
pub fn build_tile_url(provider: &ProviderConfig, token: &str, zoom: u8, x: u32, y: u32) -> String {
    let mut url = provider
        .template
        .replace("{z}", &zoom.to_string())
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string());

    if url.contains("{s}") && !provider.subdomains.is_empty() {
        let index = (x as u64 + y as u64) % provider.subdomains.len() as u64;
        url = url.replace("{s}", provider.subdomains[index as usize]);
    }

    if url.contains("{token}") {
        let encoded = utf8_percent_encode(token, TOKEN_ESCAPE).to_string();
        url = url.replace("{token}", &encoded);
    }

    url
}
