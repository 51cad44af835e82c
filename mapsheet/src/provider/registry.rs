//! Built-in tile provider table.

use super::types::{ProviderConfig, ProviderError};

/// OpenStreetMap standard tiles.
pub const OSM: ProviderConfig = ProviderConfig::new(
    "osm",
    "OpenStreetMap",
    "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
    "© OpenStreetMap contributors",
)
.with_subdomains(&["a", "b", "c"]);

/// Esri World Imagery satellite tiles.
///
/// Note the `{y}/{x}` order in the template.
pub const SATELLITE: ProviderConfig = ProviderConfig::new(
    "satellite",
    "ArcGIS World Imagery",
    "https://services.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
    "Source: Esri, Maxar, Earthstar Geographics",
)
.with_max_zoom(19);

static PROVIDERS: [ProviderConfig; 2] = [OSM, SATELLITE];

/// Key of the provider used when nothing is configured.
pub const DEFAULT_PROVIDER: &str = "osm";

/// Looks up a provider by key.
///
/// Unknown keys are a configuration error and are reported, never replaced
/// by a default provider.
pub fn provider_config(key: &str) -> Result<&'static ProviderConfig, ProviderError> {
    PROVIDERS
        .iter()
        .find(|p| p.key == key)
        .ok_or_else(|| ProviderError::UnknownProvider(key.to_string()))
}

/// All registered providers, in display order.
pub fn all_providers() -> &'static [ProviderConfig] {
    &PROVIDERS
}

/// The provider after `key` in display order, wrapping around.
pub fn next_provider(key: &str) -> &'static ProviderConfig {
    let index = PROVIDERS.iter().position(|p| p.key == key);
    match index {
        Some(i) => &PROVIDERS[(i + 1) % PROVIDERS.len()],
        None => &PROVIDERS[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lookup_known_providers() {
        let osm = provider_config("osm").unwrap();
        assert_eq!(osm.label, "OpenStreetMap");
        assert_eq!(osm.subdomains, &["a", "b", "c"]);
        assert_eq!(osm.tile_size, 256);

        let sat = provider_config("satellite").unwrap();
        assert!(sat.subdomains.is_empty());
        assert_eq!(sat.max_zoom, 19);
    }

    #[test]
    fn test_unknown_provider_is_an_error() {
        let err = provider_config("mapquest").unwrap_err();
        assert_eq!(err, ProviderError::UnknownProvider("mapquest".to_string()));
    }

    #[test]
    fn test_default_provider_registered() {
        assert!(provider_config(DEFAULT_PROVIDER).is_ok());
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<_> = all_providers().iter().map(|p| p.key).collect();
        assert_eq!(keys.len(), all_providers().len());
    }

    #[test]
    fn test_next_provider_cycles() {
        assert_eq!(next_provider("osm").key, "satellite");
        assert_eq!(next_provider("satellite").key, "osm");
        assert_eq!(next_provider("unknown").key, "osm");
    }
}
