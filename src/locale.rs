// src/locale.rs
//
// Country/region code normalization. The planning core assumes codes are
// already in canonical form (upper-case country, `COUNTRY-REGION` region),
// so every entry point funnels through here first.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLocale {
    pub country: String,
    pub region: Option<String>,
}

/// Normalize a raw country/region pair into the canonical form used by the
/// holiday source: `US` / `US-CA`. A region given without a country prefix
/// (`ca`, `on`, `nsw`) is prefixed with the country code.
pub fn normalize_locale(country: &str, region: Option<&str>) -> NormalizedLocale {
    let country_code = country.trim().to_uppercase();
    let region_code = region.and_then(|raw| {
        let cleaned = raw.trim().to_uppercase().replace(' ', "");
        if cleaned.is_empty() {
            return None;
        }
        if cleaned.contains('-') {
            Some(cleaned)
        } else {
            Some(format!("{}-{}", country_code, cleaned))
        }
    });
    NormalizedLocale {
        country: country_code,
        region: region_code,
    }
}
