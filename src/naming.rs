//! Model name and trigger phrase derivation.

use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

/// Fallback stem for names that slugify to nothing.
const FALLBACK_STEM: &str = "brand";

/// Maximum length of the trigger token stem.
const TRIGGER_STEM_LEN: usize = 8;

/// Slugify a brand display name: lowercase, collapse every run of
/// non-alphanumeric characters into a single hyphen, trim hyphens.
pub fn model_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Derive a model container name from a brand display name and an
/// epoch-seconds disambiguator.
///
/// The disambiguator keeps two registrations of the same brand name from
/// colliding on the provider side.
pub fn derive_model_name(name: &str, epoch_secs: u64) -> String {
    let slug = model_slug(name);
    let stem = if slug.is_empty() {
        FALLBACK_STEM
    } else {
        slug.as_str()
    };
    format!("{}-{}", stem, epoch_secs)
}

/// Derive a model container name using the current wall clock.
pub fn derive_model_name_now(name: &str) -> String {
    derive_model_name(name, epoch_seconds())
}

/// Derive a unique trigger phrase for a new brand.
///
/// The phrase is a compact uppercase token (so it never collides with
/// natural prompt text) with a random suffix so two brands with the same
/// display name still get distinct phrases.
pub fn derive_trigger_phrase(name: &str) -> String {
    let compact: String = model_slug(name)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(TRIGGER_STEM_LEN)
        .collect::<String>()
        .to_ascii_uppercase();
    let stem = if compact.is_empty() {
        FALLBACK_STEM.to_ascii_uppercase()
    } else {
        compact
    };
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}", stem, &suffix[..4].to_ascii_uppercase())
}

/// Seconds since the Unix epoch.
pub fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
