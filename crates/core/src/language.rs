//! Reduction of provider locales to languages ZITADEL accepts as a user's
//! preferred language.

/// Primary language subtags accepted by the import.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "bg", "cs", "de", "en", "es", "fr", "hu", "id", "it", "ja", "ko", "mk", "nl", "pl", "pt",
    "ro", "ru", "sv", "tr", "uk", "zh",
];

/// Reduce a locale such as `en-US` to its primary language subtag.
///
/// Matching is case-insensitive. Unsupported or unrecognized locales reduce
/// to an empty string so they are dropped instead of rejected by the import.
pub fn reduce(locale: &str) -> String {
    let lower = locale.trim().to_ascii_lowercase();
    let primary = lower.split('-').next().unwrap_or_default();

    if SUPPORTED_LANGUAGES.contains(&primary) {
        primary.to_string()
    } else {
        String::new()
    }
}
