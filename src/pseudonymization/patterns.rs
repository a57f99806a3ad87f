//! Pattern resolution
//!
//! Turns a [`Settings`] object and a [`FileCategory`] into the ordered list of
//! regex sources the content anonymizer runs over a file.

use crate::domain::{FileCategory, Settings};

/// Built-in pattern selectable as the `E-Mail` option
pub const EMAIL_PATTERN: &str = r"([a-zA-Z0-9._%+-]+)@([a-zA-Z0-9.-]+\.[a-zA-Z]{2,})";

/// Built-in pattern selectable as the `IP-Adressen` option
///
/// The address must not touch an ASCII letter, digit or underscore on either
/// side. Non-ASCII letters such as `ä` do not block a match.
pub const IPV4_PATTERN: &str = r"(?<![0-9A-Za-z_])(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(?![0-9A-Za-z_])";

/// Looks up a built-in pattern by its option name
pub fn builtin_pattern(name: &str) -> Option<&'static str> {
    match name {
        "E-Mail" => Some(EMAIL_PATTERN),
        "IP-Adressen" => Some(IPV4_PATTERN),
        _ => None,
    }
}

/// Resolves the regex sources for a file category
///
/// For logs, built-ins named in `logSettings.checkedOptions` come first, then
/// `regexSettings.patterns`. Every other category only uses the user's regex
/// patterns. Missing settings yield an empty list and a warning; this never fails.
pub fn resolve_patterns(settings: &Settings, category: FileCategory) -> Vec<String> {
    let regex_patterns = settings.regex_settings.as_ref().map(|r| r.patterns.clone());

    match category {
        FileCategory::Log => {
            let builtins = settings.log_settings.as_ref().map(|log| {
                log.checked_options
                    .iter()
                    .filter_map(|option| {
                        let pattern = builtin_pattern(option);
                        if pattern.is_none() {
                            tracing::debug!(option = %option, "Ignoring unknown log option");
                        }
                        pattern
                    })
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            });

            match (builtins, regex_patterns) {
                (Some(mut builtins), Some(regex)) => {
                    builtins.extend(regex);
                    builtins
                }
                (Some(builtins), None) => builtins,
                (None, Some(regex)) => regex,
                (None, None) => {
                    tracing::warn!("No settings provided for logs");
                    Vec::new()
                }
            }
        }
        FileCategory::Json | FileCategory::Xml | FileCategory::Other => {
            regex_patterns.unwrap_or_else(|| {
                tracing::warn!(?category, "No regexes provided for JSON and XML");
                Vec::new()
            })
        }
    }
}
