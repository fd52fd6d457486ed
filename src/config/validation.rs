//! Config validation: unknown-key detection with Levenshtein suggestions
//! and range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::DashboardConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Valid dotted key paths for `DashboardConfig`. Keys inside `[[wells]]`
/// entries appear as `wells.<field>`.
///
/// Any new field added to `DashboardConfig` must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [server]
        "server",
        "server.addr",
        "server.max_upload_bytes",
        "server.cors_origins",
        // [upload]
        "upload",
        "upload.base_url",
        "upload.timeout_secs",
        // [notifications]
        "notifications",
        "notifications.capacity",
        // [[wells]]
        "wells",
        "wells.name",
        "wells.depth",
    ];
    keys.iter().copied().collect()
}

/// Recursively collect dotted key paths from a TOML value. Arrays of tables
/// contribute their entries' keys under the array's own path.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            match v {
                toml::Value::Table(_) => keys.extend(walk_toml_keys(v, &path)),
                toml::Value::Array(items) => {
                    for item in items.iter().filter(|i| i.is_table()) {
                        for nested in walk_toml_keys(item, &path) {
                            if !keys.contains(&nested) {
                                keys.push(nested);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys; it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new(); // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Collect every value that would break startup or the dashboard.
pub fn validate_ranges(config: &DashboardConfig) -> Vec<String> {
    let mut errors = Vec::new();

    let addr = &config.server.addr;
    let port_ok = addr
        .rsplit_once(':')
        .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
    if !port_ok {
        errors.push(format!("server.addr = '{addr}' must be HOST:PORT"));
    }
    if config.server.max_upload_bytes == 0 {
        errors.push("server.max_upload_bytes must be > 0".to_string());
    }

    match reqwest::Url::parse(&config.upload.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(format!(
            "upload.base_url scheme '{}' is not http or https",
            url.scheme()
        )),
        Err(e) => errors.push(format!(
            "upload.base_url = '{}' is not a valid URL: {e}",
            config.upload.base_url
        )),
    }
    if config.upload.timeout_secs == 0 {
        errors.push("upload.timeout_secs must be > 0".to_string());
    }

    if config.notifications.capacity == 0 {
        errors.push("notifications.capacity must be > 0".to_string());
    }

    // Highlighting matches on name, so names must be unique.
    let mut seen = HashSet::new();
    for (i, well) in config.wells.iter().enumerate() {
        if well.name.trim().is_empty() {
            errors.push(format!("wells[{i}].name must not be empty"));
        } else if !seen.insert(well.name.as_str()) {
            errors.push(format!("wells[{i}].name '{}' is duplicated", well.name));
        }
        if !well.depth.is_finite() || well.depth < 0.0 {
            errors.push(format!(
                "wells[{i}].depth = {} must be a finite, non-negative number of feet",
                well.depth
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WellEntry;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("hello", "hello"), 0);
        assert_eq!(levenshtein("capacty", "capacity"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_includes_array_table_fields() {
        let toml: toml::Value = r#"
            [server]
            addr = "0.0.0.0:1"

            [[wells]]
            name = "A"
            depth = 1.0

            [[wells]]
            name = "B"
            depth = 2.0
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        for expected in ["server", "server.addr", "wells", "wells.name", "wells.depth"] {
            assert!(keys.contains(&expected.to_string()), "missing {expected}");
        }
        assert_eq!(keys.iter().filter(|k| *k == "wells.name").count(), 1);
    }

    #[test]
    fn test_unknown_key_gets_suggestion() {
        let warnings = validate_unknown_keys(
            r#"
            [upload]
            timeout_sec = 10
            "#,
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "upload.timeout_sec");
        assert_eq!(warnings[0].suggestion.as_deref(), Some("upload.timeout_secs"));
        assert!(warnings[0].to_string().contains("did you mean"));
    }

    #[test]
    fn test_known_keys_produce_no_warnings() {
        let warnings = validate_unknown_keys(
            r#"
            [notifications]
            capacity = 10
            [[wells]]
            name = "A"
            depth = 1.0
            "#,
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_ranges_catch_duplicates_and_bad_addr() {
        let mut config = DashboardConfig::default();
        config.server.addr = "no-port".to_string();
        config.wells = vec![WellEntry::new("A", 1.0), WellEntry::new("A", f64::NAN)];
        let errors = validate_ranges(&config);
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("duplicated")));
    }

    #[test]
    fn test_default_config_passes_ranges() {
        assert!(validate_ranges(&DashboardConfig::default()).is_empty());
    }
}
