//! Masking of secret fields inside structured (JSON) log payloads.
//!
//! Paths use dot notation; a `[]` suffix expands into every array element,
//! e.g. `"accounts[].token"`.

use serde_json::Value;

use super::mask;

/// Segments of a dot-notation field path.
enum PathSegment {
    /// Navigate into an object property by name.
    Key(String),
    /// Expand into every element of a JSON array.
    ArrayItem,
}

fn parse_path(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        if let Some(key) = part.strip_suffix("[]") {
            segments.push(PathSegment::Key(key.to_owned()));
            segments.push(PathSegment::ArrayItem);
        } else {
            segments.push(PathSegment::Key(part.to_owned()));
        }
    }
    segments
}

fn mask_at_path(value: &mut Value, segments: &[PathSegment]) {
    let Some((first, rest)) = segments.split_first() else {
        if let Value::String(s) = value {
            let masked = mask(Some(s.as_str()));
            *s = masked;
        }
        return;
    };

    match first {
        PathSegment::Key(key) => {
            if let Value::Object(map) = value {
                if let Some(child) = map.get_mut(key) {
                    mask_at_path(child, rest);
                }
            }
        }
        PathSegment::ArrayItem => {
            if let Value::Array(items) = value {
                for item in items.iter_mut() {
                    mask_at_path(item, rest);
                }
            }
        }
    }
}

/// Replace every string leaf found at `paths` with its [`mask`]ed form.
///
/// Missing paths and non-string leaves are left untouched.
pub fn redact_fields(payload: &mut Value, paths: &[&str]) {
    for path in paths {
        mask_at_path(payload, &parse_path(path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_path_array() {
        let segs = parse_path("accounts[].token");
        assert_eq!(segs.len(), 3);
        assert!(matches!(segs[1], PathSegment::ArrayItem));
    }

    #[test]
    fn redact_flat_field() {
        let mut val = json!({"api_key": "sk_live_abc123xyz", "name": "stripe"});
        redact_fields(&mut val, &["api_key"]);
        assert_eq!(val["api_key"], "sk_l***z");
        assert_eq!(val["name"], "stripe");
    }

    #[test]
    fn redact_nested_field() {
        let mut val = json!({"provider": {"credentials": {"secret": "whsec_0123456789"}}});
        redact_fields(&mut val, &["provider.credentials.secret"]);
        assert_eq!(val["provider"]["credentials"]["secret"], "whse***9");
    }

    #[test]
    fn redact_array_field() {
        let mut val = json!({
            "accounts": [
                {"token": "tok_aaaaaaaaaa1"},
                {"token": "short"}
            ]
        });
        redact_fields(&mut val, &["accounts[].token"]);
        assert_eq!(val["accounts"][0]["token"], "tok_***1");
        assert_eq!(val["accounts"][1]["token"], "***");
    }

    #[test]
    fn missing_or_non_string_is_noop() {
        let mut val = json!({"name": "Bob", "retries": 3});
        redact_fields(&mut val, &["api_key", "retries", "name.inner"]);
        assert_eq!(val, json!({"name": "Bob", "retries": 3}));
    }
}
