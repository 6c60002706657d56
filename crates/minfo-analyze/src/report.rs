use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Root of the inspection tool's JSON output:
/// `{ "media": { "@ref": ..., "track": [ ... ] } }`. The schema is defined
/// by the tool; only the parts this crate reads are named, everything else
/// rides along opaquely.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaReport {
    pub media: Option<MediaNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaNode {
    #[serde(rename = "@ref")]
    pub reference: Option<String>,
    pub track: Option<Vec<Track>>,
}

/// One stream or metadata record. `@type` discriminates
/// (General/Video/Audio/Text/Menu); the remaining attributes have no fixed
/// schema and are kept as an opaque map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl Track {
    /// String attribute, e.g. `Format` or `Language`. The tool writes
    /// nearly everything as strings; nested objects (`extra`) return None.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Attribute parsed as a number. The tool writes numbers as strings,
    /// e.g. `"Duration": "1506.432"`.
    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        self.attr(key).and_then(|value| value.parse().ok())
    }

    /// A `Yes`/`No` attribute such as `Default` or `Forced`.
    pub fn attr_flag(&self, key: &str) -> bool {
        self.attr(key).is_some_and(|value| value.eq_ignore_ascii_case("yes"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Track;

    fn track(value: serde_json::Value) -> Track {
        serde_json::from_value(value).expect("track should deserialize")
    }

    #[test]
    fn attributes_are_carried_opaquely() {
        let track = track(json!({
            "@type": "Video",
            "Format": "AVC",
            "Duration": "1506.432",
            "Default": "Yes",
            "SomethingNew": "kept"
        }));

        assert_eq!(track.kind, "Video");
        assert_eq!(track.attr("Format"), Some("AVC"));
        assert_eq!(track.attr_f64("Duration"), Some(1506.432));
        assert!(track.attr_flag("Default"));
        assert!(!track.attr_flag("Forced"));
        assert_eq!(track.attr("SomethingNew"), Some("kept"));
        assert_eq!(track.attr("Missing"), None);
    }

    #[test]
    fn nested_values_do_not_read_as_strings() {
        let track = track(json!({
            "@type": "Menu",
            "extra": { "_00_00_00_000": "Intro" }
        }));
        assert_eq!(track.attr("extra"), None);
        assert!(track.attributes.get("extra").is_some());
    }
}
