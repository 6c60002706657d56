use minfo_core::{MinfoError, MinfoResult, ResultsMap};
use serde_json::Value;

use crate::report::{MediaReport, Track};

/// Tracks of one report partitioned by type, document order preserved.
/// General and Menu keep the first match only, like the view they feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedTracks {
    pub general: Option<Track>,
    pub video: Vec<Track>,
    pub audio: Vec<Track>,
    pub text: Vec<Track>,
    pub menu: Option<Track>,
}

/// One chapter mark from the Menu track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// `HH:MM:SS.mmm` offset into the stream.
    pub offset: String,
    pub title: String,
}

impl ClassifiedTracks {
    /// Chapter marks from the Menu track's `extra` object, which maps
    /// `_HH_MM_SS_mmm` keys to titles (optionally `lang:`-prefixed).
    /// Malformed keys are skipped. The zero-padded key format makes the
    /// map's sorted iteration order chronological.
    pub fn chapters(&self) -> Vec<Chapter> {
        let Some(menu) = &self.menu else {
            return Vec::new();
        };
        let Some(extra) = menu.attributes.get("extra").and_then(Value::as_object) else {
            return Vec::new();
        };

        extra
            .iter()
            .filter_map(|(key, value)| {
                let offset = parse_offset_key(key)?;
                let title = strip_language_prefix(value.as_str()?).to_string();
                Some(Chapter { offset, title })
            })
            .collect()
    }
}

/// Build the structured view of one analysis.
///
/// `Ok(None)` means the server returned no JSON report, so only the text
/// view is available. `Err` means a report was present but unreadable; the
/// caller surfaces that as a notice over the raw payload instead of failing
/// the submission.
pub fn classify(results: &ResultsMap) -> MinfoResult<Option<ClassifiedTracks>> {
    match results.get("json") {
        Some(raw) => classify_report(raw).map(Some),
        None => Ok(None),
    }
}

/// Decode one report document and partition its tracks.
pub fn classify_report(raw: &str) -> MinfoResult<ClassifiedTracks> {
    let report: MediaReport =
        serde_json::from_str(raw).map_err(|err| MinfoError::Report(err.to_string()))?;
    let tracks = report
        .media
        .and_then(|media| media.track)
        .ok_or_else(|| MinfoError::Report("missing media.track sequence".to_string()))?;

    let mut classified = ClassifiedTracks::default();
    for track in tracks {
        match track.kind.as_str() {
            "General" => {
                if classified.general.is_none() {
                    classified.general = Some(track);
                }
            }
            "Video" => classified.video.push(track),
            "Audio" => classified.audio.push(track),
            "Text" => classified.text.push(track),
            "Menu" => {
                if classified.menu.is_none() {
                    classified.menu = Some(track);
                }
            }
            other => tracing::debug!(kind = other, "skipping unrecognized track type"),
        }
    }
    Ok(classified)
}

/// `_00_05_30_000` -> `00:05:30.000`.
fn parse_offset_key(key: &str) -> Option<String> {
    let parts: Vec<&str> = key.strip_prefix('_')?.split('_').collect();
    let [hours, minutes, seconds, millis] = parts.as_slice() else {
        return None;
    };
    for part in &parts {
        if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
    }
    Some(format!("{hours}:{minutes}:{seconds}.{millis}"))
}

/// Chapter titles may carry a short language prefix, e.g. `en:Opening`.
fn strip_language_prefix(title: &str) -> &str {
    match title.split_once(':') {
        Some((prefix, rest))
            if prefix.len() <= 3 && prefix.bytes().all(|byte| byte.is_ascii_alphabetic()) =>
        {
            rest
        }
        _ => title,
    }
}

#[cfg(test)]
mod tests {
    use minfo_core::{MinfoError, ResultsMap};

    use super::{classify, classify_report, parse_offset_key, strip_language_prefix};

    fn results_with_json(raw: &str) -> ResultsMap {
        let mut results = ResultsMap::new();
        results.insert("json".to_string(), raw.to_string());
        results
    }

    #[test]
    fn partitions_tracks_by_type_in_document_order() {
        let raw = r#"{"media":{"track":[
            {"@type":"General"},
            {"@type":"Video"},
            {"@type":"Audio","Language":"en"},
            {"@type":"Audio","Language":"ja"}
        ]}}"#;
        let tracks = classify(&results_with_json(raw)).unwrap().unwrap();

        assert!(tracks.general.is_some());
        assert_eq!(tracks.video.len(), 1);
        assert_eq!(tracks.audio.len(), 2);
        assert_eq!(tracks.audio[0].attr("Language"), Some("en"));
        assert_eq!(tracks.audio[1].attr("Language"), Some("ja"));
        assert!(tracks.text.is_empty());
        assert!(tracks.menu.is_none());
    }

    #[test]
    fn missing_json_payload_means_no_structured_view() {
        let results = ResultsMap::new();
        assert!(classify(&results).unwrap().is_none());
    }

    #[test]
    fn garbage_json_is_an_explicit_report_error() {
        let result = classify(&results_with_json("not json"));
        assert!(matches!(result, Err(MinfoError::Report(_))));
    }

    #[test]
    fn document_without_track_sequence_is_a_report_error() {
        for raw in [r#"{}"#, r#"{"media":{}}"#, r#"{"media":null}"#] {
            let result = classify_report(raw);
            assert!(matches!(result, Err(MinfoError::Report(_))), "raw: {raw}");
        }
    }

    #[test]
    fn unrecognized_track_types_are_excluded_everywhere() {
        let raw = r#"{"media":{"track":[
            {"@type":"General"},
            {"@type":"Image"},
            {"@type":"Other"}
        ]}}"#;
        let tracks = classify_report(raw).unwrap();
        assert!(tracks.general.is_some());
        assert!(tracks.video.is_empty());
        assert!(tracks.audio.is_empty());
        assert!(tracks.text.is_empty());
        assert!(tracks.menu.is_none());
    }

    #[test]
    fn classification_is_deterministic() {
        let results = results_with_json(
            r#"{"media":{"track":[{"@type":"General"},{"@type":"Video","Format":"AVC"}]}}"#,
        );
        let first = classify(&results).unwrap();
        let second = classify(&results).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn chapters_come_from_the_menu_extra_map_in_order() {
        let raw = r#"{"media":{"track":[
            {"@type":"Menu","extra":{
                "_00_05_30_000":"en:Second",
                "_00_00_00_000":"First",
                "not_a_time":"skipped"
            }}
        ]}}"#;
        let tracks = classify_report(raw).unwrap();
        let chapters = tracks.chapters();

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].offset, "00:00:00.000");
        assert_eq!(chapters[0].title, "First");
        assert_eq!(chapters[1].offset, "00:05:30.000");
        assert_eq!(chapters[1].title, "Second");
    }

    #[test]
    fn no_menu_track_means_no_chapters() {
        let tracks = classify_report(r#"{"media":{"track":[{"@type":"General"}]}}"#).unwrap();
        assert!(tracks.chapters().is_empty());
    }

    #[test]
    fn offset_keys_must_be_fully_numeric() {
        assert_eq!(parse_offset_key("_00_05_30_000").as_deref(), Some("00:05:30.000"));
        assert_eq!(parse_offset_key("_00_05_30"), None);
        assert_eq!(parse_offset_key("chapters"), None);
        assert_eq!(parse_offset_key("_aa_bb_cc_dd"), None);
    }

    #[test]
    fn language_prefixes_are_stripped_only_when_short_and_alphabetic() {
        assert_eq!(strip_language_prefix("en:Opening"), "Opening");
        assert_eq!(strip_language_prefix("Opening"), "Opening");
        assert_eq!(strip_language_prefix("12:34 mark"), "12:34 mark");
    }
}
