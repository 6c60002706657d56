use console::style;
use minfo_analyze::{ClassifiedTracks, Track, classify};
use minfo_core::{AnalysisOutcome, ResultsMap, ViewMode};
use url::Url;

/// Print one finished analysis in the selected view, followed by the
/// elapsed-time line.
pub fn print_outcome(outcome: &AnalysisOutcome, view: ViewMode) {
    print_source_line(outcome);
    match view {
        ViewMode::Text => print_text_view(outcome),
        ViewMode::Structured => print_structured_view(outcome),
    }
    if let Some(duration) = outcome.duration {
        println!("{} in {} ms", style("Done").green(), duration.as_millis());
    }
    println!();
}

/// Just the JSON payload, for piping into other tools.
pub fn print_raw(outcome: &AnalysisOutcome) {
    match outcome.output("json") {
        Some(raw) => println!("{raw}"),
        None => eprintln!("{} no JSON data available", style("Warning:").yellow()),
    }
}

fn print_source_line(outcome: &AnalysisOutcome) {
    let Some(url) = outcome.url.as_deref() else {
        return;
    };
    match Url::parse(url).ok().and_then(|parsed| parsed.host_str().map(str::to_owned)) {
        Some(host) => println!("{} {} [{}]", style("Analyzed:").cyan(), url, style(host).dim()),
        None => println!("{} {url}", style("Analyzed:").cyan()),
    }
}

fn print_text_view(outcome: &AnalysisOutcome) {
    println!("{}", style("TEXT OUTPUT").dim());
    match outcome.output("text") {
        Some(text) => println!("{}", text.trim_end()),
        None => println!("No text data available."),
    }
}

fn print_structured_view(outcome: &AnalysisOutcome) {
    let empty = ResultsMap::new();
    let results = outcome.results.as_ref().unwrap_or(&empty);

    match classify(results) {
        Ok(Some(tracks)) => print_sections(&tracks),
        Ok(None) => {
            // No JSON report came back; the text output is all there is.
            print_text_view(outcome);
        }
        Err(err) => {
            tracing::warn!(error = %err, "structured view unavailable");
            println!("{} Could not parse the media report.", style("Analysis Data Error:").red());
            println!("{}", outcome.output("json").unwrap_or("No JSON data"));
        }
    }
}

fn print_sections(tracks: &ClassifiedTracks) {
    for line in summarize_general(tracks) {
        println!("{line}");
    }
    print_track_section("Video", &tracks.video, describe_video);
    print_track_section("Audio", &tracks.audio, describe_audio);
    print_track_section("Subtitles", &tracks.text, describe_text);

    let chapters = tracks.chapters();
    if !chapters.is_empty() {
        println!();
        println!("{}", style("Chapters").bold());
        for chapter in &chapters {
            println!("  {} {}", style(&chapter.offset).dim(), chapter.title);
        }
    }

    let accessibility = summarize_accessibility(tracks);
    if !accessibility.is_empty() {
        println!();
        println!("{}", style("Accessibility").bold());
        for line in accessibility {
            println!("  {line}");
        }
    }
}

fn print_track_section(title: &str, tracks: &[Track], describe: fn(&Track) -> String) {
    if tracks.is_empty() {
        return;
    }
    println!();
    println!("{}", style(title).bold());
    for (index, track) in tracks.iter().enumerate() {
        println!("  {} {}", style(format!("#{}", index + 1)).dim(), describe(track));
    }
}

fn summarize_general(tracks: &ClassifiedTracks) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(general) = &tracks.general {
        if let Some(format) = general.attr("Format") {
            lines.push(format!("Container: {format}"));
        }
        if let Some(duration) = general.attr_f64("Duration") {
            lines.push(format!("Duration: {}", format_duration(duration)));
        }
        if let Some(size) = general.attr_f64("FileSize") {
            lines.push(format!("Size: {}", format_size(size)));
        }
        if let Some(rate) = general.attr_f64("OverallBitRate") {
            lines.push(format!("Overall bit rate: {}", format_bitrate(rate)));
        }
        if let Some(app) = general.attr("Encoded_Application") {
            lines.push(format!("Written by: {app}"));
        }
    }
    lines.push(format!(
        "Tracks: {} video, {} audio, {} subtitle",
        tracks.video.len(),
        tracks.audio.len(),
        tracks.text.len()
    ));
    lines
}

fn describe_video(track: &Track) -> String {
    let mut parts = Vec::new();
    if let Some(format) = track.attr("Format") {
        match track.attr("Format_Profile") {
            Some(profile) => parts.push(format!("{format} ({profile})")),
            None => parts.push(format.to_string()),
        }
    }
    if let (Some(width), Some(height)) = (track.attr("Width"), track.attr("Height")) {
        parts.push(format!("{width}x{height}"));
    }
    if let Some(rate) = track.attr_f64("FrameRate") {
        parts.push(format!("{rate:.3} fps"));
    }
    if let Some(depth) = track.attr("BitDepth") {
        parts.push(format!("{depth} bits"));
    }
    if let Some(rate) = track.attr_f64("BitRate") {
        parts.push(format_bitrate(rate));
    }
    if let Some(hdr) = track.attr("HDR_Format") {
        parts.push(hdr.to_string());
    } else if let Some(primaries) = track.attr("colour_primaries") {
        parts.push(primaries.to_string());
    }
    if track.attr("ScanType").is_some_and(|scan| scan != "Progressive") {
        parts.push("interlaced".to_string());
    }
    finish_description(parts)
}

fn describe_audio(track: &Track) -> String {
    let mut parts = Vec::new();
    if let Some(format) = track.attr("Format") {
        parts.push(format.to_string());
    }
    if let Some(channels) = track.attr("Channels") {
        match track.attr("ChannelLayout") {
            Some(layout) => parts.push(format!("{channels} ch ({layout})")),
            None => parts.push(format!("{channels} ch")),
        }
    }
    if let Some(rate) = track.attr_f64("SamplingRate") {
        parts.push(format!("{:.1} kHz", rate / 1000.0));
    }
    if let Some(rate) = track.attr_f64("BitRate") {
        parts.push(format_bitrate(rate));
    }
    if let Some(language) = track.attr("Language") {
        parts.push(language.to_string());
    }
    if let Some(title) = track.attr("Title") {
        parts.push(format!("\"{title}\""));
    }
    push_flags(track, &mut parts);
    finish_description(parts)
}

fn describe_text(track: &Track) -> String {
    let mut parts = Vec::new();
    if let Some(format) = track.attr("Format") {
        parts.push(format.to_string());
    }
    if let Some(language) = track.attr("Language") {
        parts.push(language.to_string());
    }
    if let Some(title) = track.attr("Title") {
        parts.push(format!("\"{title}\""));
    }
    push_flags(track, &mut parts);
    finish_description(parts)
}

fn push_flags(track: &Track, parts: &mut Vec<String>) {
    if track.attr_flag("Default") {
        parts.push("[default]".to_string());
    }
    if track.attr_flag("Forced") {
        parts.push("[forced]".to_string());
    }
}

fn finish_description(parts: Vec<String>) -> String {
    if parts.is_empty() {
        "(no details)".to_string()
    } else {
        parts.join(", ")
    }
}

fn summarize_accessibility(tracks: &ClassifiedTracks) -> Vec<String> {
    let mut lines = Vec::new();

    let audio_languages = collect_languages(&tracks.audio);
    if !audio_languages.is_empty() {
        lines.push(format!("Audio languages: {}", audio_languages.join(", ")));
    }
    let subtitle_languages = collect_languages(&tracks.text);
    if !subtitle_languages.is_empty() {
        lines.push(format!("Subtitle languages: {}", subtitle_languages.join(", ")));
    }

    if tracks.audio.iter().any(is_audio_description) {
        lines.push("Audio description track present".to_string());
    }
    if tracks.text.iter().any(is_sdh_caption) {
        lines.push("SDH / closed captions present".to_string());
    }

    lines
}

fn collect_languages(tracks: &[Track]) -> Vec<String> {
    let mut languages = Vec::new();
    for track in tracks {
        if let Some(language) = track.attr("Language")
            && !languages.iter().any(|known| known == language)
        {
            languages.push(language.to_string());
        }
    }
    languages
}

fn is_audio_description(track: &Track) -> bool {
    track
        .attr("Title")
        .is_some_and(|title| title.to_lowercase().contains("description"))
}

fn is_sdh_caption(track: &Track) -> bool {
    if track.attr("Format").is_some_and(|format| format.starts_with("EIA-")) {
        return true;
    }
    track
        .attr("Title")
        .is_some_and(|title| title.to_lowercase().contains("sdh"))
}

fn format_duration(seconds: f64) -> String {
    let total = seconds.round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours} h {minutes} min {secs} s")
    } else if minutes > 0 {
        format!("{minutes} min {secs} s")
    } else {
        format!("{secs} s")
    }
}

fn format_size(bytes: f64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes as u64)
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}

fn format_bitrate(bps: f64) -> String {
    if bps >= 1_000_000.0 {
        format!("{:.1} Mb/s", bps / 1_000_000.0)
    } else if bps >= 1_000.0 {
        format!("{:.0} kb/s", bps / 1_000.0)
    } else {
        format!("{bps:.0} b/s")
    }
}

#[cfg(test)]
mod tests {
    use minfo_analyze::{Track, classify_report};
    use serde_json::json;

    use super::{
        describe_audio, describe_text, describe_video, format_bitrate, format_duration,
        format_size, summarize_accessibility, summarize_general,
    };

    fn track(value: serde_json::Value) -> Track {
        serde_json::from_value(value).expect("track should deserialize")
    }

    #[test]
    fn durations_pick_the_right_unit() {
        assert_eq!(format_duration(42.4), "42 s");
        assert_eq!(format_duration(273.0), "4 min 33 s");
        assert_eq!(format_duration(5400.0), "1 h 30 min 0 s");
    }

    #[test]
    fn sizes_use_binary_units() {
        assert_eq!(format_size(512.0), "512 B");
        assert_eq!(format_size(1536.0), "1.50 KiB");
        assert_eq!(format_size(734_003_200.0), "700.00 MiB");
    }

    #[test]
    fn bitrates_scale_between_units() {
        assert_eq!(format_bitrate(800.0), "800 b/s");
        assert_eq!(format_bitrate(320_000.0), "320 kb/s");
        assert_eq!(format_bitrate(4_500_000.0), "4.5 Mb/s");
    }

    #[test]
    fn video_description_lists_the_key_properties() {
        let description = describe_video(&track(json!({
            "@type": "Video",
            "Format": "AVC",
            "Format_Profile": "High@L4.1",
            "Width": "1920",
            "Height": "1080",
            "FrameRate": "23.976",
            "BitDepth": "8",
            "BitRate": "4500000",
            "colour_primaries": "BT.709"
        })));
        assert_eq!(
            description,
            "AVC (High@L4.1), 1920x1080, 23.976 fps, 8 bits, 4.5 Mb/s, BT.709"
        );
    }

    #[test]
    fn audio_description_includes_layout_language_and_flags() {
        let description = describe_audio(&track(json!({
            "@type": "Audio",
            "Format": "AAC",
            "Channels": "6",
            "ChannelLayout": "L R C LFE Ls Rs",
            "SamplingRate": "48000",
            "Language": "en",
            "Default": "Yes"
        })));
        assert_eq!(description, "AAC, 6 ch (L R C LFE Ls Rs), 48.0 kHz, en, [default]");
    }

    #[test]
    fn bare_tracks_still_render_something() {
        assert_eq!(describe_text(&track(json!({"@type": "Text"}))), "(no details)");
    }

    #[test]
    fn general_summary_always_reports_track_counts() {
        let tracks = classify_report(
            r#"{"media":{"track":[
                {"@type":"General","Format":"Matroska","Duration":"273.0"},
                {"@type":"Video"},
                {"@type":"Audio"},
                {"@type":"Audio"}
            ]}}"#,
        )
        .unwrap();
        let lines = summarize_general(&tracks);
        assert!(lines.contains(&"Container: Matroska".to_string()));
        assert!(lines.contains(&"Duration: 4 min 33 s".to_string()));
        assert!(lines.contains(&"Tracks: 1 video, 2 audio, 0 subtitle".to_string()));
    }

    #[test]
    fn accessibility_summary_spots_description_and_sdh_tracks() {
        let tracks = classify_report(
            r#"{"media":{"track":[
                {"@type":"Audio","Language":"en"},
                {"@type":"Audio","Language":"en","Title":"Audio Description"},
                {"@type":"Text","Language":"en","Title":"English (SDH)"},
                {"@type":"Text","Language":"ja"}
            ]}}"#,
        )
        .unwrap();
        let lines = summarize_accessibility(&tracks);
        assert!(lines.contains(&"Audio languages: en".to_string()));
        assert!(lines.contains(&"Subtitle languages: en, ja".to_string()));
        assert!(lines.contains(&"Audio description track present".to_string()));
        assert!(lines.contains(&"SDH / closed captions present".to_string()));
    }
}
