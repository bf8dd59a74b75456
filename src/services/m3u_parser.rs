//! M3U playlist parsing and rendering
//!
//! Parsing never fails: malformed input yields fewer channels or
//! placeholder names, never an error.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::Channel;

const EXTINF_TAG: &str = "#EXTINF:";
const UNKNOWN_CHANNEL_NAME: &str = "Unknown";
const STREAM_SCHEMES: [&str; 3] = ["http", "rtmp", "rtsp"];

lazy_static! {
    /// Title after the last comma of an EXTINF line
    static ref NAME_REGEX: Regex = Regex::new(r",([^,]+)$").unwrap();
    static ref GROUP_REGEX: Regex = Regex::new(r#"group-title="([^"]+)""#).unwrap();
    static ref LOGO_REGEX: Regex = Regex::new(r#"tvg-logo="([^"]+)""#).unwrap();
}

/// EXTINF data waiting for its stream URL line
#[derive(Debug)]
struct PendingChannel {
    name: String,
    group: Option<String>,
    logo: Option<String>,
}

fn capture(regex: &Regex, line: &str) -> Option<String> {
    regex
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Parse an EXTINF line
/// Format: #EXTINF:-1 tvg-logo="..." group-title="...",Title
fn parse_extinf(line: &str) -> PendingChannel {
    let name = capture(&NAME_REGEX, line)
        .map(|n| n.trim().to_string())
        .unwrap_or_else(|| UNKNOWN_CHANNEL_NAME.to_string());

    PendingChannel {
        name,
        group: capture(&GROUP_REGEX, line),
        logo: capture(&LOGO_REGEX, line),
    }
}

fn is_stream_url(line: &str) -> bool {
    STREAM_SCHEMES.iter().any(|scheme| line.starts_with(scheme))
}

/// Parse raw playlist text into channels labelled with `source_name`.
///
/// Channels are returned in the order their URL lines appear. An EXTINF
/// line that is not followed by a URL before the next EXTINF is dropped;
/// a URL with no EXTINF gets a `Channel <n>` placeholder name where `n`
/// is its 1-based position in the output.
pub fn parse_m3u(content: &str, source_name: &str) -> Vec<Channel> {
    let mut channels = Vec::new();
    let mut pending: Option<PendingChannel> = None;

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with(EXTINF_TAG) {
            pending = Some(parse_extinf(line));
        } else if line.starts_with('#') {
            continue;
        } else if is_stream_url(line) {
            let channel = match pending.take() {
                Some(p) => Channel {
                    name: p.name,
                    url: line.to_string(),
                    group: p.group,
                    logo: p.logo,
                    source: source_name.to_string(),
                },
                None => Channel {
                    name: format!("Channel {}", channels.len() + 1),
                    url: line.to_string(),
                    group: None,
                    logo: None,
                    source: source_name.to_string(),
                },
            };
            channels.push(channel);
        }
    }

    tracing::info!("Parsed {} channels from {}", channels.len(), source_name);
    channels
}

/// Render channels as an M3U playlist.
///
/// Names get the source appended in brackets, so a re-parse yields
/// `"<name> [<source>]"` as the name.
pub fn render_m3u(channels: &[Channel]) -> String {
    let mut lines = Vec::with_capacity(channels.len() * 2 + 1);
    lines.push("#EXTM3U".to_string());

    for channel in channels {
        let mut extinf = String::from("#EXTINF:-1");
        if let Some(logo) = channel.logo.as_deref().filter(|l| !l.is_empty()) {
            extinf.push_str(&format!(" tvg-logo=\"{}\"", logo));
        }
        if let Some(group) = channel.group.as_deref().filter(|g| !g.is_empty()) {
            extinf.push_str(&format!(" group-title=\"{}\"", group));
        }
        extinf.push_str(&format!(",{} [{}]", channel.name, channel.source));

        lines.push(extinf);
        lines.push(channel.url.clone());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(name: &str, url: &str, group: Option<&str>, logo: Option<&str>) -> Channel {
        Channel {
            name: name.to_string(),
            url: url.to_string(),
            group: group.map(String::from),
            logo: logo.map(String::from),
            source: "src".to_string(),
        }
    }

    #[test]
    fn test_parse_extinf_with_attributes() {
        let line = r#"#EXTINF:-1 tvg-id="globo" tvg-logo="http://logo.com/globo.png" group-title="TV",Globo HD"#;
        let pending = parse_extinf(line);

        assert_eq!(pending.name, "Globo HD");
        assert_eq!(pending.group.as_deref(), Some("TV"));
        assert_eq!(pending.logo.as_deref(), Some("http://logo.com/globo.png"));
    }

    #[test]
    fn test_parse_extinf_without_comma() {
        let pending = parse_extinf("#EXTINF:-1");
        assert_eq!(pending.name, UNKNOWN_CHANNEL_NAME);
        assert!(pending.group.is_none());
        assert!(pending.logo.is_none());
    }

    #[test]
    fn test_parse_extinf_uses_last_comma() {
        let pending = parse_extinf("#EXTINF:-1 group-title=\"A\",Foo, Bar ");
        assert_eq!(pending.name, "Bar");
    }

    #[test]
    fn test_parse_mixed_playlist() {
        let content = "#EXTINF:-1 group-title=\"News\",CNN\nhttp://a/b\nhttp://c/d";
        let channels = parse_m3u(content, "S");

        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].name, "CNN");
        assert_eq!(channels[0].group.as_deref(), Some("News"));
        assert_eq!(channels[0].url, "http://a/b");
        assert_eq!(channels[0].source, "S");
        assert_eq!(channels[1].name, "Channel 2");
        assert_eq!(channels[1].url, "http://c/d");
        assert!(channels[1].group.is_none());
    }

    #[test]
    fn test_parse_well_formed_pairs_in_order() {
        let content = "#EXTM3U\n\
            #EXTINF:-1,One\nhttp://one\n\
            #EXTINF:-1,Two\nrtmp://two\n\
            #EXTINF:-1,Three\nrtsp://three\n";
        let channels = parse_m3u(content, "S");

        let names: Vec<_> = channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["One", "Two", "Three"]);
        assert_eq!(channels[2].url, "rtsp://three");
    }

    #[test]
    fn test_dangling_extinf_is_dropped() {
        let content = "#EXTINF:-1,Lost\n#EXTINF:-1,Kept\nhttp://kept\n#EXTINF:-1,Tail";
        let channels = parse_m3u(content, "S");

        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name, "Kept");
    }

    #[test]
    fn test_ignores_comments_and_unknown_lines() {
        let content = "#EXTM3U\r\n#EXTVLCOPT:http-user-agent=x\r\n  \r\nudp://239.0.0.1\r\nftp://x\r\n#EXTINF:-1,Ok\r\n#EXTGRP:Foo\r\nhttp://ok\r\n";
        let channels = parse_m3u(content, "S");

        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name, "Ok");
        assert_eq!(channels[0].url, "http://ok");
    }

    #[test]
    fn test_placeholder_counts_emitted_channels() {
        let content = "#EXTINF:-1,First\nhttp://1\nhttp://2\n#EXTINF:-1,Dropped\n#EXTINF:-1,Third\nhttp://3\nhttp://4";
        let channels = parse_m3u(content, "S");

        let names: Vec<_> = channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Channel 2", "Third", "Channel 4"]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_m3u("", "S").is_empty());
        assert!(parse_m3u("#EXTM3U\n\n", "S").is_empty());
    }

    #[test]
    fn test_render_m3u() {
        let channels = vec![
            channel("CNN", "http://a/b", Some("News"), Some("http://logo/cnn.png")),
            channel("Plain", "http://c/d", None, None),
        ];

        let rendered = render_m3u(&channels);
        assert_eq!(
            rendered,
            "#EXTM3U\n\
             #EXTINF:-1 tvg-logo=\"http://logo/cnn.png\" group-title=\"News\",CNN [src]\n\
             http://a/b\n\
             #EXTINF:-1,Plain [src]\n\
             http://c/d"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_m3u(&[]), "#EXTM3U");
    }

    #[test]
    fn test_render_then_parse_keeps_channel_set() {
        let channels = vec![
            channel("CNN", "http://a/b", Some("News"), Some("http://logo/cnn.png")),
            channel("BBC", "rtmp://c/d", None, Some("http://logo/bbc.png")),
            channel("Local", "rtsp://e/f", Some("Local"), None),
        ];

        let reparsed = parse_m3u(&render_m3u(&channels), "src");

        assert_eq!(reparsed.len(), channels.len());
        for (original, parsed) in channels.iter().zip(&reparsed) {
            assert_eq!(parsed.name, format!("{} [src]", original.name));
            assert_eq!(parsed.url, original.url);
            assert_eq!(parsed.group, original.group);
            assert_eq!(parsed.logo, original.logo);
        }
    }
}
