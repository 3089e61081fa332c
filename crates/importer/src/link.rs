//! Classify a pasted link as a single video or a playlist.

use url::Url;
use watchcash_core::types::ExternalVideoId;
use watchcash_core::{WatchCashError, WatchCashResult};

const VIDEO_ID_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportTarget {
    Video(ExternalVideoId),
    Playlist(String),
}

/// Accepts `watch?v=`, `youtu.be/`, `/embed/`, `/shorts/`, `/live/` and
/// `/playlist?list=` links, with or without a scheme. A link carrying both
/// a video and a list resolves to the video unless its path is `/playlist`.
pub fn parse_import_url(input: &str) -> WatchCashResult<ImportTarget> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid_link());
    }

    let url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{trimmed}")).map_err(|_| invalid_link())?
        }
        Err(_) => return Err(invalid_link()),
    };

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let host = host.strip_prefix("m.").unwrap_or(host);
    let host = host.strip_prefix("music.").unwrap_or(host);

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let query = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    };

    let video_id = match host {
        "youtu.be" => segments.first().map(|s| s.to_string()),
        "youtube.com" | "youtube-nocookie.com" => match segments.as_slice() {
            ["watch", ..] => query("v"),
            ["embed" | "shorts" | "live" | "v", id, ..] => Some(id.to_string()),
            _ => None,
        },
        _ => return Err(invalid_link()),
    };

    let is_playlist_page = segments.first() == Some(&"playlist");
    if !is_playlist_page {
        if let Some(id) = video_id.filter(|id| is_valid_video_id(id)) {
            return Ok(ImportTarget::Video(ExternalVideoId::new(id)));
        }
    }

    match query("list") {
        Some(list) if is_valid_playlist_id(&list) => Ok(ImportTarget::Playlist(list)),
        _ => Err(invalid_link()),
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_valid_video_id(id: &str) -> bool {
    id.len() == VIDEO_ID_LEN && id.chars().all(is_id_char)
}

fn is_valid_playlist_id(id: &str) -> bool {
    id.len() >= 2 && id.chars().all(is_id_char)
}

fn invalid_link() -> WatchCashError {
    WatchCashError::Validation("Invalid YouTube link: no video or playlist id found".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str) -> ImportTarget {
        ImportTarget::Video(ExternalVideoId::new(id))
    }

    #[test]
    fn test_video_link_shapes() {
        for link in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://youtu.be/dQw4w9WgXcQ",
            "youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "www.youtube.com/live/dQw4w9WgXcQ",
        ] {
            assert_eq!(parse_import_url(link).unwrap(), video("dQw4w9WgXcQ"), "{link}");
        }
    }

    #[test]
    fn test_playlist_links() {
        assert_eq!(
            parse_import_url(
                "https://www.youtube.com/playlist?list=PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf"
            )
            .unwrap(),
            ImportTarget::Playlist("PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf".into())
        );
        // video wins on a watch page inside a list
        assert_eq!(
            parse_import_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL123").unwrap(),
            video("dQw4w9WgXcQ")
        );
        assert_eq!(
            parse_import_url("https://www.youtube.com/playlist?v=dQw4w9WgXcQ&list=PL123").unwrap(),
            ImportTarget::Playlist("PL123".into())
        );
    }

    #[test]
    fn test_malformed_links_are_validation_errors() {
        for link in [
            "",
            "not a url",
            "https://vimeo.com/12345678901",
            "https://www.youtube.com/watch?v=short",
            "https://www.youtube.com/channel/UC1234567890",
            "https://www.youtube.com/playlist",
        ] {
            assert!(
                matches!(parse_import_url(link), Err(WatchCashError::Validation(_))),
                "{link}"
            );
        }
    }
}
