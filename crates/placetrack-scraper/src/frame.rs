//! Picks the one document, out of a page and its nested frames, that hosts
//! the data being extracted.

use crate::browser::RawDocument;

/// Which resolution step produced the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSource {
    /// A frame whose address contains the surface-specific path segment.
    PathSegment,
    /// A frame whose address contains the target listing id.
    TargetId,
    /// No frame qualified; the top-level document is used.
    TopLevel,
}

/// Resolves the queryable document, in priority order:
///
/// 1. the first frame whose address contains `segment`;
/// 2. the first frame, other than the top-level document, whose address
///    contains `target_id`;
/// 3. the top-level document.
///
/// Frames are considered in document order. Blank `segment`/`target_id`
/// values skip their step.
#[must_use]
pub fn resolve_document(
    top: RawDocument,
    frames: Vec<RawDocument>,
    segment: Option<&str>,
    target_id: Option<&str>,
) -> (RawDocument, FrameSource) {
    let segment = segment.filter(|s| !s.trim().is_empty());
    let target_id = target_id.filter(|s| !s.trim().is_empty());

    let by_segment = segment.and_then(|seg| frames.iter().position(|f| f.url.contains(seg)));
    if let Some(idx) = by_segment {
        return (take(frames, idx), FrameSource::PathSegment);
    }

    let by_target = target_id.and_then(|id| {
        frames
            .iter()
            .position(|f| f.url != top.url && f.url.contains(id))
    });
    if let Some(idx) = by_target {
        return (take(frames, idx), FrameSource::TargetId);
    }

    (top, FrameSource::TopLevel)
}

fn take(mut frames: Vec<RawDocument>, idx: usize) -> RawDocument {
    frames.swap_remove(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(url: &str) -> RawDocument {
        RawDocument::new(url, format!("<p>{url}</p>"))
    }

    #[test]
    fn review_segment_wins_over_target_id() {
        let top = doc("https://map.example.com/place/np-1");
        let frames = vec![
            doc("https://pcmap.example.com/place/np-1/home"),
            doc("https://pcmap.example.com/place/np-1/review/visitor"),
        ];

        let (resolved, source) = resolve_document(top, frames, Some("/review"), Some("np-1"));
        assert_eq!(source, FrameSource::PathSegment);
        assert_eq!(resolved.url, "https://pcmap.example.com/place/np-1/review/visitor");
    }

    #[test]
    fn falls_back_to_frame_with_target_id() {
        let top = doc("https://map.example.com/place/np-1");
        let frames = vec![
            doc("https://ads.example.com/banner"),
            doc("https://pcmap.example.com/place/np-1/home"),
        ];

        let (resolved, source) = resolve_document(top, frames, Some("/review"), Some("np-1"));
        assert_eq!(source, FrameSource::TargetId);
        assert_eq!(resolved.url, "https://pcmap.example.com/place/np-1/home");
    }

    #[test]
    fn frame_equal_to_top_level_is_not_a_target_match() {
        let top = doc("https://map.example.com/place/np-1");
        let frames = vec![doc("https://map.example.com/place/np-1")];

        let (resolved, source) = resolve_document(top, frames, None, Some("np-1"));
        assert_eq!(source, FrameSource::TopLevel);
        assert_eq!(resolved.url, "https://map.example.com/place/np-1");
    }

    #[test]
    fn no_frames_uses_top_level() {
        let top = doc("https://map.example.com/place/np-1");
        let (resolved, source) = resolve_document(top.clone(), Vec::new(), Some("/review"), Some("np-1"));
        assert_eq!(source, FrameSource::TopLevel);
        assert_eq!(resolved, top);
    }

    #[test]
    fn blank_hints_are_ignored() {
        let top = doc("https://map.example.com/");
        let frames = vec![doc("https://pcmap.example.com/anything")];
        let (_, source) = resolve_document(top, frames, Some("  "), Some(""));
        assert_eq!(source, FrameSource::TopLevel);
    }
}
