//! Caption Segment Mapper
//!
//! Maps raw transcript segments into caption render instructions. The mapping
//! is strictly 1:1 and order-preserving: no gap-filling, no merging of short
//! or overlapping segments. Text is upper-cased and trimmed; two pipelines fed
//! the same transcript must produce byte-identical caption text.
//!
//! Empty-text segments (silence markers) still yield an instruction here so
//! the count invariant holds; whether to render them is the caller's choice
//! (the pipeline controller skips them by default).

use super::models::{Anchor, CaptionInstruction, BOX_WIDTH_FRACTION};
use super::whisper::TranscriptSegment;

/// Maps transcript segments into caption instructions, preserving count and
/// chronological order.
pub fn map_segments(segments: &[TranscriptSegment]) -> Vec<CaptionInstruction> {
    segments
        .iter()
        .map(|segment| CaptionInstruction {
            text: segment.text.trim().to_uppercase(),
            visible_from: segment.start_sec,
            visible_until: segment.end_sec,
            box_width_fraction: BOX_WIDTH_FRACTION,
            anchor: Anchor::center(),
        })
        .collect()
}
