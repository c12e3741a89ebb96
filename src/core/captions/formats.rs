//! ASS Subtitle Rendering
//!
//! Renders caption instructions into an ASS (Advanced SubStation Alpha)
//! document for the codec engine's `subtitles` burn-in filter. ASS is used
//! instead of SRT because the style must travel with the file: the center
//! anchor, the outline, and the caption box margins that make libass wrap
//! text at the configured fraction of the frame width.

use crate::core::{Size2D, TimeSec};

use super::models::{CaptionInstruction, CaptionStyle};

/// Renders caption instructions into a complete ASS document.
///
/// `frame` is the output frame size; it becomes the script's play resolution
/// so margins and font sizes are interpreted in output pixels. The wrap box of
/// each caption is realized as left/right margins: a `box_width_fraction` of
/// 0.9 leaves 5% of the width on each side.
pub fn render_ass(
    captions: &[CaptionInstruction],
    style: &CaptionStyle,
    frame: Size2D,
) -> String {
    let mut output = String::new();

    output.push_str("[Script Info]\n");
    output.push_str("ScriptType: v4.00+\n");
    output.push_str(&format!("PlayResX: {}\n", frame.width));
    output.push_str(&format!("PlayResY: {}\n", frame.height));
    output.push_str("WrapStyle: 0\n");
    output.push_str("ScaledBorderAndShadow: yes\n\n");

    let outline_color = style
        .outline_color
        .map(|c| c.to_ass_color())
        .unwrap_or_else(|| "&H00000000".to_string());
    let outline_width = if style.outline_color.is_some() {
        style.outline_width
    } else {
        0.0
    };

    output.push_str("[V4+ Styles]\n");
    output.push_str(
        "Format: Name, Fontname, Fontsize, PrimaryColour, OutlineColour, BackColour, \
         Bold, Italic, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV\n",
    );

    // One named style per distinct anchor is unnecessary: the mapper emits a
    // single anchor, so the default style carries it and per-event margins
    // realize the box width.
    let anchor = captions
        .first()
        .map(|c| c.anchor)
        .unwrap_or_default();
    output.push_str(&format!(
        "Style: Caption,{},{},{},{},&H00000000,{},0,1,{},0,{},0,0,0\n\n",
        style.font_family,
        style.font_size,
        style.color.to_ass_color(),
        outline_color,
        if style.bold { -1 } else { 0 },
        outline_width,
        anchor.ass_alignment(),
    ));

    output.push_str("[Events]\n");
    output.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");

    for caption in captions {
        let side_margin = frame_side_margin(frame.width, caption.box_width_fraction);
        output.push_str(&format!(
            "Dialogue: 0,{},{},Caption,,{},{},0,,{}\n",
            format_ass_timestamp(caption.visible_from),
            format_ass_timestamp(caption.visible_until),
            side_margin,
            side_margin,
            escape_ass_text(&caption.text),
        ));
    }

    output
}

/// Pixel margin on each side realizing the caption box width fraction
fn frame_side_margin(frame_width: u32, box_width_fraction: f64) -> u32 {
    let fraction = box_width_fraction.clamp(0.0, 1.0);
    ((frame_width as f64 * (1.0 - fraction)) / 2.0).round() as u32
}

/// Formats seconds as an ASS timestamp (H:MM:SS.CC, centisecond precision)
fn format_ass_timestamp(seconds: TimeSec) -> String {
    let total_cs = (seconds.max(0.0) * 100.0).round() as u64;
    let cs = total_cs % 100;
    let total_secs = total_cs / 100;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{}:{:02}:{:02}.{:02}", hours, mins, secs, cs)
}

/// Escapes text for an ASS Dialogue line.
///
/// Braces delimit override blocks and newlines are literal `\N`; a Dialogue
/// line must stay on one physical line.
fn escape_ass_text(text: &str) -> String {
    text.replace('{', "(").replace('}', ")").replace('\n', "\\N")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::captions::models::{Anchor, BOX_WIDTH_FRACTION};

    fn caption(text: &str, from: f64, until: f64) -> CaptionInstruction {
        CaptionInstruction {
            text: text.to_string(),
            visible_from: from,
            visible_until: until,
            box_width_fraction: BOX_WIDTH_FRACTION,
            anchor: Anchor::center(),
        }
    }

    #[test]
    fn test_format_ass_timestamp() {
        assert_eq!(format_ass_timestamp(0.0), "0:00:00.00");
        assert_eq!(format_ass_timestamp(1.2), "0:00:01.20");
        assert_eq!(format_ass_timestamp(61.555), "0:01:01.56");
        assert_eq!(format_ass_timestamp(3661.0), "1:01:01.00");
        assert_eq!(format_ass_timestamp(-5.0), "0:00:00.00");
    }

    #[test]
    fn test_side_margin_from_box_fraction() {
        // 0.9 box on a 720-wide frame leaves 36px on each side
        assert_eq!(frame_side_margin(720, 0.9), 36);
        assert_eq!(frame_side_margin(720, 1.0), 0);
        assert_eq!(frame_side_margin(1080, 0.9), 54);
    }

    #[test]
    fn test_escape_ass_text() {
        assert_eq!(escape_ass_text("plain"), "plain");
        assert_eq!(escape_ass_text("{\\b1}bold"), "(\\b1)bold");
        assert_eq!(escape_ass_text("two\nlines"), "two\\Nlines");
    }

    #[test]
    fn test_render_ass_document() {
        let captions = vec![caption("HELLO", 0.0, 1.2), caption("WORLD", 1.2, 2.5)];
        let doc = render_ass(&captions, &CaptionStyle::default(), Size2D::new(720, 1280));

        assert!(doc.starts_with("[Script Info]"));
        assert!(doc.contains("PlayResX: 720"));
        assert!(doc.contains("PlayResY: 1280"));
        // Default style: Arial 40, white on black outline, bold, centered
        assert!(doc.contains(
            "Style: Caption,Arial,40,&H00FFFFFF,&H00000000,&H00000000,-1,0,1,2,0,5,0,0,0"
        ));
        assert!(doc.contains("Dialogue: 0,0:00:00.00,0:00:01.20,Caption,,36,36,0,,HELLO"));
        assert!(doc.contains("Dialogue: 0,0:00:01.20,0:00:02.50,Caption,,36,36,0,,WORLD"));
    }

    #[test]
    fn test_render_ass_without_outline() {
        let style = CaptionStyle {
            outline_color: None,
            ..CaptionStyle::default()
        };
        let doc = render_ass(
            &[caption("HI", 0.0, 1.0)],
            &style,
            Size2D::new(720, 1280),
        );
        assert!(doc.contains("Style: Caption,Arial,40,&H00FFFFFF,&H00000000,&H00000000,-1,0,1,0,0,5,0,0,0"));
    }

    #[test]
    fn test_render_ass_empty_caption_list() {
        let doc = render_ass(&[], &CaptionStyle::default(), Size2D::new(720, 1280));
        assert!(doc.contains("[Events]"));
        assert!(!doc.contains("Dialogue:"));
    }
}
