use crate::detection::domain::face::{Gender, TrackedFace};
use crate::overlay::domain::overlay_renderer::OverlayRenderer;
use crate::shared::constants::{FEMALE_COLOR, MALE_COLOR};
use crate::shared::frame::Frame;

const STROKE_WIDTH: i64 = 2;
const GLYPH_SCALE: i64 = 2;
const GLYPH_ADVANCE: i64 = 4 * GLYPH_SCALE;
const GLYPH_HEIGHT: i64 = 5 * GLYPH_SCALE;
const LABEL_PADDING: i64 = 5;
const LABEL_TEXT: [u8; 3] = [0xff, 0xff, 0xff];

/// Draws each tracked face as a colored box with a label band above it.
///
/// The label reads `"<rounded age> <M|F>"` from the stabilized values.
/// With mirroring enabled, x coordinates are flipped so the overlay lines
/// up with a mirrored preview (webcams are usually displayed mirrored).
/// Text uses a tiny built-in bitmap font; no font assets involved.
pub struct BoxLabelRenderer {
    mirror: bool,
}

impl BoxLabelRenderer {
    pub fn new(mirror: bool) -> Self {
        Self { mirror }
    }

    pub fn label_for(face: &TrackedFace) -> String {
        let letter = match face.smoothed_gender {
            Gender::Male => 'M',
            Gender::Female => 'F',
        };
        format!("{} {letter}", face.smoothed_age.round() as i64)
    }

    fn color_for(gender: Gender) -> [u8; 3] {
        match gender {
            Gender::Male => MALE_COLOR,
            Gender::Female => FEMALE_COLOR,
        }
    }

    fn draw_face(&self, frame: &mut Frame, face: &TrackedFace) {
        let color = Self::color_for(face.smoothed_gender);
        let w = face.bbox.width.round() as i64;
        let h = face.bbox.height.round() as i64;
        let y = face.bbox.y.round() as i64;
        let x = if self.mirror {
            frame.width() as i64 - face.bbox.x.round() as i64 - w
        } else {
            face.bbox.x.round() as i64
        };

        stroke_rect(frame, x, y, w, h, STROKE_WIDTH, color);

        let label = Self::label_for(face);
        let text_width = label.chars().count() as i64 * GLYPH_ADVANCE;
        let band_h = GLYPH_HEIGHT + LABEL_PADDING;
        let band_y = y - band_h - LABEL_PADDING;
        fill_rect(frame, x, band_y, text_width + 2 * LABEL_PADDING, band_h, color);
        draw_text(
            frame,
            x + LABEL_PADDING,
            band_y + (band_h - GLYPH_HEIGHT) / 2,
            &label,
            LABEL_TEXT,
        );
    }
}

impl OverlayRenderer for BoxLabelRenderer {
    fn draw(
        &self,
        frame: &mut Frame,
        faces: &[TrackedFace],
    ) -> Result<(), Box<dyn std::error::Error>> {
        for face in faces {
            self.draw_face(frame, face);
        }
        Ok(())
    }
}

fn fill_rect(frame: &mut Frame, x: i64, y: i64, w: i64, h: i64, color: [u8; 3]) {
    for py in y..y + h {
        for px in x..x + w {
            frame.put_pixel(px, py, color);
        }
    }
}

fn stroke_rect(frame: &mut Frame, x: i64, y: i64, w: i64, h: i64, thickness: i64, color: [u8; 3]) {
    fill_rect(frame, x, y, w, thickness, color);
    fill_rect(frame, x, y + h - thickness, w, thickness, color);
    fill_rect(frame, x, y, thickness, h, color);
    fill_rect(frame, x + w - thickness, y, thickness, h, color);
}

/// 3x5 bitmap glyphs, one row per element, low 3 bits used.
fn glyph(ch: char) -> [u8; 5] {
    match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        _ => [0b000; 5],
    }
}

fn draw_char(frame: &mut Frame, x: i64, y: i64, ch: char, color: [u8; 3]) {
    for (row, bits) in glyph(ch).iter().enumerate() {
        for col in 0..3i64 {
            if (bits >> (2 - col)) & 1 == 1 {
                for dy in 0..GLYPH_SCALE {
                    for dx in 0..GLYPH_SCALE {
                        frame.put_pixel(
                            x + col * GLYPH_SCALE + dx,
                            y + row as i64 * GLYPH_SCALE + dy,
                            color,
                        );
                    }
                }
            }
        }
    }
}

fn draw_text(frame: &mut Frame, x: i64, y: i64, text: &str, color: [u8; 3]) {
    let mut cursor = x;
    for ch in text.chars() {
        draw_char(frame, cursor, y, ch, color);
        cursor += GLYPH_ADVANCE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face::GenderHistory;
    use crate::shared::bounding_box::BoundingBox;

    const BACKGROUND: [u8; 3] = [0, 0, 0];

    fn face(x: f64, y: f64, w: f64, h: f64, age: f64, gender: Gender) -> TrackedFace {
        TrackedFace {
            bbox: BoundingBox::new(x, y, w, h),
            smoothed_age: age,
            smoothed_gender: gender,
            gender_history: GenderHistory::seeded(10, gender),
        }
    }

    fn blank(w: u32, h: u32) -> Frame {
        Frame::filled(w, h, 0, BACKGROUND)
    }

    #[test]
    fn test_label_formatting() {
        let f = face(0.0, 0.0, 10.0, 10.0, 30.4, Gender::Male);
        assert_eq!(BoxLabelRenderer::label_for(&f), "30 M");
        let f = face(0.0, 0.0, 10.0, 10.0, 27.5, Gender::Female);
        assert_eq!(BoxLabelRenderer::label_for(&f), "28 F");
    }

    #[test]
    fn test_male_box_uses_male_color() {
        let renderer = BoxLabelRenderer::new(false);
        let mut frame = blank(200, 200);
        renderer
            .draw(&mut frame, &[face(50.0, 50.0, 80.0, 80.0, 30.0, Gender::Male)])
            .unwrap();
        // Top-left corner of the stroke.
        assert_eq!(frame.pixel(50, 50), MALE_COLOR);
        // Box interior untouched.
        assert_eq!(frame.pixel(90, 90), BACKGROUND);
    }

    #[test]
    fn test_female_box_uses_female_color() {
        let renderer = BoxLabelRenderer::new(false);
        let mut frame = blank(200, 200);
        renderer
            .draw(
                &mut frame,
                &[face(50.0, 50.0, 80.0, 80.0, 25.0, Gender::Female)],
            )
            .unwrap();
        assert_eq!(frame.pixel(50, 50), FEMALE_COLOR);
    }

    #[test]
    fn test_mirror_flips_x() {
        let renderer = BoxLabelRenderer::new(true);
        let mut frame = blank(200, 200);
        // Box at x=10, width=40 → mirrored x = 200 - 10 - 40 = 150.
        renderer
            .draw(
                &mut frame,
                &[face(10.0, 100.0, 40.0, 40.0, 30.0, Gender::Male)],
            )
            .unwrap();
        assert_eq!(frame.pixel(150, 100), MALE_COLOR);
        assert_eq!(frame.pixel(10, 100), BACKGROUND);
    }

    #[test]
    fn test_label_band_sits_above_box() {
        let renderer = BoxLabelRenderer::new(false);
        let mut frame = blank(200, 200);
        renderer
            .draw(
                &mut frame,
                &[face(50.0, 100.0, 80.0, 80.0, 30.0, Gender::Male)],
            )
            .unwrap();
        // Band occupies rows just above y=100.
        assert_eq!(frame.pixel(52, 94), MALE_COLOR);
    }

    #[test]
    fn test_box_partially_off_frame_is_clipped_not_panicking() {
        let renderer = BoxLabelRenderer::new(false);
        let mut frame = blank(100, 100);
        renderer
            .draw(
                &mut frame,
                &[face(-20.0, -30.0, 80.0, 80.0, 30.0, Gender::Male)],
            )
            .unwrap();
        // Visible part of the top edge was drawn.
        assert_eq!(frame.pixel(30, 0), BACKGROUND); // interior column, stroke is off-frame above
        assert_eq!(frame.pixel(59, 10), MALE_COLOR); // right edge at x = -20 + 80 - 1
    }

    #[test]
    fn test_no_faces_leaves_frame_untouched() {
        let renderer = BoxLabelRenderer::new(false);
        let mut frame = blank(50, 50);
        let before = frame.clone();
        renderer.draw(&mut frame, &[]).unwrap();
        assert_eq!(frame, before);
    }

    #[test]
    fn test_text_is_drawn_in_white() {
        let renderer = BoxLabelRenderer::new(false);
        let mut frame = blank(300, 300);
        renderer
            .draw(
                &mut frame,
                &[face(100.0, 150.0, 80.0, 80.0, 30.0, Gender::Male)],
            )
            .unwrap();
        let found_white = (0..300u32).any(|x| (0..150u32).any(|y| frame.pixel(x, y) == LABEL_TEXT));
        assert!(found_white, "expected white label pixels above the box");
    }
}
