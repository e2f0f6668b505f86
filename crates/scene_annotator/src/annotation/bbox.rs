//! Bounding boxes and annotation records
//!
//! Pixel boxes are axis-aligned with the origin at the top-left corner and
//! y growing downwards.
//!
//! # Normalized y convention
//!
//! The normalized x coordinate is the box center, but the normalized y
//! coordinate is `(y - h / 2) / H`, i.e. measured from the top edge rather
//! than the center. Existing datasets were produced with this convention, so
//! it is kept as is; [`NormalizedBox::to_pixel_box`] inverts it exactly.
//! Because of it `cy` can be negative for boxes close to the top border.

use serde::Serialize;

use super::AnnotationError;

/// Axis-aligned box in pixel units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoundingBox2D {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width, never negative
    pub width: f64,
    /// Height, never negative
    pub height: f64,
}

impl BoundingBox2D {
    /// Create a box from its top-left corner and size
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// The all-zero box produced for objects with no visible extent
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Create a box from two opposite corners
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(x0.min(x1), y0.min(y1), (x1 - x0).abs(), (y1 - y0).abs())
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the box has no area
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Express the box as fractions of the render size
    pub fn normalize(&self, render_width: f64, render_height: f64) -> NormalizedBox {
        NormalizedBox {
            cx: (self.x + self.width / 2.0) / render_width,
            cy: (self.y - self.height / 2.0) / render_height,
            w: self.width / render_width,
            h: self.height / render_height,
        }
    }
}

/// Box as fractions of the render size (see the module docs for `cy`)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NormalizedBox {
    /// Horizontal center
    pub cx: f64,
    /// Top edge minus half the height
    pub cy: f64,
    /// Width
    pub w: f64,
    /// Height
    pub h: f64,
}

impl NormalizedBox {
    /// Reconstruct the pixel box this was normalized from
    pub fn to_pixel_box(&self, render_width: f64, render_height: f64) -> BoundingBox2D {
        let width = self.w * render_width;
        let height = self.h * render_height;
        BoundingBox2D {
            x: self.cx * render_width - width / 2.0,
            y: self.cy * render_height + height / 2.0,
            width,
            height,
        }
    }
}

/// One detector label for one object in one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnnotationRecord {
    /// Frame index
    pub frame: i32,
    /// Detector class label
    pub class_id: i64,
    /// Normalized box
    pub bbox: NormalizedBox,
}

impl AnnotationRecord {
    /// Text line in the annotation file format, newline included
    pub fn to_line(&self) -> String {
        let NormalizedBox { cx, cy, w, h } = self.bbox;
        format!("{} {cx:?} {cy:?} {w:?} {h:?} \n", self.class_id)
    }

    /// Parse one line of an annotation file
    pub fn parse_line(frame: i32, line: &str) -> Result<Self, AnnotationError> {
        let malformed = || AnnotationError::MalformedRecord(line.trim_end().to_string());

        let fields: Vec<&str> = line.split_whitespace().collect();
        let &[class_id, cx, cy, w, h] = fields.as_slice() else {
            return Err(malformed());
        };

        let parse = |field: &str| field.parse::<f64>().map_err(|_| malformed());
        Ok(Self {
            frame,
            class_id: class_id.parse().map_err(|_| malformed())?,
            bbox: NormalizedBox {
                cx: parse(cx)?,
                cy: parse(cy)?,
                w: parse(w)?,
                h: parse(h)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_uses_center_x_and_top_based_y() {
        // 640x480 frame, box (100,100)-(300,300)
        let bbox = BoundingBox2D::from_corners(100.0, 100.0, 300.0, 300.0);
        let normalized = bbox.normalize(640.0, 480.0);

        assert_relative_eq!(normalized.cx, 0.3125);
        assert_relative_eq!(normalized.cy, 0.0);
        assert_relative_eq!(normalized.w, 0.3125);
        assert_relative_eq!(normalized.h, 200.0 / 480.0);
    }

    #[test]
    fn test_pixel_box_reconstruction() {
        let boxes = [
            BoundingBox2D::new(100.0, 100.0, 200.0, 200.0),
            BoundingBox2D::new(13.0, 7.0, 91.0, 33.0),
            BoundingBox2D::new(320.5, 401.25, 10.0, 60.5),
        ];

        for original in boxes {
            let restored = original.normalize(640.0, 480.0).to_pixel_box(640.0, 480.0);
            assert_relative_eq!(restored.x, original.x, epsilon = 1e-9);
            assert_relative_eq!(restored.y, original.y, epsilon = 1e-9);
            assert_relative_eq!(restored.width, original.width, epsilon = 1e-9);
            assert_relative_eq!(restored.height, original.height, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_line_format() {
        let record = AnnotationRecord {
            frame: 0,
            class_id: 3,
            bbox: NormalizedBox { cx: 0.3125, cy: 0.0, w: 0.3125, h: 0.5 },
        };
        assert_eq!(record.to_line(), "3 0.3125 0.0 0.3125 0.5 \n");
    }

    #[test]
    fn test_parse_line_reads_back_emitted_record() {
        let record = AnnotationRecord {
            frame: 4,
            class_id: 7,
            bbox: BoundingBox2D::new(13.0, 7.0, 91.0, 33.0).normalize(640.0, 480.0),
        };
        let parsed = AnnotationRecord::parse_line(4, &record.to_line()).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_parse_line_rejects_garbage() {
        assert!(matches!(
            AnnotationRecord::parse_line(0, "1 0.5 0.5"),
            Err(AnnotationError::MalformedRecord(_))
        ));
        assert!(matches!(
            AnnotationRecord::parse_line(0, "one 0.5 0.5 0.1 0.1"),
            Err(AnnotationError::MalformedRecord(_))
        ));
    }
}
