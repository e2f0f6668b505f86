//! Keyframed transform animation

use crate::foundation::math::Transform;

/// Transform keyframes indexed by frame number
///
/// Sampling between keys interpolates; sampling outside the keyed range
/// holds the first or last key.
#[derive(Debug, Clone, Default)]
pub struct TransformTrack {
    keys: Vec<(i32, Transform)>,
}

impl TransformTrack {
    /// Create an empty track
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the key at `frame`
    pub fn insert(&mut self, frame: i32, transform: Transform) {
        match self.keys.binary_search_by_key(&frame, |(f, _)| *f) {
            Ok(index) => self.keys[index].1 = transform,
            Err(index) => self.keys.insert(index, (frame, transform)),
        }
    }

    /// Builder-style key insertion
    #[must_use]
    pub fn with_key(mut self, frame: i32, transform: Transform) -> Self {
        self.insert(frame, transform);
        self
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when the track has no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Evaluate the track at `frame`
    pub fn sample(&self, frame: i32) -> Option<Transform> {
        let (first, last) = (self.keys.first()?, self.keys.last()?);
        if frame <= first.0 {
            return Some(first.1);
        }
        if frame >= last.0 {
            return Some(last.1);
        }

        let next = self.keys.partition_point(|(f, _)| *f <= frame);
        let (f0, a) = self.keys[next - 1];
        let (f1, b) = self.keys[next];
        if f0 == frame {
            return Some(a);
        }

        let t = (frame - f0) as f32 / (f1 - f0) as f32;
        Some(a.interpolate(&b, t))
    }
}
