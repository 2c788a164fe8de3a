// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Marker size and colour by magnitude.

/// Opacity applied to every marker (0-255).
pub const MARKER_ALPHA: u8 = 77;

/// Smallest click radius in pixels, so that tiny markers stay pickable.
pub const MIN_PICK_RADIUS: f32 = 6.0;

/// Magnitude band a marker is coloured by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MagnitudeClass {
    /// Magnitude 3 and below
    Small,
    /// Above 3, up to and including 6
    Medium,
    /// Above 6
    Large,
}

impl MagnitudeClass {
    pub const ALL: [MagnitudeClass; 3] = [
        MagnitudeClass::Small,
        MagnitudeClass::Medium,
        MagnitudeClass::Large,
    ];

    #[must_use]
    pub fn for_magnitude(magnitude: f64) -> Self {
        if magnitude <= 3.0 {
            MagnitudeClass::Small
        } else if magnitude <= 6.0 {
            MagnitudeClass::Medium
        } else {
            MagnitudeClass::Large
        }
    }

    /// Base colour as (r, g, b)
    #[must_use]
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            MagnitudeClass::Small => (0, 128, 0),
            MagnitudeClass::Medium => (255, 215, 0),
            MagnitudeClass::Large => (220, 20, 20),
        }
    }

    /// Legend text
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            MagnitudeClass::Small => "Small (below 3)",
            MagnitudeClass::Medium => "Medium (below 6)",
            MagnitudeClass::Large => "Large (above 6)",
        }
    }
}

/// How a single event is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Marker radius in pixels
    pub size: f32,
    pub class: MagnitudeClass,
}

impl MarkerStyle {
    /// Size grows as `2^m / 2^floor(m/2)`, roughly doubling every two
    /// magnitude units. A missing magnitude is drawn as magnitude 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, reason = "marker sizes are small")]
    pub fn for_magnitude(magnitude: Option<f64>) -> Self {
        let m = magnitude.unwrap_or(0.0);
        let size = 2f64.powf(m) / 2f64.powf((m / 2.0).floor());
        Self {
            size: size as f32,
            class: MagnitudeClass::for_magnitude(m),
        }
    }

    #[must_use]
    pub fn pick_radius(&self) -> f32 {
        self.size.max(MIN_PICK_RADIUS)
    }

    /// Fill colour as (r, g, b, a) with the shared marker opacity.
    #[must_use]
    pub fn rgba(&self) -> (u8, u8, u8, u8) {
        let (r, g, b) = self.class.rgb();
        (r, g, b, MARKER_ALPHA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_size_formula() {
        // 2^1.7 / 2^0
        assert!(approx(MarkerStyle::for_magnitude(Some(1.7)).size, 3.249));
        // 2^4 / 2^2
        assert!(approx(MarkerStyle::for_magnitude(Some(4.0)).size, 4.0));
        // 2^5 / 2^2
        assert!(approx(MarkerStyle::for_magnitude(Some(5.0)).size, 8.0));
        // 2^7.5 / 2^3
        assert!(approx(MarkerStyle::for_magnitude(Some(7.5)).size, 22.627));
    }

    #[test]
    fn test_negative_magnitude_uses_floor_division() {
        // floor(-0.25) = -1, so 2^-0.5 / 2^-1
        assert!(approx(MarkerStyle::for_magnitude(Some(-0.5)).size, 1.414));
    }

    #[test]
    fn test_missing_magnitude() {
        let style = MarkerStyle::for_magnitude(None);
        assert!(approx(style.size, 1.0));
        assert_eq!(style.class, MagnitudeClass::Small);
    }

    #[test]
    fn test_class_boundaries() {
        assert_eq!(MagnitudeClass::for_magnitude(3.0), MagnitudeClass::Small);
        assert_eq!(MagnitudeClass::for_magnitude(3.01), MagnitudeClass::Medium);
        assert_eq!(MagnitudeClass::for_magnitude(6.0), MagnitudeClass::Medium);
        assert_eq!(MagnitudeClass::for_magnitude(6.1), MagnitudeClass::Large);
    }

    #[test]
    fn test_pick_radius_floor() {
        assert!(approx(MarkerStyle::for_magnitude(Some(1.0)).pick_radius(), MIN_PICK_RADIUS));
        assert!(approx(MarkerStyle::for_magnitude(Some(7.5)).pick_radius(), 22.627));
    }

    #[test]
    fn test_rgba_uses_shared_alpha() {
        let (_, _, _, a) = MarkerStyle::for_magnitude(Some(7.0)).rgba();
        assert_eq!(a, MARKER_ALPHA);
    }
}
