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

//! Encyclopedia thumbnail textures.
//!
//! Decodes downloaded image bytes into egui textures and provides the
//! placeholder shown while nothing better is available.

use eframe::egui;

/// Longest edge of a displayed thumbnail, in pixels.
const MAX_EDGE: u32 = 300;

const PLACEHOLDER_WIDTH: usize = 300;
const PLACEHOLDER_HEIGHT: usize = 200;

/// Decode `bytes` into a texture named `name`, scaled down to fit the
/// detail page.
pub fn load_texture_from_bytes(
    ctx: &egui::Context,
    bytes: &[u8],
    name: &str,
) -> Option<egui::TextureHandle> {
    let image = match image::load_from_memory(bytes) {
        Ok(image) => image,
        Err(e) => {
            log::warn!("Failed to decode thumbnail {name}: {e}");
            return None;
        }
    };

    let source_size = egui::vec2(image.width() as f32, image.height() as f32);
    let image = if image.width() > MAX_EDGE || image.height() > MAX_EDGE {
        image.resize(MAX_EDGE, MAX_EDGE, image::imageops::FilterType::Lanczos3)
    } else {
        image
    };

    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let mut color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    color_image.source_size = source_size;

    Some(ctx.load_texture(
        format!("thumbnail_{name}"),
        color_image,
        egui::TextureOptions::LINEAR,
    ))
}

/// A muted landscape silhouette used when no photo was found.
pub fn placeholder_texture(ctx: &egui::Context) -> egui::TextureHandle {
    let width = PLACEHOLDER_WIDTH;
    let height = PLACEHOLDER_HEIGHT;
    let sky = egui::Color32::from_rgb(173, 206, 230);
    let land = egui::Color32::from_rgb(210, 180, 140);
    let ridge = egui::Color32::from_rgb(150, 120, 90);

    let mut pixels = vec![sky; width * height];
    for x in 0..width {
        // Two overlapping slopes make a single peak
        let peak = (x as f32 - width as f32 * 0.45).abs();
        let horizon = (height as f32 * 0.35 + peak * 0.6).min(height as f32 * 0.75) as usize;
        for y in horizon..height {
            pixels[y * width + x] = if y < horizon + 3 { ridge } else { land };
        }
    }

    let image = egui::ColorImage {
        size: [width, height],
        pixels,
        source_size: egui::Vec2::new(width as f32, height as f32),
    };

    ctx.load_texture("thumbnail_placeholder", image, egui::TextureOptions::LINEAR)
}
