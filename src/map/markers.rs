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

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use eframe::egui;
use quake_feed::QuakeEvent;
use walkers::{MapMemory, Plugin, Position, Projector};

/// Marker ready to draw: where, how big, what colour, and which event.
#[derive(Debug, Clone, Copy)]
pub struct MarkerSpot {
    pub position: Position,
    pub radius: f32,
    pub pick_radius: f32,
    pub color: egui::Color32,
    pub index: usize,
}

impl MarkerSpot {
    pub fn for_event(index: usize, event: &QuakeEvent) -> Self {
        let style = event.marker_style();
        let (r, g, b, a) = style.rgba();
        Self {
            position: walkers::lat_lon(event.plot_latitude(), event.longitude),
            radius: style.size,
            pick_radius: style.pick_radius(),
            color: egui::Color32::from_rgba_unmultiplied(r, g, b, a),
            index,
        }
    }
}

/// Draws the event markers and reports which one was clicked.
pub struct QuakeMarkersPlugin {
    pub markers: Vec<MarkerSpot>,
    /// -1 = no click, >= 0 = clicked event index
    pub clicked_idx: Arc<AtomicI32>,
    /// When false, markers are drawn but clicks are ignored
    pub picking: bool,
}

impl Plugin for QuakeMarkersPlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let painter = ui.painter().with_clip_rect(response.rect);
        let outline = egui::Stroke::new(0.5, egui::Color32::from_black_alpha(90));

        let mut on_screen = Vec::with_capacity(self.markers.len());
        for marker in &self.markers {
            let projected = projector.project(marker.position);
            let center = egui::pos2(projected.x, projected.y);
            if !response.rect.expand(marker.radius).contains(center) {
                continue;
            }

            painter.circle_filled(center, marker.radius, marker.color);
            painter.circle_stroke(center, marker.radius, outline);
            on_screen.push((center, marker.pick_radius, marker.index));
        }

        if !self.picking || !response.clicked() {
            return;
        }
        let Some(click) = response.interact_pointer_pos() else {
            return;
        };
        if let Some(index) = pick_marker(&on_screen, click) {
            record_pick(&self.clicked_idx, index);
        }
    }
}

/// Publish a clicked event index. Indices past `i32::MAX` are dropped.
fn record_pick(slot: &AtomicI32, index: usize) {
    match i32::try_from(index) {
        Ok(index) => slot.store(index, Ordering::Relaxed),
        Err(_) => log::warn!("Ignoring click on marker {index}, index out of range"),
    }
}

/// Closest marker whose pick radius contains `click`.
pub fn pick_marker(markers: &[(egui::Pos2, f32, usize)], click: egui::Pos2) -> Option<usize> {
    markers
        .iter()
        .filter_map(|&(center, pick_radius, index)| {
            let dist = center.distance(click);
            (dist <= pick_radius).then_some((dist, index))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, index)| index)
}
