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

use eframe::egui;
use quake_feed::{MagnitudeClass, MarkerStyle, QuakeEvent};

use crate::map::QuakeMap;

pub const MAP_TITLE: &str = "Earthquake Events - Web Mercator Projection";

pub struct MapPage {
    pub show_legend: bool,
    pub show_list: bool,
}

impl MapPage {
    pub fn new(show_legend: bool) -> Self {
        Self {
            show_legend,
            show_list: true,
        }
    }

    /// Draw the page. Returns the index of an event the user picked, either
    /// on the map or from the list.
    pub fn show(&mut self, ui: &mut egui::Ui, map: &mut QuakeMap, picking: bool) -> Option<usize> {
        let mut picked = None;

        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(MAP_TITLE).size(16.0).strong());
        });
        ui.add_space(4.0);

        if self.show_list {
            egui::SidePanel::right("event_list_panel")
                .resizable(true)
                .default_width(280.0)
                .show_inside(ui, |ui| {
                    if let Some(index) = event_list(ui, map.events()) {
                        picked = Some(index);
                    }
                });
        }

        let map_rect = ui.available_rect_before_wrap();
        if let Some(index) = map.show(ui, picking) {
            picked = Some(index);
        }
        if self.show_legend {
            draw_legend(ui, map_rect);
        }

        let index = picked.filter(|_| picking)?;
        if let Some(event) = map.event(index).cloned() {
            map.center_on(&event);
        }
        Some(index)
    }
}

/// Indices of `events` ordered by magnitude, largest first; events with no
/// magnitude go last.
pub fn by_magnitude(events: &[QuakeEvent]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..events.len()).collect();
    order.sort_by(|&a, &b| {
        let ma = events[a].magnitude.unwrap_or(f64::NEG_INFINITY);
        let mb = events[b].magnitude.unwrap_or(f64::NEG_INFINITY);
        mb.total_cmp(&ma)
    });
    order
}

fn event_list(ui: &mut egui::Ui, events: &[QuakeEvent]) -> Option<usize> {
    let mut picked = None;

    ui.label(egui::RichText::new(format!("EVENTS ({})", events.len()))
        .color(egui::Color32::from_rgb(100, 180, 220))
        .size(12.0)
        .strong());
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for index in by_magnitude(events) {
            let event = &events[index];
            let (r, g, b) = MarkerStyle::for_magnitude(event.magnitude).class.rgb();
            let magnitude = event
                .magnitude
                .map_or_else(|| "  ?".to_string(), |m| format!("{m:>4.1}"));

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(magnitude)
                    .color(egui::Color32::from_rgb(r, g, b))
                    .monospace()
                    .strong());
                let row = ui.selectable_label(false, egui::RichText::new(&event.place).size(11.0));
                let row = match event.local_time() {
                    Some(time) => row.on_hover_text(time),
                    None => row,
                };
                if row.clicked() {
                    picked = Some(index);
                }
            });
        }
    });

    picked
}

fn draw_legend(ui: &egui::Ui, map_rect: egui::Rect) {
    let painter = ui.painter().with_clip_rect(map_rect);
    let size = egui::vec2(150.0, 76.0);
    let origin = map_rect.left_bottom() + egui::vec2(10.0, -10.0 - size.y);
    let frame = egui::Rect::from_min_size(origin, size);

    painter.rect_filled(frame, 6.0, egui::Color32::from_rgba_unmultiplied(25, 30, 35, 200));

    for (row, class) in MagnitudeClass::ALL.iter().enumerate() {
        let (r, g, b) = class.rgb();
        let y = origin.y + 14.0 + row as f32 * 22.0;
        painter.circle_filled(egui::pos2(origin.x + 16.0, y), 6.0, egui::Color32::from_rgb(r, g, b));
        painter.text(
            egui::pos2(origin.x + 30.0, y),
            egui::Align2::LEFT_CENTER,
            class.label(),
            egui::FontId::proportional(11.0),
            egui::Color32::from_rgb(220, 220, 220),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quake_feed::FeatureCollection;

    fn events(magnitudes: &[Option<f64>]) -> Vec<QuakeEvent> {
        let features: Vec<String> = magnitudes
            .iter()
            .enumerate()
            .map(|(i, mag)| {
                let mag = mag.map_or_else(|| "null".to_string(), |m| m.to_string());
                format!(
                    r#"{{"id":"ev{i}","properties":{{"mag":{mag},"place":"P{i}"}},"geometry":{{"coordinates":[10.0,20.0,5.0]}}}}"#
                )
            })
            .collect();
        let json = format!(
            r#"{{"metadata":{{"count":{}}},"features":[{}]}}"#,
            magnitudes.len(),
            features.join(",")
        );
        FeatureCollection::from_slice(json.as_bytes())
            .unwrap()
            .features
            .iter()
            .map(|f| QuakeEvent::from_feature(f).unwrap())
            .collect()
    }

    #[test]
    fn test_sorted_largest_first() {
        let events = events(&[Some(2.0), Some(6.5), None, Some(4.1)]);
        assert_eq!(by_magnitude(&events), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_empty_list() {
        assert!(by_magnitude(&[]).is_empty());
    }
}
