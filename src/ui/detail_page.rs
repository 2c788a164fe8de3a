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

//! Detail page for a single event: its feed properties plus an
//! encyclopedia summary and photo of the nearest named place.

use eframe::egui;
use log::warn;
use quake_feed::{Article, FeedError, QuakeEvent};

use crate::photo;

const NOT_FOUND: &str = "No Information Found";

/// State of the encyclopedia lookup for the event on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Pending,
    Found(Article),
    NotFound,
}

/// What the user asked for from the detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailAction {
    OpenUrl(String),
}

pub struct DetailPage {
    event: Option<QuakeEvent>,
    lookup: Lookup,
    photo: Option<egui::TextureHandle>,
    placeholder: Option<egui::TextureHandle>,
}

impl Default for DetailPage {
    fn default() -> Self {
        Self {
            event: None,
            lookup: Lookup::NotFound,
            photo: None,
            placeholder: None,
        }
    }
}

impl DetailPage {
    /// Show `event`, forgetting whatever was shown before.
    pub fn open(&mut self, event: QuakeEvent, lookup_started: bool) {
        self.event = Some(event);
        self.photo = None;
        self.lookup = if lookup_started {
            Lookup::Pending
        } else {
            Lookup::NotFound
        };
    }

    pub fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    fn is_showing(&self, event_id: &str) -> bool {
        self.event.as_ref().is_some_and(|e| e.id == event_id)
    }

    /// Apply a finished lookup. Results for an event no longer shown are
    /// dropped and `false` is returned.
    pub fn apply_article(&mut self, event_id: &str, result: Result<Option<Article>, FeedError>) -> bool {
        if !self.is_showing(event_id) {
            return false;
        }
        self.lookup = match result {
            Ok(Some(article)) => Lookup::Found(article),
            Ok(None) => Lookup::NotFound,
            Err(e) => {
                warn!("Encyclopedia lookup failed: {e}");
                Lookup::NotFound
            }
        };
        true
    }

    pub fn apply_image(&mut self, ctx: &egui::Context, event_id: &str, result: Result<Vec<u8>, FeedError>) -> bool {
        if !self.is_showing(event_id) {
            return false;
        }
        match result {
            Ok(bytes) => {
                self.photo = photo::load_texture_from_bytes(ctx, &bytes, event_id);
            }
            Err(e) => warn!("Thumbnail download failed: {e}"),
        }
        true
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<DetailAction> {
        let Some(event) = &self.event else {
            ui.centered_and_justified(|ui| {
                ui.label("Click an earthquake on the map to see more about it");
            });
            return None;
        };

        let mut action = None;

        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(event.display_title()).size(18.0).strong());
        });
        ui.add_space(6.0);

        egui::SidePanel::left("detail_properties")
            .resizable(false)
            .default_width(380.0)
            .show_inside(ui, |ui| {
                egui::Grid::new("detail_grid")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .striped(true)
                    .show(ui, |ui| {
                        for (label, value, help) in property_rows(event) {
                            ui.label(egui::RichText::new(label).strong()).on_hover_text(help);
                            ui.label(value).on_hover_text(help);
                            ui.end_row();
                        }
                    });

                ui.add_space(12.0);
                if let Some(url) = &event.url {
                    if ui.button("🌐 Open USGS event page")
                        .on_hover_text(url.as_str())
                        .clicked() {
                        action = Some(DetailAction::OpenUrl(url.clone()));
                    }
                }
                if let Lookup::Found(article) = &self.lookup {
                    if ui.button("📖 Open encyclopedia article").clicked() {
                        action = Some(DetailAction::OpenUrl(article.page_url()));
                    }
                }
            });

        let photo = match &self.photo {
            Some(texture) => texture.clone(),
            None => self
                .placeholder
                .get_or_insert_with(|| photo::placeholder_texture(ui.ctx()))
                .clone(),
        };

        egui::CentralPanel::default().show_inside(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add(egui::Image::new(&photo).max_size(egui::vec2(300.0, 300.0)));
            });
            ui.add_space(8.0);

            match &self.lookup {
                Lookup::Pending => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Looking up encyclopedia summary…");
                    });
                }
                Lookup::Found(article) => {
                    ui.label(egui::RichText::new(&article.title).strong());
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.label(article.summary.as_str());
                    });
                }
                Lookup::NotFound => {
                    ui.label(egui::RichText::new(NOT_FOUND).italics());
                }
            }
        });

        action
    }
}

fn or_none<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

/// The fourteen labelled properties with their hover help, in display order.
pub fn property_rows(event: &QuakeEvent) -> [(&'static str, String, &'static str); 14] {
    [
        ("Place:", event.place.clone(),
            "Description of named geographic region near to the event"),
        ("Time:", or_none(event.local_time()),
            "Time when event occurred"),
        ("Gap:", or_none(event.gap),
            "The largest azimuthal gap between azimuthally adjacent stations (in degrees)"),
        ("Dmin:", or_none(event.dmin),
            "Horizontal distance from the epicenter to the nearest station (in degrees)"),
        ("Status:", event.status.clone(),
            "Indicates whether the event has been reviewed by a human"),
        ("Alert:", or_none(event.alert.as_deref()),
            "The alert level from the PAGER earthquake impact scale"),
        ("Felt:", or_none(event.felt),
            "The total number of felt reports submitted to the DYFI system"),
        ("Magnitude:", or_none(event.magnitude),
            "The magnitude of the event"),
        ("Type:", event.event_type.clone(),
            "Whether the event was an 'earthquake' or 'quarry'"),
        ("Magnitude Type:", or_none(event.mag_type.as_deref()),
            "The method used to calculate the preferred magnitude for the event"),
        ("Significance:", or_none(event.sig),
            "A number describing how significant the event is (between 0 and 1000)"),
        ("Tsunami:", if event.tsunami { "Yes" } else { "No" }.to_string(),
            "A flag indicating whether a large event occurred in oceanic regions\nThe flag does not indicate if a tsunami actually did or will exist"),
        ("MMI:", or_none(event.mmi),
            "The maximum estimated instrumental intensity for the event"),
        ("CDI:", or_none(event.cdi),
            "The maximum reported intensity for the event"),
    ]
}
