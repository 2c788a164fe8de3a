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

//! Query settings form.
//!
//! Everything is kept as text exactly as typed; validation happens only when
//! a refresh is requested.

use chrono::{Local, NaiveDate};
use eframe::egui;
use egui_extras::DatePickerButton;
use quake_feed::query::TIME_ZONES;
use quake_feed::{FeedPeriod, QueryError, QueryForm, SearchArea, SummaryFeed};

const DATE_FORMAT: &str = "%Y-%m-%d";
const FIELD_WIDTH: f32 = 120.0;

/// Entries of the Refresh menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshChoice {
    /// Build a custom query from the form
    Parameters,
    Preset(SummaryFeed),
}

impl RefreshChoice {
    pub const ALL: [RefreshChoice; 5] = [
        RefreshChoice::Parameters,
        RefreshChoice::Preset(SummaryFeed::Significant),
        RefreshChoice::Preset(SummaryFeed::M4_5),
        RefreshChoice::Preset(SummaryFeed::M2_5),
        RefreshChoice::Preset(SummaryFeed::M1_0),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RefreshChoice::Parameters => "Use Parameters",
            RefreshChoice::Preset(feed) => feed.label(),
        }
    }

    pub fn hover_text(&self) -> &'static str {
        match self {
            RefreshChoice::Parameters => "Use the data you specified",
            RefreshChoice::Preset(_) => "A standard URL",
        }
    }
}

pub struct SettingsPage {
    pub form: QueryForm,
    /// Period used by the preset feeds
    pub period: FeedPeriod,
}

impl SettingsPage {
    pub fn new(period: FeedPeriod) -> Self {
        Self {
            form: QueryForm::default(),
            period,
        }
    }

    /// URL for a Refresh menu entry, or the reason the form was rejected.
    pub fn resolve(&self, choice: RefreshChoice) -> Result<String, QueryError> {
        match choice {
            RefreshChoice::Parameters => self.form.build_url(),
            RefreshChoice::Preset(feed) => Ok(feed.url(self.period)),
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.columns(3, |columns| {
                self.query_options(&mut columns[0]);
                self.search_options(&mut columns[1]);
                self.additional_options(&mut columns[2]);
            });
        });
    }

    fn query_options(&mut self, ui: &mut egui::Ui) {
        section(ui, "Query Options", |ui| {
            egui::Grid::new("query_options_grid")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    date_field(ui, "Start Date:", "Limit to events on or after the specified start date",
                        &mut self.form.start_date, "start_date_picker");
                    date_field(ui, "End Date:", "Limit to events on or before the specified end date",
                        &mut self.form.end_date, "end_date_picker");
                    text_field(ui, "Start Time:", "Limit to events on or after the specified start time",
                        &mut self.form.start_time);
                    text_field(ui, "End Time:", "Limit to events on or before the specified end time",
                        &mut self.form.end_time);

                    ui.label("Time Zone:")
                        .on_hover_text("Allow for timezone, default is Universal Coordinated Time");
                    egui::ComboBox::from_id_salt("timezone_combo")
                        .selected_text(self.form.timezone.abbreviation)
                        .height(300.0)
                        .show_ui(ui, |ui| {
                            for tz in TIME_ZONES {
                                ui.selectable_value(&mut self.form.timezone, tz, tz.to_string());
                            }
                        });
                    ui.end_row();
                });
        });
    }

    fn search_options(&mut self, ui: &mut egui::Ui) {
        section(ui, "Rectangle Search", |ui| {
            egui::Grid::new("rectangle_grid")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    text_field(ui, "Min Latitude:",
                        "Limit to events with a latitude larger than the specified minimum\nBetween -90 and 90 degrees",
                        &mut self.form.min_latitude);
                    text_field(ui, "Max Latitude:",
                        "Limit to events with a latitude smaller than the specified maximum\nBetween -90 and 90 degrees",
                        &mut self.form.max_latitude);
                    text_field(ui, "Min Longitude:",
                        "Limit to events with a longitude larger than the specified minimum\nBetween -180 and 180 degrees",
                        &mut self.form.min_longitude);
                    text_field(ui, "Max Longitude:",
                        "Limit to events with a longitude smaller than the specified maximum\nBetween -180 and 180 degrees",
                        &mut self.form.max_longitude);
                });
        });

        section(ui, "Circle Search", |ui| {
            egui::Grid::new("circle_grid")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    text_field(ui, "Latitude:",
                        "Specify the latitude to be used for a radius search\nBetween -90 and 90 degrees",
                        &mut self.form.latitude);
                    text_field(ui, "Longitude:",
                        "Specify the longitude to be used for a radius search\nBetween -180 and 180 degrees",
                        &mut self.form.longitude);
                    text_field(ui, "Max Radius:",
                        "Limit to events within the specified maximum number of degrees\nfrom the geographic point defined by the latitude and longitude\nBetween 0 and 180 degrees",
                        &mut self.form.max_radius);
                });
        });

        section(ui, "Search Type", |ui| {
            ui.horizontal(|ui| {
                ui.label("Search Option:")
                    .on_hover_text("Specify for a Circle search or Rectangle search");
                for area in SearchArea::ALL {
                    ui.radio_value(&mut self.form.area, area, area.label());
                }
            });
        });
    }

    fn additional_options(&mut self, ui: &mut egui::Ui) {
        section(ui, "Additional Options", |ui| {
            egui::Grid::new("additional_grid")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    text_field(ui, "Min Depth:",
                        "Limit to events with depth more than the specified minimum\nBetween -100 and 1000 km",
                        &mut self.form.min_depth);
                    text_field(ui, "Max Depth:",
                        "Limit to events with depth less than the specified maximum\nBetween -100 and 1000 km",
                        &mut self.form.max_depth);
                    text_field(ui, "Min Magnitude:",
                        "Limit to events with a magnitude larger than the specified minimum",
                        &mut self.form.min_magnitude);
                    text_field(ui, "Max Magnitude:",
                        "Limit to events with a magnitude smaller than the specified maximum",
                        &mut self.form.max_magnitude);
                    text_field(ui, "Search Limit:",
                        "Specify the amount of results returned from your query\nBetween 1 and 20000. Depending on the limit specified,\nreading data from the server may take quite long",
                        &mut self.form.limit);

                    ui.label("URL Time:")
                        .on_hover_text("Time interval used by the standard feeds in the Refresh menu");
                    egui::ComboBox::from_id_salt("url_period_combo")
                        .selected_text(self.period.label())
                        .show_ui(ui, |ui| {
                            for period in FeedPeriod::ALL {
                                ui.selectable_value(&mut self.period, period, period.label());
                            }
                        });
                    ui.end_row();
                });
        });
    }
}

fn section(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::group(ui.style())
        .corner_radius(6.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(title)
                .color(egui::Color32::from_rgb(100, 180, 220))
                .strong());
            ui.add_space(4.0);
            add_contents(ui);
        });
    ui.add_space(6.0);
}

fn text_field(ui: &mut egui::Ui, label: &str, help: &str, value: &mut String) {
    ui.label(label).on_hover_text(help);
    ui.add(egui::TextEdit::singleline(value).desired_width(FIELD_WIDTH))
        .on_hover_text(help);
    ui.end_row();
}

/// Text entry plus a calendar button that writes back into the text.
fn date_field(ui: &mut egui::Ui, label: &str, help: &str, value: &mut String, picker_id: &str) {
    ui.label(label).on_hover_text(help);
    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(value).desired_width(FIELD_WIDTH))
            .on_hover_text(help);

        let mut date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
            .unwrap_or_else(|_| Local::now().date_naive());
        if ui.add(DatePickerButton::new(&mut date).id_salt(picker_id)).changed() {
            *value = date.format(DATE_FORMAT).to_string();
        }
    });
    ui.end_row();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_uses_selected_period() {
        let mut page = SettingsPage::new(FeedPeriod::Day);
        page.period = FeedPeriod::Week;
        assert_eq!(
            page.resolve(RefreshChoice::Preset(SummaryFeed::M4_5)).unwrap(),
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/4.5_week.geojson"
        );
    }

    #[test]
    fn test_parameters_reject_bad_form() {
        let mut page = SettingsPage::new(FeedPeriod::Day);
        page.form.start_time.clear();
        assert_eq!(page.resolve(RefreshChoice::Parameters), Err(QueryError::BadTime));
    }

    #[test]
    fn test_parameters_build_query() {
        let page = SettingsPage::new(FeedPeriod::Day);
        let url = page.resolve(RefreshChoice::Parameters).unwrap();
        assert!(url.starts_with("https://earthquake.usgs.gov/fdsnws/event/1/query?format=geojson&starttime="));
        assert!(url.ends_with("&limit=1"));
    }

    #[test]
    fn test_menu_labels() {
        let labels: Vec<_> = RefreshChoice::ALL.iter().map(RefreshChoice::label).collect();
        assert_eq!(labels[0], "Use Parameters");
        assert_eq!(labels[1], "Significant Earthquakes");
        assert_eq!(labels.len(), 5);
    }
}
