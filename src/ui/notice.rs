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

use std::collections::VecDeque;

use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub level: NoticeLevel,
}

/// Message boxes shown one at a time, oldest first.
#[derive(Debug, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    pub fn info(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.push(title.into(), message.into(), NoticeLevel::Info);
    }

    pub fn error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.push(title.into(), message.into(), NoticeLevel::Error);
    }

    fn push(&mut self, title: String, message: String, level: NoticeLevel) {
        log::debug!("Notice [{title}]: {message}");
        self.queue.push_back(Notice {
            title,
            message,
            level,
        });
    }

    pub fn current(&self) -> Option<&Notice> {
        self.queue.front()
    }

    pub fn dismiss(&mut self) {
        self.queue.pop_front();
    }

    /// Show the oldest notice centred over the window.
    pub fn render(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.current() else {
            return;
        };

        let (accent, icon) = match notice.level {
            NoticeLevel::Info => (egui::Color32::from_rgb(100, 180, 220), "ℹ"),
            NoticeLevel::Error => (egui::Color32::from_rgb(255, 100, 100), "⚠"),
        };

        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .id(egui::Id::new("notice_window"))
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .collapsible(false)
            .resizable(false)
            .min_width(280.0)
            .frame(egui::Frame::window(&ctx.style())
                .stroke(egui::Stroke::new(1.0, accent))
                .corner_radius(6.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(icon).color(accent).size(18.0));
                    ui.label(notice.message.as_str());
                });
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed || enter_dismisses(ctx) {
            self.dismiss();
        }
    }
}

/// Enter closes a notice unless it was meant for a focused widget, such as
/// a text field being committed.
fn enter_dismisses(ctx: &egui::Context) -> bool {
    ctx.memory(|m| m.focused().is_none()) && ctx.input(|i| i.key_pressed(egui::Key::Enter))
}

/// Small progress box shown while a feed download is running.
pub fn render_busy(ctx: &egui::Context, message: &str) {
    egui::Window::new("Fetching data")
        .id(egui::Id::new("busy_window"))
        .title_bar(false)
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 40.0))
        .resizable(false)
        .frame(egui::Frame::window(&ctx.style())
            .fill(egui::Color32::from_rgba_unmultiplied(25, 30, 35, 220))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(60, 80, 100)))
            .corner_radius(6.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(egui::RichText::new(message)
                    .color(egui::Color32::from_rgb(200, 200, 200)));
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_shown_in_order() {
        let mut notices = Notices::default();
        assert!(notices.current().is_none());

        notices.error("Server Error", "Bad Response");
        notices.info("Data Retrieved", "3 earthquakes were found");

        let first = notices.current().unwrap();
        assert_eq!(first.title, "Server Error");
        assert_eq!(first.level, NoticeLevel::Error);

        notices.dismiss();
        assert_eq!(notices.current().unwrap().message, "3 earthquakes were found");
        notices.dismiss();
        assert!(notices.current().is_none());
    }

    fn enter_pressed() -> egui::RawInput {
        egui::RawInput {
            events: vec![egui::Event::Key {
                key: egui::Key::Enter,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_enter_dismisses_without_focus() {
        let ctx = egui::Context::default();
        let mut notices = Notices::default();
        notices.info("Data Plotted", "1 points plotted");

        let _ = ctx.run(enter_pressed(), |ctx| notices.render(ctx));
        assert!(notices.current().is_none());
    }

    #[test]
    fn test_enter_in_focused_field_keeps_notice() {
        let ctx = egui::Context::default();
        let mut notices = Notices::default();
        notices.error("Search Limit Error", "Limit must be between 1 and 20000");

        let _ = ctx.run(enter_pressed(), |ctx| {
            ctx.memory_mut(|m| m.request_focus(egui::Id::new("limit_field")));
            notices.render(ctx);
        });
        assert_eq!(notices.current().unwrap().title, "Search Limit Error");

        // Without a key press nothing changes
        let _ = ctx.run(egui::RawInput::default(), |ctx| notices.render(ctx));
        assert!(notices.current().is_some());
    }
}
