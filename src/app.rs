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

//! The QuakeMap window: page switching, the fetch flow and job results.

use std::sync::Arc;

use eframe::egui;
use log::{debug, error, info, warn};
use quake_feed::{load_events, FeedClient, FeedSession, SessionFiles, Transport, WikiClient};

use crate::config::{AppConfig, MapTheme};
use crate::map::QuakeMap;
use crate::ui::notice::render_busy;
use crate::ui::{DetailAction, DetailPage, MapPage, Notices, Page, RefreshChoice, SettingsPage};
use crate::worker::{JobResult, Workers};

const BUSY_MESSAGE: &str = "Fetching data please wait…";

const TITLE_RETRIEVED: &str = "Data Retrieved";
const TITLE_PLOTTED: &str = "Data Plotted";
const TITLE_SELECTED: &str = "Point Selected";
const TITLE_LOADING: &str = "Loading";

pub struct QuakeMapApp {
    config: AppConfig,
    page: Page,
    session: FeedSession,
    files: SessionFiles,
    workers: Workers,
    notices: Notices,
    settings: SettingsPage,
    map_page: MapPage,
    map: QuakeMap,
    detail: DetailPage,
    /// Fetched on the first frame, from `--feed`
    startup_url: Option<String>,
    cleaned_up: bool,
}

impl QuakeMapApp {
    pub fn new(config: AppConfig, files: SessionFiles, transport: Arc<dyn Transport>) -> Self {
        let client = FeedClient::new(transport.clone(), files.data_path());
        let wiki = WikiClient::new(transport);
        let workers = Workers::new(client.clone(), wiki, files.clone());
        let map = QuakeMap::new(config.map_theme, AppConfig::tile_cache_dir(), config.default_zoom);

        Self {
            page: Page::Settings,
            session: FeedSession::new(client),
            files,
            workers,
            notices: Notices::default(),
            settings: SettingsPage::new(config.feed_period),
            map_page: MapPage::new(config.show_legend),
            map,
            detail: DetailPage::default(),
            startup_url: None,
            cleaned_up: false,
            config,
        }
    }

    #[must_use]
    pub fn with_startup_fetch(mut self, url: Option<String>) -> Self {
        self.startup_url = url;
        self
    }

    /// Resolve a Refresh menu entry and fetch it.
    pub fn refresh(&mut self, choice: RefreshChoice, ctx: &egui::Context) {
        match self.settings.resolve(choice) {
            Ok(url) => self.request_fetch(&url, ctx),
            Err(e) => {
                info!("Query rejected: {}", e.code());
                self.notices.error(e.title(), e.to_string());
            }
        }
    }

    /// Fetch `url` unless it is the data already on disk.
    pub fn request_fetch(&mut self, url: &str, ctx: &egui::Context) {
        if !self.session.needs_fetch(url) {
            debug!("{url} is already the current data set");
            return;
        }
        if self.workers.fetch_feed(url, ctx) {
            info!("Fetching {url}");
        } else {
            self.notices.info(TITLE_LOADING, "Another request is still running, please wait");
        }
    }

    fn switch_page(&mut self, page: Page) {
        if page == self.page {
            return;
        }
        debug!("Switching to {}", page.label());
        self.page = page;
        if page == Page::Map {
            self.sync_map();
        }
    }

    /// Reload the map from the data file if it shows an older data set.
    fn sync_map(&mut self) {
        let Some(current) = self.session.current_url().map(str::to_string) else {
            return;
        };
        if !self.map.is_stale(Some(&current)) {
            return;
        }
        debug!("Map shows {:?}, reloading for {current}", self.map.local_url());

        match load_events(&self.files.data_path()) {
            Ok(loaded) => {
                if loaded.skipped > 0 {
                    warn!("{} features had no coordinates", loaded.skipped);
                }
                let plotted = loaded.events.len();
                self.map.set_events(&current, loaded.events);
                self.notices.info(TITLE_PLOTTED, format!("{plotted} points plotted"));
            }
            Err(e) => {
                error!("Failed to load {}: {e}", self.files.data_path().display());
                self.notices.error(e.title(), e.user_message());
            }
        }
    }

    fn handle_results(&mut self, ctx: &egui::Context) {
        for result in self.workers.poll() {
            match result {
                JobResult::Feed { url, result: Ok(summary) } => {
                    info!("Fetched {} events from {url}", summary.count);
                    self.session.mark_current(&url);
                    self.notices.info(TITLE_RETRIEVED, format!("{} earthquakes were found", summary.count));
                    if self.page == Page::Map {
                        self.sync_map();
                    }
                }
                JobResult::Feed { url, result: Err(e) } => {
                    error!("Fetch of {url} failed ({}): {e}", e.code());
                    self.notices.error(e.title(), e.user_message());
                }
                JobResult::Article { event_id, result } => {
                    if !self.detail.apply_article(&event_id, result) {
                        debug!("Dropping lookup for {event_id}, no longer shown");
                    }
                }
                JobResult::Image { event_id, result } => {
                    if !self.detail.apply_image(ctx, &event_id, result) {
                        debug!("Dropping thumbnail for {event_id}, no longer shown");
                    }
                }
            }
        }
    }

    fn on_marker_picked(&mut self, index: usize, ctx: &egui::Context) {
        let Some(event) = self.map.event(index).cloned() else {
            return;
        };
        info!("Selected {} ({})", event.id, event.place);
        self.notices
            .info(TITLE_SELECTED, format!("Here is more info about the point - {}", event.place));

        let lookup = self.config.wiki_lookups;
        if lookup {
            self.workers.lookup_place(&event.id, &event.place, ctx);
        }
        self.detail.open(event, lookup);
        self.switch_page(Page::Detail);
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            warn!("Failed to save config: {e}");
        }
    }

    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").on_hover_text("Quit the program").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                if self.page == Page::Settings {
                    ui.menu_button("Refresh", |ui| {
                        for choice in RefreshChoice::ALL {
                            if ui.button(choice.label()).on_hover_text(choice.hover_text()).clicked() {
                                self.refresh(choice, ctx);
                                ui.close();
                            }
                        }
                    });
                }

                ui.menu_button("View", |ui| {
                    ui.menu_button("Map Theme", |ui| {
                        for theme in MapTheme::ALL {
                            if ui.radio(self.config.map_theme == theme, theme.label()).clicked() {
                                self.config.map_theme = theme;
                                self.map.set_theme(theme);
                                self.save_config();
                            }
                        }
                    });
                    if ui.checkbox(&mut self.map_page.show_legend, "Magnitude Legend").changed() {
                        self.config.show_legend = self.map_page.show_legend;
                        self.save_config();
                    }
                    ui.checkbox(&mut self.map_page.show_list, "Event List");
                    if ui.checkbox(&mut self.config.wiki_lookups, "Encyclopedia Lookups").changed() {
                        self.save_config();
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.menu_button("Pages", |ui| {
                        for page in Page::ALL {
                            if page != self.page && ui.button(page.label()).clicked() {
                                self.switch_page(page);
                                ui.close();
                            }
                        }
                    });
                    if let Some(url) = self.session.current_url() {
                        ui.label(egui::RichText::new(url)
                            .color(egui::Color32::from_rgb(130, 130, 130))
                            .size(9.0)
                            .monospace());
                    }
                });
            });
        });
    }

    /// Remove the session files. Safe to call more than once.
    fn cleanup(&mut self) {
        if self.cleaned_up {
            return;
        }
        self.cleaned_up = true;
        let removed = self.files.cleanup();
        info!("Removed {removed} session files from {}", self.files.dir().display());
    }
}

impl eframe::App for QuakeMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(url) = self.startup_url.take() {
            self.request_fetch(&url, ctx);
        }
        self.handle_results(ctx);

        if self.settings.period != self.config.feed_period {
            self.config.feed_period = self.settings.period;
            self.save_config();
        }

        self.render_menu_bar(ctx);

        let mut picked = None;
        let mut action = None;
        egui::CentralPanel::default().show(ctx, |ui| match self.page {
            Page::Settings => self.settings.show(ui),
            Page::Map => picked = self.map_page.show(ui, &mut self.map, self.page.allows_picking()),
            Page::Detail => action = self.detail.show(ui),
        });

        if let Some(index) = picked {
            self.on_marker_picked(index, ctx);
        }
        if let Some(DetailAction::OpenUrl(url)) = action {
            if let Err(e) = webbrowser::open(&url) {
                warn!("Failed to open {url}: {e}");
            }
        }

        if self.workers.pending_feed().is_some() {
            render_busy(ctx, BUSY_MESSAGE);
        }
        self.notices.render(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.cleanup();
    }
}

impl Drop for QuakeMapApp {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{wait_until, StubTransport};

    const FEED_URL: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/significant_day.geojson";
    const FEED: &str = r#"{
        "metadata": {"count": 2},
        "features": [
            {"id": "a", "properties": {"mag": 4.2, "place": "10km W of Ridgecrest, CA"},
             "geometry": {"coordinates": [-117.6, 35.7, 8.0]}},
            {"id": "b", "properties": {"mag": 2.0, "place": "Nowhere"},
             "geometry": {"coordinates": []}}
        ]
    }"#;

    fn app(tmp: &tempfile::TempDir) -> (Arc<StubTransport>, QuakeMapApp) {
        let stub = Arc::new(StubTransport::with_bodies(&[(FEED_URL, FEED.as_bytes())]));
        let files = SessionFiles::new(tmp.path().join("session")).unwrap();
        let mut config = AppConfig::default();
        config.wiki_lookups = false;
        (stub.clone(), QuakeMapApp::new(config, files, stub))
    }

    fn fetch_and_wait(app: &mut QuakeMapApp, ctx: &egui::Context) {
        app.request_fetch(FEED_URL, ctx);
        wait_until(|| {
            app.handle_results(ctx);
            app.workers.pending_feed().is_none()
        });
    }

    /// Drain the notice queue as `(title, message)` pairs.
    fn notice_messages(app: &mut QuakeMapApp) -> Vec<(String, String)> {
        let mut messages = Vec::new();
        while let Some(notice) = app.notices.current() {
            messages.push((notice.title.clone(), notice.message.clone()));
            app.notices.dismiss();
        }
        messages
    }

    fn shown(title: &str, message: &str) -> (String, String) {
        (title.to_string(), message.to_string())
    }

    #[test]
    fn test_identical_request_not_reissued() {
        let tmp = tempfile::tempdir().unwrap();
        let (stub, mut app) = app(&tmp);
        let ctx = egui::Context::default();

        fetch_and_wait(&mut app, &ctx);
        assert_eq!(app.session.current_url(), Some(FEED_URL));
        assert_eq!(
            notice_messages(&mut app),
            vec![shown("Data Retrieved", "2 earthquakes were found")]
        );

        app.request_fetch(FEED_URL, &ctx);
        assert!(app.workers.pending_feed().is_none());
        assert_eq!(stub.calls().len(), 1);
    }

    #[test]
    fn test_second_fetch_while_running_shows_loading() {
        let tmp = tempfile::tempdir().unwrap();
        let (stub, mut app) = app(&tmp);
        let ctx = egui::Context::default();

        app.request_fetch(FEED_URL, &ctx);
        // Still pending until the result is polled
        app.request_fetch("https://earthquake.usgs.gov/other.geojson", &ctx);
        assert_eq!(
            app.notices.current().map(|n| n.title.as_str()),
            Some("Loading")
        );

        wait_until(|| {
            app.handle_results(&ctx);
            app.workers.pending_feed().is_none()
        });
        assert_eq!(stub.calls(), vec![FEED_URL.to_string()]);
    }

    #[test]
    fn test_failed_fetch_keeps_current_url() {
        let tmp = tempfile::tempdir().unwrap();
        let (_stub, mut app) = app(&tmp);
        let ctx = egui::Context::default();

        app.request_fetch("https://earthquake.usgs.gov/missing.geojson", &ctx);
        wait_until(|| {
            app.handle_results(&ctx);
            app.workers.pending_feed().is_none()
        });

        assert_eq!(app.session.current_url(), None);
        let notice = app.notices.current().unwrap();
        assert_eq!(notice.title, "Server Error");
    }

    #[test]
    fn test_map_reloads_only_for_new_data() {
        let tmp = tempfile::tempdir().unwrap();
        let (_stub, mut app) = app(&tmp);
        let ctx = egui::Context::default();

        fetch_and_wait(&mut app, &ctx);
        notice_messages(&mut app);

        app.switch_page(Page::Map);
        assert_eq!(app.map.events().len(), 1);
        assert_eq!(notice_messages(&mut app), vec![shown("Data Plotted", "1 points plotted")]);

        app.switch_page(Page::Settings);
        app.switch_page(Page::Map);
        assert!(notice_messages(&mut app).is_empty());
    }

    #[test]
    fn test_marker_pick_opens_detail() {
        let tmp = tempfile::tempdir().unwrap();
        let (_stub, mut app) = app(&tmp);
        let ctx = egui::Context::default();

        fetch_and_wait(&mut app, &ctx);
        app.switch_page(Page::Map);
        notice_messages(&mut app);

        app.on_marker_picked(0, &ctx);
        assert_eq!(app.page, Page::Detail);
        assert!(!app.page.allows_picking());
        assert_eq!(
            notice_messages(&mut app),
            vec![shown(
                "Point Selected",
                "Here is more info about the point - 10km W of Ridgecrest, CA"
            )]
        );
    }

    #[test]
    fn test_rejected_form_shows_error() {
        let tmp = tempfile::tempdir().unwrap();
        let (stub, mut app) = app(&tmp);
        let ctx = egui::Context::default();

        app.settings.form.limit = "0".to_string();
        app.refresh(RefreshChoice::Parameters, &ctx);

        assert_eq!(app.notices.current().unwrap().title, "Search Limit Error");
        assert!(stub.calls().is_empty());
    }

    #[test]
    fn test_cleanup_on_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let session_dir = tmp.path().join("session");
        {
            let (_stub, mut app) = app(&tmp);
            let ctx = egui::Context::default();
            fetch_and_wait(&mut app, &ctx);
            assert!(session_dir.join("current_data.json").exists());
        }
        assert!(!session_dir.join("current_data.json").exists());
    }
}
