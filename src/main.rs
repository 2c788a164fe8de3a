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

mod app;
mod config;
mod map;
mod photo;
#[cfg(test)]
mod testing;
mod ui;
mod worker;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eframe::egui;
use mimalloc::MiMalloc;
use quake_feed::{FeedPeriod, ReqwestTransport, SessionFiles, SummaryFeed};

use app::QuakeMapApp;
use config::AppConfig;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Map USGS earthquake events and look up the places they happened.
#[derive(Parser, Debug)]
#[command(name = "quakemap-desktop", version, about)]
struct Args {
    /// Directory for session files, overriding the config file
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Standard feed to fetch on startup: significant, 4.5, 2.5 or 1.0
    #[arg(long, value_name = "FEED", value_parser = parse_feed)]
    feed: Option<SummaryFeed>,

    /// Period of the startup feed: hour, day, week or month
    #[arg(long, value_name = "PERIOD", value_parser = parse_period)]
    period: Option<FeedPeriod>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn parse_feed(value: &str) -> Result<SummaryFeed, String> {
    SummaryFeed::ALL
        .into_iter()
        .find(|feed| feed.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| format!("unknown feed {value:?}, expected significant, 4.5, 2.5 or 1.0"))
}

fn parse_period(value: &str) -> Result<FeedPeriod, String> {
    FeedPeriod::ALL
        .into_iter()
        .find(|period| period.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| format!("unknown period {value:?}, expected hour, day, week or month"))
}

fn main() -> Result<(), eframe::Error> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    log::info!("Starting QuakeMap Desktop {}", env!("CARGO_PKG_VERSION"));

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config, using defaults: {e}");
        AppConfig::default()
    });
    if let Ok(path) = AppConfig::get_config_path() {
        log::debug!("Config file: {}", path.display());
    }
    if let Some(dir) = args.data_dir {
        config.session_dir = Some(dir);
    }
    if let Some(period) = args.period {
        config.feed_period = period;
    }
    let startup_url = args.feed.map(|feed| feed.url(config.feed_period));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Earthquake Mapping"),
        ..Default::default()
    };

    eframe::run_native(
        "Earthquake Mapping",
        options,
        Box::new(move |_cc: &eframe::CreationContext<'_>| -> Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>> {
            let session_dir = config.resolve_session_dir();
            log::info!("Session files in {}", session_dir.display());
            let files = SessionFiles::new(session_dir)?;
            let transport = ReqwestTransport::with_timeout(&config.user_agent, config.request_timeout())?;

            Ok(Box::new(
                QuakeMapApp::new(config, files, Arc::new(transport)).with_startup_fetch(startup_url),
            ))
        }),
    )
}
