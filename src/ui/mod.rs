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

//! Pages and dialogs of the QuakeMap window.

pub mod detail_page;
pub mod map_page;
pub mod notice;
pub mod settings_page;

pub use detail_page::{DetailAction, DetailPage};
pub use map_page::MapPage;
pub use notice::Notices;
pub use settings_page::{RefreshChoice, SettingsPage};

/// Top-level pages, switched from the menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Settings,
    Map,
    Detail,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Settings, Page::Map, Page::Detail];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Settings => "Settings Page",
            Page::Map => "Map Page",
            Page::Detail => "Point Info Page",
        }
    }

    /// Marker clicks only open the detail page when it is not already up.
    pub fn allows_picking(&self) -> bool {
        *self != Page::Detail
    }
}
