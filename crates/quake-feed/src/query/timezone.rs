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

use std::fmt;

/// A named UTC offset offered by the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeZone {
    pub abbreviation: &'static str,
    /// Offset in `±HH:MM` form, unencoded.
    pub offset: &'static str,
}

const fn tz(abbreviation: &'static str, offset: &'static str) -> TimeZone {
    TimeZone {
        abbreviation,
        offset,
    }
}

/// Every zone the form offers, in menu order.
pub const TIME_ZONES: [TimeZone; 31] = [
    tz("UTC", "+00:00"),
    tz("ECT", "+01:00"),
    tz("EET", "+02:00"),
    tz("ART", "+02:00"),
    tz("EAT", "+03:00"),
    tz("MET", "+03:30"),
    tz("NET", "+04:00"),
    tz("PLT", "+05:00"),
    tz("IST", "+05:30"),
    tz("BST", "+06:00"),
    tz("VST", "+07:00"),
    tz("CTT", "+08:00"),
    tz("JST", "+09:00"),
    tz("ACT", "+09:30"),
    tz("AET", "+10:00"),
    tz("SST", "+11:00"),
    tz("NST", "+12:00"),
    tz("MIT", "-11:00"),
    tz("HST", "-10:00"),
    tz("AST", "-09:00"),
    tz("PST", "-08:00"),
    tz("PNT", "-07:00"),
    tz("MST", "-07:00"),
    tz("CST", "-06:00"),
    tz("EST", "-05:00"),
    tz("IET", "-05:00"),
    tz("PRT", "-04:00"),
    tz("CNT", "-03:30"),
    tz("AGT", "-03:00"),
    tz("BET", "-03:00"),
    tz("CAT", "-01:00"),
];

impl TimeZone {
    pub const UTC: TimeZone = TIME_ZONES[0];

    /// Look a zone up by its abbreviation (case-insensitive).
    #[must_use]
    pub fn from_abbreviation(abbreviation: &str) -> Option<TimeZone> {
        TIME_ZONES
            .iter()
            .copied()
            .find(|zone| zone.abbreviation.eq_ignore_ascii_case(abbreviation))
    }

    /// Offset as it must appear inside a query string; `+` would otherwise
    /// decode as a space.
    #[must_use]
    pub fn url_offset(&self) -> String {
        self.offset.replace('+', "%2B")
    }
}

impl Default for TimeZone {
    fn default() -> Self {
        TimeZone::UTC
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.abbreviation, self.offset)
    }
}
