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

//! Test helpers shared by the app modules.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use quake_feed::{HttpResponse, Transport, TransportError};

/// Canned responses by URL; anything else is a 404. Records every request.
#[derive(Debug, Default)]
pub struct StubTransport {
    bodies: HashMap<String, Vec<u8>>,
    calls: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn with_bodies(bodies: &[(&str, &[u8])]) -> Self {
        Self {
            bodies: bodies.iter().map(|(url, body)| ((*url).to_string(), body.to_vec())).collect(),
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for StubTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());
        Ok(match self.bodies.get(url) {
            Some(body) => HttpResponse { status: 200, body: body.clone() },
            None => HttpResponse { status: 404, body: Vec::new() },
        })
    }
}

/// Poll `done` until it returns true, giving up after five seconds.
pub fn wait_until(mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
}
