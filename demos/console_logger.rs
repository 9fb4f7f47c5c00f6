// Copyright 2024 FastLabs Developers
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

use twinlog::ConsoleLogger;
use twinlog::Logger;
use twinlog::Severity;

fn main() {
    let logger = ConsoleLogger::new(Severity::Debug);
    twinlog::error!(logger, "Hello error!");
    twinlog::warning!(logger, "Hello warning!");
    twinlog::info!(logger, "Hello info!");
    twinlog::trace!(logger, "Hello trace!");
    twinlog::debug!(logger, "Hello debug!");

    let plain = ConsoleLogger::from_level("warning").no_color();
    plain.warning(format_args!("Hello {}!", "plain warning"));
    plain.info(format_args!("filtered out"));
}
