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

use twinlog::Error;
use twinlog::FileLogger;

fn main() -> Result<(), Error> {
    let level = std::env::var("TWINLOG_LEVEL").unwrap_or_else(|_| "debug".to_string());
    let logger = FileLogger::builder("logs", "example")
        .level(&level)
        .max_file_size(1024 * 1024)
        .build()?;

    let repeat = 1;

    for i in 0..repeat {
        twinlog::fatal!(logger, "Hello fatal!");
        twinlog::error!(logger, "Hello error!");
        twinlog::warning!(logger, "Hello warning!");
        twinlog::info!(logger, "Hello info!");
        twinlog::trace!(logger, "Hello trace!");
        twinlog::debug!(logger, "Hello debug!");

        if i + 1 < repeat {
            std::thread::sleep(std::time::Duration::from_secs(10));
        }
    }

    println!("{:?}", logger.stats());
    Ok(())
}
