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

use jiff::Zoned;

/// Wall-clock time used to name rotated files.
#[derive(Debug)]
pub(crate) enum Clock {
    /// The system time in the local time zone.
    System,
    /// A fixed time, moved only by [`Clock::advance`].
    #[cfg(test)]
    Frozen(Zoned),
}

impl Clock {
    pub(crate) fn now(&self) -> Zoned {
        match self {
            Clock::System => Zoned::now(),
            #[cfg(test)]
            Clock::Frozen(now) => now.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn frozen_at(time: &str) -> Clock {
        Clock::Frozen(time.parse().expect("invalid zoned datetime"))
    }

    #[cfg(test)]
    pub(crate) fn advance(&mut self, span: jiff::Span) {
        if let Clock::Frozen(now) = self {
            *now = now.checked_add(span).expect("frozen clock out of range");
        }
    }
}
