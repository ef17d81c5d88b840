/*
Copyright 2023 the dice-bridge developers

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

       http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.
*/

//! One adapter per supported host format. Adapters pull the raw equation and
//! the already-rolled face values out of a host's markup and hand both to the
//! shared `dice-equation` pipeline; host quirks never leak past this crate.

pub mod chat_log;
pub mod formula_pair;
pub mod inline_roll;
pub mod sheet_button;

pub use chat_log::ChatLogAdapter;
pub use formula_pair::FormulaPairAdapter;
pub use inline_roll::InlineRollAdapter;
pub use sheet_button::{KeepPreset, SheetButtonAdapter};

use dice_equation::{ParseRollError, RollConversion};

pub const DEFAULT_THEME: &str = "bees";

/// Per-session adapter state, passed in explicitly instead of living in
/// module globals so the pipeline stays testable in isolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterContext {
    pub theme: String,
}

impl AdapterContext {
    pub fn new(theme: &str) -> AdapterContext {
        AdapterContext {
            theme: theme.to_string(),
        }
    }
}

impl Default for AdapterContext {
    fn default() -> AdapterContext {
        AdapterContext::new(DEFAULT_THEME)
    }
}

pub trait HostAdapter {
    /// Convert one observed markup/text fragment into a normalized roll.
    /// An empty dice array means the fragment held nothing to roll.
    fn convert(
        &self,
        fragment: &str,
        context: &AdapterContext,
    ) -> Result<RollConversion, ParseRollError>;
}
