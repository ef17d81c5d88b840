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

//! Generic chat-log roll block: the equation sits in a `formula` line
//! reading `rolling <equation>` and each rolled die appears as a `diceroll`
//! element whose `didroll` child holds the shown face value.

use crate::{AdapterContext, HostAdapter};
use dice_equation::{parse_roll_equation, ParseRollError, RollConversion};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static FORMULA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<div class="formula"[^>]*>\s*rolling ([^<]+)<"#).unwrap()
});

static DIDROLL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)class="didroll"[^>]*>\s*(-?\d+)\s*<"#).unwrap());

#[derive(Debug, Default, Clone, Copy)]
pub struct ChatLogAdapter;

impl HostAdapter for ChatLogAdapter {
    fn convert(
        &self,
        fragment: &str,
        context: &AdapterContext,
    ) -> Result<RollConversion, ParseRollError> {
        let equation = FORMULA_RE
            .captures(fragment)
            .map(|caps| caps[1].trim().to_string())
            .ok_or(ParseRollError::MissingEquation)?;

        // dropped dice still show a value and still occupy a slot
        let values: Vec<i64> = DIDROLL_RE
            .captures_iter(fragment)
            .filter_map(|caps| caps[1].parse().ok())
            .collect();

        debug!("chat log roll `{}` with values {:?}", equation, values);
        parse_roll_equation(&equation, &context.theme, &values)
    }
}
