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

//! Newer sheet messages carry the roll twice: a raw formula element and an
//! evaluated string whose text is just `+`/`-`-delimited flat values with no
//! markup around them. Dice consume the evaluated values in order; modifier
//! values come from the formula itself.

use crate::{AdapterContext, HostAdapter};
use dice_equation::{parse_roll_equation, ParseRollError, RollConversion};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static RAW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)class="rt-formula__raw"[^>]*>([^<]+)<"#).unwrap()
});

static EVALUATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)class="rt-formula__evaluated-string"[^>]*>([^<]+)<"#).unwrap()
});

#[derive(Debug, Default, Clone, Copy)]
pub struct FormulaPairAdapter;

impl HostAdapter for FormulaPairAdapter {
    fn convert(
        &self,
        fragment: &str,
        context: &AdapterContext,
    ) -> Result<RollConversion, ParseRollError> {
        let equation = RAW_RE
            .captures(fragment)
            .map(|caps| caps[1].trim().to_string())
            .ok_or(ParseRollError::MissingEquation)?;
        let evaluated = EVALUATED_RE
            .captures(fragment)
            .map(|caps| caps[1].trim().to_string())
            .ok_or(ParseRollError::MissingEquation)?;

        let values: Vec<i64> = evaluated
            .split(|c| c == '+' || c == '-')
            .filter_map(|piece| piece.trim().parse().ok())
            .collect();

        debug!("formula pair `{}` evaluated as `{}`", equation, evaluated);
        parse_roll_equation(&equation, &context.theme, &values)
    }
}
