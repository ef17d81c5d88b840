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

//! Inline-roll tooltips: a sentence of the shape
//! `Rolling <equation> = <result-html>` where each physically rolled die is
//! a `basicdiceroll` span inside the result. Bracketed `[...]` annotations
//! label modifiers on the host side and are stripped before matching.
//! Modifier values come from the equation's own literal terms, not from the
//! result markup.

use crate::{AdapterContext, HostAdapter};
use dice_equation::{parse_roll_equation, ParseRollError, RollConversion};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

static ROLLING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"rolling (.*) = (.*)").unwrap());

static DIE_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span class="basicdiceroll[^"]*">(-?\d+)</span>"#).unwrap()
});

#[derive(Debug, Default, Clone, Copy)]
pub struct InlineRollAdapter;

impl HostAdapter for InlineRollAdapter {
    fn convert(
        &self,
        fragment: &str,
        context: &AdapterContext,
    ) -> Result<RollConversion, ParseRollError> {
        let text = fragment.to_lowercase();
        let text = LABEL_RE.replace_all(&text, "");

        let caps = ROLLING_RE
            .captures(&text)
            .ok_or(ParseRollError::MissingEquation)?;
        let equation = caps[1].to_string();
        let result = caps.get(2).map_or("", |m| m.as_str());

        let values: Vec<i64> = DIE_SPAN_RE
            .captures_iter(result)
            .filter_map(|caps| caps[1].parse().ok())
            .collect();

        debug!("inline roll `{}` with values {:?}", equation, values);
        parse_roll_equation(&equation, &context.theme, &values)
    }
}
