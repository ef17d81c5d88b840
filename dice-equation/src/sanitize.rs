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

//! Strips host-specific roll syntax the rest of the pipeline does not
//! understand. Comparators only drive success/failure coloring on the host
//! page and reroll/explode/sort operators are not emulated; the pipeline
//! represents the as-rolled face values only.

use regex::Regex;
use std::sync::LazyLock;

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static CS_CF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(cs|cf)\d+").unwrap());

static COMPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(cs|cf)?[><=]=?\d+").unwrap());

static OP_BEFORE_SIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(rr|ro|co|ce|sf|df|min|max|!!|!p|r|!)([+,-])").unwrap()
});

static OP_TRAILING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(rr|ro|co|ce|sf|df|min|max|!!|!p|r|!)(\d+|$)").unwrap()
});

static IMPLIED_KEEP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([kd][hl])([^0-9]|$)").unwrap());

/// Normalize a raw host equation. Never fails; syntax the sanitizer does not
/// recognize is left in place and surfaces as a parse error downstream.
pub fn sanitize(raw: &str) -> String {
    let mut equation = raw.to_lowercase();
    // bracketed roll-label annotations, e.g. `(2)[ABILITY MODIFIER]`
    equation = LABEL_RE.replace_all(&equation, "").into_owned();
    equation = WHITESPACE_RE.replace_all(&equation, "").into_owned();
    // a host may emit an empty bonus group; treating it as a zero modifier
    // keeps group and index alignment intact
    equation = equation.replace("()", "(0)");
    equation = equation.replace("+-", "-");
    equation = CS_CF_RE.replace_all(&equation, "").into_owned();
    equation = COMPARATOR_RE.replace_all(&equation, "").into_owned();
    equation = OP_BEFORE_SIGN_RE.replace_all(&equation, "$2").into_owned();
    equation = OP_TRAILING_RE.replace_all(&equation, "").into_owned();
    equation = IMPLIED_KEEP_RE
        .replace_all(&equation, "${1}1${2}")
        .into_owned();
    equation
}
