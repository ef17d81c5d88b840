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

//! Normalized roll representation handed to the remote roll service.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Die geometry of a token. `D10x` is the synthetic tens die of a d100 pair
/// and `Mod` is a flat numeric modifier with no geometry at all.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DieKind {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D10x,
    Mod,
    Other(u32),
}

impl DieKind {
    pub fn from_faces(faces: u32) -> DieKind {
        match faces {
            4 => DieKind::D4,
            6 => DieKind::D6,
            8 => DieKind::D8,
            10 => DieKind::D10,
            12 => DieKind::D12,
            20 => DieKind::D20,
            faces => DieKind::Other(faces),
        }
    }
}

impl fmt::Display for DieKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DieKind::D4 => f.write_str("d4"),
            DieKind::D6 => f.write_str("d6"),
            DieKind::D8 => f.write_str("d8"),
            DieKind::D10 => f.write_str("d10"),
            DieKind::D12 => f.write_str("d12"),
            DieKind::D20 => f.write_str("d20"),
            DieKind::D10x => f.write_str("d10x"),
            DieKind::Mod => f.write_str("mod"),
            DieKind::Other(faces) => write!(f, "d{}", faces),
        }
    }
}

impl Serialize for DieKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One physical die with its assigned face value, or one flat modifier.
/// Token order in the flat array is load-bearing: operator descriptors
/// reference dice by index.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct DiceToken {
    pub theme: String,
    #[serde(rename = "type")]
    pub kind: DieKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_to_display: Option<String>,
}

impl DiceToken {
    pub fn die(kind: DieKind, theme: &str) -> DiceToken {
        DiceToken {
            theme: theme.to_string(),
            kind,
            value: None,
            value_to_display: None,
        }
    }

    pub fn die_with_value(kind: DieKind, theme: &str, value: i64) -> DiceToken {
        DiceToken {
            theme: theme.to_string(),
            kind,
            value: Some(value),
            value_to_display: None,
        }
    }

    pub fn modifier(theme: &str, value: i64) -> DiceToken {
        DiceToken {
            theme: theme.to_string(),
            kind: DieKind::Mod,
            value: Some(value),
            value_to_display: None,
        }
    }
}

/// Expand a d100 into its conventional (tens, ones) pair. The tens bucket is
/// `ceil(v / 10 - 1)` with the zero bucket mapped to 10, while the displayed
/// tens string keeps the raw bucket value. A pair without a value lets the
/// remote service roll both dice.
pub fn d100_pair(theme: &str, value: Option<i64>) -> [DiceToken; 2] {
    match value {
        Some(value) => {
            let bucket = (value - 1).div_euclid(10);
            let tens = if bucket == 0 { 10 } else { bucket };
            let ones = (value - 1).rem_euclid(10) + 1;
            [
                DiceToken {
                    theme: theme.to_string(),
                    kind: DieKind::D10x,
                    value: Some(tens),
                    value_to_display: Some(format!("{}", bucket * 10)),
                },
                DiceToken::die_with_value(DieKind::D10, theme, ones),
            ]
        }
        None => [
            DiceToken::die(DieKind::D10x, theme),
            DiceToken::die(DieKind::D10, theme),
        ],
    }
}

/// Canonical encoding of post-roll arithmetic for the remote service:
/// keep-highest/lowest, divide-and-round and critical-multiplier groups.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
pub struct OperatorDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
    #[serde(rename = "/", skip_serializing_if = "Option::is_none")]
    pub div: Option<String>,
    #[serde(rename = "*", skip_serializing_if = "BTreeMap::is_empty")]
    pub mul: BTreeMap<String, Vec<usize>>,
}

impl OperatorDescriptor {
    pub fn is_empty(&self) -> bool {
        self.k.is_none() && self.round.is_none() && self.div.is_none() && self.mul.is_empty()
    }
}

/// Payload for the remote roll-creation call.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct RollRequest {
    pub dice: Vec<DiceToken>,
    pub operator: OperatorDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}
