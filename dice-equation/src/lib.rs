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

//! Roll-equation parsing and normalization. Takes a dice equation in the
//! inconsistent notations tabletop hosts emit, together with the face values
//! the host page already rolled, and produces the normalized dice tokens and
//! operator descriptor the remote roll service consumes.

pub mod operators;
pub mod parser;
pub mod reconcile;
pub mod sanitize;
pub mod terms;
pub mod tokens;

use serde::Serialize;
use thiserror::Error;

pub use tokens::{DiceToken, DieKind, OperatorDescriptor, RollRequest};

#[cfg(feature = "logging")]
use log::debug;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseRollError {
    #[error("invalid dice notation `{equation}`: {message}")]
    Syntax { equation: String, message: String },
    #[error("unparsed input after equation: `{rest}`")]
    TrailingInput { rest: String },
    #[error("no roll found in host fragment")]
    MissingEquation,
}

/// Result of running an equation through the pipeline: the flat dice-token
/// array and the operator descriptor referencing it by index. An empty dice
/// array means there is nothing to roll and submission should be skipped.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct RollConversion {
    pub dice: Vec<DiceToken>,
    pub operator: OperatorDescriptor,
}

impl RollConversion {
    pub fn into_request(self) -> RollRequest {
        RollRequest {
            dice: self.dice,
            operator: self.operator,
            label: None,
            external_id: None,
        }
    }
}

/// Full pipeline: sanitize the raw equation, parse it, assign the observed
/// face values and derive the operator descriptor. Pass an empty value slice
/// to build a dry roll the remote service rolls itself.
pub fn parse_roll_equation(
    equation: &str,
    theme: &str,
    values: &[i64],
) -> Result<RollConversion, ParseRollError> {
    let sanitized = sanitize::sanitize(equation);
    #[cfg(feature = "logging")]
    {
        debug!("sanitized `{}` to `{}`", equation, sanitized);
    }

    let term = parser::parse_equation(&sanitized)?;
    let reconciled = reconcile::reconcile(&term, values, theme);
    let operator = operators::canonicalize(&sanitized, reconciled.multiplier_groups);

    #[cfg(feature = "logging")]
    {
        debug!(
            "converted `{}` into {} dice tokens, operator {:?}",
            equation,
            reconciled.dice.len(),
            operator
        );
    }

    Ok(RollConversion {
        dice: reconciled.dice,
        operator,
    })
}
