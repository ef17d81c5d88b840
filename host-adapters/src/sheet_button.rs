//! Character-sheet roll buttons carry a compact `data-text` notation instead
//! of full markup: `2d6+3`, a bare bonus like `+5`, or a raw ability score
//! that has to be converted to its modifier. These rolls happen before the
//! host has rolled anything, so the tokens are emitted dry and the remote
//! service generates the values.

use crate::{AdapterContext, HostAdapter};
use dice_equation::{
    tokens::d100_pair, DiceToken, DieKind, OperatorDescriptor, ParseRollError, RollConversion,
};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static NOTATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d*)d(\d+)").unwrap());

static PLUS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+(\d+)").unwrap());

static MINUS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-(\d+)").unwrap());

/// Advantage/disadvantage preset attached to a button: the host rolls two
/// d20s and keeps one.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum KeepPreset {
    Advantage,
    Disadvantage,
}

impl KeepPreset {
    fn descriptor(self) -> &'static str {
        match self {
            KeepPreset::Advantage => "h1",
            KeepPreset::Disadvantage => "l1",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SheetButtonAdapter {
    pub keep: Option<KeepPreset>,
    pub critical: bool,
}

impl SheetButtonAdapter {
    pub fn with_keep(keep: KeepPreset) -> SheetButtonAdapter {
        SheetButtonAdapter {
            keep: Some(keep),
            critical: false,
        }
    }

    pub fn critical() -> SheetButtonAdapter {
        SheetButtonAdapter {
            keep: None,
            critical: true,
        }
    }
}

impl HostAdapter for SheetButtonAdapter {
    fn convert(
        &self,
        fragment: &str,
        context: &AdapterContext,
    ) -> Result<RollConversion, ParseRollError> {
        let text: String = fragment
            .chars()
            .filter(|c| !matches!(c, '(' | ')' | ' '))
            .collect();
        debug!("sheet button text `{}`", text);

        // a keep preset always means two d20s, whatever the button says
        let mut count: u32 = if self.keep.is_some() { 2 } else { 1 };
        let mut faces: u32 = 20;
        if let Some(caps) = NOTATION_RE.captures(&text) {
            if self.keep.is_none() {
                count = caps[1].parse().unwrap_or(1);
            }
            faces = caps[2].parse().unwrap_or(20);
        }
        if self.critical {
            count *= 2;
        }

        let modifier: Option<i64> = if let Some(caps) = PLUS_RE.captures(&text) {
            caps[1].parse().ok()
        } else if let Some(caps) = MINUS_RE.captures(&text) {
            caps[1].parse::<i64>().ok().map(|bonus| -bonus)
        } else if let Ok(score) = text.parse::<i64>() {
            // a raw ability score becomes its modifier
            Some(score.div_euclid(2) - 5)
        } else {
            None
        };

        let mut dice = Vec::new();
        for _ in 0..count {
            if faces == 100 {
                let pair = d100_pair(&context.theme, None);
                dice.extend(pair.iter().cloned());
            } else {
                dice.push(DiceToken::die(DieKind::from_faces(faces), &context.theme));
            }
        }
        match modifier {
            Some(0) | None => {}
            Some(modifier) => dice.push(DiceToken::modifier(&context.theme, modifier)),
        }

        let mut operator = OperatorDescriptor::default();
        if let Some(keep) = self.keep {
            operator.k = Some(keep.descriptor().to_string());
        }

        Ok(RollConversion { dice, operator })
    }
}
