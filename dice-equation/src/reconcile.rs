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

//! Walks the parsed term tree and assigns the face values the host page
//! already rolled. The same traversal records which flat token indices fall
//! inside a multiplied group, so the operator descriptor can never drift out
//! of step with token ordering.

use crate::{
    terms::{BinOp, DiceTerm, Term},
    tokens::{d100_pair, DiceToken, DieKind},
};
use std::collections::BTreeMap;

#[cfg(feature = "logging")]
use log::debug;

/// Output of a reconciliation pass: the flat token array plus the
/// critical-multiplier groups keyed by factor.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Reconciled {
    pub dice: Vec<DiceToken>,
    pub multiplier_groups: BTreeMap<String, Vec<usize>>,
}

struct Walk<'a> {
    values: &'a [i64],
    next_value: usize,
    theme: &'a str,
    sign: i64,
    dice: Vec<DiceToken>,
    multiplier_groups: BTreeMap<String, Vec<usize>>,
}

impl<'a> Walk<'a> {
    fn take_value(&mut self) -> Option<i64> {
        let value = self.values.get(self.next_value).copied();
        if value.is_some() {
            self.next_value += 1;
        }
        value
    }

    fn push_modifier(&mut self, value: i64) {
        self.dice.push(DiceToken::modifier(self.theme, value));
    }

    fn push_dice(&mut self, term: &DiceTerm) {
        for _ in 0..term.dice.count {
            let value = self.take_value();
            if term.dice.sides.faces() == 100 {
                let pair = d100_pair(self.theme, value);
                self.dice.extend(pair.iter().cloned());
            } else {
                let kind = DieKind::from_faces(term.dice.sides.faces());
                self.dice.push(DiceToken {
                    theme: self.theme.to_string(),
                    kind,
                    value,
                    value_to_display: None,
                });
            }
        }
    }

    /// Record tokens from `start` onward as a multiplied group, provided the
    /// group actually contains dice.
    fn mark_multiplier(&mut self, start: usize, factor: i64) {
        if factor < 2 {
            return;
        }
        if !self.dice[start..]
            .iter()
            .any(|token| token.kind != DieKind::Mod)
        {
            return;
        }
        self.multiplier_groups
            .entry(factor.to_string())
            .or_insert_with(Vec::new)
            .extend(start..self.dice.len());
    }

    fn walk(&mut self, term: &Term) {
        match term {
            Term::Constant(value) => {
                let signed = self.sign * value;
                self.push_modifier(signed);
            }
            Term::Dice(dice_term) => self.push_dice(dice_term),
            Term::Group(inner) | Term::Round(inner) => self.walk(inner),
            Term::Calc(left, op, right) => match op {
                BinOp::Add => {
                    self.walk(left);
                    self.sign = 1;
                    self.walk(right);
                }
                BinOp::Sub => {
                    self.walk(left);
                    self.sign = -1;
                    self.walk(right);
                }
                BinOp::Mul => match (left.as_ref(), right.as_ref()) {
                    (Term::Constant(a), Term::Constant(b)) => {
                        let signed = self.sign * a * b;
                        self.push_modifier(signed);
                    }
                    (_, Term::Constant(factor)) => {
                        let start = self.dice.len();
                        self.walk(left);
                        self.mark_multiplier(start, *factor);
                    }
                    (Term::Constant(factor), _) => {
                        let start = self.dice.len();
                        self.walk(right);
                        self.mark_multiplier(start, *factor);
                    }
                    _ => {
                        self.walk(left);
                        self.walk(right);
                    }
                },
                BinOp::Div => match (left.as_ref(), right.as_ref()) {
                    (Term::Constant(a), Term::Constant(b)) => {
                        if let Some(quotient) = a.checked_div(*b) {
                            let signed = self.sign * quotient;
                            self.push_modifier(signed);
                        }
                    }
                    // the divisor is handled by the operator canonicalizer
                    (_, Term::Constant(_)) => self.walk(left),
                    _ => {
                        self.walk(left);
                        self.walk(right);
                    }
                },
            },
        }
    }
}

/// Assign observed face values to the term tree's dice in left-to-right,
/// depth-first order. Missing values leave tokens dry (the remote service
/// rolls them); a tree with no dice at all yields an empty token array since
/// there is nothing to roll.
pub fn reconcile(term: &Term, values: &[i64], theme: &str) -> Reconciled {
    let mut walk = Walk {
        values,
        next_value: 0,
        theme,
        sign: 1,
        dice: Vec::new(),
        multiplier_groups: BTreeMap::new(),
    };
    walk.walk(term);

    if !walk.dice.iter().any(|token| token.kind != DieKind::Mod) {
        walk.dice.clear();
        walk.multiplier_groups.clear();
    }

    #[cfg(feature = "logging")]
    {
        debug!(
            "reconciled {} tokens from {} observed values",
            walk.dice.len(),
            values.len()
        );
    }

    Reconciled {
        dice: walk.dice,
        multiplier_groups: walk.multiplier_groups,
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::parser::parse_equation;
    use crate::tokens::DiceToken;

    const THEME: &str = "test-theme";

    fn run(equation: &str, values: &[i64]) -> Reconciled {
        let term = parse_equation(equation).unwrap();
        reconcile(&term, values, THEME)
    }

    #[test]
    fn test_plain_dice_in_order() {
        let result = run("3d6", &[3, 2, 6]);
        assert_eq!(
            result.dice,
            vec![
                DiceToken::die_with_value(DieKind::D6, THEME, 3),
                DiceToken::die_with_value(DieKind::D6, THEME, 2),
                DiceToken::die_with_value(DieKind::D6, THEME, 6),
            ]
        );
        assert!(result.multiplier_groups.is_empty());
    }

    #[test]
    fn test_modifier_signs() {
        let result = run("1d20+2-5", &[11]);
        assert_eq!(
            result.dice,
            vec![
                DiceToken::die_with_value(DieKind::D20, THEME, 11),
                DiceToken::modifier(THEME, 2),
                DiceToken::modifier(THEME, -5),
            ]
        );
    }

    #[test]
    fn test_negative_literal_in_group() {
        let result = run("1d20+(-10)+(0)", &[4]);
        assert_eq!(
            result.dice,
            vec![
                DiceToken::die_with_value(DieKind::D20, THEME, 4),
                DiceToken::modifier(THEME, -10),
                DiceToken::modifier(THEME, 0),
            ]
        );
    }

    #[test]
    fn test_short_value_list_leaves_dry_tokens() {
        let result = run("2d8", &[7]);
        assert_eq!(result.dice[0].value, Some(7));
        assert_eq!(result.dice[1].value, None);
    }

    #[test]
    fn test_dry_run_has_no_values() {
        let result = run("2d6+3", &[]);
        assert_eq!(result.dice.len(), 3);
        assert_eq!(result.dice[0].value, None);
        assert_eq!(result.dice[1].value, None);
        // the modifier still carries its literal value
        assert_eq!(result.dice[2].value, Some(3));
    }

    #[test]
    fn test_pure_number_yields_nothing_to_roll() {
        let result = run("5", &[]);
        assert!(result.dice.is_empty());
        let result = run("2+3", &[]);
        assert!(result.dice.is_empty());
    }

    #[test]
    fn test_d100_expansion() {
        let result = run("1d100", &[55]);
        assert_eq!(result.dice.len(), 2);
        assert_eq!(result.dice[0].kind, DieKind::D10x);
        assert_eq!(result.dice[0].value, Some(5));
        assert_eq!(result.dice[0].value_to_display.as_deref(), Some("50"));
        assert_eq!(result.dice[1].kind, DieKind::D10);
        assert_eq!(result.dice[1].value, Some(5));

        let percent = run("1d%", &[10]);
        assert_eq!(percent.dice[0].value, Some(10));
        assert_eq!(percent.dice[1].value, Some(10));
    }

    #[test]
    fn test_multiplied_group_records_member_indices() {
        let result = run("(1d6+2)*2+(1d8)", &[4, 1]);
        assert_eq!(
            result.dice,
            vec![
                DiceToken::die_with_value(DieKind::D6, THEME, 4),
                DiceToken::modifier(THEME, 2),
                DiceToken::die_with_value(DieKind::D8, THEME, 1),
            ]
        );
        assert_eq!(result.multiplier_groups["2"], vec![0, 1]);
    }

    #[test]
    fn test_multiplier_without_dice_is_not_a_group() {
        let result = run("1d6+(2+3)*2", &[4]);
        assert!(result.multiplier_groups.is_empty());
    }

    #[test]
    fn test_divisor_is_not_a_modifier() {
        let result = run("round(3d6/3)", &[3, 2, 6]);
        assert_eq!(result.dice.len(), 3);
        assert!(result
            .dice
            .iter()
            .all(|token| token.kind == DieKind::D6));
    }

    #[test]
    fn test_keep_annotation_consumes_all_dice() {
        let result = run("2d20kh1", &[12, 9]);
        assert_eq!(
            result.dice,
            vec![
                DiceToken::die_with_value(DieKind::D20, THEME, 12),
                DiceToken::die_with_value(DieKind::D20, THEME, 9),
            ]
        );
    }
}
