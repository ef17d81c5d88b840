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

//! Intermediate term tree produced by the equation parser. Constructed per
//! parse call and discarded once the reconciler has walked it.

/// Face count of a dice group. `Percent` is the `d%` shorthand for a d100.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Sides {
    Faces(u32),
    Percent,
}

impl Sides {
    pub fn faces(self) -> u32 {
        match self {
            Sides::Faces(n) => n,
            Sides::Percent => 100,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DiceGroup {
    pub count: u32,
    pub sides: Sides,
}

/// Success/failure comparator attached to a dice group. Recognized by the
/// grammar so host equations parse, ignored by everything downstream.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Comparator {
    Greater,
    GreaterEq,
    Less,
    LessEq,
    Equal,
    NotEq,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum KeepDirection {
    Highest,
    Lowest,
}

/// Keep/drop annotation such as `kh1`, `kl2` or `dh1`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Keep {
    pub direction: KeepDirection,
    pub dropped: bool,
    pub count: u32,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DiceTerm {
    pub dice: DiceGroup,
    pub filter: Option<(Comparator, u32)>,
    pub keep: Option<Keep>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinOp {
    Mul,
    Div,
    Add,
    Sub,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Term {
    Constant(i64),
    Dice(DiceTerm),
    Calc(Box<Term>, BinOp, Box<Term>),
    /// Parenthesized sub-equation.
    Group(Box<Term>),
    /// `round(...)` wrapper.
    Round(Box<Term>),
}

impl Term {
    /// True if any dice term occurs anywhere in the tree.
    pub fn has_dice(&self) -> bool {
        match self {
            Term::Constant(_) => false,
            Term::Dice(_) => true,
            Term::Calc(left, _, right) => left.has_dice() || right.has_dice(),
            Term::Group(inner) | Term::Round(inner) => inner.has_dice(),
        }
    }
}
