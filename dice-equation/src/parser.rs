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

use crate::{
    terms::{BinOp, Comparator, DiceGroup, DiceTerm, Keep, KeepDirection, Sides, Term},
    ParseRollError,
};

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{digit1, multispace0},
    combinator::{map, map_res, opt, recognize, success, verify},
    error::context,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

pub fn parse_u32(input: &str) -> IResult<&str, u32> {
    context(
        "Failed to parse integer between 1 and 4294967295 inclusive",
        verify(
            map_res(digit1, |s: &str| s.parse::<u32>()),
            |value: &u32| value > &0,
        ),
    )(input)
}

pub fn parse_i64(input: &str) -> IResult<&str, i64> {
    map_res(
        recognize(pair(alt((tag("+"), tag("-"), success(""))), digit1)),
        |s: &str| s.parse::<i64>(),
    )(input)
}

pub fn parse_sides(input: &str) -> IResult<&str, Sides> {
    alt((
        map(parse_u32, Sides::Faces),
        map(tag("%"), |_| Sides::Percent),
    ))(input)
}

pub fn parse_dice_group(input: &str) -> IResult<&str, DiceGroup> {
    map(
        pair(
            terminated(alt((parse_u32, success(1))), multispace0),
            preceded(tag_no_case("d"), preceded(multispace0, parse_sides)),
        ),
        |(count, sides)| DiceGroup { count, sides },
    )(input)
}

pub fn parse_comparator(input: &str) -> IResult<&str, Comparator> {
    alt((
        map(tag(">="), |_| Comparator::GreaterEq),
        map(tag(">"), |_| Comparator::Greater),
        map(tag("<="), |_| Comparator::LessEq),
        map(tag("<"), |_| Comparator::Less),
        map(tag("!="), |_| Comparator::NotEq),
        map(tag("="), |_| Comparator::Equal),
    ))(input)
}

pub fn parse_keep(input: &str) -> IResult<&str, Keep> {
    map(
        pair(
            alt((
                map(tag_no_case("kh"), |_| (KeepDirection::Highest, false)),
                map(tag_no_case("kl"), |_| (KeepDirection::Lowest, false)),
                map(tag_no_case("dh"), |_| (KeepDirection::Highest, true)),
                map(tag_no_case("dl"), |_| (KeepDirection::Lowest, true)),
                map(tag_no_case("k"), |_| (KeepDirection::Highest, false)),
                map(tag_no_case("h"), |_| (KeepDirection::Highest, false)),
                map(tag_no_case("l"), |_| (KeepDirection::Lowest, false)),
            )),
            opt(preceded(multispace0, parse_u32)),
        ),
        |((direction, dropped), count)| Keep {
            direction,
            dropped,
            count: count.unwrap_or(1),
        },
    )(input)
}

pub fn parse_dice_term(input: &str) -> IResult<&str, DiceTerm> {
    map(
        tuple((
            parse_dice_group,
            opt(preceded(
                multispace0,
                pair(parse_comparator, preceded(multispace0, parse_u32)),
            )),
            opt(preceded(multispace0, parse_keep)),
        )),
        |(dice, filter, keep)| DiceTerm { dice, filter, keep },
    )(input)
}

pub fn parse_term(input: &str) -> IResult<&str, Term> {
    alt((
        parse_term_calculation,
        parse_term_roll,
        parse_term_constant,
        parse_term_round,
        parse_term_group,
    ))(input)
}

pub fn parse_term_constant(input: &str) -> IResult<&str, Term> {
    map(parse_i64, Term::Constant)(input)
}

pub fn parse_term_group(input: &str) -> IResult<&str, Term> {
    map(
        delimited(
            tag("("),
            delimited(multispace0, parse_term, multispace0),
            tag(")"),
        ),
        |inner| Term::Group(Box::new(inner)),
    )(input)
}

pub fn parse_term_round(input: &str) -> IResult<&str, Term> {
    map(
        preceded(
            tag_no_case("round"),
            preceded(
                multispace0,
                delimited(
                    tag("("),
                    delimited(multispace0, parse_term, multispace0),
                    tag(")"),
                ),
            ),
        ),
        |inner| Term::Round(Box::new(inner)),
    )(input)
}

pub fn parse_term_roll(input: &str) -> IResult<&str, Term> {
    map(parse_dice_term, Term::Dice)(input)
}

pub fn parse_operator(input: &str) -> IResult<&str, BinOp> {
    alt((
        map(tag("+"), |_| BinOp::Add),
        map(tag("-"), |_| BinOp::Sub),
        map(tag("*"), |_| BinOp::Mul),
        map(tag("/"), |_| BinOp::Div),
    ))(input)
}

pub fn parse_term_calculation(input: &str) -> IResult<&str, Term> {
    map(
        tuple((
            alt((
                parse_term_roll,
                parse_term_constant,
                parse_term_round,
                parse_term_group,
            )),
            delimited(multispace0, parse_operator, multispace0),
            parse_term,
        )),
        |(left, op, right)| Term::Calc(Box::new(left), op, Box::new(right)),
    )(input)
}

// The grammar is right-recursive, so `a * b + c` first parses as
// `a * (b + c)`. Rotate multiplication and division back onto their
// immediate right operand to restore precedence.
fn rearrange_term(root: Term) -> Term {
    match root {
        Term::Calc(left, op, right) if op == BinOp::Mul || op == BinOp::Div => {
            if let Term::Calc(right_left, right_op, right_right) = *right {
                Term::Calc(
                    Box::new(Term::Calc(left, op, right_left)),
                    right_op,
                    Box::new(rearrange_term(*right_right)),
                )
            } else {
                Term::Calc(left, op, Box::new(rearrange_term(*right)))
            }
        }
        Term::Calc(left, op, right) => Term::Calc(left, op, Box::new(rearrange_term(*right))),
        Term::Group(inner) => Term::Group(Box::new(rearrange_term(*inner))),
        Term::Round(inner) => Term::Round(Box::new(rearrange_term(*inner))),
        other => other,
    }
}

pub fn parse_rearranged_term(input: &str) -> IResult<&str, Term> {
    map(parse_term, rearrange_term)(input)
}

/// Parse a full equation into a term tree, requiring all input to be
/// consumed.
pub fn parse_equation(input: &str) -> Result<Term, ParseRollError> {
    let trimmed = input.trim();
    let (rest, term) =
        parse_rearranged_term(trimmed).map_err(|error| ParseRollError::Syntax {
            equation: trimmed.to_string(),
            message: format!("{:?}", error),
        })?;
    if rest.trim().is_empty() {
        Ok(term)
    } else {
        Err(ParseRollError::TrailingInput {
            rest: rest.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn dice(count: u32, sides: u32) -> DiceTerm {
        DiceTerm {
            dice: DiceGroup {
                count,
                sides: Sides::Faces(sides),
            },
            filter: None,
            keep: None,
        }
    }

    #[test]
    fn test_parse_u32() {
        assert_eq!(parse_u32("1"), Ok(("", 1)));
        assert_eq!(parse_u32("6969"), Ok(("", 6969)));
        assert_eq!(parse_u32("20kh1"), Ok(("kh1", 20)));
        assert!(parse_u32("0").is_err());
        assert!(parse_u32("-1").is_err());
        assert!(parse_u32("").is_err());
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64("0"), Ok(("", 0)));
        assert_eq!(parse_i64("+1"), Ok(("", 1)));
        assert_eq!(parse_i64("-1337"), Ok(("", -1337)));
        assert_eq!(parse_i64("0k"), Ok(("k", 0)));
        assert!(parse_i64("k").is_err());
        assert!(parse_i64("").is_err());
    }

    #[test]
    fn test_parse_sides() {
        assert_eq!(parse_sides("20"), Ok(("", Sides::Faces(20))));
        assert_eq!(parse_sides("%"), Ok(("", Sides::Percent)));
        assert!(parse_sides("x").is_err());
    }

    #[test]
    fn test_parse_dice_group() {
        assert_eq!(
            parse_dice_group("d6"),
            Ok((
                "",
                DiceGroup {
                    count: 1,
                    sides: Sides::Faces(6)
                }
            ))
        );
        assert_eq!(
            parse_dice_group("2D 20"),
            Ok((
                "",
                DiceGroup {
                    count: 2,
                    sides: Sides::Faces(20)
                }
            ))
        );
        assert_eq!(
            parse_dice_group("1d%"),
            Ok((
                "",
                DiceGroup {
                    count: 1,
                    sides: Sides::Percent
                }
            ))
        );
        assert!(parse_dice_group("d").is_err());
        assert!(parse_dice_group("").is_err());
    }

    #[test]
    fn test_parse_keep() {
        assert_eq!(
            parse_keep("kh1"),
            Ok((
                "",
                Keep {
                    direction: KeepDirection::Highest,
                    dropped: false,
                    count: 1
                }
            ))
        );
        assert_eq!(
            parse_keep("kl2"),
            Ok((
                "",
                Keep {
                    direction: KeepDirection::Lowest,
                    dropped: false,
                    count: 2
                }
            ))
        );
        assert_eq!(
            parse_keep("k3"),
            Ok((
                "",
                Keep {
                    direction: KeepDirection::Highest,
                    dropped: false,
                    count: 3
                }
            ))
        );
        assert_eq!(
            parse_keep("dl1"),
            Ok((
                "",
                Keep {
                    direction: KeepDirection::Lowest,
                    dropped: true,
                    count: 1
                }
            ))
        );
        assert_eq!(
            parse_keep("kh"),
            Ok((
                "",
                Keep {
                    direction: KeepDirection::Highest,
                    dropped: false,
                    count: 1
                }
            ))
        );
        assert!(parse_keep("").is_err());
    }

    #[test]
    fn test_parse_dice_term() {
        assert_eq!(
            parse_dice_term("2d20kh1"),
            Ok((
                "",
                DiceTerm {
                    dice: DiceGroup {
                        count: 2,
                        sides: Sides::Faces(20)
                    },
                    filter: None,
                    keep: Some(Keep {
                        direction: KeepDirection::Highest,
                        dropped: false,
                        count: 1
                    })
                }
            ))
        );
        assert_eq!(
            parse_dice_term("4d6>3"),
            Ok((
                "",
                DiceTerm {
                    dice: DiceGroup {
                        count: 4,
                        sides: Sides::Faces(6)
                    },
                    filter: Some((Comparator::Greater, 3)),
                    keep: None
                }
            ))
        );
        assert_eq!(
            parse_dice_term("10d10>=5k2"),
            Ok((
                "",
                DiceTerm {
                    dice: DiceGroup {
                        count: 10,
                        sides: Sides::Faces(10)
                    },
                    filter: Some((Comparator::GreaterEq, 5)),
                    keep: Some(Keep {
                        direction: KeepDirection::Highest,
                        dropped: false,
                        count: 2
                    })
                }
            ))
        );
    }

    #[test]
    fn test_parse_term() {
        assert_eq!(
            parse_term("1d20-1"),
            Ok((
                "",
                Term::Calc(
                    Box::new(Term::Dice(dice(1, 20))),
                    BinOp::Sub,
                    Box::new(Term::Constant(1))
                )
            ))
        );
        assert_eq!(
            parse_term("round(3d6/3)"),
            Ok((
                "",
                Term::Round(Box::new(Term::Calc(
                    Box::new(Term::Dice(dice(3, 6))),
                    BinOp::Div,
                    Box::new(Term::Constant(3))
                )))
            ))
        );
        assert!(parse_term("(1d6 + 2) * 2 + (1d8)").is_ok());
        assert!(parse_term("").is_err());
    }

    #[test]
    fn test_precedence_rotation() {
        // (1d6+2)*2+(1d8): the multiplication must bind to the literal 2,
        // not to the whole right-hand chain.
        let term = parse_equation("(1d6+2)*2+(1d8)").unwrap();
        match term {
            Term::Calc(left, BinOp::Add, right) => {
                match *left {
                    Term::Calc(group, BinOp::Mul, factor) => {
                        assert!(matches!(*group, Term::Group(_)));
                        assert_eq!(*factor, Term::Constant(2));
                    }
                    other => panic!("expected multiplication on the left, got {:?}", other),
                }
                assert!(matches!(*right, Term::Group(_)));
            }
            other => panic!("expected top level addition, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_equation_errors() {
        // "2d" parses the literal 2 and leaves the dangling `d` behind
        assert_eq!(
            parse_equation("2d"),
            Err(ParseRollError::TrailingInput {
                rest: "d".to_string()
            })
        );
        assert!(matches!(
            parse_equation(""),
            Err(ParseRollError::Syntax { .. })
        ));
        assert_eq!(
            parse_equation("2d6foo"),
            Err(ParseRollError::TrailingInput {
                rest: "foo".to_string()
            })
        );
        assert!(matches!(
            parse_equation("(1d6"),
            Err(ParseRollError::TrailingInput { .. }) | Err(ParseRollError::Syntax { .. })
        ));
    }
}
