//! Derives the canonical operator descriptor from the sanitized equation
//! text. Critical-multiplier groups are not re-derived here: they come out of
//! the reconciler's traversal, so both passes agree on flat token indices by
//! construction.

use crate::tokens::OperatorDescriptor;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static KEEP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"k([lh])?(\d+)?").unwrap());

static DIVISOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/(\d+)").unwrap());

pub fn canonicalize(
    sanitized: &str,
    multiplier_groups: BTreeMap<String, Vec<usize>>,
) -> OperatorDescriptor {
    let mut operator = OperatorDescriptor::default();

    if let Some(keep) = KEEP_RE.captures(sanitized) {
        let direction = keep.get(1).map_or("h", |m| m.as_str());
        let count = keep.get(2).map_or("1", |m| m.as_str());
        operator.k = Some(format!("{}{}", direction, count));
    }

    if sanitized.contains("round(") {
        operator.round = Some("nearest".to_string());
        if let Some(divisor) = DIVISOR_RE.captures(sanitized) {
            operator.div = Some(divisor[1].to_string());
        }
    }

    operator.mul = multiplier_groups;
    operator
}
