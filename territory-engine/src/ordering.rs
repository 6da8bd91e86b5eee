//! Natural (numeric-aware) string ordering for region and territory names.
//!
//! Territory names are usually bare numbers or number-suffixed labels, so a
//! plain lexicographic sort would put "10" before "2". Digit runs compare
//! numerically, everything else case-insensitively.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Compare two names naturally: "2" < "10", "B-2" < "B-10", case-insensitive.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let nx = take_number(&mut left);
                let ny = take_number(&mut right);
                match nx.cmp(&ny) {
                    Ordering::Equal => {}
                    unequal => return unequal,
                }
            }
            (Some(x), Some(y)) => {
                let cx = x.to_ascii_lowercase();
                let cy = y.to_ascii_lowercase();
                match cx.cmp(&cy) {
                    Ordering::Equal => {
                        left.next();
                        right.next();
                    }
                    unequal => return unequal,
                }
            }
        }
    }
}

fn take_number(chars: &mut Peekable<Chars<'_>>) -> u64 {
    let mut value = 0u64;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = value
            .saturating_mul(10)
            .saturating_add(u64::from(digit));
        chars.next();
    }
    value
}
