// 📐 Rule Matching Helpers - fare type, fare class expressions, OW/RT, display type
//
// Small pure predicates shared by the fare retailer and fare-by-rule matchers.

use crate::entities::Owrt;

/// Any one-way (1 or 3) on a fare retailer rule
pub const ANY_ONE_WAY: char = 'X';

fn first_char(value: &str) -> Option<char> {
    value.chars().next()
}

// ============================================================================
// FARE TYPE
// ============================================================================

/// Generic fare type on a fare retailer rule against the fare's fare type.
///
/// "*Y" economy, "*W" premium economy, "*E" "*B" "*F" "*J" "*X" "*S" "*P" "*R"
/// by first letter, "*FR" first, "*BJ" business, "*EW" economy or premium economy.
pub fn match_generic_fare_type(rule_type: &str, fare_type: &str) -> bool {
    if rule_type.is_empty() || rule_type == fare_type {
        return true;
    }
    if rule_type.len() > 3 || !rule_type.starts_with('*') {
        return false;
    }

    let Some(fare_first) = first_char(fare_type) else {
        return false;
    };

    match &rule_type[1..] {
        "Y" => matches!(fare_first, 'E' | 'X' | 'P' | 'S'),
        "W" => matches!(fare_first, 'W' | 'Z'),
        "E" | "B" | "F" | "J" | "X" | "S" | "P" | "R" => first_char(&rule_type[1..]) == Some(fare_first),
        "FR" => matches!(fare_first, 'F' | 'R'),
        "BJ" => matches!(fare_first, 'B' | 'J'),
        "EW" => matches!(fare_first, 'E' | 'X' | 'S' | 'P' | 'W' | 'Z'),
        _ => false,
    }
}

/// Base fare type on a fare-by-rule base table row against the base fare.
/// "**" matches any fare type.
pub fn match_fare_type(rule_type: &str, fare_type: &str) -> bool {
    if rule_type.is_empty() || rule_type == fare_type {
        return true;
    }
    if rule_type == "**" {
        return true;
    }
    if rule_type.len() != 2 || !rule_type.starts_with('*') {
        return false;
    }

    let Some(fare_first) = first_char(fare_type) else {
        return false;
    };

    match &rule_type[1..] {
        "Y" => matches!(fare_first, 'E' | 'X' | 'A' | 'P' | 'S'),
        generic => match first_char(generic) {
            Some(c @ ('R' | 'F' | 'B' | 'E' | 'W' | 'X' | 'S' | 'P' | 'A' | 'Z' | 'J')) => c == fare_first,
            _ => false,
        },
    }
}

// ============================================================================
// FARE CLASS EXPRESSIONS
// ============================================================================

/// Reject expressions that cannot be matched meaningfully
pub fn validate_match_expression(expr: &str) -> bool {
    !(expr == "-"
        || expr == "?"
        || expr.contains("-?")
        || expr.contains("?-")
        || expr.contains("--"))
}

/// Fare class expression against a fare basis.
/// '?' matches exactly one character, '-' matches one or more.
pub fn match_fare_class_expression(expr: &str, fare_basis: &str) -> bool {
    let expr: Vec<char> = expr.chars().collect();
    let basis: Vec<char> = fare_basis.chars().collect();

    let (mut e, mut b) = (0, 0);
    // Last '-' seen: expression index after it, basis index its match ends at
    let mut resume: Option<(usize, usize)> = None;

    while b < basis.len() {
        match expr.get(e) {
            Some('-') => {
                resume = Some((e + 1, b + 1));
                e += 1;
                b += 1;
            }
            Some(&c) if c == '?' || c == basis[b] => {
                e += 1;
                b += 1;
            }
            _ => match resume {
                Some((after_dash, end)) => {
                    resume = Some((after_dash, end + 1));
                    e = after_dash;
                    b = end + 1;
                }
                None => return false,
            },
        }
    }

    e == expr.len()
}

// ============================================================================
// OW/RT + DISPLAY TYPE
// ============================================================================

/// OW/RT indicator on a rule (' ', '1', '2', '3', 'X') against the fare
pub fn match_owrt(rule_owrt: char, fare_owrt: Owrt) -> bool {
    match rule_owrt {
        ' ' => true,
        '1' | '2' | '3' => rule_owrt == fare_owrt.code(),
        ANY_ONE_WAY => fare_owrt.is_one_way(),
        _ => false,
    }
}

/// Cat 35 display type on a rule against the fare. 'Q' covers 'L' and 'T'.
pub fn match_cat35_type(rule_type: char, fare_type: char) -> bool {
    match rule_type {
        ' ' => true,
        'L' | 'T' => rule_type == fare_type,
        'Q' => matches!(fare_type, 'Q' | 'L' | 'T'),
        _ => false,
    }
}
