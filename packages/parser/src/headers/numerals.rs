//! Roman numeral validation.

const ROMAN_VALUES: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Value of a canonical uppercase Roman numeral.
///
/// Non-canonical spellings ("IIII", "IC", "MIL") return `None`, which keeps
/// words like "CIVIL" or "MIL" from being read as numerals.
pub fn roman_value(numeral: &str) -> Option<u32> {
    if numeral.is_empty() || numeral.len() > 15 {
        return None;
    }

    let mut rest = numeral;
    let mut total = 0;
    for (value, symbol) in ROMAN_VALUES {
        // At most three repeats of a single symbol, one of a subtractive pair
        let max_repeats = if symbol.len() == 1 { 3 } else { 1 };
        let mut repeats = 0;
        while repeats < max_repeats {
            match rest.strip_prefix(symbol) {
                Some(tail) => {
                    rest = tail;
                    total += value;
                    repeats += 1;
                }
                None => break,
            }
        }
    }

    if !rest.is_empty() {
        return None;
    }
    // Re-encode to reject mixes like "IXI" or "VIV" the greedy walk accepts
    (to_roman(total) == numeral).then_some(total)
}

fn to_roman(mut value: u32) -> String {
    let mut out = String::new();
    for (unit, symbol) in ROMAN_VALUES {
        while value >= unit {
            out.push_str(symbol);
            value -= unit;
        }
    }
    out
}

/// True for a canonical uppercase Roman numeral.
pub fn is_roman_numeral(token: &str) -> bool {
    roman_value(token).is_some()
}

/// True for a canonical Roman numeral written entirely in upper or lower case.
pub fn is_roman_numeral_any_case(token: &str) -> bool {
    if token.chars().all(|c| c.is_ascii_lowercase()) {
        is_roman_numeral(&token.to_ascii_uppercase())
    } else {
        is_roman_numeral(token)
    }
}
