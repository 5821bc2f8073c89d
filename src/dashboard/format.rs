//! Display formatting for numbers, addresses and token amounts.

use crate::bridge::BASE_UNIT_FACTOR;

/// Characters kept on each side of a truncated address.
const ADDRESS_EDGE: usize = 6;

/// Insert thousands separators into the integer part of a number.
///
/// Input that is not a plain decimal number is returned unchanged.
pub fn number_with_commas(value: impl ToString) -> String {
    let value = value.to_string();
    let (sign, unsigned) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return value;
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Shorten an address to its first and last characters.
pub fn truncate_wallet_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= ADDRESS_EDGE * 2 {
        return address.to_string();
    }
    let head: String = chars[..ADDRESS_EDGE].iter().collect();
    let tail: String = chars[chars.len() - ADDRESS_EDGE..].iter().collect();
    format!("{head}...{tail}")
}

/// Base units to whole tokens.
pub fn to_tokens(base_units: f64) -> f64 {
    base_units / BASE_UNIT_FACTOR as f64
}

/// Base units to a token amount with two decimals.
pub fn format_token_price(base_units: f64) -> String {
    format!("{:.2}", to_tokens(base_units))
}

/// Two decimals with thousands separators.
pub fn format_amount(value: f64) -> String {
    number_with_commas(format!("{value:.2}"))
}
