//! Brazilian-real amounts: `1.234,56` (thousands `.`, decimal `,`).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Valor inválido: '{0}'")]
pub struct MoneyParseError(pub String);

/// Parses a locale-formatted amount such as `"1.234,56"` or `"R$ 10,00"`.
pub fn parse_brl(raw: &str) -> Result<f64, MoneyParseError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Err(MoneyParseError(raw.to_string()));
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MoneyParseError(raw.to_string()))
}

/// Formats an amount as `1.234,56` with the given number of decimals.
pub fn format_brl_amount(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer_part, fraction) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (formatted.clone(), None),
    };

    let mut grouped = String::new();
    for (i, ch) in integer_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let mut result: String = grouped.chars().rev().collect();

    // "-0" after rounding is still zero
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        result.insert(0, '-');
    }

    match fraction {
        Some(f) => format!("{},{}", result, f),
        None => result,
    }
}

/// Currency display: `R$ 1.234` / `R$ 1.234,56` (no-break space after the symbol).
pub fn format_brl(value: f64, decimals: usize) -> String {
    format!("R$\u{a0}{}", format_brl_amount(value, decimals))
}

/// Longest amount the mask accepts, in digits (cents included).
pub const MAX_AMOUNT_DIGITS: usize = 15;

/// Input mask for amount fields: digits are read as cents.
///
/// `"123456"` becomes `"1.234,56"`, anything that is not a digit is dropped.
/// Digits typed past [`MAX_AMOUNT_DIGITS`] are ignored.
pub fn mask_currency_input(raw: &str) -> String {
    let cents = raw
        .chars()
        .filter(|c| c.is_ascii_digit())
        .skip_while(|c| *c == '0')
        .take(MAX_AMOUNT_DIGITS)
        .fold(0u64, |acc, c| acc * 10 + u64::from(c as u8 - b'0'));
    let integer = cents / 100;
    let fraction = cents % 100;
    format!("{},{:02}", format_brl_amount(integer as f64, 0), fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_brl() {
        assert_eq!(parse_brl("1.234,56"), Ok(1234.56));
        assert_eq!(parse_brl("R$ 10,00"), Ok(10.0));
        assert_eq!(parse_brl("1.000.000"), Ok(1_000_000.0));
        assert_eq!(parse_brl("0,5"), Ok(0.5));
        assert!(parse_brl("").is_err());
        assert!(parse_brl("abc").is_err());
    }

    #[test]
    fn test_format_brl_amount() {
        assert_eq!(format_brl_amount(1234.56, 2), "1.234,56");
        assert_eq!(format_brl_amount(1234567.891, 2), "1.234.567,89");
        assert_eq!(format_brl_amount(999.0, 0), "999");
        assert_eq!(format_brl_amount(0.0, 2), "0,00");
        assert_eq!(format_brl_amount(-1500.0, 0), "-1.500");
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(1000.0, 0), "R$\u{a0}1.000");
    }

    #[test]
    fn test_mask_currency_input() {
        assert_eq!(mask_currency_input("123456"), "1.234,56");
        assert_eq!(mask_currency_input("R$ 1.234,5"), "123,45");
        assert_eq!(mask_currency_input(""), "0,00");
        assert_eq!(mask_currency_input("7"), "0,07");
    }

    #[test]
    fn test_mask_ignores_digits_past_the_limit() {
        let typed = "1234567890123456789012345";
        let masked = mask_currency_input(typed);
        assert_eq!(masked, "1.234.567.890.123,45");
        assert_eq!(mask_currency_input(&format!("{}9", masked)), masked);
    }

    #[test]
    fn test_mask_output_parses_back() {
        let masked = mask_currency_input("100000099");
        assert_eq!(masked, "1.000.000,99");
        assert_eq!(parse_brl(&masked), Ok(1_000_000.99));
    }
}
