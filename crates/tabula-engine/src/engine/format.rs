//! Number formatting for display and for canonical expression text.

const SIGNIFICANT_DIGITS: usize = 6;

/// Format a number for display, `%g` style with six significant digits.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let sci = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, n);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= SIGNIFICANT_DIGITS as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, n)).to_string()
    }
}

/// Format a number literal so that parsing it back yields the same value,
/// switching to exponent form when that is shorter.
pub fn format_literal(n: f64) -> String {
    let plain = format!("{}", n);
    let exponent = format!("{:e}", n);
    if exponent.len() < plain.len() {
        exponent
    } else {
        plain
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_integers() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(123456.0), "123456");
        assert_eq!(format_number(1234567.0), "1.23457e+06");
    }

    #[test]
    fn test_format_number_fractions() {
        assert_eq!(format_number(1.0 / 3.0), "0.333333");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.0001), "0.0001");
        assert_eq!(format_number(0.00001), "1e-05");
    }

    #[test]
    fn test_format_number_large() {
        assert_eq!(format_number(1e20), "1e+20");
    }

    #[test]
    fn test_format_literal_round_trips() {
        assert_eq!(format_literal(1.0), "1");
        assert_eq!(format_literal(0.5), "0.5");
        assert_eq!(format_literal(0.1).parse::<f64>().unwrap(), 0.1);
        assert_eq!(format_literal(100.0), "100");
        assert_eq!(format_literal(1e300), "1e300");
        assert_eq!(format_literal(2.5e-10), "2.5e-10");
        assert_eq!(format_literal(1e300).parse::<f64>().unwrap(), 1e300);
    }
}
