//! Textual rendering of numbers
//!
//! Two renderings exist: `print` uses the shortest general form with six
//! significant digits (`120`, `0.1`, `1e+20`), while string concatenation
//! uses a fixed six-decimal form (`1.000000`).

/// Significant digits of the general form
const PRECISION: i32 = 6;

/// General form, six significant digits, trailing zeros removed
///
/// Switches to exponent notation when the decimal exponent is below -4 or
/// at least six.
pub fn format_general(value: f64) -> String {
    if let Some(special) = non_finite(value) {
        return special;
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Round to the target precision first; the exponent must come from the
    // rounded value (999999.5 becomes 1e+06, not 999999.5)
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (PRECISION - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

/// Fixed form with exactly six decimals
pub fn format_fixed(value: f64) -> String {
    match non_finite(value) {
        Some(special) => special,
        None => format!("{:.6}", value),
    }
}

fn non_finite(value: f64) -> Option<String> {
    let text = if value.is_nan() {
        if value.is_sign_negative() {
            "-nan"
        } else {
            "nan"
        }
    } else if value.is_infinite() {
        if value > 0.0 {
            "inf"
        } else {
            "-inf"
        }
    } else {
        return None;
    };
    Some(text.to_string())
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_integers() {
        assert_eq!(format_general(120.0), "120");
        assert_eq!(format_general(1.0), "1");
        assert_eq!(format_general(-42.0), "-42");
        assert_eq!(format_general(0.0), "0");
        assert_eq!(format_general(123456.0), "123456");
    }

    #[test]
    fn test_general_fractions() {
        assert_eq!(format_general(3.14159265), "3.14159");
        assert_eq!(format_general(0.5), "0.5");
        assert_eq!(format_general(0.1 + 0.2), "0.3");
        assert_eq!(format_general(2.5), "2.5");
        assert_eq!(format_general(0.0001), "0.0001");
    }

    #[test]
    fn test_general_exponent_form() {
        assert_eq!(format_general(1e20), "1e+20");
        assert_eq!(format_general(1234567.0), "1.23457e+06");
        assert_eq!(format_general(999999.5), "1e+06");
        assert_eq!(format_general(0.00001), "1e-05");
        assert_eq!(format_general(-2.5e-7), "-2.5e-07");
    }

    #[test]
    fn test_general_non_finite() {
        assert_eq!(format_general(f64::INFINITY), "inf");
        assert_eq!(format_general(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_general(f64::NAN), "nan");
        assert_eq!(format_general(-f64::NAN), "-nan");
        assert_eq!(format_fixed(-f64::NAN), "-nan");
    }

    #[test]
    fn test_fixed() {
        assert_eq!(format_fixed(1.0), "1.000000");
        assert_eq!(format_fixed(2.5), "2.500000");
        assert_eq!(format_fixed(-0.125), "-0.125000");
        assert_eq!(format_fixed(f64::INFINITY), "inf");
    }
}
