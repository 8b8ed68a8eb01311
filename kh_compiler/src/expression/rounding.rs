//! Five-place rounding on the exact binary value of an `f64`.
//!
//! Exact ties round away from zero (`0.015625` gives `0.01563`). A decimal
//! spelling that is stored just below a tie rounds down. The exact expansion
//! of an `f64` has at most 1074 fractional digits.

/// Fractional digits kept for every computed value
pub const DECIMAL_PLACES: usize = 5;

const EXACT_DIGITS: usize = 1100;

/// Round half away from zero to [`DECIMAL_PLACES`]; non-finite values pass
/// through and negative zero becomes zero
pub fn round_half_up(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let kept = fraction.get(..DECIMAL_PLACES).unwrap_or(fraction);
    let round_up = fraction
        .as_bytes()
        .get(DECIMAL_PLACES)
        .is_some_and(|digit| *digit >= b'5');

    let mut digits: Vec<u8> = whole.bytes().chain(kept.bytes()).collect();
    if round_up {
        increment(&mut digits);
    }

    let split = digits.len() - kept.len();
    let text = format!(
        "{}.{}",
        String::from_utf8_lossy(&digits[..split]),
        String::from_utf8_lossy(&digits[split..])
    );
    let magnitude = text.parse::<f64>().unwrap_or(value.abs());

    if magnitude == 0.0 {
        0.0
    } else if value.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    }
}

/// Render with exactly [`DECIMAL_PLACES`] fractional digits
pub fn format_value(value: f64) -> String {
    format!("{:.*}", DECIMAL_PLACES, round_half_up(value))
}

/// Add one to an ASCII decimal digit string
fn increment(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}
