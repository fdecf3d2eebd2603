//! English rendering of whole amounts, as printed on the "amount in
//! words" line of a payslip.

const UNITS: [&str; 10] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];
const TEENS: [&str; 10] = [
    "Ten", "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen",
    "Eighteen", "Nineteen",
];
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];
const SCALES: [&str; 4] = ["", "Thousand", "Million", "Billion"];

/// Magnitudes from here on have no scale word and are written as
/// plain digits.
const WORDS_LIMIT: u64 = 1_000_000_000_000;

/// Converts a whole number into English words using short-scale
/// grouping, e.g. `1500` becomes `"One Thousand Five Hundred"`.
///
/// Zero is `"Zero"`, negatives are prefixed with `"Minus "`, and
/// magnitudes of a trillion or more fall back to their digits.
pub fn amount_in_words(value: i64) -> String {
    if value == 0 {
        return "Zero".to_string();
    }
    if value < 0 {
        return format!("Minus {}", magnitude_in_words(value.unsigned_abs()));
    }
    magnitude_in_words(value.unsigned_abs())
}

/// Floors `net` and renders it with [`amount_in_words`].  Values
/// outside the integer range (including NaN and infinities) are
/// written as numbers instead.
pub fn net_pay_in_words(net: f64) -> String {
    let floored = net.floor();
    if floored.is_finite() && floored.abs() < i64::MAX as f64 {
        return amount_in_words(floored as i64);
    }
    if floored.is_finite() && floored < 0.0 {
        return format!("Minus {}", -floored);
    }
    format!("{}", floored)
}

fn magnitude_in_words(n: u64) -> String {
    if n >= WORDS_LIMIT {
        return n.to_string();
    }
    if n < 1000 {
        return below_thousand(n);
    }
    let mut divisor = 1000;
    for scale in &SCALES[1..] {
        if n < divisor * 1000 {
            let head = magnitude_in_words(n / divisor);
            let rest = n % divisor;
            return if rest == 0 {
                format!("{} {}", head, scale)
            } else {
                format!("{} {} {}", head, scale, magnitude_in_words(rest))
            };
        }
        divisor *= 1000;
    }
    n.to_string()
}

fn below_thousand(n: u64) -> String {
    let n = n as usize;
    match n {
        0..=9 => UNITS[n].to_string(),
        10..=19 => TEENS[n - 10].to_string(),
        20..=99 => match n % 10 {
            0 => TENS[n / 10].to_string(),
            unit => format!("{} {}", TENS[n / 10], UNITS[unit]),
        },
        _ => match n % 100 {
            0 => format!("{} Hundred", UNITS[n / 100]),
            rest => format!("{} Hundred {}", UNITS[n / 100], below_thousand(rest as u64)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers() {
        assert_eq!(amount_in_words(0), "Zero");
        assert_eq!(amount_in_words(7), "Seven");
        assert_eq!(amount_in_words(13), "Thirteen");
        assert_eq!(amount_in_words(40), "Forty");
        assert_eq!(amount_in_words(99), "Ninety Nine");
        assert_eq!(amount_in_words(300), "Three Hundred");
        assert_eq!(amount_in_words(512), "Five Hundred Twelve");
    }

    #[test]
    fn grouped_numbers() {
        assert_eq!(amount_in_words(33800), "Thirty Three Thousand Eight Hundred");
        assert_eq!(amount_in_words(1_000_000), "One Million");
        assert_eq!(
            amount_in_words(2_000_017),
            "Two Million Seventeen"
        );
        assert_eq!(
            amount_in_words(999_999_999_999),
            "Nine Hundred Ninety Nine Billion Nine Hundred Ninety Nine Million \
             Nine Hundred Ninety Nine Thousand Nine Hundred Ninety Nine"
        );
    }

    #[test]
    fn negatives_and_overflow() {
        assert_eq!(amount_in_words(-1500), "Minus One Thousand Five Hundred");
        assert_eq!(amount_in_words(1_000_000_000_000), "1000000000000");
        assert_eq!(amount_in_words(-2_000_000_000_000), "Minus 2000000000000");
        assert_eq!(amount_in_words(i64::MIN), format!("Minus {}", i64::MIN.unsigned_abs()));
    }

    #[test]
    fn net_pay_is_floored() {
        assert_eq!(net_pay_in_words(33800.99), "Thirty Three Thousand Eight Hundred");
        assert_eq!(net_pay_in_words(-0.5), "Minus One");
        assert_eq!(net_pay_in_words(0.4), "Zero");
        assert_eq!(net_pay_in_words(f64::NAN), "NaN");
        assert_eq!(net_pay_in_words(1e20), "100000000000000000000");
    }
}
