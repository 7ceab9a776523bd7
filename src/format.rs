pub fn format_with_commas(value: i64) -> String {
    let is_negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if is_negative {
        format!("-{}", out)
    } else {
        out
    }
}

/// `₩ 1,234,000`; negative amounts keep the sign after the glyph.
pub fn format_currency(amount: i64, symbol: &str) -> String {
    format!("{} {}", symbol, format_with_commas(amount))
}

/// Amount with an explicit `+`/`-` direction, as used by the recent list.
pub fn format_signed(amount: i64, outflow: bool, symbol: &str) -> String {
    let sign = if outflow { "-" } else { "+" };
    format!("{} {}{}", sign, symbol, format_with_commas(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commas() {
        assert_eq!(format_with_commas(0), "0");
        assert_eq!(format_with_commas(999), "999");
        assert_eq!(format_with_commas(1000), "1,000");
        assert_eq!(format_with_commas(15000), "15,000");
        assert_eq!(format_with_commas(1234567), "1,234,567");
        assert_eq!(format_with_commas(-1234567), "-1,234,567");
        assert_eq!(format_with_commas(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(15000, "₩"), "₩ 15,000");
        assert_eq!(format_currency(-15000, "₩"), "₩ -15,000");
        assert_eq!(format_signed(3000, true, "₩"), "- ₩3,000");
        assert_eq!(format_signed(3000, false, "₩"), "+ ₩3,000");
    }
}
