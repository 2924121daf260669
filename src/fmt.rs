use rust_decimal::Decimal;

/// Format an amount as euros the Dutch way: `€ 1.234,56`.
pub fn euro(value: Decimal) -> String {
    let negative = value < Decimal::ZERO;
    let cents = format!("{:.2}", value.abs().round_dp(2));
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_separators = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_separators.push('.');
        }
        with_separators.push(c);
    }
    let with_separators: String = with_separators.chars().rev().collect();

    if negative {
        format!("€ -{with_separators},{dec_part}")
    } else {
        format!("€ {with_separators},{dec_part}")
    }
}

/// Like `euro`, but drops the sign. Used where the column heading already
/// says which direction the money went.
pub fn absolute_euro(value: Decimal) -> String {
    euro(value.abs())
}

/// Share of `value` in `total` as a percentage; 0 when the total is zero.
pub fn percentage_of(value: Decimal, total: Decimal) -> Decimal {
    if total == Decimal::ZERO {
        return Decimal::ZERO;
    }
    value / total * Decimal::from(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_euro_formatting() {
        assert_eq!(euro(dec("10.00")), "€ 10,00");
        assert_eq!(euro(dec("20")), "€ 20,00");
        assert_eq!(euro(dec("1234.56")), "€ 1.234,56");
        assert_eq!(euro(dec("1000000.99")), "€ 1.000.000,99");
        assert_eq!(euro(dec("-20.50")), "€ -20,50");
        assert_eq!(euro(dec("0")), "€ 0,00");
    }

    #[test]
    fn test_absolute_euro_drops_sign() {
        assert_eq!(absolute_euro(dec("-20.50")), "€ 20,50");
        assert_eq!(absolute_euro(dec("10.00")), "€ 10,00");
    }

    #[test]
    fn test_percentage_of() {
        assert_eq!(percentage_of(dec("10.50"), dec("1050.00")), dec("1"));
        assert_eq!(percentage_of(dec("1"), dec("1")), dec("100"));
        assert_eq!(percentage_of(dec("1"), Decimal::ZERO), Decimal::ZERO);
    }
}
