use once_cell::sync::Lazy;
use regex::Regex;

/// Currency symbols, thousands separators and whitespace.
static PRICE_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{Sc},\s]").expect("valid price regex"));

/// Outcome of normalizing one raw price cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceParse {
    Valid(f64),
    Negative(f64),
    Unparseable,
}

/// Strip formatting from a price string and parse it.
///
/// `"$1,200.00"` → `Valid(1200.0)`; `"N/A"`, `""` and non-finite values are
/// `Unparseable`.
pub fn parse_price(raw: &str) -> PriceParse {
    let stripped = PRICE_NOISE.replace_all(raw, "");
    match stripped.parse::<f64>() {
        Ok(v) if !v.is_finite() => PriceParse::Unparseable,
        Ok(v) if v < 0.0 => PriceParse::Negative(v),
        // -0.0 normalizes to 0.0 so the written value is stable
        Ok(v) => PriceParse::Valid(v + 0.0),
        Err(_) => PriceParse::Unparseable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_currency_and_thousands_separators() {
        assert_eq!(parse_price("$1,200.00"), PriceParse::Valid(1200.0));
        assert_eq!(parse_price("€ 85"), PriceParse::Valid(85.0));
        assert_eq!(parse_price("1200.0"), PriceParse::Valid(1200.0));
    }

    #[test]
    fn rejects_text_and_non_finite_values() {
        assert_eq!(parse_price("N/A"), PriceParse::Unparseable);
        assert_eq!(parse_price(""), PriceParse::Unparseable);
        assert_eq!(parse_price("NaN"), PriceParse::Unparseable);
        assert_eq!(parse_price("inf"), PriceParse::Unparseable);
        assert_eq!(parse_price("12.5.1"), PriceParse::Unparseable);
    }

    #[test]
    fn flags_negative_prices() {
        assert_eq!(parse_price("-$40.00"), PriceParse::Negative(-40.0));
    }
}
