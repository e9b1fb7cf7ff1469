use serde::{Deserialize, Serialize};

/// Price band selected in the browse filters.
///
/// Tokens follow the listing UI: `"200000-400000"` is inclusive on both ends,
/// `"800000+"` is open-ended above. Currency symbols and thousands separators
/// are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceRange {
    #[default]
    Any,
    Between { min: u64, max: u64 },
    AtLeast(u64),
    /// Token could not be read; matches nothing.
    Unreadable,
}

impl PriceRange {
    pub fn parse(raw: &str) -> Self {
        let token: String = raw
            .chars()
            .filter(|c| !matches!(c, '$' | ',' | '_') && !c.is_whitespace())
            .collect();

        if is_unset(&token) {
            return Self::Any;
        }

        if let Some(min) = token.strip_suffix('+') {
            return min.parse().map(Self::AtLeast).unwrap_or(Self::Unreadable);
        }

        match token.split_once('-') {
            Some((min, max)) => match (min.parse(), max.parse()) {
                (Ok(min), Ok(max)) => Self::Between { min, max },
                _ => Self::Unreadable,
            },
            None => Self::Unreadable,
        }
    }

    pub fn contains(&self, price: u64) -> bool {
        match *self {
            Self::Any => true,
            Self::Between { min, max } => (min..=max).contains(&price),
            Self::AtLeast(min) => price >= min,
            Self::Unreadable => false,
        }
    }
}

/// "At least N" bedroom/bathroom filter (`"3+"`, `"1.5+"`, or a bare number).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Threshold {
    #[default]
    Any,
    AtLeast(f64),
    Unreadable,
}

impl Threshold {
    pub fn parse(raw: &str) -> Self {
        let token = raw.trim();
        if is_unset(token) {
            return Self::Any;
        }

        let number = token.strip_suffix('+').unwrap_or(token).trim();
        match number.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Self::AtLeast(value),
            _ => Self::Unreadable,
        }
    }

    pub fn admits(&self, count: f64) -> bool {
        match *self {
            Self::Any => true,
            Self::AtLeast(min) => count >= min,
            Self::Unreadable => false,
        }
    }
}

/// Single-key ordering for browse results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
}

impl SortKey {
    /// Unknown keys fall back to `Newest`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "price-low" | "price_low" | "price-asc" => Self::PriceLow,
            "price-high" | "price_high" | "price-desc" => Self::PriceHigh,
            _ => Self::Newest,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
        }
    }
}

pub(crate) fn is_unset(token: &str) -> bool {
    token.is_empty() || token.eq_ignore_ascii_case("any") || token.eq_ignore_ascii_case("all")
}
