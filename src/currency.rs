use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display currency. A label only: amounts are never converted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Inr,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Eur, Currency::Gbp, Currency::Inr];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Inr => "INR",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Currency::Usd => Currency::Eur,
            Currency::Eur => Currency::Gbp,
            Currency::Gbp => Currency::Inr,
            Currency::Inr => Currency::Usd,
        }
    }

    /// `USD 170.00`
    pub fn format(&self, amount: f64) -> String {
        format!("{} {:.2}", self.code(), amount)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unsupported currency '{}', expected one of USD, EUR, GBP, INR", s)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_only() {
        assert_eq!(Currency::Usd.format(170.0), "USD 170.00");
        assert_eq!(Currency::Inr.format(170.0), "INR 170.00");
        assert_eq!(Currency::Gbp.format(12.5), "GBP 12.50");
    }

    #[test]
    fn test_parse_and_cycle() {
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::Eur);
        assert!("JPY".parse::<Currency>().is_err());
        assert_eq!(Currency::Inr.next(), Currency::Usd);
    }
}
