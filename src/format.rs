//! Money and date value objects with Colombian (es-CO) rendering.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CURRENCY: &str = "COP";

const MESES_CORTOS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("No se pueden operar montos en monedas distintas ({0} y {1})")]
    CurrencyMismatch(String, String),
    #[error("El monto no puede ser negativo")]
    Negative,
}

/// Non-negative amount in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    pub amount: u64,
    pub currency: String,
}

impl Money {
    pub fn cop(amount: u64) -> Self {
        Self {
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn new(amount: u64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// `$ 2.500.000.000`
    pub fn format(&self) -> String {
        format!("$ {}", group_thousands(self.amount))
    }

    /// `$2.5B`, `$1.2M`, `$50K`; amounts under a thousand use `format`.
    pub fn format_short(&self) -> String {
        let amount = self.amount as f64;
        if self.amount >= 1_000_000_000 {
            format!("${:.1}B", amount / 1_000_000_000.0)
        } else if self.amount >= 1_000_000 {
            format!("${:.1}M", amount / 1_000_000.0)
        } else if self.amount >= 1_000 {
            format!("${:.0}K", amount / 1_000.0)
        } else {
            self.format()
        }
    }

    fn check_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.clone(),
                other.currency.clone(),
            ));
        }
        Ok(())
    }

    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.check_currency(other)?;
        Ok(Money::new(
            self.amount.saturating_add(other.amount),
            self.currency.clone(),
        ))
    }

    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        self.check_currency(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(MoneyError::Negative)?;
        Ok(Money::new(amount, self.currency.clone()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// `2500000000` -> `2.500.000.000`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Benchmark window shown on tender cards: `$2.5B - $3.2B`.
pub fn format_rango_corto(monto_min: u64, monto_max: u64) -> String {
    format!(
        "{} - {}",
        Money::cop(monto_min).format_short(),
        Money::cop(monto_max).format_short()
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("La fecha de inicio no puede ser posterior a la fecha de fin")]
pub struct DateRangeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Whole days until `end`, 0 once it has passed.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        if today > self.end {
            return 0;
        }
        (self.end - today).num_days()
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        today > self.end
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.contains(other.start) || self.contains(other.end) || other.contains(self.start)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", format_fecha(self.start), format_fecha(self.end))
    }
}

/// Parse an ISO date, ignoring any time part.
pub fn parse_fecha(iso: &str) -> Option<NaiveDate> {
    let date_part = iso.get(..10).unwrap_or(iso);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// `14/2/2026`
pub fn format_fecha(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// `14 feb`
pub fn format_fecha_corta(date: NaiveDate) -> String {
    format!("{} {}", date.day(), MESES_CORTOS[date.month0() as usize])
}

/// Closing label for an ISO date; the raw text when it does not parse.
pub fn fecha_cierre_texto(iso: &str) -> String {
    match parse_fecha(iso) {
        Some(date) => format!(
            "Cierra {} de {}",
            date.day(),
            MESES_CORTOS[date.month0() as usize]
        ),
        None => iso.to_string(),
    }
}
