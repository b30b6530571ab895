use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, HoldingField};

/// Date format used by the holdings store for `purchase date` (e.g. `18-06-2024`).
pub const PURCHASE_DATE_FORMAT: &str = "%d-%m-%Y";

/// A holding exactly as the holdings store publishes it.
///
/// Every field is optional: the store validates records on creation, but the
/// core still has to cope with records that slipped through. A field with the
/// wrong JSON type fails deserialization (a structural problem with the
/// payload); a field that is merely absent is only detected by
/// [`HoldingRecord::validate`], so it can be reported per holding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
    /// Store-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name (e.g., "Apple Inc.")
    #[serde(default)]
    pub name: Option<String>,

    /// Ticker symbol (e.g., "AAPL")
    #[serde(default)]
    pub symbol: Option<String>,

    /// Number of shares held
    #[serde(default)]
    pub shares: Option<i64>,

    /// Price per share at acquisition
    #[serde(default, rename = "purchase price")]
    pub purchase_price: Option<Decimal>,

    /// Acquisition date, `DD-MM-YYYY` on the wire. Informational only: a
    /// date in any other format decodes as `None`.
    #[serde(default, rename = "purchase date", with = "purchase_date_format")]
    pub purchase_date: Option<NaiveDate>,
}

impl HoldingRecord {
    /// Human-readable label used in diagnostics: the id, else the symbol.
    pub fn label(&self) -> String {
        self.id
            .clone()
            .or_else(|| self.symbol.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Share count used for filtering. A record without `shares` compares as 0.
    pub fn share_count(&self) -> i64 {
        self.shares.unwrap_or(0)
    }

    /// Check the fields required for valuation, in the order symbol, shares,
    /// purchase price. An empty symbol, a non-positive share count or a
    /// non-positive purchase price is rejected the same way as a missing one.
    pub fn validate(&self) -> Result<Holding, CoreError> {
        let symbol = self
            .symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| self.malformed(HoldingField::Symbol))?;

        let shares = self
            .shares
            .filter(|s| *s > 0)
            .ok_or_else(|| self.malformed(HoldingField::Shares))?;

        let purchase_price = self
            .purchase_price
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| self.malformed(HoldingField::PurchasePrice))?;

        Ok(Holding {
            id: self.id.clone(),
            name: self.name.clone().unwrap_or_default(),
            symbol: symbol.to_uppercase(),
            shares,
            purchase_price,
            purchase_date: self.purchase_date,
        })
    }

    fn malformed(&self, field: HoldingField) -> CoreError {
        CoreError::MalformedHolding {
            holding: self.label(),
            field,
        }
    }
}

/// A holding that passed [`HoldingRecord::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub id: Option<String>,
    pub name: String,
    /// Ticker symbol, uppercased
    pub symbol: String,
    /// Always > 0
    pub shares: i64,
    /// Always > 0
    pub purchase_price: Decimal,
    pub purchase_date: Option<NaiveDate>,
}

impl Holding {
    /// Same label rules as [`HoldingRecord::label`].
    pub fn label(&self) -> String {
        self.id.clone().unwrap_or_else(|| self.symbol.clone())
    }

    /// What the position cost: `shares × purchase price`.
    pub fn cost_basis(&self) -> Result<Decimal, CoreError> {
        let shares = Decimal::from(self.shares);
        shares.checked_mul(self.purchase_price).ok_or_else(|| {
            CoreError::Arithmetic(format!("{shares} × {}", self.purchase_price))
        })
    }
}

mod purchase_date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::PURCHASE_DATE_FORMAT;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(PURCHASE_DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|s| match NaiveDate::parse_from_str(&s, PURCHASE_DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::warn!(value = %s, error = %e, "ignoring purchase date not in DD-MM-YYYY");
                None
            }
        }))
    }
}
