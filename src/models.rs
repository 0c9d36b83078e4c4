use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TallyError};

/// Date an expense was recorded on. Imported rows may not carry one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RecordDate {
    Known(NaiveDate),
    #[default]
    Unknown,
}

impl RecordDate {
    pub fn today() -> Self {
        Self::Known(chrono::Local::now().date_naive())
    }

    /// Lenient parse: anything that is not an ISO date (or date-time) is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Self::Known(date);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Self::Known(dt.date());
        }
        Self::Unknown
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for RecordDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse).unwrap_or_default())
    }
}

impl ToSql for RecordDate {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Known(date) => ToSqlOutput::Owned(Value::Text(date.format("%Y-%m-%d").to_string())),
            Self::Unknown => ToSqlOutput::Owned(Value::Null),
        })
    }
}

impl FromSql for RecordDate {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Self::Unknown),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(Self::parse)
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// One expense entry.
/// Largest accepted amount. Spreadsheets store numbers as doubles, and
/// sums of many records still fit comfortably in an `i64`.
pub const MAX_AMOUNT: i64 = 1 << 53;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub category: String,
    pub amount: i64,
    #[serde(default)]
    pub date: RecordDate,
}

impl Record {
    pub fn new(category: impl Into<String>, amount: i64, date: RecordDate) -> Self {
        Self {
            category: category.into(),
            amount,
            date,
        }
    }

    /// Category non-empty and amount within `1..=MAX_AMOUNT`.
    pub fn is_valid(&self) -> bool {
        !self.category.trim().is_empty() && (1..=MAX_AMOUNT).contains(&self.amount)
    }

    /// The line shown in listings; search matches against it too.
    pub fn display_line(&self, currency: &str) -> String {
        format!("{} - {} {} | {}", self.category, self.amount, currency, self.date)
    }
}

/// User input that passed validation but has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub category: String,
    pub amount: i64,
}

impl NewRecord {
    pub fn parse(category: &str, amount: &str) -> Result<Self> {
        let category = category.trim();
        let amount = amount.trim();
        if category.is_empty() {
            return Err(TallyError::EmptyCategory);
        }
        if amount.is_empty() {
            return Err(TallyError::EmptyAmount);
        }
        let amount: i64 = amount
            .parse()
            .map_err(|_| TallyError::AmountNotInteger(amount.to_string()))?;
        if amount <= 0 {
            return Err(TallyError::AmountNotPositive(amount));
        }
        if amount > MAX_AMOUNT {
            return Err(TallyError::AmountTooLarge(amount));
        }
        Ok(Self {
            category: category.to_string(),
            amount,
        })
    }

    pub fn dated(self, date: RecordDate) -> Record {
        Record::new(self.category, self.amount, date)
    }
}
