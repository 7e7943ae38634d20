/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (purchase, warranty expiry, contract terms).
pub type Date = chrono::NaiveDate;

/// Choice codes are stored as SMALLINT.
pub type ChoiceCode = i16;
