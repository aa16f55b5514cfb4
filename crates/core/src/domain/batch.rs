use std::fmt;

pub const DEFAULT_BATCH_COUNT: i64 = 3;
pub const MAX_BATCH_COUNT: i64 = 10;

/// Number of fortunes in a batch, already checked to be within 1..=10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchCount(usize);

impl BatchCount {
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for BatchCount {
    fn default() -> Self {
        Self(DEFAULT_BATCH_COUNT as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchCountError {
    TooMany(i64),
    TooFew(i64),
}

impl fmt::Display for BatchCountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooMany(_) => write!(
                f,
                "The mystical energies can only handle {MAX_BATCH_COUNT} fortunes at once!"
            ),
            Self::TooFew(_) => write!(f, "You must request at least 1 fortune!"),
        }
    }
}

impl std::error::Error for BatchCountError {}

impl TryFrom<i64> for BatchCount {
    type Error = BatchCountError;

    fn try_from(count: i64) -> Result<Self, Self::Error> {
        if count > MAX_BATCH_COUNT {
            return Err(BatchCountError::TooMany(count));
        }
        if count < 1 {
            return Err(BatchCountError::TooFew(count));
        }
        Ok(Self(count as usize))
    }
}

impl BatchCount {
    /// Parses the raw `count` query value. Anything that is not an integer
    /// falls back to the default count; integers are range-checked.
    pub fn from_query(raw: Option<&str>) -> Result<Self, BatchCountError> {
        let Some(raw) = raw.map(str::trim) else {
            return Ok(Self::default());
        };

        let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(Self::default());
        }

        match raw.parse::<i64>() {
            Ok(count) => Self::try_from(count),
            // Well-formed but past i64: still an out-of-range integer.
            Err(_) if raw.starts_with('-') => Err(BatchCountError::TooFew(i64::MIN)),
            Err(_) => Err(BatchCountError::TooMany(i64::MAX)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_count_in_range() {
        for n in 1..=MAX_BATCH_COUNT {
            assert_eq!(BatchCount::try_from(n).unwrap().get(), n as usize);
        }
    }

    #[test]
    fn rejects_out_of_range_counts() {
        assert_eq!(BatchCount::try_from(0), Err(BatchCountError::TooFew(0)));
        assert_eq!(BatchCount::try_from(-4), Err(BatchCountError::TooFew(-4)));
        assert_eq!(BatchCount::try_from(11), Err(BatchCountError::TooMany(11)));
        assert_eq!(
            BatchCountError::TooMany(15).to_string(),
            "The mystical energies can only handle 10 fortunes at once!"
        );
        assert_eq!(
            BatchCountError::TooFew(0).to_string(),
            "You must request at least 1 fortune!"
        );
    }

    #[test]
    fn query_value_defaults_when_missing_or_not_a_number() {
        assert_eq!(BatchCount::from_query(None).unwrap().get(), 3);
        assert_eq!(BatchCount::from_query(Some("lots")).unwrap().get(), 3);
        assert_eq!(BatchCount::from_query(Some(" 7 ")).unwrap().get(), 7);
        assert_eq!(BatchCount::from_query(Some("+4")).unwrap().get(), 4);
        assert_eq!(BatchCount::from_query(Some("")).unwrap().get(), 3);
        assert_eq!(BatchCount::from_query(Some("-")).unwrap().get(), 3);
        assert_eq!(BatchCount::from_query(Some("2.5")).unwrap().get(), 3);
        assert!(BatchCount::from_query(Some("15")).is_err());
    }

    #[test]
    fn query_value_past_i64_is_still_out_of_range() {
        assert_eq!(
            BatchCount::from_query(Some("99999999999999999999")),
            Err(BatchCountError::TooMany(i64::MAX))
        );
        assert_eq!(
            BatchCount::from_query(Some("-99999999999999999999")),
            Err(BatchCountError::TooFew(i64::MIN))
        );
    }
}
