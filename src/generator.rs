//! Value generators that fill a column row by row

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::model::Value;

/// Produces one value per inserted row, in file order
pub trait ValueGenerator: Send {
    fn next_value(&mut self) -> Value;
}

impl<F> ValueGenerator for F
where
    F: FnMut() -> Value + Send,
{
    fn next_value(&mut self) -> Value {
        self()
    }
}

/// Integer sequence, 1, 2, 3 … by default
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    next: i64,
    increment: i64,
}

/// Create an integer sequence starting at 1 and incrementing by 1
pub fn sequence() -> SequenceGenerator {
    SequenceGenerator {
        next: 1,
        increment: 1,
    }
}

impl SequenceGenerator {
    pub fn starting_at(mut self, start: i64) -> Self {
        self.next = start;
        self
    }

    pub fn incrementing_by(mut self, increment: i64) -> Self {
        self.increment = increment;
        self
    }
}

impl ValueGenerator for SequenceGenerator {
    fn next_value(&mut self) -> Value {
        let current = self.next;
        self.next = self.next.wrapping_add(self.increment);
        Value::Int(current)
    }
}

/// String sequence, `prefix1`, `prefix2` … optionally zero-padded
#[derive(Debug, Clone)]
pub struct StringSequenceGenerator {
    prefix: String,
    sequence: SequenceGenerator,
    padding: usize,
}

/// Create a string sequence with the given prefix
pub fn string_sequence(prefix: impl Into<String>) -> StringSequenceGenerator {
    StringSequenceGenerator {
        prefix: prefix.into(),
        sequence: sequence(),
        padding: 0,
    }
}

impl StringSequenceGenerator {
    pub fn starting_at(mut self, start: i64) -> Self {
        self.sequence = self.sequence.starting_at(start);
        self
    }

    pub fn incrementing_by(mut self, increment: i64) -> Self {
        self.sequence = self.sequence.incrementing_by(increment);
        self
    }

    /// Left-pad the number with zeros to `width` digits
    pub fn with_left_padding(mut self, width: usize) -> Self {
        self.padding = width;
        self
    }
}

impl ValueGenerator for StringSequenceGenerator {
    fn next_value(&mut self) -> Value {
        let n = self.sequence.next;
        self.sequence.next = n.wrapping_add(self.sequence.increment);
        Value::String(format!("{}{:0width$}", self.prefix, n, width = self.padding))
    }
}

/// Date or datetime sequence stepping by a fixed duration
#[derive(Debug, Clone)]
pub struct DateSequenceGenerator {
    next: NaiveDateTime,
    step: Duration,
    with_time: bool,
}

/// Create a date sequence starting at 1970-01-01, one day apart
pub fn date_sequence() -> DateSequenceGenerator {
    DateSequenceGenerator {
        next: NaiveDateTime::default(),
        step: Duration::days(1),
        with_time: false,
    }
}

impl DateSequenceGenerator {
    pub fn starting_at(mut self, date: NaiveDate) -> Self {
        self.next = date.and_time(NaiveTime::MIN);
        self.with_time = false;
        self
    }

    /// Start at a datetime; generated values are then datetimes
    pub fn starting_at_datetime(mut self, datetime: NaiveDateTime) -> Self {
        self.next = datetime;
        self.with_time = true;
        self
    }

    pub fn incrementing_by(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }
}

impl ValueGenerator for DateSequenceGenerator {
    fn next_value(&mut self) -> Value {
        let current = self.next;
        self.next = current
            .checked_add_signed(self.step)
            .unwrap_or(NaiveDateTime::MAX);
        if self.with_time {
            Value::DateTime(current)
        } else {
            Value::Date(current.date())
        }
    }
}
