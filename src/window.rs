//! Date parsing and window planning for export ranges.
//!
//! An export range is a half-open `[start, end)` pair of UTC midnights. [`plan`] splits it into
//! contiguous [`Window`]s of at most [`BatchSize`] days; the final window is clamped to the range
//! end and may be shorter.

// crates.io
use time::{format_description::well_known::Rfc3339, macros::format_description};
// self
use crate::{_prelude::*, error::ValidationError};

const SECONDS_PER_DAY: i64 = 86_400;

/// Parses a strict `YYYY-MM-DD` string into the UTC midnight it names.
pub fn parse_date(input: &str) -> Result<OffsetDateTime, ValidationError> {
	let date = time::Date::parse(input, format_description!("[year]-[month]-[day]"))
		.map_err(|source| ValidationError::InvalidDate { input: input.to_owned(), source })?;

	Ok(date.midnight().assume_utc())
}

/// Half-open export range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
	start: OffsetDateTime,
	end: OffsetDateTime,
}
impl DateRange {
	/// Creates a range, rejecting `start > end`. An empty range (`start == end`) is valid.
	pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Result<Self, ValidationError> {
		if start > end {
			return Err(ValidationError::InvertedRange { start, end });
		}

		Ok(Self { start, end })
	}

	/// Parses both bounds from `YYYY-MM-DD` strings.
	pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
		Self::new(parse_date(start)?, parse_date(end)?)
	}

	/// Inclusive lower bound.
	pub fn start(&self) -> OffsetDateTime {
		self.start
	}

	/// Exclusive upper bound.
	pub fn end(&self) -> OffsetDateTime {
		self.end
	}

	/// Returns `true` when the range covers no time at all.
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}
}

/// Number of days covered by a single window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchSize(NonZeroU32);
impl BatchSize {
	/// One week, the default batch size.
	pub const DEFAULT: Self = Self(NonZeroU32::MIN.saturating_add(6));

	/// Wraps a non-zero day count.
	pub const fn new(days: NonZeroU32) -> Self {
		Self(days)
	}

	/// Returns `None` for zero days.
	pub fn from_days(days: u32) -> Option<Self> {
		NonZeroU32::new(days).map(Self)
	}

	/// Day count.
	pub fn days(self) -> u32 {
		self.0.get()
	}

	/// Window length.
	pub fn duration(self) -> Duration {
		Duration::seconds(i64::from(self.days()) * SECONDS_PER_DAY)
	}
}
impl Default for BatchSize {
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// One sub-interval of a [`DateRange`], processed as a single export unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Window {
	/// Inclusive lower bound.
	pub start: OffsetDateTime,
	/// Exclusive upper bound.
	pub end: OffsetDateTime,
}
impl Window {
	/// Lower bound as Unix epoch seconds.
	pub fn start_timestamp(&self) -> i64 {
		self.start.unix_timestamp()
	}

	/// Upper bound as Unix epoch seconds.
	pub fn end_timestamp(&self) -> i64 {
		self.end.unix_timestamp()
	}

	/// Window length.
	pub fn duration(&self) -> Duration {
		self.end - self.start
	}
}
impl Display for Window {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let start = self.start.format(&Rfc3339).map_err(|_| std::fmt::Error)?;
		let end = self.end.format(&Rfc3339).map_err(|_| std::fmt::Error)?;

		write!(f, "since {start} until {end}")
	}
}

/// Lazily yields the windows of a planned range.
#[derive(Clone, Debug)]
pub struct Windows {
	cursor: OffsetDateTime,
	end: OffsetDateTime,
	step: Duration,
}
impl Iterator for Windows {
	type Item = Window;

	fn next(&mut self) -> Option<Self::Item> {
		if self.cursor >= self.end {
			return None;
		}

		let end = self.cursor.checked_add(self.step).map_or(self.end, |next| next.min(self.end));
		let window = Window { start: self.cursor, end };

		self.cursor = end;

		Some(window)
	}
}

/// Partitions `range` into ordered, contiguous windows of at most `batch` days.
pub fn plan(range: DateRange, batch: BatchSize) -> Windows {
	Windows { cursor: range.start, end: range.end, step: batch.duration() }
}
