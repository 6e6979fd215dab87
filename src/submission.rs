//! Registration submissions: parsing, validation, and mapping onto a spreadsheet row.
//!
//! A submission lives for one request. It is parsed from the JSON body, rejected unless both
//! `name` and `email` carry text, and consumed into a [`SheetRow`] whose column order is fixed:
//! name, email, phone, gaming interests, experience, message, submitted-at, source.

// crates.io
use time::{format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::{_prelude::*, error::SubmissionError, sheets::SheetRow};

const SUBMITTED_AT_FORMAT: &[BorrowedFormatItem<'static>] =
	format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

/// Experience tiers offered by the registration form.
///
/// Recognition is informational: the sheet always receives the submitted text unchanged, and
/// values outside these tiers are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExperienceLevel {
	/// Plays for fun.
	Casual,
	/// Regular player.
	Intermediate,
	/// Plays ranked or in local tournaments.
	Competitive,
	/// Professional or semi-professional.
	Professional,
}
impl ExperienceLevel {
	/// Matches a form value against the known tiers, ignoring case and surrounding whitespace.
	pub fn recognize(value: &str) -> Option<Self> {
		let value = value.trim();

		[Self::Casual, Self::Intermediate, Self::Competitive, Self::Professional]
			.into_iter()
			.find(|level| level.as_str().eq_ignore_ascii_case(value))
	}

	/// Form value for this tier.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExperienceLevel::Casual => "casual",
			ExperienceLevel::Intermediate => "intermediate",
			ExperienceLevel::Competitive => "competitive",
			ExperienceLevel::Professional => "professional",
		}
	}
}
impl Display for ExperienceLevel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawSubmission {
	name: Option<String>,
	email: Option<String>,
	phone: Option<String>,
	gaming_interests: Option<String>,
	experience: Option<String>,
	message: Option<String>,
	submitted_at: Option<String>,
	source: Option<String>,
}

/// A validated registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
	/// Registrant name; never blank.
	pub name: String,
	/// Contact email; never blank.
	pub email: String,
	/// Phone number.
	pub phone: Option<String>,
	/// Free-text list of games or genres.
	pub gaming_interests: Option<String>,
	/// Self-reported experience, exactly as submitted.
	pub experience: Option<String>,
	/// Free-text message.
	pub message: Option<String>,
	/// Client-supplied submission time; the relay's clock is used when absent.
	pub submitted_at: Option<String>,
	/// Client-supplied source tag; the configured default is used when absent.
	pub source: Option<String>,
}
impl Submission {
	/// Creates a submission with only the required fields set.
	pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			email: email.into(),
			phone: None,
			gaming_interests: None,
			experience: None,
			message: None,
			submitted_at: None,
			source: None,
		}
	}

	/// Parses and validates a JSON request body.
	///
	/// Empty strings in optional fields count as absent. A body that is valid JSON but not an
	/// object is treated as missing its required fields.
	pub fn from_json(body: &[u8]) -> Result<Self, SubmissionError> {
		let value: serde_json::Value =
			serde_json::from_slice(body).map_err(SubmissionError::InvalidJson)?;

		if !value.is_object() {
			return Err(SubmissionError::MissingRequired);
		}

		let raw: RawSubmission = serde_path_to_error::deserialize(value).map_err(|source| {
			SubmissionError::InvalidField { path: source.path().to_string(), source }
		})?;

		Self::validate(raw)
	}

	fn validate(raw: RawSubmission) -> Result<Self, SubmissionError> {
		let (Some(name), Some(email)) = (present(raw.name), present(raw.email)) else {
			return Err(SubmissionError::MissingRequired);
		};
		Ok(Self {
			name,
			email,
			phone: present(raw.phone),
			gaming_interests: present(raw.gaming_interests),
			experience: present(raw.experience),
			message: present(raw.message),
			submitted_at: present(raw.submitted_at),
			source: present(raw.source),
		})
	}

	/// Known tier matching the submitted experience, if any.
	pub fn experience_level(&self) -> Option<ExperienceLevel> {
		self.experience.as_deref().and_then(ExperienceLevel::recognize)
	}

	/// Consumes the submission into its spreadsheet row.
	///
	/// `now` stamps submissions that carry no `submittedAt`; `default_source` fills the source
	/// column when the submission carries none.
	pub fn into_row(self, now: OffsetDateTime, default_source: &str) -> SheetRow {
		let submitted_at = self.submitted_at.unwrap_or_else(|| format_submitted_at(now));

		SheetRow::new([
			self.name,
			self.email,
			self.phone.unwrap_or_default(),
			self.gaming_interests.unwrap_or_default(),
			self.experience.unwrap_or_default(),
			self.message.unwrap_or_default(),
			submitted_at,
			self.source.unwrap_or_else(|| default_source.to_owned()),
		])
	}
}

/// Formats `now` as an ISO-8601 UTC timestamp with millisecond precision.
pub fn format_submitted_at(now: OffsetDateTime) -> String {
	now.to_offset(time::UtcOffset::UTC)
		.format(SUBMITTED_AT_FORMAT)
		.unwrap_or_else(|_| now.unix_timestamp().to_string())
}

fn present(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.trim().is_empty())
}
