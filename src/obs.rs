//! Structured logging and counters for the submission pipeline.
//!
//! Every stage runs inside a `sheets_relay.submission` span whose `stage` field names the step.
//! With the `metrics` feature, [`count`] also feeds `sheets_relay_submission_total`, labelled by
//! `stage` and `outcome`.

mod counter;
mod span;

pub use counter::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Step of the submission pipeline, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
	/// Body parsing and required-field checks.
	Validate,
	/// Assertion signing plus token exchange.
	Authenticate,
	/// Row append.
	Append,
}
impl Stage {
	/// Field and label value.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Validate => "validate",
			Self::Authenticate => "authenticate",
			Self::Append => "append",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.pad(self.as_str())
	}
}

/// How far a stage got.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Stage entered.
	Attempt,
	/// Stage finished with a value.
	Success,
	/// Stage returned an error.
	Failure,
}
impl Outcome {
	/// Classifies a finished stage.
	pub fn of<T, E>(result: &std::result::Result<T, E>) -> Self {
		if result.is_ok() { Self::Success } else { Self::Failure }
	}

	/// Label value.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Attempt => "attempt",
			Self::Success => "success",
			Self::Failure => "failure",
		}
	}
}
