// self
use crate::obs::{Outcome, Stage};

/// Counter incremented once per stage transition.
pub const SUBMISSION_COUNTER: &str = "sheets_relay_submission_total";

/// Bumps [`SUBMISSION_COUNTER`] for `stage`; compiled out without the `metrics` feature.
pub fn count(stage: Stage, outcome: Outcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(SUBMISSION_COUNTER, "stage" => stage.as_str(), "outcome" => outcome.as_str())
		.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (stage, outcome);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn counting_without_recorder_is_silent() {
		for stage in [Stage::Validate, Stage::Authenticate, Stage::Append] {
			count(stage, Outcome::Attempt);
			count(stage, Outcome::Failure);
		}
	}
}
