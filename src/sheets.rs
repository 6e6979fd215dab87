//! Sheets API `values.append` client.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::SheetTarget,
	error::UpstreamError,
	http::HttpClient,
	obs::Stage,
};

/// Number of columns written per submission.
pub const ROW_WIDTH: usize = 8;

/// One spreadsheet row in submission column order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SheetRow([String; ROW_WIDTH]);
impl SheetRow {
	/// Wraps the cells in column order.
	pub fn new(cells: [String; ROW_WIDTH]) -> Self {
		Self(cells)
	}

	/// Cells in column order.
	pub fn cells(&self) -> &[String; ROW_WIDTH] {
		&self.0
	}
}

#[derive(Serialize)]
struct AppendRequest<'a> {
	values: [&'a SheetRow; 1],
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
	#[serde(default)]
	updates: AppendUpdates,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
	updated_range: Option<String>,
}

/// Result of a successful append.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppendReceipt {
	/// A1 range the row landed in, when the API reported it.
	pub updated_range: Option<String>,
}

/// Builds `{api}/v4/spreadsheets/{id}/values/{range}:append?valueInputOption=USER_ENTERED`.
pub fn append_url(target: &SheetTarget) -> Url {
	let mut url = target.api_base.clone();

	if let Ok(mut segments) = url.path_segments_mut() {
		segments.pop_if_empty().extend([
			"v4",
			"spreadsheets",
			target.spreadsheet_id.as_str(),
			"values",
			format!("{}:append", target.range).as_str(),
		]);
	}

	url.query_pairs_mut().append_pair("valueInputOption", "USER_ENTERED");

	url
}

/// Appends `row` after the last populated row of `target`.
///
/// Values use `USER_ENTERED` interpretation so timestamps and numbers are parsed the way the
/// Sheets UI would parse them.
pub async fn append_row(
	client: &HttpClient,
	target: &SheetTarget,
	token: &AccessToken,
	row: &SheetRow,
) -> Result<AppendReceipt, UpstreamError> {
	let request = client
		.post(append_url(target))
		.bearer_auth(token.expose())
		.json(&AppendRequest { values: [row] });
	let response = client.send(request, Stage::Append).await?;

	if !response.status.is_success() {
		return Err(UpstreamError::AppendRejected {
			status: response.status.as_u16(),
			body: response.body_text(),
		});
	}

	// The receipt is informational; an unexpected body does not undo a 2xx append.
	let parsed = serde_json::from_slice::<AppendResponse>(&response.body).unwrap_or_default();

	Ok(AppendReceipt { updated_range: parsed.updates.updated_range })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn target(api_base: &str, range: &str) -> SheetTarget {
		SheetTarget {
			spreadsheet_id: "1AbC-sheet".into(),
			range: range.into(),
			api_base: Url::parse(api_base).expect("API base should parse."),
		}
	}

	#[test]
	fn append_url_targets_range() {
		let url = append_url(&target("https://sheets.googleapis.com", "Sheet1!A:H"));

		assert_eq!(
			url.as_str(),
			"https://sheets.googleapis.com/v4/spreadsheets/1AbC-sheet/values/Sheet1!A:H:append?valueInputOption=USER_ENTERED"
		);
	}

	#[test]
	fn append_url_escapes_sheet_names() {
		let url = append_url(&target("http://127.0.0.1:9999/", "Sign ups/2026!A:H"));

		assert_eq!(
			url.path(),
			"/v4/spreadsheets/1AbC-sheet/values/Sign%20ups%2F2026!A:H:append"
		);
	}

	#[test]
	fn row_serializes_as_flat_array() {
		let row = SheetRow::new(std::array::from_fn(|idx| idx.to_string()));
		let body = serde_json::to_value(AppendRequest { values: [&row] })
			.expect("Append body should serialize.");

		assert_eq!(body, serde_json::json!({ "values": [["0", "1", "2", "3", "4", "5", "6", "7"]] }));
	}
}
