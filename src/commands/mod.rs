pub mod config;
pub mod dialog;

use dialogbridge::outcome::DialogResult;

/// Renders a dialog result for stdout: JSON, or plain text where empty
/// results print nothing.
pub fn render_result(result: &DialogResult, json: bool) -> anyhow::Result<Option<String>> {
    if json {
        return Ok(Some(serde_json::to_string(result)?));
    }
    let text = result.to_string();
    Ok((!text.is_empty()).then_some(text))
}
