use crate::backend::zenity::SEPARATOR;
use crate::error::Result;

/// Prompt shown after the two entries differed.
pub const MISMATCH_LABEL: &str = "Passwords do not match, try again";

/// Repeats a two-field password prompt until both fields match.
///
/// `prompt` receives the label to show and returns both fields joined by `|`,
/// or `None` when the user cancelled.
pub fn confirm_new_password<F>(text: &str, mut prompt: F) -> Result<Option<String>>
where
    F: FnMut(&str) -> Result<Option<String>>,
{
    let mut label = text;
    loop {
        let Some(fields) = prompt(label)? else {
            return Ok(None);
        };
        if let Some(password) = matching_pair(&fields) {
            return Ok(Some(password.to_string()));
        }
        tracing::debug!("password confirmation did not match");
        label = MISMATCH_LABEL;
    }
}

/// Returns `p` when `fields` is exactly `p|p`.
///
/// The password may itself contain the separator, so the split point is the
/// middle of the output rather than the first `|`.
fn matching_pair(fields: &str) -> Option<&str> {
    if fields.len() % 2 == 0 {
        return None;
    }
    let mid = fields.len() / 2;
    let (password, rest) = fields.split_at_checked(mid)?;
    let confirmation = rest.strip_prefix(SEPARATOR)?;
    (password == confirmation).then_some(password)
}
