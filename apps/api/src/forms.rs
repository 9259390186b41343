use crate::errors::AppError;

/// Raw `application/x-www-form-urlencoded` pairs, in submission order.
/// HTML forms repeat keys for multi-selects (`university[]=a&university[]=b`),
/// which a flat struct cannot capture.
#[derive(Debug, Default)]
pub struct FormFields(Vec<(String, String)>);

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        FormFields(pairs)
    }
}

impl FormFields {
    /// First value submitted under `key`.
    pub fn required(&self, key: &str) -> Result<String, AppError> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| AppError::Validation(format!("Missing form field '{key}'")))
    }

    /// Every value submitted under `key` or `key[]`, blanks skipped.
    pub fn list(&self, key: &str) -> Vec<String> {
        let bracketed = format!("{key}[]");
        self.0
            .iter()
            .filter(|(k, _)| k == key || *k == bracketed)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect()
    }
}
