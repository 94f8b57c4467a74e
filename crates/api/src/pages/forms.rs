//! Parsing for urlencoded form posts.
//!
//! Forms are read as raw `(name, value)` pairs so repeated keys (member
//! multi-selects, quote line-item rows) survive, and so a malformed number
//! becomes a validation message on the re-rendered form rather than an
//! extractor rejection.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use landscaper_core::error::CoreError;
use landscaper_core::money::{format_cents, parse_amount, parse_optional_amount};
use landscaper_core::types::{Cents, DbId};

/// Submitted form fields in submission order.
#[derive(Debug, Clone, Default)]
pub struct FormFields(Vec<(String, String)>);

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        FormFields(pairs)
    }
}

impl FormFields {
    /// First value for `name`, or `""`.
    pub fn get(&self, name: &str) -> &str {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Every value submitted for `name`.
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn text(&self, name: &str) -> String {
        self.get(name).trim().to_string()
    }

    /// Trimmed value, `None` when blank.
    pub fn optional_text(&self, name: &str) -> Option<String> {
        Some(self.text(name)).filter(|v| !v.is_empty())
    }

    pub fn id(&self, name: &str) -> Result<DbId, CoreError> {
        self.optional_id(name)?
            .ok_or_else(|| CoreError::Validation(format!("{name}: a selection is required")))
    }

    pub fn optional_id(&self, name: &str) -> Result<Option<DbId>, CoreError> {
        parse_field(name, self.get(name))
    }

    /// Every non-blank id submitted under `name`.
    pub fn ids(&self, name: &str) -> Result<Vec<DbId>, CoreError> {
        self.all(name)
            .into_iter()
            .filter_map(|raw| parse_field(name, raw).transpose())
            .collect()
    }

    pub fn date(&self, name: &str) -> Result<NaiveDate, CoreError> {
        self.optional_date(name)?
            .ok_or_else(|| CoreError::Validation(format!("{name}: a date is required")))
    }

    pub fn optional_date(&self, name: &str) -> Result<Option<NaiveDate>, CoreError> {
        parse_field(name, self.get(name))
    }

    /// Finite number, `None` when blank.
    pub fn optional_number(&self, name: &str) -> Result<Option<f64>, CoreError> {
        match parse_field::<f64>(name, self.get(name))? {
            Some(n) if !n.is_finite() => Err(CoreError::Validation(format!(
                "{name}: '{}' is not a number",
                self.text(name)
            ))),
            other => Ok(other),
        }
    }

    pub fn amount(&self, name: &str) -> Result<Cents, CoreError> {
        let raw = self.get(name);
        if raw.trim().is_empty() {
            return Err(CoreError::Validation(format!("{name}: an amount is required")));
        }
        parse_amount(raw)
    }

    pub fn optional_amount(&self, name: &str) -> Result<Option<Cents>, CoreError> {
        parse_optional_amount(self.get(name))
    }

    /// First value per field, for echoing a failed submission back into
    /// its form.
    pub fn values(&self) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        for (key, value) in &self.0 {
            values.entry(key.clone()).or_insert_with(|| value.clone());
        }
        values
    }
}

fn parse_field<T: std::str::FromStr>(name: &str, raw: &str) -> Result<Option<T>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| CoreError::Validation(format!("{name}: '{raw}' is not valid")))
}

/// Builder for the `values` map a form template reads its inputs from.
#[derive(Debug, Default)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: impl ToString) -> Self {
        self.0.insert(name.to_string(), value.to_string());
        self
    }

    pub fn set_opt<T: ToString>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.set(name, value),
            None => self,
        }
    }

    /// Money as editable decimal text.
    pub fn set_amount(self, name: &str, cents: Option<Cents>) -> Self {
        self.set_opt(name, cents.map(format_cents))
    }

    pub fn build(self) -> BTreeMap<String, String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn repeated_keys_are_kept() {
        let form = fields(&[("member_ids", "3"), ("member_ids", ""), ("member_ids", "7")]);
        assert_eq!(form.ids("member_ids").unwrap(), vec![3, 7]);
        assert_eq!(form.values()["member_ids"], "3");
    }

    #[test]
    fn blanks_are_none_and_garbage_is_a_validation_error() {
        let form = fields(&[("crew_id", " "), ("client_id", "abc"), ("hours", "2.5")]);
        assert_eq!(form.optional_id("crew_id").unwrap(), None);
        assert_matches!(form.id("client_id"), Err(CoreError::Validation(_)));
        assert_matches!(form.id("missing"), Err(CoreError::Validation(_)));
        assert_eq!(form.optional_number("hours").unwrap(), Some(2.5));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let form = fields(&[("a", "NaN"), ("b", "inf"), ("c", "-infinity")]);
        for name in ["a", "b", "c"] {
            assert_matches!(form.optional_number(name), Err(CoreError::Validation(_)));
        }
    }

    #[test]
    fn amounts_and_dates() {
        let form = fields(&[("total", "$1,250.50"), ("paid_on", "2026-10-16"), ("cost", "")]);
        assert_eq!(form.amount("total").unwrap(), 125_050);
        assert_eq!(form.optional_amount("cost").unwrap(), None);
        assert_matches!(form.amount("cost"), Err(CoreError::Validation(_)));
        assert_eq!(
            form.date("paid_on").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
        );
    }

    #[test]
    fn form_values_format_money() {
        let values = FormValues::new()
            .set("name", "Hartley")
            .set_amount("estimated_cost", Some(50_000))
            .set_opt::<String>("phone", None)
            .build();
        assert_eq!(values["estimated_cost"], "500.00");
        assert!(!values.contains_key("phone"));
    }
}
