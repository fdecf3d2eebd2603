//! Data models for the Payslip Engine.
//!
//! The `models` module defines the serialisable structs and enums
//! that make up a payslip document: the issuing organization, the
//! client the payslips are produced for, employees and their salary
//! components.  Field names on the wire follow the document format
//! users paste into the editor, which is why most structs rename to
//! camelCase while client contact fields stay snake_case.
//!
//! These types are only ever built from a document that has already
//! passed the shape checks in [`crate::validate`], so required fields
//! are plain `String`s and optional ones are `Option<String>`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The root of a payslip document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayslipDocument {
    /// Issuing organization.  Used as the display identity when no
    /// client is available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<Organization>,
    /// Document-wide client, the fallback for payslips that carry no
    /// client of their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
    /// The payslips contained in this document, in input order.
    pub payslips: Vec<PayslipRecord>,
}

/// The organization issuing the payslips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(default, deserialize_with = "loose_text")]
    pub name: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub address: String,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(
        default,
        alias = "postal_code",
        deserialize_with = "loose_text_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub zip_code: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Logo as a URL or inline data URI.
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(
        default,
        alias = "tax_id",
        deserialize_with = "loose_text_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_id: Option<String>,
}

/// A client of the organization.  Payslips may be produced on a
/// client's letterhead, so a client carries its own branding assets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Always populated after validation; generated when absent.
    #[serde(default, deserialize_with = "loose_text")]
    pub id: String,
    /// Always populated after validation; `"Client <id>"` when absent.
    #[serde(default, deserialize_with = "loose_text")]
    pub name: String,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(
        default,
        rename = "zipCode",
        alias = "postal_code",
        deserialize_with = "loose_text_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub zip_code: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Branding assets.  Each is either a URL or inline content such
    /// as a data URI.
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Arbitrary custom key/value pairs attached to the client.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

/// An employee receiving a payslip.  Only `id` and `name` are
/// checked; everything else is informational.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(deserialize_with = "loose_text")]
    pub id: String,
    #[serde(deserialize_with = "loose_text")]
    pub name: String,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<String>,
    #[serde(default, deserialize_with = "loose_text_opt", skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<String>,
    /// Personal tax identifier (PAN or similar).
    #[serde(
        default,
        alias = "taxId",
        deserialize_with = "loose_text_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub pan_number: Option<String>,
}

/// Classifies a salary component.  Aggregation is driven entirely by
/// this tag; the order of components carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Earning,
    Deduction,
}

/// A single line on a payslip, such as basic pay or income tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryComponent {
    #[serde(default, deserialize_with = "loose_text")]
    pub name: String,
    /// Monetary value.  Negative amounts are allowed and are summed
    /// as-is within their kind.
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
}

/// Inclusive date range a payslip covers.  Dates are kept as the
/// strings the user supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayPeriod {
    #[serde(default, deserialize_with = "loose_text")]
    pub from: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub to: String,
}

/// One payslip within a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipRecord {
    #[serde(default, deserialize_with = "loose_text")]
    pub payslip_number: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub month: String,
    /// Accepted as a number or a string and kept as text.
    #[serde(default, deserialize_with = "loose_text")]
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_period: Option<PayPeriod>,
    pub employee: Employee,
    pub salary_components: Vec<SalaryComponent>,
    #[serde(default, deserialize_with = "loose_text")]
    pub currency: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub currency_symbol: String,
    /// Net pay as written in the document.  Display only; the engine
    /// always derives net pay from the components, so anything other
    /// than a JSON number (e.g. `"33,800.00"`) is dropped, not rejected.
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub net_pay: Option<f64>,
    /// Client override for this payslip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
}

impl PayslipRecord {
    /// Label used when choosing between payslips of one document,
    /// e.g. `"Jane Doe - March 2024"`.
    pub fn selector_label(&self) -> String {
        format!("{} - {} {}", self.employee.name, self.month, self.year)
    }
}

/// Renders a scalar JSON value as text.  Ids and years are often
/// written as numbers, so numbers and booleans are accepted as well.
fn scalar_text<E: serde::de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Number(number) => Ok(Some(number_text(&number))),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        Value::Array(_) => Err(E::custom("expected text, found an array")),
        Value::Object(_) => Err(E::custom("expected text, found an object")),
    }
}

/// Whole numbers are written without a fraction even when the
/// document spelled them as floats (`2024.0`, `1e3`).
fn number_text(number: &serde_json::Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() && value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", value as i64)
        }
        _ => number.to_string(),
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

fn loose_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text::<D::Error>(value)?.unwrap_or_default())
}

fn loose_text_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_text(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_ids_and_years_are_kept_as_text() {
        let record: PayslipRecord = serde_json::from_value(json!({
            "payslipNumber": 17,
            "month": "March",
            "year": 2024,
            "employee": {"id": 42, "name": "Jane Doe"},
            "salaryComponents": []
        }))
        .unwrap();
        assert_eq!(record.employee.id, "42");
        assert_eq!(record.year, "2024");
        assert_eq!(record.payslip_number, "17");
        assert_eq!(record.selector_label(), "Jane Doe - March 2024");
    }

    #[test]
    fn whole_number_floats_drop_their_fraction() {
        let record: PayslipRecord = serde_json::from_value(json!({
            "month": "March",
            "year": 2024.0,
            "employee": {"id": 1e3, "name": "Jane Doe", "bankAccount": 1.5},
            "salaryComponents": []
        }))
        .unwrap();
        assert_eq!(record.year, "2024");
        assert_eq!(record.employee.id, "1000");
        assert_eq!(record.employee.bank_account.as_deref(), Some("1.5"));
        assert_eq!(record.selector_label(), "Jane Doe - March 2024");
    }

    #[test]
    fn client_accepts_postal_code_alias_and_metadata() {
        let client: Client = serde_json::from_value(json!({
            "id": "c-1",
            "name": "Globex",
            "postal_code": "10001",
            "contact_email": "ops@globex.test",
            "metadata": {"cost_center": "CC-9"}
        }))
        .unwrap();
        assert_eq!(client.zip_code.as_deref(), Some("10001"));
        assert_eq!(client.contact_email.as_deref(), Some("ops@globex.test"));
        assert_eq!(client.metadata.get("cost_center").map(String::as_str), Some("CC-9"));

        let encoded = serde_json::to_value(&client).unwrap();
        assert_eq!(encoded["zipCode"], "10001");
    }

    #[test]
    fn unknown_component_type_is_rejected() {
        let parsed = serde_json::from_value::<SalaryComponent>(json!({
            "name": "Bonus",
            "amount": 10,
            "type": "bonus"
        }));
        assert!(parsed.is_err());
    }
}
