//! Document validation and normalization.
//!
//! [`validate`] turns the raw text of a payslip document into a typed
//! [`PayslipDocument`].  It runs in two passes over a freshly parsed
//! working copy:
//!
//! 1. a shape pass over the untyped JSON that checks the structural
//!    rules and fills in missing client ids and names, and
//! 2. a schema pass that decodes the normalized copy into the typed
//!    model, catching fields of the wrong type.
//!
//! The working copy belongs to the call, so a failure at any step
//! leaves nothing partially normalized behind.

use crate::error::ValidationError;
use crate::ids::{ClientIdGenerator, ClientScope, UuidClientIds};
use crate::models::{Client, Organization, PayslipDocument, PayslipRecord};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

const PAYSLIPS: &str = "payslips";
const ORGANIZATION: &str = "organization";
const CLIENT: &str = "client";
const EMPLOYEE: &str = "employee";
const SALARY_COMPONENTS: &str = "salaryComponents";

/// Validates and normalizes a payslip document using random client
/// ids.  See [`validate_with`].
pub fn validate(raw: &str) -> Result<PayslipDocument, ValidationError> {
    validate_with(raw, &UuidClientIds)
}

/// Validates and normalizes a payslip document, drawing generated
/// client ids from `ids`.
pub fn validate_with(
    raw: &str,
    ids: &dyn ClientIdGenerator,
) -> Result<PayslipDocument, ValidationError> {
    let result = normalize(raw, ids).and_then(decode);
    if let Err(err) = &result {
        debug!("payslip document rejected: {}", err);
    }
    result
}

/// Pretty-prints `raw` with two-space indentation without checking it
/// against the payslip rules.
pub fn format_json(raw: &str) -> Result<String, ValidationError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| ValidationError::MalformedInput(err.to_string()))?;
    serde_json::to_string_pretty(&value)
        .map_err(|err| ValidationError::MalformedInput(err.to_string()))
}

/// JavaScript-style truthiness, which is how the document format
/// decides whether an optional block or field is "present".
pub(crate) fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().map_or(true, |n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Shape pass.  Returns the root object with client ids and names
/// filled in and absent optional blocks removed.
fn normalize(raw: &str, ids: &dyn ClientIdGenerator) -> Result<Map<String, Value>, ValidationError> {
    let root: Value = serde_json::from_str(raw)
        .map_err(|err| ValidationError::MalformedInput(err.to_string()))?;
    let mut root = match root {
        Value::Object(map) => map,
        _ => return Err(ValidationError::NotAnObject),
    };

    let entries = match root.get(PAYSLIPS) {
        Some(Value::Array(entries)) => entries,
        _ => return Err(ValidationError::MissingPayslipsArray),
    };

    let has_organization = is_present(root.get(ORGANIZATION));
    let has_document_client = is_present(root.get(CLIENT));
    let has_payslip_client = entries.iter().any(|entry| is_present(entry.get(CLIENT)));
    if !has_organization && !has_document_client && !has_payslip_client {
        return Err(ValidationError::NoIdentitySource);
    }

    if has_organization {
        let organization = &root[ORGANIZATION];
        if !is_present(organization.get("name")) || !is_present(organization.get("address")) {
            return Err(ValidationError::IncompleteOrganization);
        }
    } else {
        root.remove(ORGANIZATION);
    }

    if has_document_client {
        fill_client_identity(&mut root[CLIENT], ClientScope::Document, ids);
    } else {
        root.remove(CLIENT);
    }

    if let Some(Value::Array(entries)) = root.get_mut(PAYSLIPS) {
        for (index, entry) in entries.iter_mut().enumerate() {
            check_entry(entry, index)?;
            let Some(entry) = entry.as_object_mut() else {
                continue;
            };
            if is_present(entry.get(CLIENT)) {
                fill_client_identity(&mut entry[CLIENT], ClientScope::Payslip(index), ids);
            } else {
                entry.remove(CLIENT);
            }
        }
    }

    Ok(root)
}

fn check_entry(entry: &Value, index: usize) -> Result<(), ValidationError> {
    let entry = entry
        .as_object()
        .ok_or(ValidationError::InvalidPayslipEntry(index))?;
    let employee = entry.get(EMPLOYEE);
    let has_components = matches!(entry.get(SALARY_COMPONENTS), Some(Value::Array(_)));
    if !is_present(employee) || !has_components {
        return Err(ValidationError::IncompletePayslip(index));
    }
    let employee = employee.unwrap_or(&Value::Null);
    if !is_present(employee.get("id")) || !is_present(employee.get("name")) {
        return Err(ValidationError::IncompleteEmployee(index));
    }
    Ok(())
}

/// Fills an absent `id` from the generator, then an absent `name`
/// with `"Client <id>"`.  Values already present are never touched.
/// Non-object clients are left for the schema pass to reject.
fn fill_client_identity(client: &mut Value, scope: ClientScope, ids: &dyn ClientIdGenerator) {
    let Some(client) = client.as_object_mut() else {
        return;
    };
    if !is_present(client.get("id")) {
        let id = ids.generate(scope);
        info!("generated client id {} for {:?} client", id, scope);
        client.insert("id".to_string(), Value::String(id));
    }
    if !is_present(client.get("name")) {
        let id = match &client["id"] {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        let name = format!("Client {}", id);
        info!("generated client name {:?} for {:?} client", name, scope);
        client.insert("name".to_string(), Value::String(name));
    }
}

/// Schema pass.  Decodes each block separately so errors can say
/// where the offending field lives.
fn decode(mut root: Map<String, Value>) -> Result<PayslipDocument, ValidationError> {
    let organization = root
        .remove(ORGANIZATION)
        .map(|value| decode_part::<Organization>(value, ORGANIZATION.to_string()))
        .transpose()?;
    let client = root
        .remove(CLIENT)
        .map(|value| decode_part::<Client>(value, CLIENT.to_string()))
        .transpose()?;
    let entries = match root.remove(PAYSLIPS) {
        Some(Value::Array(entries)) => entries,
        _ => return Err(ValidationError::MissingPayslipsArray),
    };
    let payslips = entries
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            decode_part::<PayslipRecord>(value, format!("payslip at index {}", index))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PayslipDocument {
        organization,
        client,
        payslips,
    })
}

fn decode_part<T: DeserializeOwned>(value: Value, location: String) -> Result<T, ValidationError> {
    serde_json::from_value(value).map_err(|err| ValidationError::SchemaMismatch {
        location,
        detail: err.to_string(),
    })
}
