//! Stored profile overlays.
//!
//! Organizations keep their letterhead details in settings, and the
//! client directory keeps each client's contact details and branding.
//! [`apply_profiles`] copies those stored details onto a payslip
//! document before it is validated, so a template document picks up
//! the caller's own organization and selected client.
//!
//! Client branding lives partly on the directory entry itself and
//! partly in uploaded assets; [`resolve_assets`] folds the two together
//! before the client is overlaid.

use crate::error::ValidationError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Organization settings as stored by the settings page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrganizationProfile {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    /// Public URL of the uploaded logo.
    pub logo_url: Option<String>,
    pub tax_id: Option<String>,
}

/// Kind of an uploaded client asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Logo,
    Header,
    Footer,
    Signature,
}

/// An asset uploaded for a client.  Only assets whose `url` is a
/// string are used for branding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientAsset {
    #[serde(rename = "type")]
    pub kind: AssetKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Value,
}

/// A client directory entry.  Uploaded `assets` fill any branding
/// field the entry leaves empty; see [`resolve_assets`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClientProfile {
    pub id: Option<String>,
    pub name: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    #[serde(rename = "zipCode")]
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub signature: Option<String>,
    #[serde(default)]
    pub assets: Vec<ClientAsset>,
}

impl OrganizationProfile {
    /// (document field, profile value) pairs.
    fn fields(&self) -> [(&'static str, &Option<String>); 11] {
        [
            ("name", &self.name),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zipCode", &self.postal_code),
            ("country", &self.country),
            ("phone", &self.phone),
            ("email", &self.email),
            ("website", &self.website),
            ("logo", &self.logo_url),
            ("taxId", &self.tax_id),
        ]
    }
}

impl ClientProfile {
    fn fields(&self) -> [(&'static str, &Option<String>); 15] {
        [
            ("id", &self.id),
            ("name", &self.name),
            ("contact_name", &self.contact_name),
            ("contact_email", &self.contact_email),
            ("contact_phone", &self.contact_phone),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zipCode", &self.postal_code),
            ("country", &self.country),
            ("website", &self.website),
            ("logo", &self.logo),
            ("header", &self.header),
            ("footer", &self.footer),
            ("signature", &self.signature),
        ]
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}

/// Returns `profile` with each empty branding field taken from the
/// first asset of that kind carrying a string url, and `postal_code`
/// falling back to `zipCode`.  Fields the profile already has win.
pub fn resolve_assets(profile: &ClientProfile, assets: &[ClientAsset]) -> ClientProfile {
    let mut resolved = profile.clone();
    for asset in assets {
        let Value::String(url) = &asset.url else {
            continue;
        };
        let slot = match asset.kind {
            AssetKind::Logo => &mut resolved.logo,
            AssetKind::Header => &mut resolved.header,
            AssetKind::Footer => &mut resolved.footer,
            AssetKind::Signature => &mut resolved.signature,
        };
        if is_blank(slot) {
            *slot = Some(url.clone());
        }
    }
    if is_blank(&resolved.postal_code) {
        resolved.postal_code = resolved.zip_code.clone();
    }
    resolved
}

/// Overlays the given profiles onto the document text and returns the
/// result pretty-printed.  Each non-empty profile field replaces the
/// matching document field; the `organization` or `client` block is
/// created when missing.  The output is not validated.
pub fn apply_profiles(
    raw: &str,
    organization: Option<&OrganizationProfile>,
    client: Option<&ClientProfile>,
) -> Result<String, ValidationError> {
    let root: Value = serde_json::from_str(raw)
        .map_err(|err| ValidationError::MalformedInput(err.to_string()))?;
    let mut root = match root {
        Value::Object(map) => map,
        _ => return Err(ValidationError::NotAnObject),
    };
    if let Some(profile) = organization {
        overlay(&mut root, "organization", &profile.fields());
    }
    if let Some(profile) = client {
        let resolved = resolve_assets(profile, &profile.assets);
        overlay(&mut root, "client", &resolved.fields());
    }
    serde_json::to_string_pretty(&Value::Object(root))
        .map_err(|err| ValidationError::MalformedInput(err.to_string()))
}

fn overlay(root: &mut Map<String, Value>, key: &str, fields: &[(&'static str, &Option<String>)]) {
    let block = root
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !block.is_object() {
        *block = Value::Object(Map::new());
    }
    let Some(block) = block.as_object_mut() else {
        return;
    };
    for (field, value) in fields {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            block.insert(field.to_string(), Value::String(value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;
    use serde_json::json;

    #[test]
    fn organization_profile_fills_and_overrides() {
        let raw = json!({
            "organization": {"name": "Template Co", "address": "1 Template Way", "phone": "555"},
            "payslips": []
        })
        .to_string();
        let profile = OrganizationProfile {
            name: Some("Acme".into()),
            postal_code: Some("560001".into()),
            logo_url: Some("https://cdn.test/acme.png".into()),
            email: Some(String::new()),
            ..Default::default()
        };
        let merged = apply_profiles(&raw, Some(&profile), None).unwrap();
        let document = validate(&merged).unwrap();
        let organization = document.organization.unwrap();
        assert_eq!(organization.name, "Acme");
        assert_eq!(organization.address, "1 Template Way");
        assert_eq!(organization.zip_code.as_deref(), Some("560001"));
        assert_eq!(organization.logo.as_deref(), Some("https://cdn.test/acme.png"));
        assert_eq!(organization.phone.as_deref(), Some("555"));
        assert!(organization.email.is_none());
    }

    #[test]
    fn client_profile_creates_client_block() {
        let raw = json!({"payslips": []}).to_string();
        let profile = ClientProfile {
            id: Some("c-7".into()),
            name: Some("Globex".into()),
            signature: Some("data:image/png;base64,AAAA".into()),
            ..Default::default()
        };
        let merged = apply_profiles(&raw, None, Some(&profile)).unwrap();
        let document = validate(&merged).unwrap();
        let client = document.client.unwrap();
        assert_eq!(client.id, "c-7");
        assert_eq!(client.name, "Globex");
        assert_eq!(client.signature.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    fn asset(kind: AssetKind, url: Value) -> ClientAsset {
        ClientAsset {
            kind,
            name: None,
            url,
        }
    }

    #[test]
    fn own_branding_wins_over_assets() {
        let profile = ClientProfile {
            logo: Some("https://cdn.test/own.png".into()),
            header: Some(String::new()),
            ..Default::default()
        };
        let resolved = resolve_assets(
            &profile,
            &[
                asset(AssetKind::Logo, json!("https://cdn.test/asset.png")),
                asset(AssetKind::Header, json!("https://cdn.test/header.png")),
            ],
        );
        assert_eq!(resolved.logo.as_deref(), Some("https://cdn.test/own.png"));
        assert_eq!(resolved.header.as_deref(), Some("https://cdn.test/header.png"));
        assert!(resolved.footer.is_none());
    }

    #[test]
    fn first_asset_of_a_kind_wins() {
        let resolved = resolve_assets(
            &ClientProfile::default(),
            &[
                asset(AssetKind::Signature, json!("https://cdn.test/newest.png")),
                asset(AssetKind::Signature, json!("https://cdn.test/older.png")),
            ],
        );
        assert_eq!(resolved.signature.as_deref(), Some("https://cdn.test/newest.png"));
    }

    #[test]
    fn assets_without_a_string_url_are_skipped() {
        let resolved = resolve_assets(
            &ClientProfile::default(),
            &[
                asset(AssetKind::Footer, Value::Null),
                asset(AssetKind::Footer, json!({"path": "footer.png"})),
                asset(AssetKind::Footer, json!("https://cdn.test/footer.png")),
                asset(AssetKind::Logo, json!(42)),
            ],
        );
        assert_eq!(resolved.footer.as_deref(), Some("https://cdn.test/footer.png"));
        assert!(resolved.logo.is_none());
    }

    #[test]
    fn overlay_resolves_client_assets_and_zip_code() {
        let raw = json!({"payslips": []}).to_string();
        let profile: ClientProfile = serde_json::from_value(json!({
            "id": "c-3",
            "name": "Initech",
            "zipCode": "94016",
            "assets": [
                {"type": "logo", "name": "logo.png", "url": "https://cdn.test/initech.png"},
                {"type": "header", "name": "header.png"}
            ]
        }))
        .unwrap();
        let merged = apply_profiles(&raw, None, Some(&profile)).unwrap();
        let client = validate(&merged).unwrap().client.unwrap();
        assert_eq!(client.logo.as_deref(), Some("https://cdn.test/initech.png"));
        assert_eq!(client.zip_code.as_deref(), Some("94016"));
        assert!(client.header.is_none());
    }

    #[test]
    fn non_object_blocks_are_replaced() {
        let raw = json!({"client": "nobody", "payslips": []}).to_string();
        let profile = ClientProfile {
            name: Some("Globex".into()),
            ..Default::default()
        };
        let merged: Value = serde_json::from_str(
            &apply_profiles(&raw, None, Some(&profile)).unwrap(),
        )
        .unwrap();
        assert_eq!(merged["client"], json!({"name": "Globex"}));
    }

    #[test]
    fn input_must_be_an_object() {
        assert_eq!(
            apply_profiles("[]", Some(&OrganizationProfile::default()), None),
            Err(ValidationError::NotAnObject)
        );
        assert!(matches!(
            apply_profiles("nope", None, None),
            Err(ValidationError::MalformedInput(_))
        ));
    }
}
