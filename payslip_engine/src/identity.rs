//! Display identity resolution.
//!
//! A payslip is printed under a letterhead that belongs either to a
//! client or to the issuing organization.  [`resolve_identity`] picks
//! which one, and [`DisplayIdentity`] gives uniform access to the
//! fields the two shapes share.

use crate::models::{Client, Organization, PayslipDocument, PayslipRecord};
use serde::Serialize;

/// The entity whose details head a payslip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayIdentity<'a> {
    Client(&'a Client),
    Organization(&'a Organization),
    /// Nothing to show; every field reads as blank.
    Placeholder,
}

/// Picks the display identity for `record`: its own client, else the
/// document's client, else the organization, else a blank placeholder.
pub fn resolve_identity<'a>(
    document: &'a PayslipDocument,
    record: &'a PayslipRecord,
) -> DisplayIdentity<'a> {
    resolve_identity_with(document, record, None)
}

/// Like [`resolve_identity`], with a caller-chosen client (typically
/// picked from a client directory) consulted after the document's own
/// client and before the organization.
pub fn resolve_identity_with<'a>(
    document: &'a PayslipDocument,
    record: &'a PayslipRecord,
    selected: Option<&'a Client>,
) -> DisplayIdentity<'a> {
    if let Some(client) = record
        .client
        .as_ref()
        .or(document.client.as_ref())
        .or(selected)
    {
        return DisplayIdentity::Client(client);
    }
    match &document.organization {
        Some(organization) => DisplayIdentity::Organization(organization),
        None => DisplayIdentity::Placeholder,
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

impl<'a> DisplayIdentity<'a> {
    pub fn kind(&self) -> IdentityKind {
        match *self {
            DisplayIdentity::Client(_) => IdentityKind::Client,
            DisplayIdentity::Organization(_) => IdentityKind::Organization,
            DisplayIdentity::Placeholder => IdentityKind::None,
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            DisplayIdentity::Client(c) => &c.name,
            DisplayIdentity::Organization(o) => &o.name,
            DisplayIdentity::Placeholder => "",
        }
    }

    pub fn address(&self) -> &'a str {
        match *self {
            DisplayIdentity::Client(c) => text(&c.address),
            DisplayIdentity::Organization(o) => &o.address,
            DisplayIdentity::Placeholder => "",
        }
    }

    pub fn city(&self) -> &'a str {
        match *self {
            DisplayIdentity::Client(c) => text(&c.city),
            DisplayIdentity::Organization(o) => text(&o.city),
            DisplayIdentity::Placeholder => "",
        }
    }

    pub fn state(&self) -> &'a str {
        match *self {
            DisplayIdentity::Client(c) => text(&c.state),
            DisplayIdentity::Organization(o) => text(&o.state),
            DisplayIdentity::Placeholder => "",
        }
    }

    pub fn postal_code(&self) -> &'a str {
        match *self {
            DisplayIdentity::Client(c) => text(&c.zip_code),
            DisplayIdentity::Organization(o) => text(&o.zip_code),
            DisplayIdentity::Placeholder => "",
        }
    }

    pub fn country(&self) -> &'a str {
        match *self {
            DisplayIdentity::Client(c) => text(&c.country),
            DisplayIdentity::Organization(o) => text(&o.country),
            DisplayIdentity::Placeholder => "",
        }
    }

    pub fn phone(&self) -> &'a str {
        match *self {
            DisplayIdentity::Client(c) => text(&c.contact_phone),
            DisplayIdentity::Organization(o) => text(&o.phone),
            DisplayIdentity::Placeholder => "",
        }
    }

    /// Organizations carry `email`; clients carry `contact_email`.
    pub fn email(&self) -> &'a str {
        match *self {
            DisplayIdentity::Client(c) => text(&c.contact_email),
            DisplayIdentity::Organization(o) => text(&o.email),
            DisplayIdentity::Placeholder => "",
        }
    }

    pub fn website(&self) -> &'a str {
        match *self {
            DisplayIdentity::Client(c) => text(&c.website),
            DisplayIdentity::Organization(o) => text(&o.website),
            DisplayIdentity::Placeholder => "",
        }
    }

    pub fn logo(&self) -> &'a str {
        match *self {
            DisplayIdentity::Client(c) => text(&c.logo),
            DisplayIdentity::Organization(o) => text(&o.logo),
            DisplayIdentity::Placeholder => "",
        }
    }

    /// Owned snapshot for export.
    pub fn to_view(&self) -> IdentityView {
        let (header, footer, signature) = match self {
            DisplayIdentity::Client(c) => (c.header.clone(), c.footer.clone(), c.signature.clone()),
            _ => (None, None, None),
        };
        IdentityView {
            kind: self.kind(),
            name: self.name().to_string(),
            address: self.address().to_string(),
            city: self.city().to_string(),
            state: self.state().to_string(),
            postal_code: self.postal_code().to_string(),
            country: self.country().to_string(),
            phone: self.phone().to_string(),
            email: self.email().to_string(),
            website: self.website().to_string(),
            logo: self.logo().to_string(),
            header,
            footer,
            signature,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityKind {
    Client,
    Organization,
    None,
}

/// Owned copy of a [`DisplayIdentity`] with blanks filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentityView {
    pub kind: IdentityKind,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub logo: String,
    /// Client letterhead assets; always `None` for organizations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}
