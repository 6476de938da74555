// SPDX-FileCopyrightText: 2026 Warden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Item templates for `get_secret_template`.
//!
//! Each template mirrors the JSON that `bw create item` accepts for its item
//! type, with placeholder values to fill in.

use serde_json::{Value, json};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Item types that have a template. Parsing is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum TemplateKind {
    Login,
    Note,
    Card,
    Identity,
}

impl TemplateKind {
    /// Bitwarden's numeric item type.
    pub fn item_type(self) -> u8 {
        match self {
            TemplateKind::Login => 1,
            TemplateKind::Note => 2,
            TemplateKind::Card => 3,
            TemplateKind::Identity => 4,
        }
    }

    pub fn template(self) -> Value {
        match self {
            TemplateKind::Login => json!({
                "name": "Item name",
                "type": self.item_type(),
                "login": {
                    "uris": [{ "match": null, "uri": "https://example.com" }],
                    "username": "username",
                    "password": "password"
                }
            }),
            TemplateKind::Note => json!({
                "name": "Note name",
                "type": self.item_type(),
                "secureNote": { "type": 0 },
                "notes": "Note content."
            }),
            TemplateKind::Card => json!({
                "name": "Card name",
                "type": self.item_type(),
                "card": {
                    "cardholderName": "",
                    "brand": "",
                    "number": "",
                    "expMonth": "",
                    "expYear": "",
                    "code": ""
                }
            }),
            TemplateKind::Identity => json!({
                "name": "Identity name",
                "type": self.item_type(),
                "identity": {
                    "title": "",
                    "firstName": "",
                    "middleName": "",
                    "lastName": "",
                    "address1": "",
                    "city": "",
                    "state": "",
                    "postalCode": "",
                    "country": "",
                    "company": "",
                    "email": "",
                    "phone": ""
                }
            }),
        }
    }
}
