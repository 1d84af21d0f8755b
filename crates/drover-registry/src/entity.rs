use serde::{Deserialize, Serialize};

use drover_types::{BreedId, SellerId};

use crate::canonical::{canonical_display, identity_key};

/// A master-data entity stored once per real-world thing.
///
/// Implementations supply the identity-key function (what makes two raw
/// inputs "the same") and the materialization from raw input to stored
/// row. The generic registry supplies everything else.
pub trait CanonicalEntity: Clone + Send + Sync + 'static {
    /// Raw caller-supplied form of this entity.
    type Raw;

    /// Identity key of raw input. Empty means the input names nothing.
    fn identity_key_of(raw: &Self::Raw) -> String;

    /// Build a stored row from raw input. `peers` is the current table,
    /// for derived fields such as display ordering.
    fn materialize(raw: Self::Raw, peers: &[Self]) -> Self;

    /// Update this row in place from new raw input, keeping its id and
    /// any derived fields the raw input does not override.
    fn rekey(&mut self, raw: Self::Raw);

    /// Identity key of the stored row.
    fn identity_key(&self) -> String;

    /// The canonical display name.
    fn canonical_name(&self) -> &str;
}

/// A cattle breed, with a display ordering for pick lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breed {
    pub id: BreedId,
    pub name: String,
    pub order_index: u32,
}

/// Raw breed input. `order_index` is auto-assigned max+1 when omitted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BreedDraft {
    pub name: String,
    pub order_index: Option<u32>,
}

impl BreedDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order_index: None,
        }
    }
}

impl CanonicalEntity for Breed {
    type Raw = BreedDraft;

    fn identity_key_of(raw: &BreedDraft) -> String {
        identity_key(&raw.name)
    }

    fn materialize(raw: BreedDraft, peers: &[Self]) -> Self {
        let order_index = raw
            .order_index
            .unwrap_or_else(|| peers.iter().map(|b| b.order_index).max().map_or(0, |m| m + 1));
        Self {
            id: BreedId::new(),
            name: canonical_display(&raw.name),
            order_index,
        }
    }

    fn rekey(&mut self, raw: BreedDraft) {
        self.name = canonical_display(&raw.name);
        if let Some(order_index) = raw.order_index {
            self.order_index = order_index;
        }
    }

    fn identity_key(&self) -> String {
        identity_key(&self.name)
    }

    fn canonical_name(&self) -> &str {
        &self.name
    }
}

/// A livestock seller. Identity is the name AND the address tuple: the
/// same name at two addresses is two sellers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub id: SellerId,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// Raw seller input as it arrives from intake sheets.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SellerDraft {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl SellerDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

fn seller_key(name: &str, address: &[&Option<String>]) -> String {
    let mut key = identity_key(name);
    for part in address {
        key.push('|');
        if let Some(part) = part {
            key.push_str(&identity_key(part));
        }
    }
    key
}

impl CanonicalEntity for Seller {
    type Raw = SellerDraft;

    fn identity_key_of(raw: &SellerDraft) -> String {
        // A seller with no usable name is no seller; the address alone
        // never forms an identity.
        if identity_key(&raw.name).is_empty() {
            return String::new();
        }
        seller_key(&raw.name, &[&raw.address, &raw.city, &raw.state, &raw.zip])
    }

    fn materialize(raw: SellerDraft, _peers: &[Self]) -> Self {
        Self {
            id: SellerId::new(),
            name: canonical_display(&raw.name),
            address: raw.address.map(|s| s.trim().to_string()),
            city: raw.city.map(|s| s.trim().to_string()),
            state: raw.state.map(|s| s.trim().to_string()),
            zip: raw.zip.map(|s| s.trim().to_string()),
        }
    }

    fn rekey(&mut self, raw: SellerDraft) {
        self.name = canonical_display(&raw.name);
        self.address = raw.address.map(|s| s.trim().to_string());
        self.city = raw.city.map(|s| s.trim().to_string());
        self.state = raw.state.map(|s| s.trim().to_string());
        self.zip = raw.zip.map(|s| s.trim().to_string());
    }

    fn identity_key(&self) -> String {
        seller_key(
            &self.name,
            &[&self.address, &self.city, &self.state, &self.zip],
        )
    }

    fn canonical_name(&self) -> &str {
        &self.name
    }
}
