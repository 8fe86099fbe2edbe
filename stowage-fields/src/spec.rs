//! Field declarations and the validated descriptor set.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use stowage_codec::{FieldType, StoredValue};
use tracing::debug;

use crate::accessor::{FieldAccessor, FieldChange};
use crate::{FieldError, FieldResult, StoreHost};

/// One field declaration, as written by the caller.
///
/// Either a bare type name, in which case the store key defaults to the
/// field name, or a descriptor carrying an explicit `store_key` override.
/// The serde shape matches declaration files: a plain string or an object
/// with `data_type` and optional `store_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldDecl {
    /// Bare type name.
    Type(String),
    /// Full descriptor with a store key override.
    Detailed {
        data_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        store_key: Option<String>,
    },
}

impl FieldDecl {
    /// A bare typed declaration.
    #[must_use]
    pub fn typed(field_type: FieldType) -> Self {
        FieldDecl::Type(field_type.as_str().to_string())
    }

    /// A declaration with an explicit store key.
    #[must_use]
    pub fn with_store_key(field_type: FieldType, store_key: impl Into<String>) -> Self {
        FieldDecl::Detailed {
            data_type: field_type.as_str().to_string(),
            store_key: Some(store_key.into()),
        }
    }

    /// The declared type name, unvalidated.
    #[must_use]
    pub fn data_type(&self) -> &str {
        match self {
            FieldDecl::Type(data_type) => data_type,
            FieldDecl::Detailed { data_type, .. } => data_type,
        }
    }

    /// The declared store key override, if any.
    #[must_use]
    pub fn store_key(&self) -> Option<&str> {
        match self {
            FieldDecl::Type(_) => None,
            FieldDecl::Detailed { store_key, .. } => store_key.as_deref(),
        }
    }
}

/// A resolved field descriptor: name, store key, and type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    store_key: String,
    field_type: FieldType,
}

impl FieldSpec {
    /// The field name accessors and scopes are named after.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The key this field occupies in the backing map.
    #[must_use]
    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    /// The declared field type.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }
}

/// An immutable set of field descriptors sharing one backing attribute.
///
/// Built once per record type via [`FieldSet::declare`]; every validation
/// failure surfaces there, so a constructed set is safe to share and read
/// from concurrently.
#[derive(Debug, Clone)]
pub struct FieldSet {
    attribute: String,
    specs: Vec<FieldSpec>,
    metadata: BTreeMap<String, FieldDecl>,
}

impl FieldSet {
    /// Validates `declarations` and builds the descriptor set.
    ///
    /// Rejects unknown type names, names and attributes that are not
    /// identifier-shaped, duplicate field names, empty store keys, store
    /// keys containing a double quote, and store keys claimed by two
    /// fields. Declaration order is preserved in [`specs`](Self::specs).
    pub fn declare<S, I>(attribute: impl Into<String>, declarations: I) -> FieldResult<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, FieldDecl)>,
    {
        let attribute = attribute.into();
        validate_identifier("attribute", &attribute)?;

        let mut specs: Vec<FieldSpec> = Vec::new();
        let mut metadata = BTreeMap::new();
        let mut store_keys = HashSet::new();

        for (name, decl) in declarations {
            let name = name.into();
            validate_identifier("field", &name)?;
            if metadata.contains_key(&name) {
                return Err(FieldError::InvalidDeclaration(format!(
                    "duplicate field {name:?}"
                )));
            }
            let field_type: FieldType = decl.data_type().parse()?;
            let store_key = decl.store_key().unwrap_or(&name).to_string();
            if store_key.is_empty() {
                return Err(FieldError::InvalidDeclaration(format!(
                    "field {name:?} has an empty store key"
                )));
            }
            // SQLite JSON paths cannot address a label containing a double
            // quote; such a key would be invisible to every generated scope.
            if store_key.contains('"') {
                return Err(FieldError::InvalidDeclaration(format!(
                    "store key {store_key:?} contains a double quote"
                )));
            }
            if !store_keys.insert(store_key.clone()) {
                return Err(FieldError::InvalidDeclaration(format!(
                    "store key {store_key:?} is declared twice"
                )));
            }
            specs.push(FieldSpec {
                name: name.clone(),
                store_key,
                field_type,
            });
            metadata.insert(name, decl);
        }

        debug!("declared {} fields under {attribute}", specs.len());
        Ok(FieldSet {
            attribute,
            specs,
            metadata,
        })
    }

    /// The backing attribute all fields of this set live under.
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Every descriptor, in declaration order.
    #[must_use]
    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    /// The descriptor for `name`, if declared.
    #[must_use]
    pub fn spec(&self, name: &str) -> Option<&FieldSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Field names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|spec| spec.name.as_str())
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// True when no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// The declarations as written, keyed by field name.
    ///
    /// This is the introspection view: callers get back exactly what they
    /// declared (bare type names stay bare), not the resolved descriptors.
    #[must_use]
    pub fn metadata(&self) -> &BTreeMap<String, FieldDecl> {
        &self.metadata
    }

    /// A typed accessor for the named field.
    pub fn accessor(&self, name: &str) -> FieldResult<FieldAccessor<'_>> {
        self.specs
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| FieldAccessor::new(&self.attribute, spec))
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))
    }

    // ── name-dispatched convenience forms ──

    /// Reads the named field's value.
    pub fn get<R: StoreHost>(&self, record: &R, name: &str) -> FieldResult<Option<StoredValue>> {
        Ok(self.accessor(name)?.get(record))
    }

    /// Writes the named field.
    pub fn set<R: StoreHost>(
        &self,
        record: &mut R,
        name: &str,
        raw: impl Into<StoredValue>,
    ) -> FieldResult<()> {
        self.accessor(name)?.set(record, raw)
    }

    /// Removes the named field from the map.
    pub fn clear<R: StoreHost>(&self, record: &mut R, name: &str) -> FieldResult<()> {
        self.accessor(name)?.clear(record);
        Ok(())
    }

    /// True when the named field holds a non-blank value.
    pub fn is_present<R: StoreHost>(&self, record: &R, name: &str) -> FieldResult<bool> {
        Ok(self.accessor(name)?.is_present(record))
    }

    /// True when the named field differs across the pending change pair.
    pub fn is_changed<R: StoreHost>(&self, record: &R, name: &str) -> FieldResult<bool> {
        Ok(self.accessor(name)?.is_changed(record))
    }

    /// The named field's value before the pending change.
    pub fn previous_value<R: StoreHost>(
        &self,
        record: &R,
        name: &str,
    ) -> FieldResult<Option<StoredValue>> {
        Ok(self.accessor(name)?.previous_value(record))
    }

    /// The named field's pending old/new pair.
    pub fn change<R: StoreHost>(&self, record: &R, name: &str) -> FieldResult<Option<FieldChange>> {
        Ok(self.accessor(name)?.change(record))
    }

    /// Rewinds the named field to its pre-change value.
    pub fn restore<R: StoreHost>(&self, record: &mut R, name: &str) -> FieldResult<()> {
        self.accessor(name)?.restore(record);
        Ok(())
    }

    /// Forces the pre-mutation notification for the backing attribute.
    pub fn mark_changed<R: StoreHost>(&self, record: &mut R, name: &str) -> FieldResult<()> {
        self.accessor(name)?.mark_changed(record);
        Ok(())
    }
}

fn validate_identifier(kind: &str, name: &str) -> FieldResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(FieldError::InvalidDeclaration(format!(
            "{kind} name {name:?} is not a valid identifier"
        )))
    }
}
