//! Per-type scope generation for a declared field set.

use std::collections::BTreeMap;

use stowage_codec::FieldType;
use stowage_fields::{FieldSet, FieldSpec};
use tracing::debug;

use crate::Scope;

/// Where generated scopes land.
///
/// Hosts with their own query layer implement this; [`ScopeSet`] is the
/// standalone fallback.
pub trait ScopeRegistry {
    /// Registers one named scope.
    fn register_scope(&mut self, scope: Scope);
}

/// A name-keyed collecting registry.
#[derive(Debug, Clone, Default)]
pub struct ScopeSet {
    scopes: BTreeMap<String, Scope>,
}

impl ScopeSet {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The scope registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Scope> {
        self.scopes.get(name)
    }

    /// Registered scope names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scopes.keys().map(String::as_str)
    }

    /// All registered scopes, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.values()
    }

    /// Number of registered scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl ScopeRegistry for ScopeSet {
    fn register_scope(&mut self, scope: Scope) {
        self.scopes.insert(scope.name().to_string(), scope);
    }
}

/// Builds every scope for every field of `fields`, in declaration order.
#[must_use]
pub fn build_scopes(fields: &FieldSet) -> Vec<Scope> {
    fields
        .specs()
        .iter()
        .flat_map(|spec| field_scopes(fields.attribute(), spec))
        .collect()
}

/// Builds and registers every scope for `fields`.
pub fn register_scopes(registry: &mut dyn ScopeRegistry, fields: &FieldSet) {
    let scopes = build_scopes(fields);
    debug!(
        "registered {} scopes for attribute {}",
        scopes.len(),
        fields.attribute()
    );
    for scope in scopes {
        registry.register_scope(scope);
    }
}

/// The scope family for one field: equality for strings, a five-way
/// ordering family for numerics, before/eq/after for temporals, is/not
/// for booleans, and whole-value equality for arrays.
fn field_scopes(attribute: &str, spec: &FieldSpec) -> Vec<Scope> {
    let expr = extract_expr(attribute, spec.store_key());
    let name = spec.name();
    let field_type = spec.field_type();
    match field_type {
        FieldType::String => vec![Scope::unary(
            format!("with_{name}"),
            format!("{expr} = ?1"),
            field_type,
        )],
        FieldType::Integer => {
            ordered_scopes(name, &format!("CAST({expr} AS INTEGER)"), "?1", field_type)
        }
        FieldType::Float => {
            ordered_scopes(name, &format!("CAST({expr} AS REAL)"), "?1", field_type)
        }
        // Both sides go through NUMERIC so decimal text compares by
        // value, not lexically.
        FieldType::Decimal => ordered_scopes(
            name,
            &format!("CAST({expr} AS NUMERIC)"),
            "CAST(?1 AS NUMERIC)",
            field_type,
        ),
        FieldType::Time => {
            temporal_scopes(name, &format!("CAST({expr} AS INTEGER)"), field_type)
        }
        FieldType::Date => temporal_scopes(name, &expr, field_type),
        FieldType::Boolean => vec![
            Scope::nullary(format!("is_{name}"), format!("{expr} = 'true'"), field_type),
            Scope::nullary(format!("not_{name}"), format!("{expr} = 'false'"), field_type),
        ],
        FieldType::Array => vec![Scope::unary(
            format!("{name}_eq"),
            format!("{expr} = ?1"),
            field_type,
        )],
    }
}

fn ordered_scopes(name: &str, lhs: &str, rhs: &str, field_type: FieldType) -> Vec<Scope> {
    [("lt", "<"), ("lte", "<="), ("eq", "="), ("gte", ">="), ("gt", ">")]
        .into_iter()
        .map(|(suffix, op)| {
            Scope::unary(
                format!("{name}_{suffix}"),
                format!("{lhs} {op} {rhs}"),
                field_type,
            )
        })
        .collect()
}

fn temporal_scopes(name: &str, lhs: &str, field_type: FieldType) -> Vec<Scope> {
    [("before", "<"), ("eq", "="), ("after", ">")]
        .into_iter()
        .map(|(suffix, op)| {
            Scope::unary(
                format!("{name}_{suffix}"),
                format!("{lhs} {op} ?1"),
                field_type,
            )
        })
        .collect()
}

/// The JSON-path extraction expression for one field's map entry.
///
/// Backslashes are escaped for the JSON path and single quotes doubled
/// for the enclosing SQL literal, so hostile keys cannot break out of
/// the path. Double quotes never reach here: SQLite paths cannot
/// address such a label, and [`FieldSet::declare`] rejects those keys.
fn extract_expr(attribute: &str, store_key: &str) -> String {
    let path_escaped = store_key.replace('\\', "\\\\");
    let sql_escaped = path_escaped.replace('\'', "''");
    format!("json_extract({attribute}, '$.\"{sql_escaped}\"')")
}
