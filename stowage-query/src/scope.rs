//! Named predicates and argument binding.

use stowage_codec::{FieldType, StoredValue, cast, serialize};

use crate::{QueryError, QueryResult};

/// A bound predicate: a SQL fragment plus its positional parameters.
///
/// The fragment is self-contained boolean SQL, ready to drop into a
/// `WHERE` clause; parameters are numbered from `?1`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFragment {
    pub sql: String,
    pub params: Vec<StoredValue>,
}

/// A named query predicate generated for one stowed field.
///
/// Scopes are nullary (boolean fields encode the comparison in the SQL)
/// or unary (one caller argument bound as `?1`).
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    name: String,
    sql: String,
    field_type: FieldType,
    takes_value: bool,
}

impl Scope {
    pub(crate) fn nullary(name: String, sql: String, field_type: FieldType) -> Self {
        Scope {
            name,
            sql,
            field_type,
            takes_value: false,
        }
    }

    pub(crate) fn unary(name: String, sql: String, field_type: FieldType) -> Self {
        Scope {
            name,
            sql,
            field_type,
            takes_value: true,
        }
    }

    /// The scope's name, derived from the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw SQL fragment, with `?1` where the argument binds.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Number of arguments the scope takes: 0 or 1.
    #[must_use]
    pub fn arity(&self) -> usize {
        usize::from(self.takes_value)
    }

    /// The declared type of the underlying field.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Binds `args` into an executable fragment.
    ///
    /// A unary scope casts its argument under the field's type, so a
    /// scope accepts the same raw inputs a setter does, and compares the
    /// canonical form. Argument count mismatches fail with
    /// [`QueryError::WrongArity`].
    pub fn fragment(&self, args: &[StoredValue]) -> QueryResult<QueryFragment> {
        if args.len() != self.arity() {
            return Err(QueryError::WrongArity {
                scope: self.name.clone(),
                expected: self.arity(),
                given: args.len(),
            });
        }
        let params = match args.first() {
            None => Vec::new(),
            Some(arg) => vec![param_value(self.field_type, arg.clone())?],
        };
        Ok(QueryFragment {
            sql: self.sql.clone(),
            params,
        })
    }
}

/// Converts a casted argument into the parameter form the generated SQL
/// compares against: native numbers for integer and float comparisons,
/// epoch seconds for times, stored text for everything else.
fn param_value(field_type: FieldType, raw: StoredValue) -> QueryResult<StoredValue> {
    let casted = cast(field_type, raw)?;
    Ok(match casted {
        StoredValue::Integer(_) | StoredValue::Float(_) => casted,
        StoredValue::Time(t) => StoredValue::Integer(t.timestamp()),
        other => StoredValue::Text(serialize(&other)),
    })
}
