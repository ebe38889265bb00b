//! Section serialization for the merchant request.
//!
//! A merchant request is made of nine sections. Each section is a fixed list of
//! named fields, written in a fixed order and joined with [`FIELD_DELIMITER`];
//! the sections themselves are joined with [`SECTION_DELIMITER`].
//!
//! Field order is part of the wire format. It is always taken from an explicit
//! ordered list ([`Section::FIELDS`]), never from map iteration order.
//!
//! Values are written verbatim. Nothing is escaped, so a value containing `|` or
//! `~` will shift every following field on the gateway side. Callers are
//! responsible for keeping the delimiters out of field values.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::error::Result;

/// Separator between fields inside a section.
pub const FIELD_DELIMITER: &str = "|";

/// Separator between sections of the full message.
pub const SECTION_DELIMITER: &str = "~";

/// Read access to named string fields.
///
/// Implemented for plain string maps and for every section record. For section
/// records the lookup already falls back to the section defaults.
pub trait FieldLookup {
    /// Returns the value of `name`, or `None` if the field is absent.
    fn lookup(&self, name: &str) -> Option<&str>;
}

impl<V: AsRef<str>> FieldLookup for BTreeMap<String, V> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(AsRef::as_ref)
    }
}

impl<V: AsRef<str>, S: BuildHasher> FieldLookup for HashMap<String, V, S> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(AsRef::as_ref)
    }
}

/// Joins the values of `order` with `|`, writing an empty string for absent fields.
///
/// An empty `order` yields an empty string, which is how schemaless sections
/// (UPI) keep their placeholder in the full message.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use yagout::section::serialize_section;
///
/// let mut fields = BTreeMap::new();
/// fields.insert("pg_id".to_owned(), "12");
/// fields.insert("scheme".to_owned(), "7");
///
/// let line = serialize_section(&fields, &["pg_id", "paymode", "scheme", "wallet_type"]);
/// assert_eq!(line, "12||7|");
/// ```
pub fn serialize_section<F: FieldLookup + ?Sized>(fields: &F, order: &[&str]) -> String {
    order
        .iter()
        .map(|name| fields.lookup(name).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(FIELD_DELIMITER)
}

/// A fixed-shape section of the merchant request.
///
/// Records hold only what the caller supplied; defaults are applied when the
/// section is read through [`FieldLookup`] or serialized.
pub trait Section: FieldLookup {
    /// Short section name, used as the prefix of dotted field paths (`txn.amount`).
    const NAME: &'static str;

    /// Wire field names, in wire order.
    const FIELDS: &'static [&'static str];

    /// Default value of each field, parallel to [`FIELDS`](Self::FIELDS).
    const DEFAULTS: &'static [&'static str];

    /// Returns the caller-supplied value of `name`, ignoring defaults.
    fn value(&self, name: &str) -> Option<&str>;

    /// Assigns a field by its wire name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`](crate::Error::UnknownField) if the
    /// section has no field called `name`.
    fn set(&mut self, name: &str, value: String) -> Result<()>;

    /// Returns the documented default of `name`.
    #[must_use]
    fn default_value(name: &str) -> Option<&'static str> {
        Self::FIELDS
            .iter()
            .position(|field| *field == name)
            .map(|index| Self::DEFAULTS[index])
    }

    /// Serializes the section, caller values merged over defaults.
    #[must_use]
    fn to_wire(&self) -> String {
        serialize_section(self, Self::FIELDS)
    }
}

/// Declares a section record: an `Option<String>` per field plus its
/// [`Section`] and [`FieldLookup`] impls. Fields are listed in wire order.
macro_rules! section_record {
    (
        $(#[$meta:meta])*
        $name:ident => $label:literal {
            $(
                $(#[$field_meta:meta])*
                $field:ident = $default:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<String>,
            )*
        }

        impl $crate::section::Section for $name {
            const NAME: &'static str = $label;
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];
            const DEFAULTS: &'static [&'static str] = &[$($default),*];

            fn value(&self, name: &str) -> Option<&str> {
                match name {
                    $(stringify!($field) => self.$field.as_deref(),)*
                    _ => None,
                }
            }

            fn set(&mut self, name: &str, value: String) -> $crate::error::Result<()> {
                match name {
                    $(stringify!($field) => self.$field = Some(value),)*
                    _ => {
                        return Err($crate::error::Error::UnknownField {
                            section: $label,
                            field: name.to_owned(),
                        });
                    }
                }
                Ok(())
            }
        }

        impl $crate::section::FieldLookup for $name {
            fn lookup(&self, name: &str) -> Option<&str> {
                use $crate::section::Section;
                self.value(name).or_else(|| Self::default_value(name))
            }
        }
    };
}

pub(crate) use section_record;

mod records;

pub use records::{
    BillingDetails, CardDetails, CustomerDetails, ItemDetails, OtherDetails, PgDetails,
    ShippingDetails, TxnDetails, UpiDetails,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_in_given_order() {
        let mut fields = HashMap::new();
        fields.insert("b".to_owned(), "2".to_owned());
        fields.insert("a".to_owned(), "1".to_owned());
        fields.insert("c".to_owned(), "3".to_owned());
        assert_eq!(serialize_section(&fields, &["c", "a", "b"]), "3|1|2");
    }

    #[test]
    fn test_serialize_missing_fields_are_empty() {
        let fields: BTreeMap<String, String> = BTreeMap::new();
        assert_eq!(serialize_section(&fields, &["a", "b", "c"]), "||");
    }

    #[test]
    fn test_serialize_empty_order_is_empty() {
        let mut fields = BTreeMap::new();
        fields.insert("vpa".to_owned(), "someone@bank");
        assert_eq!(serialize_section(&fields, &[]), "");
    }

    #[test]
    fn test_serialize_ignores_unlisted_fields() {
        let mut fields = BTreeMap::new();
        fields.insert("a".to_owned(), "1");
        fields.insert("extra".to_owned(), "x");
        assert_eq!(serialize_section(&fields, &["a"]), "1");
    }

    #[test]
    fn test_serialize_does_not_escape_delimiters() {
        let mut fields = BTreeMap::new();
        fields.insert("a".to_owned(), "x|y");
        fields.insert("b".to_owned(), "z~w");
        assert_eq!(serialize_section(&fields, &["a", "b"]), "x|y|z~w");
    }

    #[test]
    fn test_default_value_lookup() {
        assert_eq!(TxnDetails::default_value("channel"), Some("WEB"));
        assert_eq!(TxnDetails::default_value("order_no"), Some(""));
        assert_eq!(TxnDetails::default_value("nope"), None);
        assert_eq!(CustomerDetails::default_value("is_logged_in"), Some("Y"));
    }

    #[test]
    fn test_schemas_are_parallel() {
        assert_eq!(TxnDetails::FIELDS.len(), TxnDetails::DEFAULTS.len());
        assert_eq!(PgDetails::FIELDS.len(), PgDetails::DEFAULTS.len());
        assert_eq!(CardDetails::FIELDS.len(), CardDetails::DEFAULTS.len());
        assert_eq!(CustomerDetails::FIELDS.len(), CustomerDetails::DEFAULTS.len());
        assert_eq!(BillingDetails::FIELDS.len(), BillingDetails::DEFAULTS.len());
        assert_eq!(ShippingDetails::FIELDS.len(), ShippingDetails::DEFAULTS.len());
        assert_eq!(ItemDetails::FIELDS.len(), ItemDetails::DEFAULTS.len());
        assert_eq!(OtherDetails::FIELDS.len(), OtherDetails::DEFAULTS.len());
    }
}
