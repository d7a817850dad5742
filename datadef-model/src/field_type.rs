use crate::collaborators::CoercionContext;
use crate::messages::{
    INVALID_DATE_FORMAT, INVALID_DATE_TIME_FORMAT, INVALID_DICTIONARY_ITEM,
    INVALID_NUMERIC_FORMAT, NUMERIC_IS_TOO_BIG, STRING_IS_TOO_LONG, WRONG_TYPE,
};
use crate::{DictionaryService, FieldDefinition};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use datadef_types::{
    DATE_FORMAT, DATE_TIME_FORMAT, DefinitionKey, Entity, EntityId, EntityRef, FieldValue,
    ValueKind,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum length, in characters, of a `String` field.
pub const STRING_MAX_LENGTH: usize = 255;

/// Maximum length, in characters, of a `Text` field.
pub const TEXT_MAX_LENGTH: usize = 2048;

/// Largest integer part a `Decimal` field can hold (seven digits).
pub const DECIMAL_MAX_INTEGER_PART: i64 = 9_999_999;

/// The semantic type of a field.
///
/// Each variant owns the coercion of raw submitted values into its
/// representation, the bounds checks that go with it, and the capability
/// flags the query layer consults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldType {
    /// Short text, at most [`STRING_MAX_LENGTH`] characters.
    String,
    /// Long text, at most [`TEXT_MAX_LENGTH`] characters.
    Text,
    Boolean,
    Date,
    DateTime,
    /// Decimal with at most seven integer digits.
    Decimal,
    Integer,
    /// Closed set of values fixed at schema declaration.
    Enum { values: Vec<String> },
    /// Closed set of values read from a dictionary at validation time.
    Dictionary { dictionary: String },
    /// Reference to a record of another data definition.
    BelongsTo {
        definition: DefinitionKey,
        /// Field of the referenced record used to render it.
        lookup_field: String,
        lazy: bool,
    },
    Password,
    /// Manual ordering position; records sharing a value of `scope` are
    /// ordered together.
    Priority { scope: String },
}

impl FieldType {
    #[must_use]
    pub const fn string() -> Self {
        Self::String
    }

    #[must_use]
    pub const fn text() -> Self {
        Self::Text
    }

    #[must_use]
    pub const fn boolean() -> Self {
        Self::Boolean
    }

    #[must_use]
    pub const fn date() -> Self {
        Self::Date
    }

    #[must_use]
    pub const fn date_time() -> Self {
        Self::DateTime
    }

    #[must_use]
    pub const fn decimal() -> Self {
        Self::Decimal
    }

    #[must_use]
    pub const fn integer() -> Self {
        Self::Integer
    }

    #[must_use]
    pub const fn password() -> Self {
        Self::Password
    }

    /// An enumeration over a fixed list of values, kept in declaration order.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// An enumeration whose values come from the named dictionary.
    pub fn dictionary(dictionary: impl Into<String>) -> Self {
        Self::Dictionary {
            dictionary: dictionary.into(),
        }
    }

    /// An eagerly rendered reference to `plugin.entity`.
    pub fn belongs_to(
        plugin: impl Into<String>,
        entity: impl Into<String>,
        lookup_field: impl Into<String>,
    ) -> Self {
        Self::BelongsTo {
            definition: DefinitionKey::new(plugin, entity),
            lookup_field: lookup_field.into(),
            lazy: false,
        }
    }

    /// A reference to `plugin.entity` that views should load on demand.
    pub fn lazy_belongs_to(
        plugin: impl Into<String>,
        entity: impl Into<String>,
        lookup_field: impl Into<String>,
    ) -> Self {
        Self::BelongsTo {
            definition: DefinitionKey::new(plugin, entity),
            lookup_field: lookup_field.into(),
            lazy: true,
        }
    }

    /// A priority field ordered within the scope of `scope`.
    #[must_use]
    pub fn priority(scope: &FieldDefinition) -> Self {
        Self::Priority {
            scope: scope.name().to_string(),
        }
    }

    #[must_use]
    pub const fn is_searchable(&self) -> bool {
        !matches!(
            self,
            Self::BelongsTo { .. } | Self::Password | Self::Priority { .. }
        )
    }

    #[must_use]
    pub const fn is_orderable(&self) -> bool {
        !matches!(self, Self::BelongsTo { .. } | Self::Password)
    }

    #[must_use]
    pub const fn is_aggregable(&self) -> bool {
        matches!(self, Self::Decimal | Self::Integer)
    }

    /// The in-memory representation of this type's values.
    #[must_use]
    pub const fn representation(&self) -> ValueKind {
        match self {
            Self::String
            | Self::Text
            | Self::Password
            | Self::Enum { .. }
            | Self::Dictionary { .. } => ValueKind::Text,
            Self::Boolean => ValueKind::Boolean,
            Self::Date => ValueKind::Date,
            Self::DateTime => ValueKind::DateTime,
            Self::Decimal => ValueKind::Decimal,
            Self::Integer | Self::Priority { .. } => ValueKind::Integer,
            Self::BelongsTo { .. } => ValueKind::Reference,
        }
    }

    /// The scope field of a priority type.
    #[must_use]
    pub fn scope_field(&self) -> Option<&str> {
        match self {
            Self::Priority { scope } => Some(scope),
            _ => None,
        }
    }

    /// The allowed values of an enumerated type, in their current order.
    ///
    /// Returns `None` for types that are not enumerated.
    #[must_use]
    pub fn values(&self, dictionaries: &dyn DictionaryService) -> Option<Vec<String>> {
        match self {
            Self::Enum { values } => Some(values.clone()),
            Self::Dictionary { dictionary } => Some(dictionaries.values(dictionary)),
            _ => None,
        }
    }

    /// Coerces a raw value into this type's representation.
    ///
    /// On failure an error is recorded on `entity` for the field and
    /// [`FieldValue::Null`] is returned. Reference values are resolved through
    /// the context's resolver, which hands back a lazy handle.
    pub fn to_object(
        &self,
        field: &FieldDefinition,
        value: FieldValue,
        entity: &mut Entity,
        ctx: &CoercionContext<'_>,
    ) -> FieldValue {
        if value.is_null() {
            return FieldValue::Null;
        }
        let coercion = Coercion {
            field_type: self,
            field: field.name(),
            entity,
        };
        match self {
            Self::String => coercion.text(value, STRING_MAX_LENGTH),
            Self::Text => coercion.text(value, TEXT_MAX_LENGTH),
            Self::Password => match value {
                FieldValue::Text(s) => FieldValue::Text(s),
                other => coercion.wrong_type(&other),
            },
            Self::Boolean => coercion.boolean(value),
            Self::Date => coercion.date(value),
            Self::DateTime => coercion.date_time(value),
            Self::Decimal => coercion.decimal(value),
            Self::Integer | Self::Priority { .. } => coercion.integer(value),
            Self::Enum { values } => coercion.member_of(value, values),
            Self::Dictionary { dictionary } => {
                let values = ctx.dictionaries.values(dictionary);
                coercion.member_of(value, &values)
            }
            Self::BelongsTo { definition, .. } => coercion.reference(value, definition, ctx),
        }
    }

    /// Canonical text rendering of a value of this type.
    #[must_use]
    pub fn render(&self, value: &FieldValue) -> String {
        match (self, value) {
            (Self::BelongsTo { lookup_field, .. }, FieldValue::Reference(r)) => r
                .field(lookup_field)
                .map_or_else(|_| r.id().to_string(), ToString::to_string),
            (Self::BelongsTo { lookup_field, .. }, FieldValue::Entity(e)) => {
                e.value(lookup_field).to_string()
            }
            _ => value.to_string(),
        }
    }

    /// Converts a value into this type's representation, typically to
    /// compare it with stored values.
    ///
    /// Unlike [`FieldType::to_object`] this checks no bounds or allowed
    /// values and records nothing. Returns `None` for null and for values
    /// that have no meaning in the representation.
    #[must_use]
    pub fn to_representation(&self, value: FieldValue) -> Option<FieldValue> {
        match (self.representation(), value) {
            (_, FieldValue::Null) => None,
            (ValueKind::Text, FieldValue::Text(s)) => Some(FieldValue::Text(s)),
            (ValueKind::Text, FieldValue::Entity(_) | FieldValue::Reference(_)) => None,
            (ValueKind::Text, other) => Some(FieldValue::Text(other.to_string())),
            (ValueKind::Boolean, FieldValue::Boolean(b)) => Some(FieldValue::Boolean(b)),
            (ValueKind::Boolean, FieldValue::Integer(i @ (0 | 1))) => {
                Some(FieldValue::Boolean(i == 1))
            }
            (ValueKind::Boolean, FieldValue::Text(s)) => {
                match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "1" => Some(FieldValue::Boolean(true)),
                    "false" | "0" => Some(FieldValue::Boolean(false)),
                    _ => None,
                }
            }
            (ValueKind::Integer, FieldValue::Integer(i)) => Some(FieldValue::Integer(i)),
            (ValueKind::Integer, FieldValue::Decimal(d)) if d.fract().is_zero() => {
                i64::try_from(d).ok().map(FieldValue::Integer)
            }
            (ValueKind::Integer, FieldValue::Text(s)) => {
                s.trim().parse().ok().map(FieldValue::Integer)
            }
            (ValueKind::Decimal, FieldValue::Decimal(d)) => Some(FieldValue::Decimal(d)),
            (ValueKind::Decimal, FieldValue::Integer(i)) => {
                Some(FieldValue::Decimal(Decimal::from(i)))
            }
            (ValueKind::Decimal, FieldValue::Text(s)) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .ok()
                    .map(FieldValue::Decimal)
            }
            (ValueKind::Date, FieldValue::Date(d)) => Some(FieldValue::Date(d)),
            (ValueKind::Date, FieldValue::DateTime(dt)) => Some(FieldValue::Date(dt.date())),
            (ValueKind::Date, FieldValue::Text(s)) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                .ok()
                .map(FieldValue::Date),
            (ValueKind::DateTime, FieldValue::DateTime(dt)) => Some(FieldValue::DateTime(dt)),
            (ValueKind::DateTime, FieldValue::Date(d)) => {
                Some(FieldValue::DateTime(d.and_time(NaiveTime::MIN)))
            }
            (ValueKind::DateTime, FieldValue::Text(s)) => {
                parse_date_time(s.trim()).map(FieldValue::DateTime)
            }
            (ValueKind::Reference, FieldValue::Reference(r)) => Some(FieldValue::Reference(r)),
            _ => None,
        }
    }
}

/// Renders an allowed-value set the way error arguments expect it.
#[must_use]
pub fn render_value_set(values: &[String]) -> String {
    format!("[{}]", values.join(", "))
}

/// One coercion of one value, recording failures on the target entity.
struct Coercion<'a> {
    field_type: &'a FieldType,
    field: &'a str,
    entity: &'a mut Entity,
}

impl Coercion<'_> {
    fn fail(self, message: &str, args: impl IntoIterator<Item = String>) -> FieldValue {
        self.entity.add_error(self.field, message, args);
        FieldValue::Null
    }

    fn wrong_type(self, value: &FieldValue) -> FieldValue {
        let expected = self.field_type.representation().name();
        self.fail(
            WRONG_TYPE,
            [value.type_name().to_string(), expected.to_string()],
        )
    }

    fn text(self, value: FieldValue, max_length: usize) -> FieldValue {
        let text = match value {
            FieldValue::Text(s) => s,
            FieldValue::Entity(_) | FieldValue::Reference(_) => return self.wrong_type(&value),
            other => other.to_string(),
        };
        if text.chars().count() > max_length {
            return self.fail(STRING_IS_TOO_LONG, [max_length.to_string()]);
        }
        FieldValue::Text(text)
    }

    fn boolean(self, value: FieldValue) -> FieldValue {
        let parsed = match &value {
            FieldValue::Boolean(b) => Some(*b),
            FieldValue::Integer(1) => Some(true),
            FieldValue::Integer(0) => Some(false),
            FieldValue::Text(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };
        match parsed {
            Some(b) => FieldValue::Boolean(b),
            None => self.wrong_type(&value),
        }
    }

    fn integer(self, value: FieldValue) -> FieldValue {
        let parsed = match &value {
            FieldValue::Integer(i) => Ok(*i),
            FieldValue::Decimal(d) if d.fract().is_zero() => i64::try_from(*d).map_err(|_| ()),
            FieldValue::Decimal(_) => Err(()),
            FieldValue::Text(s) => s.trim().parse::<i64>().map_err(|_| ()),
            _ => return self.wrong_type(&value),
        };
        match parsed {
            Ok(i) => FieldValue::Integer(i),
            Err(()) => self.fail(INVALID_NUMERIC_FORMAT, [value.to_string()]),
        }
    }

    fn decimal(self, value: FieldValue) -> FieldValue {
        let parsed = match &value {
            FieldValue::Decimal(d) => Some(*d),
            FieldValue::Integer(i) => Some(Decimal::from(*i)),
            FieldValue::Text(s) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .ok()
            }
            _ => return self.wrong_type(&value),
        };
        let Some(d) = parsed else {
            return self.fail(INVALID_NUMERIC_FORMAT, [value.to_string()]);
        };
        if d.abs().trunc() > Decimal::from(DECIMAL_MAX_INTEGER_PART) {
            return self.fail(NUMERIC_IS_TOO_BIG, [DECIMAL_MAX_INTEGER_PART.to_string()]);
        }
        FieldValue::Decimal(d)
    }

    fn date(self, value: FieldValue) -> FieldValue {
        match value {
            FieldValue::Date(d) => FieldValue::Date(d),
            FieldValue::DateTime(dt) => FieldValue::Date(dt.date()),
            FieldValue::Text(s) => match NaiveDate::parse_from_str(s.trim(), DATE_FORMAT) {
                Ok(d) => FieldValue::Date(d),
                Err(_) => self.fail(INVALID_DATE_FORMAT, [s]),
            },
            other => self.wrong_type(&other),
        }
    }

    fn date_time(self, value: FieldValue) -> FieldValue {
        match value {
            FieldValue::DateTime(dt) => FieldValue::DateTime(dt),
            FieldValue::Date(d) => FieldValue::DateTime(d.and_time(NaiveTime::MIN)),
            FieldValue::Text(s) => match parse_date_time(s.trim()) {
                Some(dt) => FieldValue::DateTime(dt),
                None => self.fail(INVALID_DATE_TIME_FORMAT, [s]),
            },
            other => self.wrong_type(&other),
        }
    }

    fn member_of(self, value: FieldValue, allowed: &[String]) -> FieldValue {
        let text = match value {
            FieldValue::Text(s) => s,
            FieldValue::Entity(_) | FieldValue::Reference(_) => return self.wrong_type(&value),
            other => other.to_string(),
        };
        if allowed.iter().any(|v| *v == text) {
            FieldValue::Text(text)
        } else {
            self.fail(INVALID_DICTIONARY_ITEM, [render_value_set(allowed)])
        }
    }

    fn reference(
        self,
        value: FieldValue,
        definition: &DefinitionKey,
        ctx: &CoercionContext<'_>,
    ) -> FieldValue {
        let id = match value {
            FieldValue::Reference(r) => return FieldValue::Reference(r),
            // A record without identity references nothing yet.
            FieldValue::Entity(e) => {
                return EntityRef::resolved(definition.clone(), *e)
                    .map_or(FieldValue::Null, FieldValue::Reference);
            }
            FieldValue::Integer(i) => u64::try_from(i).ok().map(EntityId::new),
            FieldValue::Text(ref s) => EntityId::parse(s).ok(),
            _ => None,
        };
        match id {
            Some(id) => FieldValue::Reference(ctx.references.load_by_id(definition, id)),
            None => self.wrong_type(&value),
        }
    }
}

fn parse_date_time(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}
