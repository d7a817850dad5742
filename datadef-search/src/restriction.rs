use datadef_types::{Entity, EntityId, FieldValue};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One atomic filter condition.
///
/// Comparisons use [`FieldValue::compare`], so integers and decimals compare
/// numerically and values of unrelated kinds never match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Restriction {
    IdEq { id: EntityId },
    Eq { field: String, value: FieldValue },
    Ne { field: String, value: FieldValue },
    Gt { field: String, value: FieldValue },
    Ge { field: String, value: FieldValue },
    Lt { field: String, value: FieldValue },
    Le { field: String, value: FieldValue },
    /// Text match where `*`/`%` stand for any run of characters and `?`/`_`
    /// for exactly one.
    Like { field: String, pattern: String },
    IsNull { field: String },
    IsNotNull { field: String },
    In { field: String, values: Vec<FieldValue> },
}

impl Restriction {
    #[must_use]
    pub const fn id_eq(id: EntityId) -> Self {
        Self::IdEq { id }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ne(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Ne {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn gt(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Gt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ge(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Ge {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn lt(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Lt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn le(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Le {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::Like {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Self::IsNull {
            field: field.into(),
        }
    }

    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::IsNotNull {
            field: field.into(),
        }
    }

    pub fn is_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The restricted field, or `None` for identity restrictions.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::IdEq { .. } => None,
            Self::Eq { field, .. }
            | Self::Ne { field, .. }
            | Self::Gt { field, .. }
            | Self::Ge { field, .. }
            | Self::Lt { field, .. }
            | Self::Le { field, .. }
            | Self::Like { field, .. }
            | Self::IsNull { field }
            | Self::IsNotNull { field }
            | Self::In { field, .. } => Some(field),
        }
    }

    /// Rewrites every compared value with `f`, stopping at the first error.
    pub fn try_map_values<E>(
        self,
        mut f: impl FnMut(FieldValue) -> Result<FieldValue, E>,
    ) -> Result<Self, E> {
        Ok(match self {
            Self::Eq { field, value } => Self::Eq { value: f(value)?, field },
            Self::Ne { field, value } => Self::Ne { value: f(value)?, field },
            Self::Gt { field, value } => Self::Gt { value: f(value)?, field },
            Self::Ge { field, value } => Self::Ge { value: f(value)?, field },
            Self::Lt { field, value } => Self::Lt { value: f(value)?, field },
            Self::Le { field, value } => Self::Le { value: f(value)?, field },
            Self::In { field, values } => Self::In {
                values: values.into_iter().map(f).collect::<Result<_, _>>()?,
                field,
            },
            other @ (Self::IdEq { .. }
            | Self::Like { .. }
            | Self::IsNull { .. }
            | Self::IsNotNull { .. }) => other,
        })
    }

    /// Whether `entity` satisfies this restriction.
    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        match self {
            Self::IdEq { id } => entity.id() == Some(*id),
            Self::Eq { field, value } => cmp(entity, field, value) == Some(Ordering::Equal),
            Self::Ne { field, value } => {
                matches!(cmp(entity, field, value), Some(Ordering::Less | Ordering::Greater))
            }
            Self::Gt { field, value } => cmp(entity, field, value) == Some(Ordering::Greater),
            Self::Ge { field, value } => {
                matches!(cmp(entity, field, value), Some(Ordering::Greater | Ordering::Equal))
            }
            Self::Lt { field, value } => cmp(entity, field, value) == Some(Ordering::Less),
            Self::Le { field, value } => {
                matches!(cmp(entity, field, value), Some(Ordering::Less | Ordering::Equal))
            }
            Self::Like { field, pattern } => entity
                .get_str(field)
                .is_some_and(|text| wildcard_match(pattern, text)),
            Self::IsNull { field } => entity.value(field).is_null(),
            Self::IsNotNull { field } => !entity.value(field).is_null(),
            Self::In { field, values } => values
                .iter()
                .any(|value| cmp(entity, field, value) == Some(Ordering::Equal)),
        }
    }
}

/// Null never compares to anything, not even to null.
fn cmp(entity: &Entity, field: &str, value: &FieldValue) -> Option<Ordering> {
    let actual = entity.value(field);
    if actual.is_null() || value.is_null() {
        return None;
    }
    actual.compare(value)
}

fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*' | '%') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some('?' | '_') => {
                p += 1;
                t += 1;
            }
            Some(c) if *c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    t = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|c| matches!(c, '*' | '%'))
}
