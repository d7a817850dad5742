use crate::{Order, QueryExecutor, QueryResult, Restriction, SearchError, SearchResult};
use datadef_model::DataDefinition;
use datadef_types::{Entity, ValueKind};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Page size used when a search does not set one.
pub const DEFAULT_MAX_RESULTS: usize = 25;

/// Upper bound on the number of restrictions in one search.
pub const MAX_RESTRICTIONS: usize = 5;

/// A bounded, ordered, paginated query over one data definition.
///
/// Restrictions are validated against the definition as they are added, so a
/// criteria object that was built without error can always be executed.
/// Failed builder calls leave the criteria unchanged.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    definition: Arc<DataDefinition>,
    max_results: usize,
    first_result: usize,
    order: Order,
    restrictions: HashSet<Restriction>,
}

impl SearchCriteria {
    /// Starts a search with default paging and the definition's default order:
    /// ascending on its priority field if it has one, otherwise by identity.
    #[must_use]
    pub fn new(definition: Arc<DataDefinition>) -> Self {
        let order = definition
            .priority_field()
            .map_or_else(Order::asc_by_id, |field| Order::asc(field.name()));
        Self {
            definition,
            max_results: DEFAULT_MAX_RESULTS,
            first_result: 0,
            order,
            restrictions: HashSet::new(),
        }
    }

    #[must_use]
    pub fn definition(&self) -> &DataDefinition {
        &self.definition
    }

    #[must_use]
    pub const fn max_results(&self) -> usize {
        self.max_results
    }

    #[must_use]
    pub const fn first_result(&self) -> usize {
        self.first_result
    }

    #[must_use]
    pub const fn order(&self) -> &Order {
        &self.order
    }

    pub fn restrictions(&self) -> impl Iterator<Item = &Restriction> {
        self.restrictions.iter()
    }

    #[must_use]
    pub fn restriction_count(&self) -> usize {
        self.restrictions.len()
    }

    /// Adds a restriction.
    ///
    /// Compared values are converted to the field's representation first, so
    /// `eq("quantity", "5")` on an integer field compares as the integer 5.
    /// Adding one that is already present is a no-op, even when the set is
    /// full.
    pub fn restricted_with(&mut self, restriction: Restriction) -> QueryResult<&mut Self> {
        let restriction = self.checked(restriction)?;
        if self.restrictions.contains(&restriction) {
            return Ok(self);
        }
        if self.restrictions.len() >= MAX_RESTRICTIONS {
            return Err(SearchError::TooManyRestrictions {
                max: MAX_RESTRICTIONS,
            });
        }
        self.restrictions.insert(restriction);
        Ok(self)
    }

    /// Replaces the order.
    pub fn order_by(&mut self, order: Order) -> QueryResult<&mut Self> {
        if let Some(name) = order.field() {
            let field = self.declared(name)?;
            if !field.field_type().is_orderable() {
                return Err(SearchError::NotOrderable {
                    definition: self.definition.key().to_string(),
                    field: name.to_string(),
                });
            }
        }
        self.order = order;
        Ok(self)
    }

    pub const fn with_max_results(&mut self, max_results: usize) -> &mut Self {
        self.max_results = max_results;
        self
    }

    pub const fn with_first_result(&mut self, first_result: usize) -> &mut Self {
        self.first_result = first_result;
        self
    }

    /// Whether `entity` satisfies every restriction.
    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        self.restrictions.iter().all(|r| r.matches(entity))
    }

    /// Filters, sorts and paginates an in-process set of records.
    ///
    /// Executors without a query language of their own can delegate here.
    pub fn evaluate<I>(&self, records: I) -> SearchResult
    where
        I: IntoIterator<Item = Entity>,
    {
        let mut matched: Vec<Entity> = records.into_iter().filter(|e| self.matches(e)).collect();
        matched.sort_by(|a, b| self.order.compare(a, b));
        let total = matched.len();
        let page = matched
            .into_iter()
            .skip(self.first_result)
            .take(self.max_results)
            .collect();
        SearchResult::new(total, page)
    }

    /// Runs the search and returns the requested page.
    pub fn list(self, executor: &dyn QueryExecutor) -> QueryResult<SearchResult> {
        debug!(
            definition = %self.definition.key(),
            restrictions = self.restrictions.len(),
            first_result = self.first_result,
            max_results = self.max_results,
            "listing records"
        );
        executor.execute(&self)
    }

    /// Runs the search expecting at most one match.
    pub fn unique(mut self, executor: &dyn QueryExecutor) -> QueryResult<Option<Entity>> {
        self.first_result = 0;
        self.max_results = 2;
        let result = executor.execute(&self)?;
        match result.total_number_of_entities {
            0 => Ok(None),
            1 => Ok(result.into_entities().into_iter().next()),
            count => Err(SearchError::AmbiguousResult {
                definition: self.definition.key().to_string(),
                count,
            }),
        }
    }

    fn checked(&self, restriction: Restriction) -> QueryResult<Restriction> {
        let Some(name) = restriction.field().map(str::to_string) else {
            return Ok(restriction);
        };
        let field_type = self.declared(&name)?.field_type();
        if !field_type.is_searchable() {
            return Err(SearchError::NotSearchable {
                definition: self.definition.key().to_string(),
                field: name,
            });
        }
        let wrong_kind = |found: &str| SearchError::WrongValueKind {
            definition: self.definition.key().to_string(),
            field: name.clone(),
            expected: field_type.representation().to_string(),
            found: found.to_string(),
        };
        if matches!(restriction, Restriction::Like { .. })
            && field_type.representation() != ValueKind::Text
        {
            return Err(wrong_kind("pattern"));
        }
        restriction.try_map_values(|value| {
            let found = value.type_name();
            field_type
                .to_representation(value)
                .ok_or_else(|| wrong_kind(found))
        })
    }

    fn declared(&self, name: &str) -> QueryResult<&datadef_model::FieldDefinition> {
        self.definition
            .field(name)
            .ok_or_else(|| SearchError::UnknownField {
                definition: self.definition.key().to_string(),
                field: name.to_string(),
            })
    }
}

/// Two criteria are equal when they would run the same query.
impl PartialEq for SearchCriteria {
    fn eq(&self, other: &Self) -> bool {
        self.definition.key() == other.definition.key()
            && self.max_results == other.max_results
            && self.first_result == other.first_result
            && self.order == other.order
            && self.restrictions == other.restrictions
    }
}

impl Eq for SearchCriteria {}
