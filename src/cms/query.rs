//! Collection query model.
//!
//! # Responsibilities
//! - Describe a `find` call: collection, filters, sort, limit, projection
//! - Evaluate a query in-process for backends without a query engine
//!
//! # Design Decisions
//! - Conditions are AND-ed, plus at most one OR group (`any_of`)
//! - Field paths use dots and fan out over arrays (`industries.slug`)
//! - Sort syntax follows the CMS convention: `field` ascending, `-field` descending

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::cms::types::Document;

/// Comparison operator for a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Equals,
    NotEquals,
    /// Field value is one of the values in an array operand.
    In,
    /// Operand `true`: field present and non-null. `false`: absent or null.
    Exists,
}

impl Op {
    /// Operator name as used in CMS query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Equals => "equals",
            Op::NotEquals => "not_equals",
            Op::In => "in",
            Op::Exists => "exists",
        }
    }
}

/// A single filter on a document field.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Op,
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Check this condition against a document.
    pub fn matches(&self, doc: &Document) -> bool {
        let found = lookup(doc, &self.field);
        match self.op {
            Op::Equals => found.iter().any(|v| loosely_equal(v, &self.value)),
            Op::NotEquals => !found.iter().any(|v| loosely_equal(v, &self.value)),
            Op::In => match &self.value {
                Value::Array(options) => found
                    .iter()
                    .any(|v| options.iter().any(|o| loosely_equal(v, o))),
                other => found.iter().any(|v| loosely_equal(v, other)),
            },
            Op::Exists => {
                let present = found.iter().any(|v| !v.is_null());
                present == self.value.as_bool().unwrap_or(true)
            }
        }
    }
}

/// A `find` query against one collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    pub collection: String,
    pub conditions: Vec<Condition>,
    /// Alternatives of which at least one must hold; empty means no group.
    pub any_of: Vec<Condition>,
    pub sort: Option<String>,
    pub limit: Option<usize>,
    pub select: Vec<String>,
    pub depth: Option<u8>,
}

impl FindQuery {
    /// Start a query over `collection` with no filters.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..Self::default()
        }
    }

    /// Add a filter condition.
    pub fn filter(mut self, field: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::new(field, op, value));
        self
    }

    /// Require at least one of `alternatives` to hold.
    pub fn any_of(mut self, alternatives: impl IntoIterator<Item = Condition>) -> Self {
        self.any_of = alternatives.into_iter().collect();
        self
    }

    /// Shorthand for an `equals` filter.
    pub fn where_equals(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(field, Op::Equals, value)
    }

    /// Exclude draft documents.
    pub fn published(self) -> Self {
        self.filter("_status", Op::NotEquals, "draft")
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restrict returned fields. `id` is always kept.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Relationship population depth.
    pub fn depth(mut self, depth: u8) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Check every condition against a document.
    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(doc))
            && (self.any_of.is_empty() || self.any_of.iter().any(|c| c.matches(doc)))
    }

    /// Evaluate the query over an in-memory document set.
    pub fn apply(&self, docs: impl IntoIterator<Item = Document>) -> Vec<Document> {
        let mut matched: Vec<Document> = docs.into_iter().filter(|d| self.matches(d)).collect();

        if let Some(sort) = self.sort.as_deref() {
            let (field, descending) = match sort.strip_prefix('-') {
                Some(field) => (field, true),
                None => (sort, false),
            };
            matched.sort_by(|a, b| {
                compare_fields(lookup(a, field).first(), lookup(b, field).first(), descending)
            });
        }

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }

        if self.select.is_empty() {
            matched
        } else {
            matched.into_iter().map(|d| self.project(d)).collect()
        }
    }

    fn project(&self, doc: Document) -> Document {
        match doc {
            Value::Object(fields) => {
                let projected: Map<String, Value> = fields
                    .into_iter()
                    .filter(|(key, _)| key == "id" || self.select.iter().any(|s| s == key))
                    .collect();
                Value::Object(projected)
            }
            other => other,
        }
    }
}

/// Resolve a dotted path, fanning out over arrays.
pub fn lookup<'a>(doc: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![doc];
    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            match value {
                Value::Object(map) => {
                    if let Some(child) = map.get(segment) {
                        next.push(child);
                    }
                }
                Value::Array(items) => {
                    for item in items {
                        if let Some(child) = item.get(segment) {
                            next.push(child);
                        }
                    }
                }
                _ => {}
            }
        }
        current = next;
    }

    // A terminal array matches element-wise.
    current
        .into_iter()
        .flat_map(|v| match v {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            other => vec![other],
        })
        .collect()
}

fn loosely_equal(field: &Value, operand: &Value) -> bool {
    match (field, operand) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            s.parse::<f64>().ok() == n.as_f64()
        }
        _ => field == operand,
    }
}

/// Order two optional field values; missing values sort last in either direction.
fn compare_fields(a: Option<&&Value>, b: Option<&&Value>, descending: bool) -> Ordering {
    let ordering = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Number(x), Value::Number(y)) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            _ => Ordering::Equal,
        },
    };
    if descending {
        ordering.reverse()
    } else {
        ordering
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn services() -> Vec<Value> {
        vec![
            json!({ "id": 1, "slug": "metrology", "order": 3, "_status": "published" }),
            json!({ "id": 2, "slug": "5-axis-machining", "order": 1, "industries": [{ "slug": "aerospace" }] }),
            json!({ "id": 3, "slug": "assembly", "order": 2, "_status": "draft" }),
        ]
    }

    #[test]
    fn test_equals_filter() {
        let query = FindQuery::new("services").where_equals("slug", "metrology");
        let docs = query.apply(services());
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["id"], 1);
    }

    #[test]
    fn test_any_of_matches_either_form() {
        let docs = vec![
            json!({ "slug": "a", "category": "case-studies" }),
            json!({ "slug": "b", "category": { "slug": "case-studies", "title": "Case Studies" } }),
            json!({ "slug": "c", "category": { "slug": "guides" } }),
        ];
        let query = FindQuery::new("resources").any_of([
            Condition::new("category", Op::Equals, "case-studies"),
            Condition::new("category.slug", Op::Equals, "case-studies"),
        ]);
        let slugs: Vec<_> = query.apply(docs).iter().map(|d| d["slug"].as_str().unwrap().to_string()).collect();
        assert_eq!(slugs, vec!["a", "b"]);
    }

    #[test]
    fn test_published_keeps_documents_without_status() {
        let docs = FindQuery::new("services").published().apply(services());
        let slugs: Vec<_> = docs.iter().map(|d| d["slug"].as_str().unwrap()).collect();
        assert_eq!(slugs, vec!["metrology", "5-axis-machining"]);
    }

    #[test]
    fn test_sort_and_limit() {
        let docs = FindQuery::new("services").sort("order").limit(2).apply(services());
        assert_eq!(docs[0]["slug"], "5-axis-machining");
        assert_eq!(docs[1]["slug"], "assembly");
        assert_eq!(docs.len(), 2);

        let docs = FindQuery::new("services").sort("-order").apply(services());
        assert_eq!(docs[0]["slug"], "metrology");
    }

    #[test]
    fn test_missing_sort_field_sorts_last() {
        let docs = vec![json!({ "slug": "a" }), json!({ "slug": "b", "order": 1 })];
        let sorted = FindQuery::new("x").sort("order").apply(docs);
        assert_eq!(sorted[0]["slug"], "b");
    }

    #[test]
    fn test_select_projects_fields() {
        let docs = FindQuery::new("services").select(["slug"]).apply(services());
        assert_eq!(docs[0], json!({ "id": 1, "slug": "metrology" }));
    }

    #[test]
    fn test_nested_path_fans_out_over_arrays() {
        let query = FindQuery::new("services").where_equals("industries.slug", "aerospace");
        let docs = query.apply(services());
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["slug"], "5-axis-machining");
    }

    #[test]
    fn test_in_and_exists() {
        let query = FindQuery::new("services").filter("slug", Op::In, json!(["assembly", "metrology"]));
        assert_eq!(query.apply(services()).len(), 2);

        let query = FindQuery::new("services").filter("industries", Op::Exists, true);
        assert_eq!(query.apply(services()).len(), 1);

        let query = FindQuery::new("services").filter("industries", Op::Exists, false);
        assert_eq!(query.apply(services()).len(), 2);
    }

    #[test]
    fn test_numeric_string_equality() {
        let query = FindQuery::new("services").where_equals("order", "1");
        assert_eq!(query.apply(services()).len(), 1);
    }
}
