//! Condition model: the ordered list of user-authored filter rows
//!
//! The model is owned by a single editing session. Edits go through explicit
//! commands so the dependent-field resets and connective invariants live in one
//! place and the compiler stays a pure function of the row list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// AND/OR joining a row's clause to the accumulated clause of prior rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalConnective {
    And,
    Or,
}

impl LogicalConnective {
    /// Lenient parse: anything that is not OR is AND (the documented default)
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("OR") {
            LogicalConnective::Or
        } else {
            LogicalConnective::And
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            LogicalConnective::And => "AND",
            LogicalConnective::Or => "OR",
        }
    }
}

impl fmt::Display for LogicalConnective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// The two kinds of filter rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConditionBody {
    Attribute {
        #[serde(default)]
        attribute: String,
        #[serde(default)]
        operator: String,
        #[serde(default)]
        value: String,
    },
    Segment {
        #[serde(default)]
        tag: String,
    },
}

/// One user-authored filter row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u64,
    #[serde(default)]
    pub connective: Option<LogicalConnective>,
    #[serde(flatten)]
    pub body: ConditionBody,
}

impl Condition {
    pub fn attribute(id: u64, attribute: &str, operator: &str, value: &str) -> Self {
        Self {
            id,
            connective: None,
            body: ConditionBody::Attribute {
                attribute: attribute.to_string(),
                operator: operator.to_string(),
                value: value.to_string(),
            },
        }
    }

    pub fn segment(id: u64, tag: &str) -> Self {
        Self {
            id,
            connective: None,
            body: ConditionBody::Segment {
                tag: tag.to_string(),
            },
        }
    }

    pub fn with_connective(mut self, connective: LogicalConnective) -> Self {
        self.connective = Some(connective);
        self
    }

    /// Whether the row carries its required fields.
    ///
    /// An empty value is allowed: null-check and emptiness operators never
    /// read it, and the compiler is the one that decides.
    pub fn is_complete(&self) -> bool {
        match &self.body {
            ConditionBody::Attribute {
                attribute,
                operator,
                ..
            } => !attribute.is_empty() && !operator.is_empty(),
            ConditionBody::Segment { tag } => !tag.is_empty(),
        }
    }
}

/// The editing-session condition list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortModel {
    next_id: u64,
    conditions: Vec<Condition>,
}

impl CohortModel {
    /// A fresh model starts with one empty attribute row
    pub fn new() -> Self {
        let mut model = Self {
            next_id: 1,
            conditions: Vec::new(),
        };
        model.add_attribute_condition();
        model
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&mut self, mut condition: Condition) -> u64 {
        condition.connective = if self.conditions.is_empty() {
            None
        } else {
            Some(LogicalConnective::And)
        };
        let id = condition.id;
        self.conditions.push(condition);
        id
    }

    /// Append an empty attribute row, returning its id
    pub fn add_attribute_condition(&mut self) -> u64 {
        let id = self.allocate_id();
        self.push(Condition::attribute(id, "", "", ""))
    }

    /// Append a segment row, returning its id
    pub fn add_segment_condition(&mut self, tag: &str) -> u64 {
        let id = self.allocate_id();
        self.push(Condition::segment(id, tag))
    }

    /// Remove a row. The surviving first row loses its connective.
    pub fn remove_condition(&mut self, id: u64) {
        self.conditions.retain(|c| c.id != id);
        if let Some(first) = self.conditions.first_mut() {
            first.connective = None;
        }
    }

    fn find_mut(&mut self, id: u64) -> Option<&mut Condition> {
        self.conditions.iter_mut().find(|c| c.id == id)
    }

    /// Set a row's attribute key, clearing its operator and value
    pub fn set_attribute(&mut self, id: u64, attribute_key: &str) {
        if let Some(condition) = self.find_mut(id) {
            if let ConditionBody::Attribute {
                attribute,
                operator,
                value,
            } = &mut condition.body
            {
                *attribute = attribute_key.to_string();
                operator.clear();
                value.clear();
            }
        }
    }

    /// Set a row's operator key, clearing its value
    pub fn set_operator(&mut self, id: u64, operator_key: &str) {
        if let Some(condition) = self.find_mut(id) {
            if let ConditionBody::Attribute {
                operator, value, ..
            } = &mut condition.body
            {
                *operator = operator_key.to_string();
                value.clear();
            }
        }
    }

    pub fn set_value(&mut self, id: u64, new_value: &str) {
        if let Some(condition) = self.find_mut(id) {
            if let ConditionBody::Attribute { value, .. } = &mut condition.body {
                *value = new_value.to_string();
            }
        }
    }

    pub fn set_segment_tag(&mut self, id: u64, tag_name: &str) {
        if let Some(condition) = self.find_mut(id) {
            if let ConditionBody::Segment { tag } = &mut condition.body {
                *tag = tag_name.to_string();
            }
        }
    }

    /// Set a row's connective. Ignored for the first row, which has none.
    pub fn set_connective(&mut self, id: u64, connective: LogicalConnective) {
        let first_id = self.conditions.first().map(|c| c.id);
        if first_id == Some(id) {
            return;
        }
        if let Some(condition) = self.find_mut(id) {
            condition.connective = Some(connective);
        }
    }
}

impl Default for CohortModel {
    fn default() -> Self {
        Self::new()
    }
}
