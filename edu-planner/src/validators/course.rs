//! Read-only view over a generated course document
//!
//! Absent or mistyped fields read as empty so rules degrade to partial
//! credit. Only entries a rule cannot interpret at all (a resource that is
//! not an object, a grade that is not a whole number) are reported as
//! `RuleError`s.

use super::RuleError;
use crate::text::{as_count, flatten_text, type_name};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy)]
pub struct CourseView<'a> {
    raw: &'a Value,
}

impl<'a> CourseView<'a> {
    pub fn new(raw: &'a Value) -> Self {
        Self { raw }
    }

    fn field(&self, key: &str) -> Option<&'a Value> {
        self.raw.get(key)
    }

    fn str_field(&self, key: &str) -> &'a str {
        self.field(key).and_then(Value::as_str).unwrap_or("")
    }

    fn array(&self, key: &str) -> &'a [Value] {
        self.field(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn strings(&self, key: &str) -> Vec<&'a str> {
        self.array(key).iter().filter_map(Value::as_str).collect()
    }

    fn objects(&self, key: &'static str) -> Result<Vec<&'a Map<String, Value>>, RuleError> {
        self.array(key)
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_object().ok_or(RuleError::MalformedEntry {
                    field: key,
                    index,
                    expected: "object",
                    found: type_name(item),
                })
            })
            .collect()
    }

    fn number(&self, key: &str) -> f64 {
        self.field(key).and_then(Value::as_f64).unwrap_or(0.0)
    }

    pub fn title(&self) -> &'a str {
        self.str_field("title")
    }

    pub fn driving_question(&self) -> &'a str {
        self.str_field("driving_question")
    }

    pub fn final_products(&self) -> Vec<&'a str> {
        self.strings("final_products")
    }

    /// Number of entries in `final_products`, whatever their type
    pub fn final_product_count(&self) -> usize {
        self.array("final_products").len()
    }

    pub fn learning_objectives(&self) -> Vec<&'a str> {
        self.strings("learning_objectives")
    }

    pub fn resources(&self) -> Result<Vec<&'a Map<String, Value>>, RuleError> {
        self.objects("resources")
    }

    pub fn assessments(&self) -> Result<Vec<&'a Map<String, Value>>, RuleError> {
        self.objects("assessments")
    }

    pub fn phase_count(&self) -> usize {
        self.array("phases").len()
    }

    /// Grade levels as whole numbers
    pub fn grade_levels(&self) -> Result<Vec<u32>, RuleError> {
        self.array("grade_levels")
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let grade = match item {
                    Value::Number(_) => as_count(item),
                    _ => None,
                };
                grade.ok_or(RuleError::MalformedEntry {
                    field: "grade_levels",
                    index,
                    expected: "whole number",
                    found: type_name(item),
                })
            })
            .collect()
    }

    pub fn duration_weeks(&self) -> f64 {
        self.number("duration_weeks")
    }

    pub fn duration_hours(&self) -> f64 {
        self.number("duration_hours")
    }

    /// Lowercase text of the whole document
    pub fn text(&self) -> String {
        flatten_text(self.raw)
    }
}
