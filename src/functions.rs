//! Aggregate functions callable from a projection, e.g. `sum(col1)`.
//!
//! The interpreter evaluates a call's argument once per row of the active
//! aggregation scope, drops null results, and hands the remaining values to
//! the function. New functions plug in through [`FunctionRegistry::register`]
//! without touching the dispatcher.

use std::{collections::HashMap, rc::Rc};

use crate::{interpreter::EvalError, value::Value};

pub trait AggregateFunction {
    /// Name the function is called by, matched case-insensitively.
    fn name(&self) -> &str;

    /// Number of arguments the call takes.
    fn arity(&self) -> usize {
        1
    }

    /// Reduce the non-null argument values collected over the scope.
    fn aggregate(&self, values: &[Value]) -> Result<Value, EvalError>;
}

/// Name → function mapping, keyed by lowercase name.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, Rc<dyn AggregateFunction>>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        let mut registry = FunctionRegistry::empty();
        registry.register(Sum);
        registry.register(Count);
        registry.register(Avg);
        registry.register(Min);
        registry.register(Max);
        registry
    }
}

impl FunctionRegistry {
    /// Registry with the built-in aggregates.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        FunctionRegistry {
            functions: HashMap::new(),
        }
    }

    pub fn register<F: AggregateFunction + 'static>(&mut self, function: F) {
        self.functions
            .insert(function.name().to_lowercase(), Rc::new(function));
    }

    pub fn get(&self, name: &str) -> Result<Rc<dyn AggregateFunction>, EvalError> {
        self.functions
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }
}

fn non_numeric(function: &str, value: &Value) -> EvalError {
    EvalError::TypeError(format!(
        "{}() requires numeric values, got {}",
        function,
        value.type_name()
    ))
}

/// Total of the values; `0` over an empty scope.
///
/// Integers are summed with overflow checks. Any float input switches the
/// whole fold to `f64`.
pub struct Sum;

impl AggregateFunction for Sum {
    fn name(&self) -> &str {
        "sum"
    }

    fn aggregate(&self, values: &[Value]) -> Result<Value, EvalError> {
        if values.iter().any(|v| matches!(v, Value::Float(_))) {
            let mut total = 0.0;
            for value in values {
                total += value.as_float().ok_or_else(|| non_numeric("sum", value))?;
            }
            return Ok(Value::Float(total));
        }

        let mut total: i64 = 0;
        for value in values {
            let Value::Integer(n) = value else {
                return Err(non_numeric("sum", value));
            };
            total = total
                .checked_add(*n)
                .ok_or_else(|| EvalError::Overflow("sum() total out of range".to_string()))?;
        }
        Ok(Value::Integer(total))
    }
}

/// Number of non-null values. `count(*)` counts rows.
pub struct Count;

impl AggregateFunction for Count {
    fn name(&self) -> &str {
        "count"
    }

    fn aggregate(&self, values: &[Value]) -> Result<Value, EvalError> {
        Ok(Value::Integer(values.len() as i64))
    }
}

/// Arithmetic mean as a float; null over an empty scope.
pub struct Avg;

impl AggregateFunction for Avg {
    fn name(&self) -> &str {
        "avg"
    }

    fn aggregate(&self, values: &[Value]) -> Result<Value, EvalError> {
        if values.is_empty() {
            return Ok(Value::Null);
        }
        let total = Sum.aggregate(values)?;
        let total = total.as_float().unwrap_or(0.0);
        Ok(Value::Float(total / values.len() as f64))
    }
}

pub struct Min;

impl AggregateFunction for Min {
    fn name(&self) -> &str {
        "min"
    }

    fn aggregate(&self, values: &[Value]) -> Result<Value, EvalError> {
        Ok(values
            .iter()
            .min_by(|a, b| a.sort_cmp(b))
            .cloned()
            .unwrap_or(Value::Null))
    }
}

pub struct Max;

impl AggregateFunction for Max {
    fn name(&self) -> &str {
        "max"
    }

    fn aggregate(&self, values: &[Value]) -> Result<Value, EvalError> {
        Ok(values
            .iter()
            .max_by(|a, b| a.sort_cmp(b))
            .cloned()
            .unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().copied().map(Value::Integer).collect()
    }

    #[test]
    fn test_sum() {
        assert_eq!(Sum.aggregate(&[]).unwrap(), Value::Integer(0));
        assert_eq!(Sum.aggregate(&ints(&[1, 2, 3])).unwrap(), Value::Integer(6));
        assert_eq!(
            Sum.aggregate(&[Value::Integer(1), Value::Float(0.5)]).unwrap(),
            Value::Float(1.5)
        );
    }

    #[test]
    fn test_sum_of_large_floats() {
        let values = [Value::Float(1e30), Value::Float(2.0)];
        assert_eq!(Sum.aggregate(&values).unwrap(), Value::Float(1e30));
        assert_eq!(Avg.aggregate(&values).unwrap(), Value::Float(5e29));
    }

    #[test]
    fn test_sum_integer_overflow() {
        let err = Sum.aggregate(&ints(&[i64::MAX, 1])).unwrap_err();
        assert!(matches!(err, EvalError::Overflow(_)));
    }

    #[test]
    fn test_sum_rejects_text() {
        let err = Sum.aggregate(&[Value::from("x")]).unwrap_err();
        assert!(matches!(err, EvalError::TypeError(_)));
    }

    #[test]
    fn test_avg_min_max() {
        let values = ints(&[4, 1, 7]);
        assert_eq!(Avg.aggregate(&values).unwrap(), Value::Float(4.0));
        assert_eq!(Min.aggregate(&values).unwrap(), Value::Integer(1));
        assert_eq!(Max.aggregate(&values).unwrap(), Value::Integer(7));
        assert_eq!(Max.aggregate(&[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_registry_is_case_insensitive() {
        let registry = FunctionRegistry::new();
        assert_eq!(registry.get("SUM").unwrap().name(), "sum");
        assert!(matches!(
            registry.get("median"),
            Err(EvalError::UnknownFunction(name)) if name == "median"
        ));
    }
}
