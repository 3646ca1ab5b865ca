use serde_json::Value;

use super::error::FilterError;
use super::types::{validate_column, Condition, FilterOp, FilterWhereInfo};

/// Compiles a Mongo-style WHERE document into SQL over the JSONB `body` column.
///
/// Every parameter is bound as JSONB, so comparisons use jsonb semantics on
/// both sides (`body->'field' = $1`).
pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Returns the SQL predicate and the parameters numbered from `starting_param_index + 1`
    pub fn generate(where_data: &Value, starting_param_index: usize) -> Result<(String, Vec<Value>), FilterError> {
        let condition = Self::parse(where_data)?;
        let mut filter_where = Self::new(starting_param_index);
        let sql = filter_where.build_sql_condition(&condition)?;
        Ok((sql, filter_where.param_values))
    }

    pub fn parse(where_data: &Value) -> Result<Condition, FilterError> {
        match where_data {
            Value::Null => Ok(Condition::And(vec![])),
            Value::Object(obj) => {
                let mut conditions = Vec::with_capacity(obj.len());
                for (key, value) in obj {
                    if key.starts_with('$') {
                        conditions.push(Self::parse_logical_operator(key, value)?);
                    } else {
                        conditions.extend(Self::parse_field_condition(key, value)?);
                    }
                }
                Ok(if conditions.len() == 1 {
                    conditions.remove(0)
                } else {
                    Condition::And(conditions)
                })
            }
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    fn parse_logical_operator(op: &str, value: &Value) -> Result<Condition, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                let parts = arr.iter().map(Self::parse).collect::<Result<Vec<_>, _>>()?;
                Ok(if op == "$and" { Condition::And(parts) } else { Condition::Or(parts) })
            }
            "$not" => Ok(Condition::Not(Box::new(Self::parse(value)?))),
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn parse_field_condition(field: &str, value: &Value) -> Result<Vec<Condition>, FilterError> {
        validate_column(field)?;

        match value {
            Value::Object(obj) if obj.keys().any(|k| k.starts_with('$')) => {
                let mut out = Vec::with_capacity(obj.len());
                for (op_key, op_val) in obj {
                    let operator = FilterOp::parse(op_key)?;
                    if matches!(operator, FilterOp::In | FilterOp::NIn) && !op_val.is_array() {
                        return Err(FilterError::InvalidOperatorData(format!("{} requires array", op_key)));
                    }
                    out.push(Condition::Field(FilterWhereInfo {
                        column: field.to_string(),
                        operator,
                        data: op_val.clone(),
                    }));
                }
                Ok(out)
            }
            // Implicit equality: { field: value }
            _ => Ok(vec![Condition::Field(FilterWhereInfo {
                column: field.to_string(),
                operator: FilterOp::Eq,
                data: value.clone(),
            })]),
        }
    }

    fn build_sql_condition(&mut self, condition: &Condition) -> Result<String, FilterError> {
        match condition {
            Condition::And(parts) | Condition::Or(parts) if parts.is_empty() => {
                // Empty AND is vacuously true, empty OR matches nothing
                Ok(if matches!(condition, Condition::And(_)) { "1=1".to_string() } else { "1=0".to_string() })
            }
            Condition::And(parts) => self.join_parts(parts, " AND "),
            Condition::Or(parts) => self.join_parts(parts, " OR "),
            Condition::Not(inner) => Ok(format!("NOT ({})", self.build_sql_condition(inner)?)),
            Condition::Field(info) => self.build_field_condition(info),
        }
    }

    fn join_parts(&mut self, parts: &[Condition], joiner: &str) -> Result<String, FilterError> {
        let sql_parts = parts
            .iter()
            .map(|part| self.build_sql_condition(part).map(|sql| format!("({})", sql)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sql_parts.join(joiner))
    }

    fn build_field_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        validate_column(&condition.column)?;
        let column = format!("body->'{}'", condition.column);

        Ok(match condition.operator {
            FilterOp::Eq => {
                if condition.data.is_null() {
                    format!("({0} IS NULL OR {0} = 'null'::jsonb)", column)
                } else {
                    format!("{} = {}", column, self.param(condition.data.clone()))
                }
            }
            FilterOp::Ne => {
                if condition.data.is_null() {
                    format!("({0} IS NOT NULL AND {0} <> 'null'::jsonb)", column)
                } else {
                    format!("({0} IS NULL OR {0} <> {1})", column, self.param(condition.data.clone()))
                }
            }
            FilterOp::Gt => format!("{} > {}", column, self.param(condition.data.clone())),
            FilterOp::Gte => format!("{} >= {}", column, self.param(condition.data.clone())),
            FilterOp::Lt => format!("{} < {}", column, self.param(condition.data.clone())),
            FilterOp::Lte => format!("{} <= {}", column, self.param(condition.data.clone())),
            FilterOp::In => {
                let values = Self::array_data(condition)?;
                if values.is_empty() {
                    return Ok("1=0".to_string());
                }
                let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                format!("{} IN ({})", column, params.join(", "))
            }
            FilterOp::NIn => {
                let values = Self::array_data(condition)?;
                if values.is_empty() {
                    return Ok("1=1".to_string());
                }
                let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                format!("({0} IS NULL OR {0} NOT IN ({1}))", column, params.join(", "))
            }
            FilterOp::Contains => {
                // jsonb containment: '["a","b"]' @> '["a"]'
                let needle = Value::Array(vec![condition.data.clone()]);
                format!("{} @> {}", column, self.param(needle))
            }
        })
    }

    fn array_data(condition: &FilterWhereInfo) -> Result<&Vec<Value>, FilterError> {
        condition
            .data
            .as_array()
            .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", condition.column)))
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}
