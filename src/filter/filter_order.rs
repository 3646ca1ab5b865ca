use std::cmp::Ordering;

use serde_json::Value;

use super::error::FilterError;
use super::matcher::compare_values;
use super::types::{validate_column, FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    pub fn generate(infos: &[FilterOrderInfo]) -> Result<String, FilterError> {
        if infos.is_empty() {
            return Ok(String::new());
        }
        let parts = infos
            .iter()
            .map(|i| {
                validate_column(&i.column)?;
                Ok(format!("body->'{}' {}", i.column, i.sort.to_sql()))
            })
            .collect::<Result<Vec<_>, FilterError>>()?;
        Ok(format!("ORDER BY {}", parts.join(", ")))
    }

    /// In-process equivalent of `generate`; missing values sort last when ascending, like Postgres NULLs
    pub fn compare(infos: &[FilterOrderInfo], a: &Value, b: &Value) -> Ordering {
        for info in infos {
            let left = a.get(&info.column).filter(|v| !v.is_null());
            let right = b.get(&info.column).filter(|v| !v.is_null());
            let ordering = match (left, right) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(l), Some(r)) => compare_values(l, r).unwrap_or(Ordering::Equal),
            };
            let ordering = match info.sort {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}
