use crate::document::Value;
use crate::query::{DocQuery, Predicate, SortDescriptor};
use rusqlite::types::Value as SqlValue;

/// Unicode-aware lowercase registered on every connection. SQLite's own
/// `lower()` folds ASCII only.
pub(crate) const FOLD_CASE_FN: &str = "fold_case";

/// Compiled SQL query fragment with bound parameters.
pub(crate) struct CompiledQuery {
    pub where_clause: String,
    pub params: Vec<SqlValue>,
    pub order_clause: String,
    pub limit_offset: String,
}

/// Translate a DocQuery into SQL fragments.
pub(crate) fn compile_query(q: &DocQuery) -> CompiledQuery {
    let mut params = vec![SqlValue::Text(q.collection.clone())];

    // WHERE
    let mut conditions = vec!["collection = ?".to_string()];
    for pred in &q.predicates {
        let (sql, pred_params) = compile_predicate(pred);
        conditions.push(sql);
        params.extend(pred_params);
    }
    let where_clause = format!("WHERE {}", conditions.join(" AND "));

    // ORDER BY
    let order_clause = compile_sort(&q.sort);

    // LIMIT / OFFSET
    let mut limit_offset = String::new();
    match (q.limit, q.offset) {
        (Some(limit), Some(offset)) => {
            limit_offset.push_str(&format!("LIMIT {} OFFSET {}", limit, offset))
        }
        (Some(limit), None) => limit_offset.push_str(&format!("LIMIT {}", limit)),
        (None, Some(offset)) => limit_offset.push_str(&format!("LIMIT -1 OFFSET {}", offset)),
        (None, None) => {}
    }

    CompiledQuery {
        where_clause,
        params,
        order_clause,
        limit_offset,
    }
}

fn compile_predicate(pred: &Predicate) -> (String, Vec<SqlValue>) {
    let mut params = Vec::new();
    let sql = match pred {
        Predicate::Eq(field, value) => binary(field, "=", value, &mut params),
        Predicate::Neq(field, value) => binary(field, "IS NOT", value, &mut params),
        Predicate::Gt(field, value) => binary(field, ">", value, &mut params),
        Predicate::Lt(field, value) => binary(field, "<", value, &mut params),
        Predicate::Gte(field, value) => binary(field, ">=", value, &mut params),
        Predicate::Lte(field, value) => binary(field, "<=", value, &mut params),
        Predicate::Contains(field, text) => {
            let col = field_to_column(field);
            params.push(SqlValue::Text(format!("%{}%", escape_like(&text.to_lowercase()))));
            format!("{}({}) LIKE ? ESCAPE '\\'", FOLD_CASE_FN, col)
        }
        Predicate::In(field, values) => {
            let col = field_to_column(field);
            if values.is_empty() {
                "0".to_string()
            } else {
                let placeholders: Vec<&str> = values
                    .iter()
                    .map(|v| {
                        params.push(value_to_sql(v));
                        "?"
                    })
                    .collect();
                format!("{} IN ({})", col, placeholders.join(", "))
            }
        }
        Predicate::And(preds) => join(preds, " AND ", "1", &mut params),
        Predicate::Or(preds) => join(preds, " OR ", "0", &mut params),
        Predicate::Not(pred) => {
            let (sql, ps) = compile_predicate(pred);
            params.extend(ps);
            format!("NOT ({})", sql)
        }
    };
    (sql, params)
}

fn binary(field: &str, op: &str, value: &Value, params: &mut Vec<SqlValue>) -> String {
    params.push(value_to_sql(value));
    format!("{} {} ?", field_to_column(field), op)
}

fn join(preds: &[Predicate], sep: &str, empty: &str, params: &mut Vec<SqlValue>) -> String {
    let parts: Vec<String> = preds
        .iter()
        .map(|p| {
            let (sql, ps) = compile_predicate(p);
            params.extend(ps);
            sql
        })
        .collect();
    if parts.is_empty() {
        empty.to_string()
    } else {
        format!("({})", parts.join(sep))
    }
}

fn compile_sort(sorts: &[SortDescriptor]) -> String {
    if sorts.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = sorts
        .iter()
        .map(|s| {
            let col = field_to_column(&s.field);
            let dir = if s.ascending { "ASC" } else { "DESC" };
            format!("{} {}", col, dir)
        })
        .collect();
    format!("ORDER BY {}", parts.join(", "))
}

/// Map a field path to a SQL column expression.
fn field_to_column(field: &str) -> String {
    match field {
        "id" => "id".to_string(),
        "created" => "created".to_string(),
        "modified" => "modified".to_string(),
        // payload.field → json_extract(payload, '$.field')
        f => {
            let name = f.strip_prefix("payload.").unwrap_or(f);
            format!("json_extract(payload, '$.{}')", name.replace('\'', "''"))
        }
    }
}

fn value_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(*b as i64),
        Value::Int(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(
            serde_json::to_string(&serde_json::Value::from(other.clone())).unwrap_or_default(),
        ),
    }
}

/// Match `%`, `_` and the escape character literally.
fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_is_always_bound_first() {
        let q = DocQuery::collection("quizzes").filter(Predicate::eq("userId", "u1"));
        let c = compile_query(&q);
        assert_eq!(
            c.where_clause,
            "WHERE collection = ? AND json_extract(payload, '$.userId') = ?"
        );
        assert_eq!(c.params.len(), 2);
    }

    #[test]
    fn sort_and_limit() {
        let q = DocQuery::collection("quizzes")
            .order_by("score", false)
            .order_by("created", false)
            .limit(5);
        let c = compile_query(&q);
        assert_eq!(
            c.order_clause,
            "ORDER BY json_extract(payload, '$.score') DESC, created DESC"
        );
        assert_eq!(c.limit_offset, "LIMIT 5");
    }

    #[test]
    fn empty_in_matches_nothing() {
        let (sql, params) = compile_predicate(&Predicate::In("kind".into(), vec![]));
        assert_eq!(sql, "0");
        assert!(params.is_empty());
    }

    #[test]
    fn contains_escapes_like_wildcards() {
        let (sql, params) =
            compile_predicate(&Predicate::Contains("title".into(), "50%_Ok\\".into()));
        assert_eq!(
            sql,
            "fold_case(json_extract(payload, '$.title')) LIKE ? ESCAPE '\\'"
        );
        assert_eq!(params, vec![SqlValue::Text("%50\\%\\_ok\\\\%".into())]);
    }
}
