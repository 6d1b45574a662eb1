//! Render inserts as literal SQL statements

use crate::model::{Insert, Value};
use crate::operation::Destination;

/// Destination that collects one `INSERT` statement per row
#[derive(Debug, Default)]
pub struct SqlScript {
    statements: Vec<String>,
}

impl SqlScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// All statements, each terminated by `;` and a newline
    pub fn to_script(&self) -> String {
        let mut script = String::new();
        for statement in &self.statements {
            script.push_str(statement);
            script.push_str(";\n");
        }
        script
    }
}

impl Destination for SqlScript {
    fn insert(&mut self, insert: &Insert) -> anyhow::Result<()> {
        self.statements.extend(statements(insert));
        Ok(())
    }
}

/// Statements for every row of one batch
pub fn statements(insert: &Insert) -> Vec<String> {
    let columns = insert
        .columns()
        .iter()
        .map(|c| identifier(c))
        .collect::<Vec<_>>()
        .join(", ");

    insert
        .rows()
        .iter()
        .map(|row| {
            let values = row.iter().map(literal).collect::<Vec<_>>().join(", ");
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                identifier(insert.table()),
                columns,
                values
            )
        })
        .collect()
}

/// Double-quoted identifier
fn identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQL literal for a value
fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Int(i) => i.to_string(),
        // Keep a decimal point so the literal is not read as an integer
        Value::Float(f) if f.fract() == 0.0 && f.is_finite() => format!("{:.1}", f),
        Value::Float(f) => f.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Date(d) => format!("DATE '{}'", d.format("%Y-%m-%d")),
        Value::DateTime(dt) => format!("TIMESTAMP '{}'", dt.format("%Y-%m-%d %H:%M:%S%.f")),
    }
}
