//! Random data tool implementation
//!
//! Generates batches of test data: UUIDs, emails, names, numbers or small
//! JSON objects.

use crate::tools::builtin::args::{optional_i64, required_str};
use crate::tools::{Tool, ToolContext, ToolDescription, ToolError};
use async_trait::async_trait;
use rand::Rng;
use serde_json::{json, Value};
use uuid::Uuid;

const MAX_COUNT: i64 = 100;
const NAMES: [&str; 5] = [
    "Alice Johnson",
    "Bob Smith",
    "Carol Williams",
    "David Brown",
    "Eve Davis",
];

/// Kinds of data the tool can generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Uuid,
    Email,
    Name,
    Number,
    Json,
}

impl DataKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "uuid" => Some(Self::Uuid),
            "email" => Some(Self::Email),
            "name" => Some(Self::Name),
            "number" => Some(Self::Number),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Generate the value at zero-based position `index`
    fn generate(self, index: usize, rng: &mut impl Rng) -> Value {
        match self {
            Self::Uuid => json!(Uuid::new_v4().to_string()),
            Self::Email => json!(format!("test{}@example.com", index + 1)),
            Self::Name => json!(NAMES[index % NAMES.len()]),
            Self::Number => json!(rng.random_range(0..1_000_000u32)),
            Self::Json => json!({
                "id": index + 1,
                "uuid": Uuid::new_v4().to_string(),
                "name": format!("Item {}", index + 1),
                "active": index % 2 == 0
            }),
        }
    }
}

/// Random data tool - builtin implementation
#[derive(Debug, Default)]
pub struct RandomDataTool;

impl RandomDataTool {
    pub fn new() -> Self {
        Self
    }

    /// Check the requested count (pure function)
    fn check_count(count: i64) -> Result<usize, ToolError> {
        if !(1..=MAX_COUNT).contains(&count) {
            return Err(ToolError::InvalidArgument(format!(
                "count must be between 1 and {MAX_COUNT}"
            )));
        }
        Ok(count as usize)
    }

    /// Generate `count` values of `kind`
    pub fn generate(kind: DataKind, count: usize) -> Vec<Value> {
        let mut rng = rand::rng();
        (0..count).map(|i| kind.generate(i, &mut rng)).collect()
    }
}

#[async_trait]
impl Tool for RandomDataTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "random_data".to_string(),
            description: "Generate random test data".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "data_type": {
                        "type": "string",
                        "description": "One of: uuid, email, name, number, json"
                    },
                    "count": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": MAX_COUNT,
                        "default": 1
                    }
                },
                "required": ["data_type"]
            }),
        }
    }

    async fn execute(&self, parameters: &Value, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let data_type = required_str(parameters, "data_type")?;
        let count = Self::check_count(optional_i64(parameters, "count")?.unwrap_or(1))?;
        let kind = DataKind::parse(data_type).ok_or_else(|| {
            ToolError::InvalidArgument(
                "unknown data_type: must be one of (uuid, email, name, number, json)".to_string(),
            )
        })?;

        Ok(json!({
            "status": "success",
            "data_type": data_type,
            "count": count,
            "results": Self::generate(kind, count)
        }))
    }
}
