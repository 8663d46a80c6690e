//! Table configuration types (Functional Core - pure data).

/// Table schema configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub gsis: Vec<GsiConfig>,
    pub billing_mode: BillingMode,
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

/// DynamoDB attribute types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
}

/// Global Secondary Index configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsiConfig {
    pub name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub projection: ProjectionType,
}

/// GSI projection type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionType {
    All,
    KeysOnly,
}

/// Billing mode for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    PayPerRequest,
}

impl TableConfig {
    /// Sets the table name.
    pub fn with_table_name(mut self, name: &str) -> Self {
        self.table_name = name.to_string();
        self
    }
}

/// The single table every lpa record lives in, with the indexes the
/// scheduler queries. Pure data, no I/O.
pub fn lpa_table_config() -> TableConfig {
    TableConfig {
        table_name: "lpa".to_string(),
        partition_key: string_attribute("PK"),
        sort_key: Some(string_attribute("SK")),
        gsis: vec![
            GsiConfig {
                name: "LpaUIDIndex".to_string(),
                partition_key: string_attribute("LpaUID"),
                sort_key: None,
                projection: ProjectionType::KeysOnly,
            },
            GsiConfig {
                name: "SKUpdatedAtIndex".to_string(),
                partition_key: string_attribute("SK"),
                sort_key: Some(string_attribute("UpdatedAt")),
                projection: ProjectionType::All,
            },
        ],
        billing_mode: BillingMode::PayPerRequest,
    }
}

fn string_attribute(name: &str) -> KeyAttribute {
    KeyAttribute {
        name: name.to_string(),
        attribute_type: AttributeType::String,
    }
}
