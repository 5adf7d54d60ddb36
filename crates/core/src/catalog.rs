/// A single SQL domain to provision: a named, reusable column constraint
/// combining a base type with a default value expression.
///
/// `default_value` is inserted verbatim after `DEFAULT` in the generated
/// statement; quoting is part of the catalog data, not of the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainDefinition {
    pub name: &'static str,
    pub base_type: &'static str,
    pub default_value: &'static str,
}

/// Domains backing the geography schema (countries, continents, users).
///
/// Order is significant only for deterministic reporting; the entries have
/// no inter-domain dependencies.
const CATALOG: &[DomainDefinition] = &[
    DomainDefinition {
        name: "dom_name",
        base_type: "varchar(100)",
        default_value: "''",
    },
    DomainDefinition {
        name: "dom_description",
        base_type: "varchar(500)",
        default_value: "''",
    },
    DomainDefinition {
        name: "dom_code",
        base_type: "varchar(10)",
        default_value: "''",
    },
    DomainDefinition {
        name: "dom_capital",
        base_type: "varchar(100)",
        default_value: "''",
    },
    DomainDefinition {
        name: "dom_area",
        base_type: "numeric(12,2)",
        default_value: "0",
    },
    DomainDefinition {
        name: "dom_population",
        base_type: "bigint",
        default_value: "0",
    },
    DomainDefinition {
        name: "dom_latitude",
        base_type: "numeric(9,6)",
        default_value: "0",
    },
    DomainDefinition {
        name: "dom_longitude",
        base_type: "numeric(9,6)",
        default_value: "0",
    },
    DomainDefinition {
        name: "dom_flag",
        base_type: "varchar(255)",
        default_value: "''",
    },
    DomainDefinition {
        name: "dom_currency",
        base_type: "varchar(50)",
        default_value: "''",
    },
    DomainDefinition {
        name: "dom_language",
        base_type: "varchar(50)",
        default_value: "''",
    },
    DomainDefinition {
        name: "dom_timezone",
        base_type: "varchar(50)",
        default_value: "'UTC'",
    },
    DomainDefinition {
        name: "dom_email",
        base_type: "varchar(150)",
        default_value: "''",
    },
    DomainDefinition {
        name: "dom_username",
        base_type: "varchar(50)",
        default_value: "''",
    },
    DomainDefinition {
        name: "dom_password",
        base_type: "varchar(255)",
        default_value: "''",
    },
    DomainDefinition {
        name: "dom_url",
        base_type: "varchar(255)",
        default_value: "''",
    },
    DomainDefinition {
        name: "dom_phone",
        base_type: "varchar(30)",
        default_value: "''",
    },
    DomainDefinition {
        name: "dom_active",
        base_type: "boolean",
        default_value: "true",
    },
    DomainDefinition {
        name: "dom_created_at",
        base_type: "timestamp",
        default_value: "now()",
    },
    DomainDefinition {
        name: "dom_updated_at",
        base_type: "timestamp",
        default_value: "now()",
    },
];

/// Returns the full catalog in provisioning order.
pub fn entries() -> &'static [DomainDefinition] {
    CATALOG
}
