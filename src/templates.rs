//! `{{KEY}}` placeholder rendering and the bundled SQL policy templates.

use std::collections::BTreeMap;

use crate::error::{WallError, WallResult};

const RLS_TEMPLATE: &str = include_str!("../templates/sql/rls.sql");
const CLS_TEMPLATE: &str = include_str!("../templates/sql/cls.sql");
const DDM_TEMPLATE: &str = include_str!("../templates/sql/ddm.sql");

/// Substitute every `{{KEY}}` in `content`.
///
/// Keys are matched after trimming whitespace inside the braces. Every
/// unresolved key is reported at once, in order of first appearance.
pub fn render<'v, I>(template: &str, content: &str, vars: I) -> WallResult<String>
where
    I: IntoIterator<Item = (&'v str, &'v str)>,
{
    let vars: BTreeMap<&str, &str> = vars.into_iter().collect();
    let mut out = String::with_capacity(content.len());
    let mut missing: Vec<String> = Vec::new();
    let mut rest = content;

    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        out.push_str(&rest[..start]);
        let raw = &rest[start + 2..start + 2 + len];
        let key = raw.trim();
        match vars.get(key) {
            Some(value) => out.push_str(value),
            None => {
                if !missing.iter().any(|m| m == key) {
                    missing.push(key.to_string());
                }
                out.push_str(&rest[start..start + 4 + len]);
            }
        }
        rest = &rest[start + 4 + len..];
    }
    out.push_str(rest);

    if missing.is_empty() {
        Ok(out)
    } else {
        Err(WallError::UnresolvedPlaceholders {
            template: template.to_string(),
            missing,
        })
    }
}

/// Render with the identifiers from configuration
pub fn render_with_config(
    template: &str,
    content: &str,
    config: &crate::config::Config,
) -> WallResult<String> {
    let vars = config.placeholders();
    render(template, content, vars.iter().map(|(k, v)| (*k, v.as_str())))
}

/// Accept only `[A-Za-z0-9_ .@-]`, non-empty.
///
/// Values end up inside bracketed SQL identifiers and string literals, so
/// anything that could close either is rejected.
pub fn validate_identifier(name: &str, value: &str) -> WallResult<()> {
    let ok = !value.trim().is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ' ' | '.' | '@' | '-'));
    if ok {
        Ok(())
    } else {
        Err(WallError::InvalidIdentifier {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

/// Bundled SQL security templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SqlPolicy {
    /// Row-level security filter predicate
    Rls,
    /// Column-level SELECT grants
    Cls,
    /// Dynamic data masking
    Ddm,
}

impl SqlPolicy {
    pub fn file_name(&self) -> &'static str {
        match self {
            SqlPolicy::Rls => "rls.sql",
            SqlPolicy::Cls => "cls.sql",
            SqlPolicy::Ddm => "ddm.sql",
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            SqlPolicy::Rls => RLS_TEMPLATE,
            SqlPolicy::Cls => CLS_TEMPLATE,
            SqlPolicy::Ddm => DDM_TEMPLATE,
        }
    }

    pub fn from_name(name: &str) -> WallResult<Self> {
        let stem = name.trim().trim_end_matches(".sql").to_ascii_lowercase();
        match stem.as_str() {
            "rls" => Ok(SqlPolicy::Rls),
            "cls" => Ok(SqlPolicy::Cls),
            "ddm" => Ok(SqlPolicy::Ddm),
            _ => Err(WallError::UnknownTemplate {
                name: name.to_string(),
            }),
        }
    }
}

/// Identifiers substituted into a SQL policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyParams {
    pub schema: String,
    pub table: String,
    /// RLS uses the first column as its filter column
    pub columns: Vec<String>,
    pub principal: String,
    /// Schema holding the RLS predicate function
    pub security_schema: String,
}

impl PolicyParams {
    fn validate(&self) -> WallResult<()> {
        validate_identifier("schema", &self.schema)?;
        validate_identifier("table", &self.table)?;
        validate_identifier("principal", &self.principal)?;
        validate_identifier("security schema", &self.security_schema)?;
        if self.columns.is_empty() {
            return Err(WallError::MissingParameter {
                name: "columns".to_string(),
                flag: "column".to_string(),
            });
        }
        for column in &self.columns {
            validate_identifier("column", column)?;
        }
        Ok(())
    }
}

/// Render one bundled policy. Nothing is executed.
pub fn render_sql_policy(policy: SqlPolicy, params: &PolicyParams) -> WallResult<String> {
    params.validate()?;

    let column_list = params
        .columns
        .iter()
        .map(|c| format!("[{}]", c))
        .collect::<Vec<_>>()
        .join(", ");
    let mask_statements = params
        .columns
        .iter()
        .map(|c| {
            format!(
                "ALTER TABLE [{}].[{}] ALTER COLUMN [{}] ADD MASKED WITH (FUNCTION = 'default()');\nGO",
                params.schema, params.table, c
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let vars = [
        ("SCHEMA", params.schema.as_str()),
        ("TABLE", params.table.as_str()),
        ("PRINCIPAL", params.principal.as_str()),
        ("SECURITY_SCHEMA", params.security_schema.as_str()),
        ("FILTER_COLUMN", params.columns[0].as_str()),
        ("COLUMN_LIST", column_list.as_str()),
        ("MASK_STATEMENTS", mask_statements.as_str()),
    ];
    render(policy.file_name(), policy.source(), vars)
}
