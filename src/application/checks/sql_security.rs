//! SQL Security suite: row/column security on the SQL analytics endpoint

use super::SuiteContext;
use crate::application::recorder::{CheckRecorder, Verdict};
use crate::domain::ports::SqlEndpoint;
use crate::domain::value_objects::Category;
use crate::error::ApiError;
use crate::templates::validate_identifier;

pub const SQL_CONNECTIVITY: &str = "SQL Connectivity";
pub const ROW_LEVEL_SECURITY: &str = "Row-Level Security";
pub const DYNAMIC_DATA_MASKING: &str = "Dynamic Data Masking";
pub const COLUMN_LEVEL_SECURITY: &str = "Column-Level Security";
pub const ROW_VISIBILITY: &str = "Row Visibility";

const PROBE_SQL: &str = "SELECT 1";
const RLS_SQL: &str = "SELECT COUNT(*) FROM sys.security_policies WHERE is_enabled = 1";
const DDM_SQL: &str = "SELECT COUNT(*) FROM sys.masked_columns";
/// Object permissions scoped to individual columns
const CLS_SQL: &str =
    "SELECT COUNT(*) FROM sys.database_permissions WHERE class = 1 AND minor_id > 0";

/// Every query after the connectivity probe is skipped when the probe fails.
pub fn run(ctx: &SuiteContext<'_>, sql: &dyn SqlEndpoint, rec: &mut CheckRecorder<'_>) {
    let connected = rec.run(
        SQL_CONNECTIVITY,
        Category::SqlSecurity,
        || sql.query_scalar(PROBE_SQL),
        |_| Verdict::pass("SQL analytics endpoint accepted a query"),
    );
    if connected.is_none() {
        return;
    }

    rec.run(
        ROW_LEVEL_SECURITY,
        Category::SqlSecurity,
        || sql.query_scalar(RLS_SQL),
        |n| {
            presence_verdict(
                *n,
                ("enabled security policy", "security policies"),
                "Apply `fabric-wall sql-policy rls` to the shared tables",
            )
        },
    );
    rec.run(
        DYNAMIC_DATA_MASKING,
        Category::SqlSecurity,
        || sql.query_scalar(DDM_SQL),
        |n| {
            presence_verdict(
                *n,
                ("masked column", "masked columns"),
                "Apply `fabric-wall sql-policy ddm` to sensitive columns",
            )
        },
    );
    rec.run(
        COLUMN_LEVEL_SECURITY,
        Category::SqlSecurity,
        || sql.query_scalar(CLS_SQL),
        |n| {
            presence_verdict(
                *n,
                ("column-scoped permission", "column-scoped permissions"),
                "Apply `fabric-wall sql-policy cls` to restrict readable columns",
            )
        },
    );

    rec.run(
        ROW_VISIBILITY,
        Category::SqlSecurity,
        || row_count(sql, ctx.row_count_table),
        |n| Verdict::pass(format!("{} row(s) visible to this identity", n)),
    );
}

fn presence_verdict(count: i64, nouns: (&str, &str), recommendation: &str) -> Verdict {
    let (singular, plural) = nouns;
    if count > 0 {
        let noun = if count == 1 { singular } else { plural };
        Verdict::pass(format!("{} {}", count, noun))
    } else {
        Verdict::fail(format!("No {} found", plural))
            .with_risk("Consumers reading through the SQL endpoint see every row and column")
            .with_recommendation(recommendation)
    }
}

fn row_count(sql: &dyn SqlEndpoint, table: Option<&str>) -> Result<i64, ApiError> {
    let table = table.ok_or_else(|| {
        ApiError::Sql("validation.row_count_table is not configured".to_string())
    })?;
    validate_identifier("row_count_table", table).map_err(|e| ApiError::Sql(e.to_string()))?;

    let quoted = table
        .split('.')
        .map(|part| format!("[{}]", part.trim()))
        .collect::<Vec<_>>()
        .join(".");
    sql.query_scalar(&format!("SELECT COUNT_BIG(*) FROM {}", quoted))
}
