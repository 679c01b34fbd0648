//! SQL policy command: render a bundled script, never execute it

use std::path::PathBuf;

use anyhow::{Context, Result};

use fabric_wall::templates::{render_sql_policy, PolicyParams, SqlPolicy};

use super::GlobalArgs;

#[derive(Debug, Clone)]
pub struct SqlPolicyArgs {
    pub policy: SqlPolicy,
    pub params: PolicyParams,
    pub output: Option<PathBuf>,
}

pub fn cmd_sql_policy(globals: &GlobalArgs, args: SqlPolicyArgs) -> Result<()> {
    let script = render_sql_policy(args.policy, &args.params)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &script)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if globals.json {
                let _ = crate::ui::json::emit(serde_json::json!({
                    "event": "rendered",
                    "policy": args.policy.file_name(),
                    "path": path.display().to_string(),
                }));
            } else {
                eprintln!("Wrote {} to {}", args.policy.file_name(), path.display());
            }
        }
        None if globals.json => {
            let _ = crate::ui::json::emit(serde_json::json!({
                "event": "rendered",
                "policy": args.policy.file_name(),
                "sql": script,
            }));
        }
        None => print!("{}", script),
    }
    Ok(())
}
