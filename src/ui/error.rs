use fabric_wall::error::{ApiError, WallError};

use crate::ui::blocks::error::ErrorBlock;
use crate::ui::ci::{github_actions_annotation, AnnotationLevel};
use crate::ui::terminal::detect_capabilities;

pub fn format_wall_error(err: &WallError, supports_color: bool, supports_unicode: bool) -> String {
    let block = ErrorBlock::new(err.to_string());
    let block = match err {
        WallError::InvalidConfig { file, .. } => block
            .with_source(file.display().to_string())
            .with_fix("Fix the TOML syntax or run `fabric-wall setup` to regenerate the file."),
        WallError::ConfigNotFound { .. } => {
            block.with_fix("Check the --config path, or run `fabric-wall setup` to create one.")
        }
        WallError::MissingParameter { .. } => block.with_fix(
            "Run `fabric-wall setup`, or set FABRIC_WALL_PROVIDER_WORKSPACE_ID / FABRIC_WALL_CONSUMER_WORKSPACE_ID.",
        ),
        WallError::UnresolvedPlaceholders { .. } => {
            block.with_fix("Add the missing identifiers to fabric-wall.toml.")
        }
        WallError::InvalidIdentifier { .. } => {
            block.with_fix("Identifiers may only contain letters, digits, '_', ' ', '.', '@' and '-'.")
        }
        WallError::Api { source, .. } => match source {
            ApiError::MissingToken => {
                block.with_fix("Export ACCESS_TOKEN with a Fabric API bearer token.")
            }
            ApiError::Forbidden { .. } => block.with_fix(
                "The token's identity needs the Admin role on the workspace to provision it.",
            ),
            _ => block,
        },
        _ => block,
    };
    block.render(supports_color, supports_unicode)
}

pub fn format_error(err: &anyhow::Error, supports_color: bool, supports_unicode: bool) -> String {
    if let Some(wall) = err.downcast_ref::<WallError>() {
        return format_wall_error(wall, supports_color, supports_unicode);
    }

    let mut block = ErrorBlock::new(err.to_string());
    if let Some(cause) = err.chain().nth(1) {
        block = block.with_source(cause.to_string());
    }
    block.render(supports_color, supports_unicode)
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let output = serde_json::json!({
            "event": "error",
            "message": format!("{:#}", err),
        });
        let _ = crate::ui::json::emit(output);
        return;
    }

    let caps = detect_capabilities();
    if caps.is_github_actions {
        println!(
            "{}",
            github_actions_annotation(AnnotationLevel::Error, &format!("{:#}", err), Some("fabric-wall"))
        );
    }

    eprint!(
        "{}",
        format_error(err, caps.supports_color, caps.supports_unicode)
    );
}
