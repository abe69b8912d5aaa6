//! Presentation of assessments: byte formatting, JSON payloads, and (with the
//! `cli` feature) the colored human report.

#![allow(missing_docs)]

#[cfg(feature = "cli")]
pub mod human;

use serde_json::{Value, json};

use crate::advisor::{Advisory, Assessment, TargetImpact};
use crate::scanner::extensions::top_extensions;

/// Human-readable size at base 1024 (`B`, `KB`, `MB`, `GB`, `TB`).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;
    const TIB: u64 = 1024 * GIB;

    if bytes >= TIB {
        format!("{:.1} TB", bytes as f64 / TIB as f64)
    } else if bytes >= GIB {
        format!("{:.1} GB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Structured payload for `--json` output.
#[must_use]
pub fn assessment_json(assessment: &Assessment, top: usize) -> Value {
    let mut payload = json!({
        "command": assessment.command_line,
        "kind": assessment.advisory.kind(),
        "warning": assessment.advisory.warning(),
    });
    match &assessment.advisory {
        Advisory::Power { action } => {
            payload["action"] = json!(action.as_str());
        }
        Advisory::RecursiveRemove { force, .. } => {
            payload["force"] = json!(force);
            payload["targets"] = assessment
                .targets
                .iter()
                .map(|target| target_json(target, top))
                .collect();
        }
        Advisory::CustomRule { name, .. } => {
            payload["rule"] = json!(name);
        }
        Advisory::Unrecognized => {}
    }
    payload
}

fn target_json(target: &TargetImpact, top: usize) -> Value {
    match &target.outcome {
        Ok(scan) => {
            let ranked: Vec<Value> = top_extensions(scan.file_types(), top)
                .into_iter()
                .map(|(extension, count)| json!({ "extension": extension, "count": count }))
                .collect();
            json!({
                "path": target.path.to_string_lossy(),
                "scan": scan,
                "total_size_human": format_bytes(scan.total_size()),
                "top_extensions": ranked,
            })
        }
        Err(err) => json!({
            "path": target.path.to_string_lossy(),
            "error": {
                "code": err.code(),
                "message": err.to_string(),
            },
        }),
    }
}
