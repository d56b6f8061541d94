use serde_json::{json, Value};

const COMPONENT: &str = "function_deployer";

pub(crate) fn log_info(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": COMPONENT,
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

pub(crate) fn log_error(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": COMPONENT,
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
