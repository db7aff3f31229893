//! Purpose: Shared JSON serializers for CLI stdout payloads.
//! Exports: `chain_report_json`, `attr_json`, `header_written_json`.
//! Role: Keep envelope shapes consistent across harness entry points.
//! Invariants: Stable key names; fields are additive-only once published.
use std::path::Path;

use serde_json::{Map, Value, json};

use linkprobe::core::attr::{BuildRole, Linkage, PlatformFamily, SymbolAttr};
use linkprobe::core::chain::ChainReport;
use linkprobe::core::error::{Error, ErrorKind};

pub(crate) fn chain_report_json(report: &ChainReport) -> Result<Value, Error> {
    let checks = serde_json::to_value(&report.checks).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to serialize chain report")
            .with_source(err)
    })?;
    let mut map = Map::new();
    map.insert("checks".to_string(), checks);
    map.insert("ok".to_string(), json!(report.ok));
    Ok(Value::Object(map))
}

pub(crate) fn attr_json(
    platform: PlatformFamily,
    linkage: Linkage,
    role: BuildRole,
    attr: SymbolAttr,
) -> Value {
    let platform = match platform {
        PlatformFamily::Windows => "windows",
        PlatformFamily::Attribute => "attribute",
    };
    let linkage = match linkage {
        Linkage::Static => "static",
        Linkage::Dynamic => "dynamic",
    };
    let role = match role {
        BuildRole::Owning => "owning",
        BuildRole::Consuming => "consuming",
    };
    json!({
        "platform": platform,
        "linkage": linkage,
        "role": role,
        "decoration": attr.c_decoration(),
    })
}

pub(crate) fn header_written_json(lib: &str, path: &Path, bytes: usize) -> Value {
    json!({
        "lib": lib,
        "path": path.display().to_string(),
        "bytes": bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::{attr_json, chain_report_json};
    use linkprobe::core::attr::{BuildRole, Linkage, PlatformFamily, SymbolAttr};
    use linkprobe::core::chain::{Expectations, run_chain};

    #[test]
    fn chain_report_envelope_shape() {
        let report = run_chain(&Expectations::default());
        let value = chain_report_json(&report).expect("serializable");
        assert_eq!(value.get("ok").and_then(|v| v.as_bool()), Some(true));
        let checks = value
            .get("checks")
            .and_then(|v| v.as_array())
            .expect("checks array");
        assert_eq!(checks.len(), 3);
        assert_eq!(checks[0].get("symbol").and_then(|v| v.as_str()), Some("foo"));
        assert_eq!(checks[1].get("actual").and_then(|v| v.as_i64()), Some(456));
    }

    #[test]
    fn attr_envelope_shape() {
        let value = attr_json(
            PlatformFamily::Windows,
            Linkage::Dynamic,
            BuildRole::Owning,
            SymbolAttr::DllExport,
        );
        assert_eq!(value["platform"], "windows");
        assert_eq!(value["linkage"], "dynamic");
        assert_eq!(value["role"], "owning");
        assert_eq!(value["decoration"], "__declspec(dllexport)");
    }
}
