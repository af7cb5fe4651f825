//! Text and JSON output for the `check` and `trace` commands.

use std::fmt::Write;

use serde_json::json;

use sepl_core::recording::DriverCall;
use sepl_core::{CompiledScript, ExecutionReport, VariableStore};

pub fn check_text(script: &CompiledScript) -> String {
    let mut out = String::new();
    write_variables(&mut out, script.variables());
    let _ = writeln!(out, "statements:");
    for (i, statement) in script.statements().iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, statement);
    }
    out
}

pub fn check_json(script: &CompiledScript) -> serde_json::Value {
    json!({
        "variables": script.variables(),
        "statements": script.statements(),
    })
}

pub fn trace_text(calls: &[DriverCall], variables: &VariableStore, report: Option<&ExecutionReport>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "calls:");
    for call in calls {
        let _ = writeln!(out, "  {}", describe(call));
    }
    write_variables(&mut out, variables);
    if let Some(report) = report {
        let _ = writeln!(
            out,
            "completed {} statements in {}ms (started {})",
            report.steps.len(),
            report.elapsed_ms,
            report.started_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S")
        );
    }
    out
}

pub fn trace_json(
    calls: &[DriverCall],
    variables: &VariableStore,
    report: Option<&ExecutionReport>,
) -> serde_json::Value {
    json!({
        "calls": calls,
        "variables": variables,
        "report": report,
    })
}

fn write_variables(out: &mut String, variables: &VariableStore) {
    let _ = writeln!(out, "variables:");
    for (name, value) in variables.iter() {
        let _ = writeln!(out, "  {} = {:?}", name, value);
    }
}

fn describe(call: &DriverCall) -> String {
    match call {
        DriverCall::Navigate { url } => format!("navigate {}", url),
        DriverCall::Find { kind, selector } => format!("find {}::{:?}", kind.prefix(), selector),
        DriverCall::Click { selector } => format!("click {:?}", selector),
        DriverCall::SendKeys { selector, text } => format!("send_keys {:?} {:?}", selector, text),
        DriverCall::GetText { selector } => format!("text {:?}", selector),
        DriverCall::GetInnerHtml { selector } => format!("inner_html {:?}", selector),
        DriverCall::Close => "close".to_string(),
    }
}
