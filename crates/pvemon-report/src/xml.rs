//! Pandora FMS agent XML rendering.
//!
//! The document is a three-line comment header, a blank line, then one
//! `<module>` block per module with child tags in fixed order. Character
//! data (name, data, module_group, string thresholds) is CDATA-wrapped and
//! hardened against embedded `]]>`; numeric threshold tags appear only when
//! the source value is present.

use crate::module::{format_float, Module};
use chrono::{DateTime, Local};
use std::fmt::Write;
use thiserror::Error;

pub const AGENT_NAME: &str = "Proxmox_Ceph_Monitor";
pub const AGENT_VERSION: &str = "1.1";

/// Faults escaping the serializer. Rendering is expected to succeed for any
/// module list the assembler produces; this is the one error class surfaced
/// to the top level.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report rendering failed: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Renders the header block and every module, in order, as one text
/// document.
pub fn render(modules: &[Module], generated_at: DateTime<Local>) -> Result<String, ReportError> {
    let mut out = String::new();
    writeln!(out, "# Agent: {AGENT_NAME}")?;
    writeln!(out, "# Version: {AGENT_VERSION}")?;
    writeln!(out, "# Date: {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out)?;

    for module in modules {
        write_module(&mut out, module)?;
    }

    Ok(out)
}

fn write_module(out: &mut String, module: &Module) -> Result<(), ReportError> {
    writeln!(out, "<module>")?;
    writeln!(out, "<name><![CDATA[{}]]></name>", cdata(&module.name))?;
    writeln!(out, "<type><![CDATA[{}]]></type>", module.module_type)?;
    writeln!(out, "<description>{}</description>", module.description)?;
    writeln!(
        out,
        "<data><![CDATA[{}]]></data>",
        cdata(&module.value.render())
    )?;
    if let Some(group) = &module.group {
        writeln!(
            out,
            "<module_group><![CDATA[{}]]></module_group>",
            cdata(group)
        )?;
    }
    if let Some(value) = module.min_warning {
        writeln!(out, "<min_warning>{}</min_warning>", threshold(value))?;
    }
    if let Some(value) = module.max_warning {
        writeln!(out, "<max_warning>{}</max_warning>", threshold(value))?;
    }
    if let Some(value) = module.min_critical {
        writeln!(out, "<min_critical>{}</min_critical>", threshold(value))?;
    }
    if let Some(value) = module.max_critical {
        writeln!(out, "<max_critical>{}</max_critical>", threshold(value))?;
    }
    if let Some(pattern) = &module.str_warning {
        writeln!(
            out,
            "<str_warning><![CDATA[{}]]></str_warning>",
            cdata(pattern)
        )?;
    }
    if let Some(pattern) = &module.str_critical {
        writeln!(
            out,
            "<str_critical><![CDATA[{}]]></str_critical>",
            cdata(pattern)
        )?;
    }
    writeln!(out, "</module>")?;
    Ok(())
}

/// Escapes text for inclusion in a CDATA section by splitting any embedded
/// `]]>` terminator across two sections. Round-tripping through an XML
/// parser reproduces the original text.
pub(crate) fn cdata(text: &str) -> String {
    text.replace("]]>", "]]]]><![CDATA[>")
}

/// Whole-valued thresholds render as integers (`85`, `0`), anything else the
/// same way float data does.
fn threshold(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format_float(value)
    }
}
