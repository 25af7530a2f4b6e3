//! Profile prologue/epilogue templates and final file assembly.
//!
//! Templates are opaque pre-authored text blocks covering homing, heating,
//! priming and cooldown. The translation core never generates
//! printer-specific setup commands itself; it only selects which template a
//! profile references, keeping the emitter printer-agnostic.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{GcodeError, Result};
use crate::profile::PrinterProfile;

/// Named store of opaque template text blocks.
///
/// Ships with prologues and epilogues for the built-in profiles; additional
/// templates can be registered from strings or files.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    templates: BTreeMap<String, String>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateStore {
    /// An empty store.
    pub fn empty() -> Self {
        Self {
            templates: BTreeMap::new(),
        }
    }

    /// A store holding the templates of all built-in profiles.
    pub fn builtin() -> Self {
        let mut store = Self::empty();
        store.insert("generic/prologue", GENERIC_PROLOGUE);
        store.insert("generic/epilogue", GENERIC_EPILOGUE);
        store.insert("prusa-mk4s/prologue", PRUSA_MK4S_PROLOGUE);
        store.insert("prusa-mk4s/epilogue", PRUSA_MK4S_EPILOGUE);
        store.insert("hyrel-30m/prologue", HYREL_30M_PROLOGUE);
        store.insert("hyrel-30m/epilogue", HYREL_30M_EPILOGUE);
        store
    }

    /// Register a template under `name`, replacing any existing entry.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.templates.insert(name.into(), text.into());
    }

    /// Register the contents of `path` under `name`.
    pub fn insert_file(&mut self, name: impl Into<String>, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path).map_err(|e| {
            GcodeError::Config(format!("cannot read template {}: {e}", path.display()))
        })?;
        self.insert(name, text);
        Ok(())
    }

    /// Look up a template by name.
    pub fn get(&self, name: &str) -> Result<&str> {
        self.templates
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| GcodeError::MissingTemplate(name.to_string()))
    }

    /// Wrap an emitted body with the profile's prologue and epilogue,
    /// placing `header_comments` at the very top of the file.
    pub fn assemble(
        &self,
        profile: &PrinterProfile,
        header_comments: &str,
        body: &str,
    ) -> Result<String> {
        let prologue = self.get(&profile.prologue)?;
        let epilogue = self.get(&profile.epilogue)?;
        let mut out = String::with_capacity(
            header_comments.len() + prologue.len() + body.len() + epilogue.len(),
        );
        out.push_str(header_comments);
        out.push_str(prologue);
        out.push_str(body);
        out.push_str(epilogue);
        Ok(out)
    }
}

const GENERIC_PROLOGUE: &str = "\
; --- prologue ---
G21 ; units in millimetres
G90 ; absolute positioning
G28 ; home all axes
G92 E0 ; reset extruder
G1 Z5 F3000 ; clear the bed
";

const GENERIC_EPILOGUE: &str = "\
; --- epilogue ---
M104 S0 ; nozzle off
M140 S0 ; bed off
G91
G1 Z10 F3000 ; raise
G90
M84 ; disable motors
";

const PRUSA_MK4S_PROLOGUE: &str = "\
; --- Prusa MK4S PLA prologue ---
G21 ; units in millimetres
G90 ; absolute positioning
M104 S215 ; set nozzle temperature
M140 S60 ; set bed temperature
G28 ; home all axes
G29 ; mesh bed levelling
M109 S215 ; wait for nozzle temperature
M190 S60 ; wait for bed temperature
G92 E0 ; reset extruder
G1 Z0.2 F720
G1 X60 E9 F1000 ; purge line
G1 X100 E12.5 F1000
G92 E0
";

const PRUSA_MK4S_EPILOGUE: &str = "\
; --- Prusa MK4S epilogue ---
G1 E-1 F2100 ; retract
M104 S0 ; nozzle off
M140 S0 ; bed off
G91
G1 Z10 F720 ; raise
G90
G1 X241 Y170 F3600 ; park
M84 ; disable motors
";

const HYREL_30M_PROLOGUE: &str = "\
; --- Hyrel System 30M prologue ---
; tested on System 30M only
G21 ; units in millimetres
G53 ; clear offsets
G28 X0 Y0 ; home XY
M6 T12 O2 X105.000 Y86.000 Z0.000 ; tool offset
M109 T12 S80 ; nozzle temperature
M190 S0 ; bed temperature
M721 T12 S0 E0 P0 ; disable unpriming
M722 T12 S0 E0 P0 ; disable priming
M229 E1 D1 ; volumetric flow
M221 T12 W0.200 Z0.120 S1.000 P1297 ; flow configuration
G4 P1
T1 ; select tool
M106 T12 P50 ; UV array duty cycle
";

const HYREL_30M_EPILOGUE: &str = "\
; --- Hyrel System 30M epilogue ---
M104 S0 ; nozzle off
M190 S0 ; bed off
G28 X0 Y0 ; home XY
M18 ; motors off
M30 ; signal finished print
";
