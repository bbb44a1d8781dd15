//! Symbol table dumping
//!
//! When a scope closes, the analyzer reports every symbol it held, in
//! declaration order, followed by an end-of-scope marker. The sink is a trait
//! so the driver can print text while tests capture events.

use crate::types::Ty;
use std::io::Write;

/// Sink for scope-exit events
pub trait ScopeDump {
    /// A variable symbol: name, stack offset, type
    fn variable(&mut self, name: &str, offset: i32, ty: Ty);
    /// A function symbol: name and rendered signature (`(T1,T2)->RT`)
    fn function(&mut self, name: &str, signature: &str);
    /// The scope holding the preceding symbols has closed
    fn end_scope(&mut self);
}

/// Textual dump, one line per symbol
pub struct TextDump<W: Write> {
    out: W,
}

impl<W: Write> TextDump<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ScopeDump for TextDump<W> {
    fn variable(&mut self, name: &str, offset: i32, ty: Ty) {
        let _ = writeln!(self.out, "{} {} {}", name, ty, offset);
    }

    fn function(&mut self, name: &str, signature: &str) {
        let _ = writeln!(self.out, "{} {} 0", name, signature);
    }

    fn end_scope(&mut self) {
        let _ = writeln!(self.out, "---end scope---");
    }
}

/// Recording dump for tests
#[cfg(test)]
pub struct RecordingDump {
    pub events: Vec<DumpEvent>,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum DumpEvent {
    Variable { name: String, offset: i32, ty: Ty },
    Function { name: String, signature: String },
    EndScope,
}

#[cfg(test)]
impl RecordingDump {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

#[cfg(test)]
impl ScopeDump for RecordingDump {
    fn variable(&mut self, name: &str, offset: i32, ty: Ty) {
        self.events.push(DumpEvent::Variable {
            name: name.to_string(),
            offset,
            ty,
        });
    }

    fn function(&mut self, name: &str, signature: &str) {
        self.events.push(DumpEvent::Function {
            name: name.to_string(),
            signature: signature.to_string(),
        });
    }

    fn end_scope(&mut self) {
        self.events.push(DumpEvent::EndScope);
    }
}
