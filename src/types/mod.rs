//! Type domain for Brik
//!
//! The language has a closed set of primitive types and a single implicit
//! widening rule: BYTE is usable wherever INT is expected.

use std::fmt;

/// Primitive type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ty {
    Void,
    Int,
    Byte,
    Bool,
    Str,
}

impl Ty {
    /// Check if the type participates in arithmetic and comparisons
    pub fn is_numeric(self) -> bool {
        matches!(self, Ty::Int | Ty::Byte)
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ty::Void => "VOID",
            Ty::Int => "INT",
            Ty::Byte => "BYTE",
            Ty::Bool => "BOOL",
            Ty::Str => "STRING",
        };
        write!(f, "{}", name)
    }
}

/// Check whether a value of `from` may be used where `to` is expected.
///
/// Exact match, or BYTE widening to INT. Never the reverse, never across
/// BOOL/STRING/VOID.
pub fn is_assignable(from: Ty, to: Ty) -> bool {
    from == to || (from == Ty::Byte && to == Ty::Int)
}

/// Result type of `+ - * /` over two numeric operands.
///
/// BYTE only when both operands are BYTE, otherwise INT. Returns None when
/// either operand is non-numeric.
pub fn numeric_result(a: Ty, b: Ty) -> Option<Ty> {
    if !a.is_numeric() || !b.is_numeric() {
        return None;
    }
    if a == Ty::Byte && b == Ty::Byte {
        Some(Ty::Byte)
    } else {
        Some(Ty::Int)
    }
}

/// Render a function signature as `(T1,T2,...)->RT` for the symbol dumper.
pub fn function_type_string(params: &[Ty], ret: Ty) -> String {
    let params: Vec<String> = params.iter().map(|t| t.to_string()).collect();
    format!("({})->{}", params.join(","), ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn assignability_matrix() {
        let all = [Ty::Void, Ty::Int, Ty::Byte, Ty::Bool, Ty::Str];
        for &t in &all {
            assert!(is_assignable(t, t));
        }
        assert!(is_assignable(Ty::Byte, Ty::Int));
        assert!(!is_assignable(Ty::Int, Ty::Byte));
        for &a in &all {
            for &b in &all {
                if a != b && !(a == Ty::Byte && b == Ty::Int) {
                    assert!(!is_assignable(a, b), "{} -> {}", a, b);
                }
            }
        }
    }

    #[test]
    fn numeric_promotion() {
        assert_eq!(numeric_result(Ty::Byte, Ty::Byte), Some(Ty::Byte));
        assert_eq!(numeric_result(Ty::Byte, Ty::Int), Some(Ty::Int));
        assert_eq!(numeric_result(Ty::Int, Ty::Byte), Some(Ty::Int));
        assert_eq!(numeric_result(Ty::Int, Ty::Int), Some(Ty::Int));
        assert_eq!(numeric_result(Ty::Bool, Ty::Int), None);
        assert_eq!(numeric_result(Ty::Int, Ty::Str), None);
    }

    #[test]
    fn signature_rendering() {
        assert_eq!(function_type_string(&[Ty::Str], Ty::Void), "(STRING)->VOID");
        assert_eq!(function_type_string(&[], Ty::Void), "()->VOID");
        assert_eq!(
            function_type_string(&[Ty::Int, Ty::Byte], Ty::Bool),
            "(INT,BYTE)->BOOL"
        );
    }
}
