use crate::model::ParamType;

pub(super) fn ts_type(ty: &ParamType) -> String {
    match ty {
        ParamType::Int | ParamType::Float => "number".into(),
        ParamType::String | ParamType::Uuid => "string".into(),
        ParamType::Date | ParamType::Timestamp => "Date | string".into(),
        ParamType::Bool => "boolean".into(),
        ParamType::Bytes => "Uint8Array".into(),
        ParamType::Vector => "number[]".into(),
        ParamType::Json | ParamType::Custom(_) => "unknown".into(),
        ParamType::Array(element) => {
            let inner = ts_type(element);
            if inner.contains(' ') {
                format!("({inner})[]")
            } else {
                format!("{inner}[]")
            }
        }
    }
}

/// Words TypeScript does not accept as function names.
pub(super) const RESERVED: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with", "await", "yield", "let", "static", "implements",
    "interface", "package", "private", "protected", "public",
];
