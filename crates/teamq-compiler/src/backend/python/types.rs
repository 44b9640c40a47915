use crate::model::ParamType;

pub(super) fn py_type(ty: &ParamType) -> String {
    match ty {
        ParamType::Int => "int".into(),
        ParamType::Float => "float".into(),
        ParamType::String | ParamType::Uuid => "str".into(),
        ParamType::Bool => "bool".into(),
        ParamType::Date => "datetime.date".into(),
        ParamType::Timestamp => "datetime.datetime".into(),
        ParamType::Bytes => "bytes".into(),
        ParamType::Vector => "list[float]".into(),
        ParamType::Json | ParamType::Custom(_) => "Any".into(),
        ParamType::Array(element) => format!("list[{}]", py_type(element)),
    }
}

pub(super) fn uses_datetime(ty: &ParamType) -> bool {
    match ty {
        ParamType::Date | ParamType::Timestamp => true,
        ParamType::Array(element) => uses_datetime(element),
        _ => false,
    }
}

/// Python keywords, plus the names a generated module binds itself.
pub(super) const RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield", "conn", "params", "statement", "render", "fetch_one", "fetch_many",
    "execute_affected", "datetime",
];
