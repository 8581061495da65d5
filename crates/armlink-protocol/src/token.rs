//! 行分词
//!
//! 纯词法层：不认识任何指令关键字。

use crate::ProtocolError;

/// 将一行文本拆分为去空白的非空字段序列
///
/// 空行、无字段或含空字段的行返回 `MalformedLine`。
pub fn tokenize(line: &str) -> Result<Vec<&str>, ProtocolError> {
    if line.trim().is_empty() {
        return Err(ProtocolError::MalformedLine("empty line".to_string()));
    }

    let mut fields = Vec::new();
    for (i, raw) in line.split(',').enumerate() {
        let field = raw.trim();
        if field.is_empty() {
            return Err(ProtocolError::MalformedLine(format!(
                "empty field at position {i}"
            )));
        }
        fields.push(field);
    }
    Ok(fields)
}
