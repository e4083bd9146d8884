use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// 解码后的文本及其来源编码
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub content: String,
    pub encoding: String,
}

impl DecodedText {
    /// 尝试多种编码解码
    ///
    /// 先按 UTF-8 严格解码（去掉 UTF-8 BOM），失败时按 Windows-1252 解码整个文件。
    /// Windows-1252 为全部 256 个字节定义了字符，因此该回退总能成功，
    /// 且用同一编码写回时字节保持不变。
    pub fn decode(data: &[u8]) -> Self {
        let body = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        if let Some(content) = UTF_8.decode_without_bom_handling_and_without_replacement(body) {
            return DecodedText {
                content: content.into_owned(),
                encoding: UTF_8.name().to_lowercase(),
            };
        }

        let (content, _) = WINDOWS_1252.decode_without_bom_handling(data);
        DecodedText {
            content: content.into_owned(),
            encoding: WINDOWS_1252.name().to_lowercase(),
        }
    }
}

/// 按编码标签将文本编码回字节
///
/// 未知标签按 UTF-8 处理。文本中含有目标编码无法表示的字符时返回 None。
pub fn encode(text: &str, encoding: &str) -> Option<Vec<u8>> {
    match Encoding::for_label(encoding.as_bytes()) {
        Some(enc) if enc != UTF_8 => {
            let (bytes, _, had_errors) = enc.encode(text);
            if had_errors {
                None
            } else {
                Some(bytes.into_owned())
            }
        }
        _ => Some(text.as_bytes().to_vec()),
    }
}

/// 把字符偏移换算为 1 起始的行号和列号
///
/// 超出内容末尾的偏移被夹到末尾。
pub fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for ch in content.chars().take(offset) {
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}
