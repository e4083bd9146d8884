use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 会话操作错误类型
///
/// 所有错误都作为返回值交给调用方处理，会话本身不会因此终止。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// 文件读写失败
    #[error("IO error on {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    /// 引用的文档名已不在对应集合中
    #[error("Document not found: {name}")]
    NotFound { name: String },

    /// 语言列表为空
    #[error("No target languages available")]
    NoLanguages,

    /// 语言列表获取失败
    #[error("Language list unavailable: {0}")]
    Catalog(String),

    /// 配置文件无效
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SessionError {
    /// 从任意错误构造 IO 错误（记录出错路径）
    pub fn io(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// 构造 NotFound 错误
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}

/// 源文档中的位置：源文档名 + 字符偏移
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    /// 源文档名
    pub source: String,
    /// 字符偏移（按 Unicode 标量值计数）
    pub offset: usize,
}

impl SourcePosition {
    pub fn new(source: impl Into<String>, offset: usize) -> Self {
        Self {
            source: source.into(),
            offset,
        }
    }
}

/// 翻译错误
///
/// 每次翻译尝试都会重新生成，并完整覆盖上一次的错误。
/// `position` 为空表示错误无法归属到具体位置（例如翻译器内部故障）。
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct TranslationError {
    /// 人类可读的错误描述
    pub message: String,
    /// 可导航的源位置（可选）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<SourcePosition>,
}

impl TranslationError {
    /// 带位置的翻译错误
    pub fn at(message: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            message: message.into(),
            position: Some(position),
        }
    }

    /// 无位置的翻译错误
    pub fn unlocated(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
