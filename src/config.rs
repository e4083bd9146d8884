use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};

/// 会话配置（可选 JSON 配置文件）
///
/// 命令行参数会覆盖配置文件中的同名字段，见 [`SessionConfig::merged_with`]。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 翻译器程序路径
    pub translator: Option<PathBuf>,
    /// 翻译器附加参数
    pub translator_args: Vec<String>,
    /// 目标语言（未指定时使用语言列表第一个）
    pub language: Option<String>,
    /// 命名空间提示
    pub namespace: Option<String>,
    /// 生成文件输出目录
    pub output_dir: Option<PathBuf>,
}

impl SessionConfig {
    /// 从 JSON 文件加载配置
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| SessionError::io(path, e))?;
        serde_json::from_str(&data)
            .map_err(|e| SessionError::Config(format!("{}: {}", path.display(), e)))
    }

    /// 用 `overrides` 中已设置的字段覆盖当前配置
    pub fn merged_with(&self, overrides: &SessionConfig) -> SessionConfig {
        SessionConfig {
            translator: overrides
                .translator
                .clone()
                .or_else(|| self.translator.clone()),
            translator_args: if overrides.translator_args.is_empty() {
                self.translator_args.clone()
            } else {
                overrides.translator_args.clone()
            },
            language: overrides.language.clone().or_else(|| self.language.clone()),
            namespace: overrides
                .namespace
                .clone()
                .or_else(|| self.namespace.clone()),
            output_dir: overrides
                .output_dir
                .clone()
                .or_else(|| self.output_dir.clone()),
        }
    }
}
