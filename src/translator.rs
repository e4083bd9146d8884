/// 翻译器协作者接口
///
/// 翻译器和语言列表都被建模为单方法的请求/响应接口，注入到翻译协调器中，
/// 使会话核心与具体的翻译引擎解耦。
///
/// # 架构设计
///
/// - **Translator**: 把整个源集合翻译为目标集合
/// - **LanguageCatalog**: 列出可用的目标语言
/// - **command**: 通过外部进程 + JSON 协议实现上述两个接口
pub mod command;

pub use command::CommandTranslator;

use crate::document::SourceText;

/// 翻译器 trait
///
/// # 约定
/// - 输入总是完整的当前源集合（整项目分析），按插入顺序排列
/// - 成功时返回生成文档的完整集合
/// - 可定位的失败应返回 [`crate::TranslationError`]（装箱），
///   协调器会通过 downcast 取回其中的位置信息；其他错误类型视为无位置的内部故障
pub trait Translator {
    /// 翻译整个源集合
    ///
    /// # 参数
    /// * `sources` - 源文档名称与内容
    /// * `namespace` - 命名空间/前缀提示
    /// * `language` - 目标语言
    fn translate(
        &self,
        sources: &[SourceText],
        namespace: &str,
        language: &str,
    ) -> Result<Vec<SourceText>, Box<dyn std::error::Error>>;
}

/// 语言列表 trait
///
/// 返回有序、非空的语言列表，第一个元素为默认选择。
pub trait LanguageCatalog {
    fn list_languages(&self) -> Result<Vec<String>, Box<dyn std::error::Error>>;
}

/// 固定语言列表
#[derive(Debug, Clone, Default)]
pub struct StaticLanguages(pub Vec<String>);

impl LanguageCatalog for StaticLanguages {
    fn list_languages(&self) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        Ok(self.0.clone())
    }
}
