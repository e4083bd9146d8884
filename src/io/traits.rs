/// IO 抽象层 - trait 定义
///
/// 该模块定义了文件读写的抽象接口，支持依赖注入和测试 mock。

use std::path::Path;

/// 文件原始数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFileData {
    /// 文件的原始字节数据
    pub bytes: Vec<u8>,
}

/// 文件读取 trait
///
/// # 职责
/// - 从存储中读取文档的原始字节数据
/// - 不负责解码，仅负责 IO
///
/// # 实现示例
/// ```rust,ignore
/// pub struct InMemoryReader(HashMap<PathBuf, Vec<u8>>);
/// impl FileReader for InMemoryReader {
///     fn read(&self, path: &Path) -> Result<RawFileData, Box<dyn std::error::Error>> {
///         let bytes = self.0.get(path).cloned().ok_or("missing")?;
///         Ok(RawFileData { bytes })
///     }
/// }
/// ```
pub trait FileReader {
    /// 读取文件的原始数据
    ///
    /// # 参数
    /// * `path` - 文件路径
    fn read(&self, path: &Path) -> Result<RawFileData, Box<dyn std::error::Error>>;
}

/// 文件写入 trait
///
/// # 职责
/// - 将编码后的数据写入存储
/// - 不负责编码，仅负责 IO
pub trait FileWriter {
    /// 写入文件数据
    ///
    /// # 参数
    /// * `data` - 要写入的原始数据
    /// * `path` - 目标文件路径
    fn write(&self, data: &RawFileData, path: &Path) -> Result<(), Box<dyn std::error::Error>>;
}
