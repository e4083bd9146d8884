/// IO 抽象层模块
///
/// 该模块提供了文件读写的抽象接口，遵循依赖倒置原则。
/// 会话通过这些 trait 读写源文档与生成文档，测试中可替换为内存实现。
///
/// # 架构设计
///
/// - **traits**: 定义 Reader/Writer trait 接口
/// - **fs_io**: 基于文件系统的默认实现
///
/// # 使用示例
///
/// ```rust,ignore
/// use transpile_session::io::{DefaultFileReader, FileReader};
///
/// let reader = DefaultFileReader;
/// let data = reader.read(Path::new("main.src"))?;
/// ```
pub mod traits;
pub mod fs_io;

// === 导出 trait 定义 ===
pub use traits::{FileReader, FileWriter, RawFileData};

// === 导出默认实现 ===
pub use fs_io::{DefaultFileReader, DefaultFileWriter};
