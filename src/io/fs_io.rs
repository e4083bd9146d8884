/// 文件系统 IO 实现
///
/// 提供基于 std::fs 的默认读写实现
use std::path::Path;
use super::traits::{FileReader, FileWriter, RawFileData};

/// 默认的文件读取器（基于 std::fs）
#[derive(Debug, Clone, Default)]
pub struct DefaultFileReader;

impl FileReader for DefaultFileReader {
    fn read(&self, path: &Path) -> Result<RawFileData, Box<dyn std::error::Error>> {
        let bytes = std::fs::read(path)?;
        Ok(RawFileData { bytes })
    }
}

/// 默认的文件写入器（基于 std::fs）
#[derive(Debug, Clone, Default)]
pub struct DefaultFileWriter;

impl FileWriter for DefaultFileWriter {
    fn write(&self, data: &RawFileData, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        // 确保父目录存在
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, &data.bytes)?;
        Ok(())
    }
}
