//! 日志输出
//!
//! 库内部通过 `log` 门面记录事件；命令行程序在启动时安装这里的 stderr 日志器。

use log::{LevelFilter, Log, Metadata, Record};

/// 输出到标准错误的日志器
#[derive(Debug, Clone)]
pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// 格式化单条日志（带本地时间戳）
    fn format(&self, record: &Record) -> String {
        format!(
            "{} {:<5} {}: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", self.format(record));
        }
    }

    fn flush(&self) {}
}

/// 安装全局日志器（只能调用一次）
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(StderrLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}
