/// 外部进程翻译器
///
/// 每次请求启动一次外部程序，通过标准输入写入一行 JSON 请求，
/// 从标准输出读取 JSON 响应。
///
/// # 协议
///
/// 请求：
/// - `{"cmd": "translate", "payload": {"sources": [{"name", "content"}], "namespace", "language"}}`
/// - `{"cmd": "languages"}`
///
/// 响应：
/// - `{"status": "ok", "payload": {"targets": [{"name", "content"}]}}`
/// - `{"status": "ok", "payload": {"languages": ["..."]}}`
/// - `{"status": "error", "message": "...", "position": {"source": "...", "offset": 0}}`（position 可选）
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{LanguageCatalog, Translator};
use crate::document::SourceText;
use crate::error::{SourcePosition, TranslationError};

/// 外部进程翻译器
#[derive(Debug, Clone)]
pub struct CommandTranslator {
    /// 翻译器程序路径
    program: PathBuf,
    /// 附加命令行参数
    args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum Request<'a> {
    Translate { payload: TranslatePayload<'a> },
    Languages,
}

#[derive(Debug, Serialize)]
struct TranslatePayload<'a> {
    sources: &'a [SourceText],
    namespace: &'a str,
    language: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Response {
    Ok {
        #[serde(default)]
        payload: Value,
    },
    Error {
        message: String,
        #[serde(default)]
        position: Option<SourcePosition>,
    },
}

#[derive(Debug, Deserialize)]
struct TargetsPayload {
    targets: Vec<SourceText>,
}

#[derive(Debug, Deserialize)]
struct LanguagesPayload {
    languages: Vec<String>,
}

impl CommandTranslator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// 设置附加参数
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// 发送一次请求并返回响应中的 payload
    fn call(&self, request: &Request<'_>) -> Result<Value, Box<dyn std::error::Error>> {
        let mut line = serde_json::to_vec(request)?;
        line.push(b'\n');

        log::debug!("spawning translator {}", self.program.display());
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| format!("failed to start translator {}: {}", self.program.display(), e))?;

        // 请求在单独线程中写入，同时由当前线程读取输出，避免双方管道都写满
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || -> std::io::Result<()> {
                match stdin.write_all(&line) {
                    // 进程可能不读取输入就退出，退出状态由下面统一判断
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                    result => result,
                }
            })
        });

        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            writer
                .join()
                .map_err(|_| "translator input writer panicked")??;
        }
        if !output.status.success() {
            return Err(format!("translator exited with {}", output.status).into());
        }

        parse_response(&output.stdout)
    }
}

/// 解析翻译器响应
///
/// 结构化错误以 [`TranslationError`] 返回（保留位置），其余解析失败作为普通错误返回。
fn parse_response(stdout: &[u8]) -> Result<Value, Box<dyn std::error::Error>> {
    let response: Response = serde_json::from_slice(stdout)
        .map_err(|e| format!("invalid translator response: {}", e))?;

    match response {
        Response::Ok { payload } => Ok(payload),
        Response::Error { message, position } => Err(Box::new(TranslationError { message, position })),
    }
}

impl Translator for CommandTranslator {
    fn translate(
        &self,
        sources: &[SourceText],
        namespace: &str,
        language: &str,
    ) -> Result<Vec<SourceText>, Box<dyn std::error::Error>> {
        let payload = self.call(&Request::Translate {
            payload: TranslatePayload {
                sources,
                namespace,
                language,
            },
        })?;
        let parsed: TargetsPayload = serde_json::from_value(payload)?;
        Ok(parsed.targets)
    }
}

impl LanguageCatalog for CommandTranslator {
    fn list_languages(&self) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        let payload = self.call(&Request::Languages)?;
        let parsed: LanguagesPayload = serde_json::from_value(payload)?;
        Ok(parsed.languages)
    }
}
