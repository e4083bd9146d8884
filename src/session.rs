/// 会话存储模块
///
/// 持有所有已加载源文档和最近一次生成的目标文档，是翻译前唯一可信的状态来源。
/// 遵循"修改-保存分离"原则：编辑只修改内存状态，需要显式调用保存。

use std::path::{Component, Path, PathBuf};

use crate::document::{name_from_path, Document, DocumentKind, DocumentSet};
use crate::error::{Result, SessionError, SourcePosition, TranslationError};
use crate::io::{DefaultFileReader, DefaultFileWriter, FileReader, FileWriter, RawFileData};
use crate::text::{self, DecodedText};

/// 解析后的可导航位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// 已加载的源文档名
    pub document: String,
    /// 字符偏移（原样返回，不做范围检查）
    pub offset: usize,
}

/// 转译会话
///
/// # 核心特性
/// - **唯一所有者**: 源文档集合和目标文档集合只由会话持有，内容按值进出
/// - **脏标记**: 只有内容真实改变才标记为已修改
/// - **整体替换**: 目标集合只能被整体替换，从不部分合并
///
/// # 使用示例
///
/// ```rust,ignore
/// use transpile_session::{Session, DocumentKind};
///
/// let mut session = Session::new();
/// session.load_sources(&["main.src".into()])?;
/// session.commit_edit("main.src", "let x = 2".to_string())?;
/// session.save_dirty(DocumentKind::Sources)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    sources: DocumentSet,
    targets: DocumentSet,
    active_language: Option<String>,
    namespace: String,
    last_error: Option<TranslationError>,
}

impl Session {
    /// 创建空会话
    pub fn new() -> Self {
        Self::default()
    }

    /// 加载源文件（使用文件系统读取器）
    pub fn load_sources(&mut self, paths: &[PathBuf]) -> Result<Vec<String>> {
        self.load_sources_with_reader(paths, &DefaultFileReader)
    }

    /// 使用自定义 Reader 加载源文件
    ///
    /// 每个文件按文件名插入或替换到源集合中；替换会重置内容和脏标记。
    /// 无法读取的文件被跳过，其余文件照常加载；若有失败，
    /// 返回第一个失败文件的 IO 错误（已加载的文件保留在会话中）。
    ///
    /// # 参数
    /// * `paths` - 源文件路径列表
    /// * `reader` - 实现 FileReader trait 的读取器
    ///
    /// # 返回
    /// 按顺序返回本次加载的文档名
    pub fn load_sources_with_reader(
        &mut self,
        paths: &[PathBuf],
        reader: &dyn FileReader,
    ) -> Result<Vec<String>> {
        let mut loaded = Vec::with_capacity(paths.len());
        let mut first_failure = None;

        for path in paths {
            let raw = match reader.read(path) {
                Ok(raw) => raw,
                Err(e) => {
                    log::warn!("failed to read {}: {}", path.display(), e);
                    first_failure.get_or_insert_with(|| SessionError::io(path.clone(), e));
                    continue;
                }
            };

            let decoded = DecodedText::decode(&raw.bytes);
            let name = name_from_path(path);
            log::debug!(
                "loaded source {} ({} bytes, {})",
                name,
                raw.bytes.len(),
                decoded.encoding
            );

            let document = Document::loaded(name.clone(), path.clone(), decoded.content, decoded.encoding);
            if self.sources.insert(document).is_some() {
                log::debug!("replaced previously loaded source {}", name);
            }
            loaded.push(name);
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(loaded),
        }
    }

    /// 写回源文档的编辑内容
    ///
    /// 只有内容确实不同才更新并标记为已修改，否则不做任何事。
    ///
    /// # 返回
    /// 内容发生变化返回 Ok(true)，内容相同返回 Ok(false)
    pub fn commit_edit(&mut self, name: &str, new_content: String) -> Result<bool> {
        Self::commit_into(&mut self.sources, name, new_content)
    }

    /// 写回目标文档的手工编辑内容（规则同 commit_edit）
    pub fn commit_target_edit(&mut self, name: &str, new_content: String) -> Result<bool> {
        Self::commit_into(&mut self.targets, name, new_content)
    }

    fn commit_into(set: &mut DocumentSet, name: &str, new_content: String) -> Result<bool> {
        let document = set.get_mut(name).ok_or_else(|| SessionError::not_found(name))?;
        let changed = document.commit(new_content);
        if changed {
            log::debug!("committed edit to {}", name);
        }
        Ok(changed)
    }

    /// 整体替换目标集合
    ///
    /// 旧集合被完全丢弃，新集合中不存在的旧名称也随之消失。
    pub fn replace_targets(&mut self, new_targets: DocumentSet) {
        log::debug!(
            "replacing {} target(s) with {}",
            self.targets.len(),
            new_targets.len()
        );
        self.targets = new_targets;
    }

    /// 保存指定集合中所有已修改的文档（使用文件系统写入器）
    pub fn save_dirty(&mut self, which: DocumentKind) -> Result<usize> {
        self.save_dirty_with_writer(which, &DefaultFileWriter)
    }

    /// 使用自定义 Writer 保存已修改的文档
    ///
    /// 只保存路径已知的脏文档，成功后清除脏标记。
    /// 遇到第一个失败时停止并返回错误，已保存的文档不会回滚。
    ///
    /// # 返回
    /// 返回成功保存的文档数量
    pub fn save_dirty_with_writer(&mut self, which: DocumentKind, writer: &dyn FileWriter) -> Result<usize> {
        let mut saved = 0;

        for document in self.set_mut(which).iter_mut() {
            if !document.dirty {
                continue;
            }
            let Some(path) = document.path.clone() else {
                log::debug!("skipping {} without a path", document.name);
                continue;
            };

            write_document(document, &path, writer)?;
            saved += 1;
        }

        log::info!("saved {} dirty document(s) in {}", saved, which);
        Ok(saved)
    }

    /// 为目标文档指定路径并保存（"另存为"）
    pub fn save_target_as(&mut self, name: &str, path: PathBuf) -> Result<()> {
        self.save_target_as_with_writer(name, path, &DefaultFileWriter)
    }

    pub fn save_target_as_with_writer(
        &mut self,
        name: &str,
        path: PathBuf,
        writer: &dyn FileWriter,
    ) -> Result<()> {
        let document = self
            .targets
            .get_mut(name)
            .ok_or_else(|| SessionError::not_found(name))?;
        write_document(document, &path, writer)?;
        document.path = Some(path);
        Ok(())
    }

    /// 把所有目标文档导出到目录（文件名即文档名）
    ///
    /// 文档名必须是相对路径且不含 `..` 等特殊组成部分，否则在写出任何文件之前
    /// 返回 IO 错误。写出时遇到第一个失败即停止，已导出的文档保持已保存状态。
    ///
    /// # 返回
    /// 按顺序返回写出的路径
    pub fn export_targets(&mut self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.export_targets_with_writer(dir, &DefaultFileWriter)
    }

    pub fn export_targets_with_writer(&mut self, dir: &Path, writer: &dyn FileWriter) -> Result<Vec<PathBuf>> {
        if let Some(bad) = self.targets.iter().find(|doc| !is_plain_relative(&doc.name)) {
            log::warn!("refusing to export target with unsafe name {:?}", bad.name);
            return Err(SessionError::io(
                dir.join(&bad.name),
                "target name must stay inside the output directory",
            ));
        }

        let mut written = Vec::with_capacity(self.targets.len());

        for document in self.targets.iter_mut() {
            let path = dir.join(&document.name);
            write_document(document, &path, writer)?;
            document.path = Some(path.clone());
            written.push(path);
        }

        Ok(written)
    }

    /// 把错误位置解析为已加载的源文档和偏移
    ///
    /// 若源文档已不在会话中（例如错误产生后重新加载了项目），返回 NotFound。
    /// 偏移原样返回。
    pub fn resolve(&self, position: &SourcePosition) -> Result<Location> {
        if !self.sources.contains(&position.source) {
            return Err(SessionError::not_found(&position.source));
        }
        Ok(Location {
            document: position.source.clone(),
            offset: position.offset,
        })
    }

    /// 计算位置对应的 1 起始行列号（用于状态显示）
    pub fn line_column(&self, location: &Location) -> Option<(usize, usize)> {
        self.sources
            .get(&location.document)
            .map(|doc| text::line_column(&doc.content, location.offset))
    }

    // === 查询接口 ===

    pub fn sources(&self) -> &DocumentSet {
        &self.sources
    }

    pub fn targets(&self) -> &DocumentSet {
        &self.targets
    }

    pub fn source(&self, name: &str) -> Option<&Document> {
        self.sources.get(name)
    }

    pub fn target(&self, name: &str) -> Option<&Document> {
        self.targets.get(name)
    }

    /// 默认活动文档（第一个加载的源文档）
    pub fn first_source_name(&self) -> Option<&str> {
        self.sources.first().map(|doc| doc.name.as_str())
    }

    /// 指定集合中已修改的文档名
    pub fn dirty_names(&self, which: DocumentKind) -> Vec<&str> {
        self.set(which)
            .iter()
            .filter(|doc| doc.dirty)
            .map(|doc| doc.name.as_str())
            .collect()
    }

    /// 是否存在任何未保存的修改
    pub fn is_dirty(&self) -> bool {
        self.sources.iter().chain(self.targets.iter()).any(|doc| doc.dirty)
    }

    pub fn active_language(&self) -> Option<&str> {
        self.active_language.as_deref()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn last_error(&self) -> Option<&TranslationError> {
        self.last_error.as_ref()
    }

    /// 当前状态文本（最近一次翻译错误的消息）
    pub fn status_message(&self) -> Option<&str> {
        self.last_error.as_ref().map(|err| err.message.as_str())
    }

    // === 翻译协调器使用的内部接口 ===

    pub(crate) fn remember_request(&mut self, language: &str, namespace: &str) {
        self.active_language = Some(language.to_string());
        self.namespace = namespace.to_string();
    }

    pub(crate) fn set_last_error(&mut self, error: Option<TranslationError>) {
        self.last_error = error;
    }

    fn set(&self, which: DocumentKind) -> &DocumentSet {
        match which {
            DocumentKind::Sources => &self.sources,
            DocumentKind::Targets => &self.targets,
        }
    }

    fn set_mut(&mut self, which: DocumentKind) -> &mut DocumentSet {
        match which {
            DocumentKind::Sources => &mut self.sources,
            DocumentKind::Targets => &mut self.targets,
        }
    }
}

/// 名称是否为只含普通组成部分的相对路径
fn is_plain_relative(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// 编码并写出单个文档，成功后清除脏标记
///
/// 内容无法用文档记录的编码表示时不写出，返回 IO 错误并保留脏标记。
fn write_document(document: &mut Document, path: &Path, writer: &dyn FileWriter) -> Result<()> {
    let bytes = text::encode(&document.content, &document.encoding).ok_or_else(|| {
        log::warn!("{} cannot be represented in {}", document.name, document.encoding);
        SessionError::io(
            path,
            format!("content of {} is not representable in {}", document.name, document.encoding),
        )
    })?;
    let data = RawFileData { bytes };
    writer.write(&data, path).map_err(|e| {
        log::warn!("failed to write {}: {}", path.display(), e);
        SessionError::io(path, e)
    })?;
    document.dirty = false;
    log::debug!("wrote {} to {}", document.name, path.display());
    Ok(())
}
