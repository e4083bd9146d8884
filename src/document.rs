use std::collections::HashMap;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

/// 文档集合类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// 源文档（被翻译的输入）
    Sources,
    /// 生成文档（最近一次成功翻译的输出）
    Targets,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Sources => write!(f, "sources"),
            DocumentKind::Targets => write!(f, "targets"),
        }
    }
}

/// 名称 + 文本内容，用于在会话边界按值传递
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceText {
    pub name: String,
    pub content: String,
}

impl SourceText {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// 文档（源文档或生成文档）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// 集合内唯一的名称，生命周期内不变
    pub name: String,
    /// 来源路径；生成文档在显式保存前为空
    pub path: Option<PathBuf>,
    /// 当前文本内容
    pub content: String,
    /// 解码时识别出的编码，保存时按此编码写回
    pub encoding: String,
    /// 内容是否与上次保存/生成的值不同
    pub dirty: bool,
}

impl Document {
    /// 从磁盘加载的源文档
    pub fn loaded(name: String, path: PathBuf, content: String, encoding: String) -> Self {
        Self {
            name,
            path: Some(path),
            content,
            encoding,
            dirty: false,
        }
    }

    /// 翻译器生成的文档（无路径、未修改）
    pub fn generated(text: SourceText) -> Self {
        Self {
            name: text.name,
            path: None,
            content: text.content,
            encoding: "utf-8".to_string(),
            dirty: false,
        }
    }

    /// 写回内容，仅当内容确实改变时才标记为已修改
    ///
    /// # 返回
    /// 内容发生变化返回 true
    pub fn commit(&mut self, new_content: String) -> bool {
        if self.content == new_content {
            return false;
        }
        self.content = new_content;
        self.dirty = true;
        true
    }
}

/// 从路径推导文档名（取文件名部分）
pub fn name_from_path(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// 按插入顺序排列的文档集合
///
/// 名称在集合内唯一；替换已存在的名称时保留其原有位置，
/// 因此列表顺序是确定的，调用方可以把第一个文档作为默认活动文档。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSet {
    documents: Vec<Document>,
    index: HashMap<String, usize>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或替换文档
    ///
    /// # 返回
    /// 若替换了同名文档，返回被替换的旧文档
    pub fn insert(&mut self, document: Document) -> Option<Document> {
        match self.index.get(&document.name) {
            Some(&slot) => Some(std::mem::replace(&mut self.documents[slot], document)),
            None => {
                self.index.insert(document.name.clone(), self.documents.len());
                self.documents.push(document);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Document> {
        self.index.get(name).map(|&slot| &self.documents[slot])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Document> {
        match self.index.get(name) {
            Some(&slot) => Some(&mut self.documents[slot]),
            None => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// 按插入顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.documents.iter_mut()
    }

    /// 按插入顺序返回所有名称
    pub fn names(&self) -> Vec<&str> {
        self.documents.iter().map(|doc| doc.name.as_str()).collect()
    }

    pub fn first(&self) -> Option<&Document> {
        self.documents.first()
    }

    /// 导出名称和内容（按值复制）
    pub fn to_texts(&self) -> Vec<SourceText> {
        self.documents
            .iter()
            .map(|doc| SourceText::new(doc.name.clone(), doc.content.clone()))
            .collect()
    }
}

impl FromIterator<Document> for DocumentSet {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut set = DocumentSet::new();
        for document in iter {
            set.insert(document);
        }
        set
    }
}
