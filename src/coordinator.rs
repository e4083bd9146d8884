/// 翻译协调器模块
///
/// 驱动一次完整的翻译尝试并规范化其结果：
/// 成功时整体替换会话的目标集合，失败时清空目标集合并记录错误，
/// 之后可通过 [`locate`] 把错误位置解析为可导航的文档位置。
///
/// # 状态机
///
/// 每次尝试：`Idle -> Running -> {Success, Failure} -> Idle`。
/// `run` 需要 `&mut Session`，同一会话上不可能有两次重叠的运行。
use std::panic::{self, AssertUnwindSafe};

use crate::document::{Document, DocumentSet, SourceText};
use crate::error::{Result, SessionError, TranslationError};
use crate::session::{Location, Session};
use crate::translator::{LanguageCatalog, Translator};

/// 一次翻译尝试的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// 生成文档的完整集合（已原样安装到会话中）
    Success(Vec<SourceText>),
    /// 翻译失败（会话目标集合已清空）
    Failure(TranslationError),
}

impl TranslationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TranslationOutcome::Success(_))
    }

    pub fn error(&self) -> Option<&TranslationError> {
        match self {
            TranslationOutcome::Success(_) => None,
            TranslationOutcome::Failure(err) => Some(err),
        }
    }
}

/// 翻译协调器
///
/// 翻译器和语言列表通过构造函数注入。
pub struct TranslationCoordinator {
    translator: Box<dyn Translator>,
    languages: Box<dyn LanguageCatalog>,
}

impl TranslationCoordinator {
    pub fn new(translator: Box<dyn Translator>, languages: Box<dyn LanguageCatalog>) -> Self {
        Self { translator, languages }
    }

    /// 可用的目标语言（有序）
    pub fn languages(&self) -> Result<Vec<String>> {
        self.languages
            .list_languages()
            .map_err(|e| SessionError::Catalog(e.to_string()))
    }

    /// 默认目标语言（列表第一个）
    pub fn default_language(&self) -> Result<String> {
        self.languages()?
            .into_iter()
            .next()
            .ok_or(SessionError::NoLanguages)
    }

    /// 执行一次翻译尝试
    ///
    /// 总是提交会话中的整个源集合。翻译器返回的非结构化错误或 panic
    /// 都被包装为无位置的失败，不会影响会话本身。
    ///
    /// # 参数
    /// * `session` - 要更新的会话
    /// * `language` - 目标语言
    /// * `namespace` - 命名空间提示
    pub fn run(&self, session: &mut Session, language: &str, namespace: &str) -> TranslationOutcome {
        session.remember_request(language, namespace);
        let sources = session.sources().to_texts();
        log::info!("translating {} source(s) to {}", sources.len(), language);

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.translator.translate(&sources, namespace, language)
        }));

        let outcome = match result {
            Ok(Ok(targets)) => TranslationOutcome::Success(targets),
            Ok(Err(err)) => TranslationOutcome::Failure(into_translation_error(err)),
            Err(payload) => TranslationOutcome::Failure(TranslationError::unlocated(format!(
                "internal translator error: {}",
                panic_message(payload.as_ref())
            ))),
        };

        apply_outcome(session, &outcome);
        outcome
    }

    /// 使用上次的语言（或默认语言）和命名空间重新翻译
    pub fn run_default(&self, session: &mut Session) -> Result<TranslationOutcome> {
        let language = match session.active_language() {
            Some(language) => language.to_string(),
            None => self.default_language()?,
        };
        let namespace = session.namespace().to_string();
        Ok(self.run(session, &language, &namespace))
    }
}

/// 把结果写入会话：成功则整体替换目标集合，失败则清空并记录错误
fn apply_outcome(session: &mut Session, outcome: &TranslationOutcome) {
    match outcome {
        TranslationOutcome::Success(targets) => {
            let set: DocumentSet = targets.iter().cloned().map(Document::generated).collect();
            if set.len() != targets.len() {
                log::warn!("translator returned duplicate output names; later entries win");
            }
            log::info!("translation succeeded with {} output(s)", set.len());
            session.replace_targets(set);
            session.set_last_error(None);
        }
        TranslationOutcome::Failure(err) => {
            log::info!("translation failed: {}", err.message);
            session.replace_targets(DocumentSet::new());
            session.set_last_error(Some(err.clone()));
        }
    }
}

/// 取回结构化的翻译错误，其他错误视为无位置的故障
fn into_translation_error(err: Box<dyn std::error::Error>) -> TranslationError {
    match err.downcast::<TranslationError>() {
        Ok(err) => *err,
        Err(other) => TranslationError::unlocated(other.to_string()),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// 定位最近一次翻译错误
///
/// # 返回
/// - 没有错误或错误不带位置时返回 None
/// - 否则返回 `Session::resolve` 的结果（源文档已卸载时为 NotFound）
pub fn locate(session: &Session) -> Option<Result<Location>> {
    let position = session.last_error()?.position.as_ref()?;
    Some(session.resolve(position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourcePosition;
    use crate::io::{FileReader, RawFileData};
    use crate::translator::StaticLanguages;
    use std::path::{Path, PathBuf};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// 按顺序返回预设结果，并记录每次收到的源集合
    struct ScriptedTranslator {
        replies: RefCell<VecDeque<Reply>>,
        seen: Rc<RefCell<Vec<Vec<SourceText>>>>,
    }

    enum Reply {
        Ok(Vec<SourceText>),
        Located(TranslationError),
        Fault(&'static str),
        Panic,
    }

    impl Translator for ScriptedTranslator {
        fn translate(
            &self,
            sources: &[SourceText],
            _namespace: &str,
            _language: &str,
        ) -> std::result::Result<Vec<SourceText>, Box<dyn std::error::Error>> {
            self.seen.borrow_mut().push(sources.to_vec());
            match self.replies.borrow_mut().pop_front().expect("unexpected translate call") {
                Reply::Ok(targets) => Ok(targets),
                Reply::Located(err) => Err(Box::new(err)),
                Reply::Fault(message) => Err(message.into()),
                Reply::Panic => panic!("translator crashed"),
            }
        }
    }

    fn coordinator(replies: Vec<Reply>) -> (TranslationCoordinator, Rc<RefCell<Vec<Vec<SourceText>>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let translator = ScriptedTranslator {
            replies: RefCell::new(replies.into()),
            seen: Rc::clone(&seen),
        };
        let languages = StaticLanguages(vec!["js".to_string(), "py".to_string()]);
        (
            TranslationCoordinator::new(Box::new(translator), Box::new(languages)),
            seen,
        )
    }

    /// 内存读取器：文件名即路径
    struct MemoryReader<'a>(&'a [(&'a str, &'a str)]);

    impl FileReader for MemoryReader<'_> {
        fn read(&self, path: &Path) -> std::result::Result<RawFileData, Box<dyn std::error::Error>> {
            let (_, content) = self
                .0
                .iter()
                .find(|(name, _)| Path::new(name) == path)
                .ok_or("no such file")?;
            Ok(RawFileData {
                bytes: content.as_bytes().to_vec(),
            })
        }
    }

    fn session_with(sources: &[(&str, &str)]) -> Session {
        let mut session = Session::new();
        let paths: Vec<PathBuf> = sources.iter().map(|(name, _)| PathBuf::from(name)).collect();
        session
            .load_sources_with_reader(&paths, &MemoryReader(sources))
            .unwrap();
        session
    }

    #[test]
    fn test_success_replaces_targets_wholesale() {
        let (coordinator, _) = coordinator(vec![
            Reply::Ok(vec![SourceText::new("a.out", "1"), SourceText::new("b.out", "2")]),
            Reply::Ok(vec![SourceText::new("c.out", "3")]),
        ]);
        let mut session = session_with(&[("a.src", "X")]);

        coordinator.run(&mut session, "js", "");
        let outcome = coordinator.run(&mut session, "js", "");

        assert!(outcome.is_success());
        assert_eq!(session.targets().to_texts(), vec![SourceText::new("c.out", "3")]);
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_failure_clears_targets_and_records_error() {
        let error = TranslationError::at("bad token", SourcePosition::new("a.src", 1));
        let (coordinator, _) = coordinator(vec![
            Reply::Ok(vec![SourceText::new("a.out", "Y")]),
            Reply::Located(error.clone()),
        ]);
        let mut session = session_with(&[("a.src", "X")]);

        coordinator.run(&mut session, "js", "");
        let outcome = coordinator.run(&mut session, "js", "");

        assert_eq!(outcome, TranslationOutcome::Failure(error.clone()));
        assert!(session.targets().is_empty());
        assert_eq!(session.last_error(), Some(&error));
        assert_eq!(session.status_message(), Some("bad token"));
    }

    #[test]
    fn test_unstructured_fault_has_no_position() {
        let (coordinator, _) = coordinator(vec![Reply::Fault("disk on fire")]);
        let mut session = session_with(&[("a.src", "X")]);

        let outcome = coordinator.run(&mut session, "js", "");

        let err = outcome.error().unwrap();
        assert_eq!(err.message, "disk on fire");
        assert!(err.position.is_none());
        assert!(locate(&session).is_none());
    }

    #[test]
    fn test_panic_becomes_failure() {
        let (coordinator, _) = coordinator(vec![Reply::Panic, Reply::Ok(vec![])]);
        let mut session = session_with(&[("a.src", "X")]);

        let outcome = coordinator.run(&mut session, "js", "");
        assert!(outcome.error().unwrap().message.contains("translator crashed"));

        // 会话仍然可用
        assert!(coordinator.run(&mut session, "js", "").is_success());
    }

    #[test]
    fn test_whole_source_set_is_submitted() {
        let (coordinator, seen) = coordinator(vec![Reply::Ok(vec![])]);
        let mut session = session_with(&[("a.src", "A"), ("b.src", "B")]);
        session.commit_edit("b.src", "B2".to_string()).unwrap();

        coordinator.run(&mut session, "py", "ns");

        assert_eq!(
            seen.borrow()[0],
            vec![SourceText::new("a.src", "A"), SourceText::new("b.src", "B2")]
        );
        assert_eq!(session.active_language(), Some("py"));
        assert_eq!(session.namespace(), "ns");
    }

    #[test]
    fn test_new_run_overwrites_previous_error() {
        let (coordinator, _) = coordinator(vec![
            Reply::Fault("first"),
            Reply::Fault("second"),
        ]);
        let mut session = session_with(&[("a.src", "X")]);

        coordinator.run(&mut session, "js", "");
        coordinator.run(&mut session, "js", "");

        assert_eq!(session.status_message(), Some("second"));
    }

    #[test]
    fn test_locate_stale_position() {
        let error = TranslationError::at("bad", SourcePosition::new("removed.src", 4));
        let (coordinator, _) = coordinator(vec![Reply::Located(error)]);
        let mut session = session_with(&[("a.src", "X")]);

        coordinator.run(&mut session, "js", "");

        assert_eq!(
            locate(&session),
            Some(Err(SessionError::not_found("removed.src")))
        );
    }

    #[test]
    fn test_run_default_uses_first_language_then_remembered() {
        let (coordinator, _) = coordinator(vec![Reply::Ok(vec![]), Reply::Ok(vec![])]);
        let mut session = session_with(&[("a.src", "X")]);

        assert_eq!(coordinator.default_language().unwrap(), "js");
        coordinator.run_default(&mut session).unwrap();
        assert_eq!(session.active_language(), Some("js"));

        coordinator.run(&mut session, "py", "");
        assert_eq!(session.active_language(), Some("py"));
    }

    #[test]
    fn test_empty_catalog() {
        let coordinator = TranslationCoordinator::new(
            Box::new(ScriptedTranslator {
                replies: RefCell::new(VecDeque::new()),
                seen: Rc::new(RefCell::new(Vec::new())),
            }),
            Box::new(StaticLanguages::default()),
        );
        assert_eq!(coordinator.default_language(), Err(SessionError::NoLanguages));
    }
}
