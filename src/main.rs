use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use transpile_session::{
    locate, logging, CommandTranslator, Session, SessionConfig, TranslationCoordinator,
    TranslationError, TranslationOutcome,
};

#[derive(Parser)]
#[command(name = "transpile_session")]
#[command(about = "加载源文件，调用外部翻译器生成目标代码，并定位翻译错误")]
#[command(version)]
struct Cli {
    /// 源文件路径（可多次指定）
    #[arg(short = 's', long = "source", required_unless_present = "list_languages")]
    sources: Vec<PathBuf>,

    /// 翻译器程序路径
    #[arg(short, long)]
    translator: Option<PathBuf>,

    /// 传给翻译器的参数（可多次指定）
    #[arg(long = "translator-arg", allow_hyphen_values = true)]
    translator_args: Vec<String>,

    /// 目标语言（默认使用翻译器语言列表的第一个）
    #[arg(short, long)]
    language: Option<String>,

    /// 命名空间/前缀提示
    #[arg(short, long)]
    namespace: Option<String>,

    /// 生成文件输出目录
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 列出翻译器支持的目标语言
    #[arg(long)]
    list_languages: bool,

    /// 静默模式(仅输出错误)
    #[arg(long)]
    quiet: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(log_level(&cli)).context("初始化日志失败")?;

    let config = resolve_config(&cli)?;
    let coordinator = build_coordinator(&config)?;

    if cli.list_languages {
        return handle_list_languages(&coordinator);
    }

    let mut session = Session::new();
    handle_load(&cli, &mut session)?;
    handle_translation(&cli, &config, &coordinator, &mut session)
}

fn log_level(cli: &Cli) -> LevelFilter {
    if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// 合并配置文件与命令行参数（命令行优先）
fn resolve_config(cli: &Cli) -> Result<SessionConfig> {
    let file_config = match &cli.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };

    let overrides = SessionConfig {
        translator: cli.translator.clone(),
        translator_args: cli.translator_args.clone(),
        language: cli.language.clone(),
        namespace: cli.namespace.clone(),
        output_dir: cli.output.clone(),
    };

    Ok(file_config.merged_with(&overrides))
}

fn build_coordinator(config: &SessionConfig) -> Result<TranslationCoordinator> {
    let program = config
        .translator
        .clone()
        .context("未指定翻译器：请使用 --translator 或在配置文件中设置 translator")?;

    let translator = CommandTranslator::new(program).with_args(config.translator_args.clone());
    Ok(TranslationCoordinator::new(
        Box::new(translator.clone()),
        Box::new(translator),
    ))
}

/// 处理语言列表
fn handle_list_languages(coordinator: &TranslationCoordinator) -> Result<()> {
    for (i, language) in coordinator.languages()?.iter().enumerate() {
        if i == 0 {
            println!("{} (默认)", language);
        } else {
            println!("{}", language);
        }
    }
    Ok(())
}

/// 加载源文件
fn handle_load(cli: &Cli, session: &mut Session) -> Result<()> {
    let names = session
        .load_sources(&cli.sources)
        .context("加载源文件失败")?;

    if !cli.quiet {
        println!("已加载 {} 个源文件", names.len());
    }
    Ok(())
}

/// 执行翻译并输出结果
fn handle_translation(
    cli: &Cli,
    config: &SessionConfig,
    coordinator: &TranslationCoordinator,
    session: &mut Session,
) -> Result<()> {
    let language = match &config.language {
        Some(language) => language.clone(),
        None => coordinator.default_language()?,
    };
    let namespace = config.namespace.clone().unwrap_or_default();

    if !cli.quiet {
        println!("正在翻译为: {}", language);
    }

    match coordinator.run(session, &language, &namespace) {
        TranslationOutcome::Success(_) => {
            if let Some(dir) = &config.output_dir {
                let written = session
                    .export_targets(dir)
                    .with_context(|| format!("写入输出目录失败: {:?}", dir))?;
                if !cli.quiet {
                    println!("翻译完成，输出 {} 个文件到: {:?}", written.len(), dir);
                }
            } else if !cli.quiet {
                print_targets_summary(session);
            }
            Ok(())
        }
        TranslationOutcome::Failure(err) => Err(describe_failure(session, &err)),
    }
}

/// 打印生成文件摘要
fn print_targets_summary(session: &Session) {
    let targets = session.targets();
    println!("翻译完成，生成 {} 个文件（未指定 --output，未写入磁盘）", targets.len());

    for (i, target) in targets.iter().take(3).enumerate() {
        println!("{}. {} ({} 字符)", i + 1, target.name, target.content.chars().count());
    }
    if targets.len() > 3 {
        println!("... 还有 {} 个文件", targets.len() - 3);
    }
}

/// 把翻译错误转换为带位置的错误描述
fn describe_failure(session: &Session, err: &TranslationError) -> anyhow::Error {
    match locate(session) {
        Some(Ok(location)) => {
            let (line, column) = session.line_column(&location).unwrap_or((1, 1));
            anyhow!("{}:{}:{}: {}", location.document, line, column, err.message)
        }
        Some(Err(stale)) => anyhow!("{} (无法定位: {})", err.message, stale),
        None => anyhow!("翻译失败: {}", err.message),
    }
}
