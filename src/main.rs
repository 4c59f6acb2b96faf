use clap::Parser;
use dtc_search::{cli, config, error, export, history, interactive, report, service, summary, workbook};
use cli::{layout_override, Cli, Commands};
use config::Config;
use error::Result;
use history::{HistoryStore, PersistenceSink};
use indicatif::{ProgressBar, ProgressStyle};
use service::{NoHistory, SearchReport, SearchService};
use std::path::PathBuf;
use std::time::Duration;
use summary::{CliSummaryGenerator, DisabledSummary, SummaryGenerator};
use tracing_subscriber::EnvFilter;
use workbook::LoadedWorkbook;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let mut config = Config::load()?;
    if let Some(provider) = cli.ai_provider {
        config.ai_provider = provider;
    }
    if let Some(user) = cli.user {
        config.user_id = user;
    }

    match cli.command {
        Commands::Load { file } => {
            println!("📥 dtc-search - チケット表の登録\n");

            let loaded = workbook::load_workbook(&file)?;
            println!("✔ {}件のチケットを検出", loaded.row_count());

            let mut store = HistoryStore::load(&config.history_path()?);
            let record = store.register_file(
                config.user_id,
                &loaded.file_name,
                &loaded.file_key,
                loaded.row_count(),
            )?;
            println!("✔ 登録: #{} {}", record.id, record.file_name);
        }

        Commands::Search { file, codes, positional, no_summary, no_history, output, explain } => {
            println!("🔍 dtc-search - 故障コード検索\n");

            println!("[1/2] チケット表を読み込み中...");
            let loaded = workbook::load_workbook(&file)?;
            println!("✔ {}件のチケット\n", loaded.row_count());

            let service = build_service(&config, positional, no_summary)?;

            println!("[2/2] 検索中...");
            let history = if no_history { None } else { open_history(&config, &loaded) };
            let reports = match history {
                Some(mut store) => run_search(&service, &loaded, &codes, &mut store).await?,
                None => run_search(&service, &loaded, &codes, &mut NoHistory).await?,
            };
            println!();

            let scorer = explain.then(|| service.engine().scorer());
            for r in &reports {
                report::print_report(r, scorer);
            }

            if let Some(output) = output {
                export::export_reports(&reports, &output)?;
            }

            let found = reports.iter().filter(|r| r.success).count();
            println!("\n✅ 検索完了（{}/{}件のコードで該当あり）", found, reports.len());
        }

        Commands::Interactive { file, positional, no_summary, explain } => {
            println!("🔍 dtc-search - 対話検索\n");

            let loaded = workbook::load_workbook(&file)?;
            let service = build_service(&config, positional, no_summary)?;

            match open_history(&config, &loaded) {
                Some(mut store) => {
                    interactive::run_interactive(&service, &loaded, &mut store, explain).await?
                }
                None => {
                    interactive::run_interactive(&service, &loaded, &mut NoHistory, explain).await?
                }
            }
        }

        Commands::Files => {
            let store = HistoryStore::load(&config.history_path()?);
            let files = store.files_for_user(config.user_id);

            if files.is_empty() {
                println!("登録済みのチケット表はありません");
            } else {
                println!("📂 登録済みチケット表（利用者 {}）:", config.user_id);
                for f in files {
                    println!(
                        "  #{:<4} {}  {}件  {}",
                        f.id,
                        f.created_at.format("%Y-%m-%d %H:%M"),
                        f.row_count,
                        f.file_name
                    );
                }
            }
        }

        Commands::History { limit } => {
            let store = HistoryStore::load(&config.history_path()?);
            let searches = store.searches_for_user(config.user_id);

            if searches.is_empty() {
                println!("検索履歴はありません");
            } else {
                println!("🕘 検索履歴（利用者 {}）:", config.user_id);
                for s in searches.into_iter().take(limit) {
                    let count = serde_json::from_str::<Vec<serde_json::Value>>(&s.results_json)
                        .map(|v| v.len())
                        .unwrap_or(0);
                    println!(
                        "  {}  {:<12} {}件  ファイル#{}",
                        s.created_at.format("%Y-%m-%d %H:%M"),
                        s.search_code,
                        count,
                        s.file_id
                    );
                }
            }
        }

        Commands::Config { show, set_provider, set_user, set_layout } => {
            // グローバル指定で上書きされた値を保存しないよう読み直す
            let mut stored = Config::load()?;

            if let Some(provider) = set_provider {
                stored.set_ai_provider(provider)?;
                println!("✔ AIプロバイダを設定しました: {}", provider);
            }
            if let Some(user) = set_user {
                stored.set_user_id(user)?;
                println!("✔ 利用者IDを設定しました: {}", user);
            }
            if let Some(layout) = set_layout {
                stored.set_column_layout(layout)?;
                println!("✔ 列レイアウトを設定しました: {}", layout);
            }

            if show || (set_provider.is_none() && set_user.is_none() && set_layout.is_none()) {
                println!("設定ファイル: {}", Config::config_path()?.display());
                println!("{}", serde_json::to_string_pretty(&stored)?);
                println!("履歴ファイル: {}", stored.history_path().unwrap_or_else(|_| PathBuf::from("-")).display());
                println!("有効なスコアルール:");
                println!("{}", serde_json::to_string_pretty(stored.scorer()?.config())?);
            }
        }
    }

    Ok(())
}

/// 履歴を開いてチケット表を登録する。履歴が使えなくても検索は続ける
fn open_history(config: &Config, loaded: &LoadedWorkbook) -> Option<HistoryStore> {
    let path = match config.history_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(error = %e, "履歴を使わずに検索します");
            return None;
        }
    };
    let mut store = HistoryStore::load(&path);
    store.try_register_file(
        config.user_id,
        &loaded.file_name,
        &loaded.file_key,
        loaded.row_count(),
    );
    Some(store)
}

fn build_service(config: &Config, positional: bool, no_summary: bool) -> Result<SearchService> {
    let engine = config.engine(layout_override(positional))?;
    let generator: Box<dyn SummaryGenerator> = if no_summary {
        Box::new(DisabledSummary)
    } else {
        let mut summarizer = CliSummaryGenerator::new(
            config.ai_provider,
            Duration::from_secs(config.summary_timeout_seconds),
        );
        if let Some(command) = &config.ai_command {
            summarizer = summarizer.with_program(command.clone());
        }
        Box::new(summarizer)
    };
    Ok(SearchService::new(engine, generator, config.user_id))
}

async fn run_search<S: PersistenceSink>(
    service: &SearchService,
    loaded: &LoadedWorkbook,
    codes: &[String],
    sink: &mut S,
) -> Result<Vec<SearchReport>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner());
    pb.set_message(format!("{}件のコードを検索中...", codes.len()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = service.search_many(loaded, codes, sink).await;

    match &result {
        Ok(_) => pb.finish_with_message("✔ 検索・要約完了"),
        Err(_) => pb.abandon(),
    }
    result
}
