use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use dtc_search_common::ColumnLayout;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dtc-search")]
#[command(about = "故障コード検索・チケット表ランキングツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (claude/codex/gemini)。省略時は設定ファイルの値
    #[arg(long, global = true)]
    pub ai_provider: Option<AiProvider>,

    /// 利用者ID（省略時は設定ファイルの値）
    #[arg(long, global = true)]
    pub user: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// チケット表を読み込んで履歴に登録
    Load {
        /// Excel（xlsx/xls/ods）またはJSONファイル
        #[arg(required = true)]
        file: PathBuf,
    },

    /// 故障コードを検索してランキングを表示
    Search {
        /// チケット表ファイル
        #[arg(required = true)]
        file: PathBuf,

        /// 検索する故障コード（複数指定可）
        #[arg(required = true, num_args = 1..)]
        codes: Vec<String>,

        /// ヘッダー名ではなく固定列位置で読む
        #[arg(long)]
        positional: bool,

        /// AI要約を行わない
        #[arg(long)]
        no_summary: bool,

        /// 履歴に保存しない
        #[arg(long)]
        no_history: bool,

        /// 出力ファイル（.xlsx → Excel、それ以外 → JSON）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// スコアの内訳を表示
        #[arg(long)]
        explain: bool,
    },

    /// 対話的にコードを入力して検索
    Interactive {
        /// チケット表ファイル
        #[arg(required = true)]
        file: PathBuf,

        /// ヘッダー名ではなく固定列位置で読む
        #[arg(long)]
        positional: bool,

        /// AI要約を行わない
        #[arg(long)]
        no_summary: bool,

        /// スコアの内訳を表示
        #[arg(long)]
        explain: bool,
    },

    /// 登録済みチケット表の一覧
    Files,

    /// 検索履歴を表示
    History {
        /// 表示件数
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// AIプロバイダを設定
        #[arg(long)]
        set_provider: Option<AiProvider>,

        /// 利用者IDを設定
        #[arg(long)]
        set_user: Option<u64>,

        /// 列の読み方を設定 (header/positional)
        #[arg(long)]
        set_layout: Option<ColumnLayout>,
    },
}

/// `--positional` を列レイアウトに変換（未指定なら設定に従う）
pub fn layout_override(positional: bool) -> Option<ColumnLayout> {
    positional.then_some(ColumnLayout::Positional)
}
