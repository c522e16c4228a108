use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-link")]
#[command(about = "フォトテーク写真と観光スポット文書の照合・画像紐付けツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// カタログの写真を文書に照合して画像を書き込む
    Attach {
        /// フォトテークのメタデータ（xlsx/xls/ods/csv）
        #[arg(short, long, required = true)]
        catalog: PathBuf,

        /// 画像フォルダ（省略時は設定値）
        #[arg(short, long)]
        images_dir: Option<PathBuf>,

        /// 文書ストア（JSON配列 / JSON Lines）
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// 対象の地域名（空文字で全件）
        #[arg(short, long)]
        region: Option<String>,

        /// 画像の公開URLの基点
        #[arg(long)]
        base_url: Option<String>,

        /// 採用する最低スコア (0-100)
        #[arg(long)]
        min_score: Option<f64>,

        /// 文書あたりの最大採用数
        #[arg(long)]
        topk: Option<usize>,

        /// 既存の画像を上書き
        #[arg(long)]
        force: bool,

        /// ドライラン（書き込まずにトレースだけ出力）
        #[arg(long)]
        dry_run: bool,

        /// トレース出力先（.csv/.json/.xlsx）
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// カタログを読み込み、画像ファイルの解決結果だけを表示
    Check {
        /// フォトテークのメタデータ（xlsx/xls/ods/csv）
        #[arg(short, long, required = true)]
        catalog: PathBuf,

        /// 画像フォルダ（省略時は設定値）
        #[arg(short, long)]
        images_dir: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 公開URLの基点を設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 最低スコアを設定
        #[arg(long)]
        set_min_score: Option<f64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
