use clap::Parser;
use log::LevelFilter;
use photo_link::{catalog, cli, config, error, export, matcher, scanner, store};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use photo_link_common::PhotoRecord;
use std::path::Path;
use store::{JsonFileStore, RegionFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Attach {
            catalog,
            images_dir,
            store,
            region,
            base_url,
            min_score,
            topk,
            force,
            dry_run,
            out,
        } => {
            println!("🖼  photo-link - 画像紐付け{}", if dry_run { "（ドライラン）" } else { "" });
            println!("開始: {}\n", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));

            let options = matcher::MatchOptions {
                base_url: base_url.unwrap_or_else(|| config.base_url.clone()),
                origin: config.origin.clone(),
                min_score: min_score.unwrap_or(config.min_score),
                top_k: topk.unwrap_or(config.top_k),
                force,
                dry_run,
            };
            config::validate_thresholds(options.min_score, options.top_k)?;

            let images_dir = images_dir.unwrap_or_else(|| config.images_dir.clone());
            let store_path = store.unwrap_or_else(|| config.store_path.clone());
            let filter = RegionFilter::region(region.as_deref().unwrap_or(&config.region));
            let out = out.unwrap_or_else(|| config.trace_path.clone());

            // 1-2. カタログ読み込みとファイル解決
            let photos = load_and_resolve(&catalog, &images_dir, 4)?;

            // 3. 照合
            println!("[3/4] 文書と照合中...");
            if let Some(label) = filter.label() {
                println!("  地域: {}", label);
            }
            let mut doc_store = JsonFileStore::open(&store_path)?;
            let report = matcher::run_matching(&photos, &mut doc_store, &filter, &options, true)?;
            println!("✔ 対象文書 {}件を照合", report.targets);
            println!("  更新: {}件", report.updated);
            println!("  既存画像のためスキップ: {}件", report.skipped);
            println!("  該当なし: {}件", report.unmatched);
            if report.failed > 0 {
                println!("⚠ 書き込み失敗: {}件", report.failed);
            }

            if !dry_run && doc_store.flush()? {
                println!("✔ 文書ストアを保存: {}", doc_store.path().display());
            }
            println!();

            // 4. トレース出力
            println!("[4/4] トレースを出力中...");
            if export::write_trace(&out, &report.traces)? {
                println!("✔ 照合結果を出力: {}（{}行）", out.display(), report.traces.len());
            } else {
                println!("⚠ 採用された照合がありません（--min-score や --region を見直してください）");
            }

            println!("\n✅ 完了");
        }

        Commands::Check { catalog, images_dir } => {
            println!("🔎 photo-link - カタログ確認\n");

            let images_dir = images_dir.unwrap_or_else(|| config.images_dir.clone());
            load_and_resolve(&catalog, &images_dir, 2)?;

            println!("\n✅ 確認完了");
        }

        Commands::Config { set_base_url, set_min_score, show } => {
            let mut config = config;

            if let Some(base_url) = set_base_url {
                config.set_base_url(base_url)?;
                println!("✔ 公開URLの基点を設定しました");
            }

            if let Some(min_score) = set_min_score {
                config.set_min_score(min_score)?;
                println!("✔ 最低スコアを設定しました");
            }

            if show {
                println!("設定: {}", Config::config_path()?.display());
                println!("  画像フォルダ: {}", config.images_dir.display());
                println!("  公開URL: {}", config.base_url);
                println!("  文書ストア: {}", config.store_path.display());
                println!("  地域: {}", if config.region.is_empty() { "（全件）" } else { config.region.as_str() });
                println!("  最低スコア: {}", config.min_score);
                println!("  最大採用数: {}", config.top_k);
                println!("  出典: {}", config.origin);
                println!("  トレース: {}", config.trace_path.display());
            }
        }
    }

    Ok(())
}

fn init_logger(verbose: bool) {
    let mut clog = colog::default_builder();
    clog.filter(None, if verbose { LevelFilter::Debug } else { LevelFilter::Warn });
    clog.init();
}

/// カタログを読み込み、画像ファイルを解決する（手順表示 [1/n] [2/n]）
fn load_and_resolve(
    catalog_path: &Path,
    images_dir: &Path,
    total_steps: usize,
) -> Result<Vec<PhotoRecord>> {
    println!("[1/{}] カタログを読み込み中...", total_steps);
    let load = catalog::load_catalog(catalog_path)?;
    println!("✔ {}件の写真を読み込み", load.rows_read);
    if load.missing_credit > 0 {
        println!("⚠ クレジットが空の写真: {}件", load.missing_credit);
    }
    println!();

    println!("[2/{}] 画像ファイルを解決中...", total_steps);
    let index = scanner::ImageIndex::build(images_dir)?;
    let mut photos = load.records;
    let stats = scanner::resolve_catalog(&mut photos, &index)?;
    println!("✔ {}/{}件のファイルを解決（{}個の画像を検出）", stats.found(), stats.total, index.len());
    println!("  完全一致: {} / 前方一致: {} / あいまい一致: {}", stats.exact, stats.prefix, stats.fuzzy);
    if !stats.missing.is_empty() {
        println!("⚠ 見つからないファイル: {}件", stats.missing.len());
        for name in &stats.missing {
            println!("  - {}", name);
        }
    }
    println!();

    Ok(photos)
}
