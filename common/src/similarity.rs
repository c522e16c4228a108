//! 文字列類似度モジュール
//!
//! 0〜100のスコアを返す近似文字列照合の関数群。
//! 基本比率は正規化レーベンシュタイン距離（strsim）を使い、
//! その上に部分一致・トークン並べ替え・トークン集合の比較を重ねる。
//!
//! | 関数 | 得意なノイズ |
//! |------|--------------|
//! | `ratio` | 誤字・軽微な差分 |
//! | `partial_ratio` | 片方がもう片方の断片 |
//! | `token_sort_ratio` | 語順の入れ替え |
//! | `token_set_ratio` | 語順・重複語・余分な語 |
//! | `weighted_ratio` | 上記の総合（長さ比で重み付け） |
//!
//! どの関数も空文字を含む比較では0を返す。

use std::collections::BTreeSet;

/// 語順スコアの割引率
const UNBASE_SCALE: f64 = 0.95;

/// 基本比率（正規化レーベンシュタイン × 100）
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// 部分一致比率
///
/// 短い方の文字列を、長い方の同じ長さの全ウィンドウと比較した最大値。
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    let short_len = shorter.chars().count();
    if short_len == 0 {
        return 0.0;
    }

    let long_chars: Vec<char> = longer.chars().collect();
    if long_chars.len() == short_len {
        return ratio(shorter, longer);
    }

    let mut best = 0.0_f64;
    for window in long_chars.windows(short_len) {
        let candidate: String = window.iter().collect();
        let score = ratio(shorter, &candidate);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }

    best
}

/// トークンを並べ替えてから比較
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// トークン集合の比較
///
/// 共通トークンがあり、どちらか一方に余分なトークンがなければ100。
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a = token_set(a);
    let tokens_b = token_set(b);

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let sect = intersection.join(" ");
    let combined_ab = join_tokens(&sect, &diff_ab);
    let combined_ba = join_tokens(&sect, &diff_ba);

    ratio(&sect, &combined_ab)
        .max(ratio(&sect, &combined_ba))
        .max(ratio(&combined_ab, &combined_ba))
}

/// トークン単位の部分一致
///
/// 共通トークンが1つでもあれば100。
pub fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let tokens_a = token_set(a);
    let tokens_b = token_set(b);

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    if tokens_a.intersection(&tokens_b).next().is_some() {
        return 100.0;
    }

    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// 重み付き総合比率
///
/// 長さ比が1.5未満なら語順系の比較、それ以上なら部分一致系の比較を
/// 割引して基本比率と比べ、最大値を返す。
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let len_ratio = len_a.max(len_b) as f64 / len_a.min(len_b) as f64;
    let base = ratio(a, b);

    if len_ratio < 1.5 {
        let token = token_sort_ratio(a, b).max(token_set_ratio(a, b));
        return base.max(token * UNBASE_SCALE);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    let partial = base.max(partial_ratio(a, b) * partial_scale);
    partial.max(partial_token_ratio(a, b) * UNBASE_SCALE * partial_scale)
}

fn token_set(s: &str) -> BTreeSet<&str> {
    s.split_whitespace().collect()
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join_tokens(sect: &str, rest: &[&str]) -> String {
    let rest = rest.join(" ");
    format!("{} {}", sect, rest).trim().to_string()
}
