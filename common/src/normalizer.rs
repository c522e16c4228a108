//! テキスト正規化モジュール
//!
//! 写真タイトル・地名・POIラベルを比較専用の正規形に変換する。
//!
//! ## 処理順序
//! 1. 小文字化
//! 2. 合字（œ/æ）の展開
//! 3. アポストロフィの統一
//! 4. 略記 st/ste → saint/sainte
//! 5. ダイアクリティカルマークの除去
//! 6. 記号の除去（ハイフン・括弧は県番号のため保持）
//! 7. 空白の圧縮
//!
//! 略記の置換は記号除去より前（`st.` の `.` が残っている段階）に行う。

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

lazy_static! {
    // st / st. / st- （単独トークン）
    static ref SAINT_RE: Regex = Regex::new(r"(?i)\bst(?:[.\-]|\b)").unwrap();
    // ste / ste. / ste-
    static ref SAINTE_RE: Regex = Regex::new(r"(?i)\bste(?:[.\-]|\b)").unwrap();
    // タイトル中の県番号 "(63)"
    static ref DEPARTMENT_RE: Regex = Regex::new(r"\((\d{2})\)").unwrap();
}

/// 比較用の正規形に変換する
///
/// 純粋関数で、どんな入力に対しても失敗しない。
/// `canonicalize(canonicalize(x)) == canonicalize(x)` が成り立つ。
///
/// # Examples
/// ```
/// use photo_link_common::canonicalize;
///
/// assert_eq!(canonicalize("Château de Chambord"), "chateau de chambord");
/// assert_eq!(canonicalize("St. Martin"), canonicalize("Saint Martin"));
/// ```
pub fn canonicalize(text: &str) -> String {
    let mut s = text.to_lowercase();

    s = expand_ligatures(&s);
    s = unify_apostrophes(&s);
    s = expand_saint(&s);
    s = strip_diacritics(&s);
    s = strip_punctuation(&s);

    // 分解・記号除去の結果として単独化した略記も置換する
    s = expand_saint(&s);

    collapse_whitespace(&s)
}

/// "a b" 形式の結合文字列（タイトル+都市、名称+所在地）
pub fn join_norm(a: &str, b: &str) -> String {
    format!("{} {}", a, b).trim().to_string()
}

/// タイトルから県番号を抽出する（例: "Puy de Dôme (63)" → "63"）
///
/// 正規化前のタイトルに対して使う。見つからなければ空文字。
pub fn department_code(title: &str) -> String {
    DEPARTMENT_RE
        .captures(title)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn expand_ligatures(s: &str) -> String {
    s.replace('œ', "oe")
        .replace('Œ', "oe")
        .replace('æ', "ae")
        .replace('Æ', "ae")
}

fn unify_apostrophes(s: &str) -> String {
    s.replace(['\u{2019}', '\u{2018}', '`'], "'")
}

fn expand_saint(s: &str) -> String {
    let s = SAINTE_RE.replace_all(s, "sainte ");
    SAINT_RE.replace_all(&s, "saint ").into_owned()
}

/// NFKD分解後に結合文字を落とす
fn strip_diacritics(s: &str) -> String {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn strip_punctuation(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() || matches!(c, '-' | '(' | ')') {
                c
            } else {
                ' '
            }
        })
        .collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_basic() {
        assert_eq!(canonicalize("  Musée   des Beaux-Arts "), "musee des beaux-arts");
        assert_eq!(canonicalize("Château de Chambord"), "chateau de chambord");
        assert_eq!(canonicalize(""), "");
    }

    #[test]
    fn test_canonicalize_ligatures() {
        assert_eq!(canonicalize("Cœur de Lyon"), "coeur de lyon");
        assert_eq!(canonicalize("ŒUVRE"), "oeuvre");
        assert_eq!(canonicalize("Lætitia"), "laetitia");
    }

    #[test]
    fn test_canonicalize_apostrophes() {
        // アポストロフィは統一後に記号として除去される
        assert_eq!(canonicalize("L’Église"), canonicalize("L'Eglise"));
        assert_eq!(canonicalize("l`eglise"), "l eglise");
    }

    #[test]
    fn test_canonicalize_saint_variants() {
        let expected = canonicalize("Saint Martin");
        assert_eq!(expected, "saint martin");
        assert_eq!(canonicalize("St. Martin"), expected);
        assert_eq!(canonicalize("St-Martin"), expected);
        assert_eq!(canonicalize("ST Martin"), expected);
        assert_eq!(canonicalize("st.martin"), expected);
    }

    #[test]
    fn test_canonicalize_sainte_variants() {
        assert_eq!(canonicalize("Ste-Foy-lès-Lyon"), "sainte foy-les-lyon");
        assert_eq!(canonicalize("Ste. Anne"), "sainte anne");
    }

    #[test]
    fn test_canonicalize_saint_not_inside_words() {
        assert_eq!(canonicalize("Stade des Alpes"), "stade des alpes");
        assert_eq!(canonicalize("Est"), "est");
        assert_eq!(canonicalize("Steak house"), "steak house");
        // アクセント付きの隣接文字は単語境界にならない
        assert_eq!(canonicalize("Ést"), "est");
    }

    #[test]
    fn test_canonicalize_keeps_parentheses_and_hyphen() {
        assert_eq!(canonicalize("Le Puy-en-Velay (43)"), "le puy-en-velay (43)");
        assert_eq!(canonicalize("Vichy, «Opéra» !"), "vichy opera");
    }

    #[test]
    fn test_canonicalize_idempotent() {
        let inputs = [
            "Château de Chambord",
            "St. Martin-d'Hères",
            "Ste-Foy-lès-Lyon (69)",
            "Cœur “historique” — Annecy",
            "ﬅ ﬁn",
            "L’Île-d’Abeau",
            "   ",
            "Notre-Dame de Fourvière / Lyon 5e",
        ];
        for input in inputs {
            let once = canonicalize(input);
            assert_eq!(canonicalize(&once), once, "not idempotent: {:?}", input);
        }
    }

    #[test]
    fn test_department_code() {
        assert_eq!(department_code("Vulcania (63)"), "63");
        assert_eq!(department_code("Lac d'Annecy (74) - vue (01)"), "74");
        assert_eq!(department_code("Route (6) nationale"), "");
        assert_eq!(department_code("Sans département"), "");
        assert_eq!(department_code("(123)"), "");
    }

    #[test]
    fn test_join_norm() {
        assert_eq!(join_norm("vulcania", "saint-ours"), "vulcania saint-ours");
        assert_eq!(join_norm("vulcania", ""), "vulcania");
        assert_eq!(join_norm("", ""), "");
    }
}
