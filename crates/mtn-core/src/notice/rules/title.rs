//! Document kind gate.

use super::text::remove_whitespace;

/// Full title with fullwidth parentheses.
pub const TITLE: &str = "美菱移模通知单（外调）";

/// Full title with ASCII parentheses.
pub const TITLE_ASCII: &str = "美菱移模通知单(外调)";

const TITLE_STEM: &str = "移模通知单";
const TITLE_QUALIFIER: &str = "外调";

/// Check whether the text belongs to a mould transfer notice.
///
/// Whitespace is ignored since extractors often split CJK titles.
pub fn is_mould_transfer_notice(text: &str) -> bool {
    let compact = remove_whitespace(text);
    compact.contains(TITLE)
        || compact.contains(TITLE_ASCII)
        || (compact.contains(TITLE_STEM) && compact.contains(TITLE_QUALIFIER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_titles() {
        assert!(is_mould_transfer_notice("美菱移模通知单（外调）"));
        assert!(is_mould_transfer_notice("美菱移模通知单(外调)"));
    }

    #[test]
    fn test_split_title() {
        assert!(is_mould_transfer_notice("美 菱 移模\n通知单 （外调）"));
        assert!(is_mould_transfer_notice("外调\n移模通知单"));
    }

    #[test]
    fn test_rejects_other_documents() {
        assert!(!is_mould_transfer_notice("美菱移模通知单"));
        assert!(!is_mould_transfer_notice("采购订单 外调"));
        assert!(!is_mould_transfer_notice(""));
    }
}
