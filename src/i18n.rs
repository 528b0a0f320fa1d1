// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持泰文（默认配置）、英文（回退）、中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 3] = ["th", "en", "zh-CN"];

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"th"、"en" 或 "zh-CN"）；不支持的代码回退到 "en"
pub fn set_locale(locale: &str) {
    let locale = if SUPPORTED_LOCALES.contains(&locale) {
        locale
    } else {
        tracing::warn!(locale, "不支持的语言，回退到 en");
        "en"
    };
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use nu_roster_import::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use nu_roster_import::i18n::t_with_args;
/// let msg = t_with_args("import.file_not_found", &[("path", "/tmp/test.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::RowViolation;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("th");
        assert_eq!(rust_i18n::locale().to_string(), "th");

        set_locale("zh-CN");
        assert_eq!(rust_i18n::locale().to_string(), "zh-CN");

        set_locale("fr");
        assert_eq!(rust_i18n::locale().to_string(), "en");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(t("common.success"), "Operation successful");

        set_locale("zh-CN");
        assert_eq!(t("common.success"), "操作成功");

        set_locale("th");
        assert_eq!(t("error.no_valid_rows"), "ไม่มีแถวที่ถูกต้องสำหรับนำเข้า");

        set_locale("en");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args("import.file_not_found", &[("path", "/tmp/test.csv")]);
        assert_eq!(msg, "File not found: /tmp/test.csv");

        set_locale("zh-CN");
        let msg = t_with_args("import.file_not_found", &[("path", "/tmp/test.csv")]);
        assert!(msg.contains("/tmp/test.csv"));
        assert!(msg.contains("文件不存在"));

        set_locale("en");
    }

    #[test]
    fn test_every_violation_has_message() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        let all = [
            RowViolation::MissingName,
            RowViolation::MissingEmail,
            RowViolation::MissingRole,
            RowViolation::UnknownRole,
            RowViolation::MissingProvider,
            RowViolation::MissingPassword,
            RowViolation::InvalidStudentId,
            RowViolation::NonCampusEmail,
        ];
        for locale in SUPPORTED_LOCALES {
            set_locale(locale);
            for violation in all {
                let key = violation.message_key();
                // 缺失键时 rust-i18n 原样返回键名
                assert_ne!(t(key), key, "locale {} missing {}", locale, key);
            }
        }
        set_locale("en");
    }
}
