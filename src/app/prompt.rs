// ==========================================
// 护理实习管理系统 - 人工确认
// ==========================================
// 默认回答为"否"；Esc / Ctrl-C / 非终端环境均视为拒绝
// ==========================================

use dialoguer::Confirm;

pub use crate::importer::Confirmer;

/// 终端确认器
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, message: &str) -> bool {
        let answer = Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact_opt();
        interpret(answer)
    }
}

/// 只有明确选择"是"才视为同意
fn interpret<E: std::fmt::Display>(answer: Result<Option<bool>, E>) -> bool {
    match answer {
        Ok(Some(true)) => true,
        Ok(_) => false,
        Err(e) => {
            tracing::warn!(error = %e, "确认提示失败，按拒绝处理");
            false
        }
    }
}

/// 固定回答的确认器（--yes）
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirmer for AutoConfirm {
    fn confirm(&self, message: &str) -> bool {
        tracing::debug!(message, answer = self.0, "自动确认");
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_only_explicit_yes() {
        assert!(interpret::<String>(Ok(Some(true))));
        assert!(!interpret::<String>(Ok(Some(false))));
        assert!(!interpret::<String>(Ok(None)));
        assert!(!interpret(Err("not a terminal".to_string())));
    }

    #[test]
    fn test_auto_confirm() {
        assert!(AutoConfirm(true).confirm("x"));
        assert!(!AutoConfirm(false).confirm("x"));
    }
}
