// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 名册 CSV/Excel 夹具、会话凭证、应用状态构建
// ==========================================

#![allow(dead_code)]

use nu_roster_import::app::AppState;
use nu_roster_import::config::{AppConfig, ConfigManager};
use nu_roster_import::session::{CredentialProvider, SessionContext, SessionUser};
use rust_xlsxwriter::Workbook;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_TOKEN: &str = "test-access-token";
pub const TEST_ACTOR: &str = "manager@nu.ac.th";

/// 名册表头（结构化姓名）
pub const ROSTER_HEADER: &str = "prefix,firstName,lastName,email,role,studentId,password";

/// 混合名册: 2 条合法学生、1 条非校园邮箱学生、1 条缺密码的 APPROVER_OUT
pub fn mixed_roster() -> String {
    [
        ROSTER_HEADER,
        "นางสาว,มาลี,ศรีสุข,malee@nu.ac.th,student,64010001,",
        "Mr.,Anan,K,anan@nu.ac.th,STUDENT,64010002,",
        ",Bob,Smith,bob@gmail.com,STUDENT,64010003,",
        ",Out,Side,outside@hospital.org,APPROVER_OUT,,",
    ]
    .join("\n")
}

/// 写入 CSV 名册
pub fn write_roster(dir: &TempDir, file_name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(file_name);
    std::fs::write(&path, content).expect("写入名册失败");
    path
}

/// Excel 单元格夹具
pub enum XlsxCell<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

/// 写入 .xlsx 名册；sheets 按顺序生成工作表
pub fn write_xlsx_roster(
    dir: &TempDir,
    file_name: &str,
    sheets: &[(&str, Vec<Vec<XlsxCell>>)],
) -> PathBuf {
    let path = dir.path().join(file_name);
    let mut workbook = Workbook::new();
    for (sheet_name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*sheet_name).expect("工作表命名失败");
        for (row_idx, row) in rows.iter().enumerate() {
            let row_num = row_idx as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = col_idx as u16;
                match cell {
                    XlsxCell::Text(text) => {
                        worksheet.write_string(row_num, col_num, *text).expect("写入单元格失败");
                    }
                    XlsxCell::Number(value) => {
                        worksheet.write_number(row_num, col_num, *value).expect("写入单元格失败");
                    }
                    XlsxCell::Blank => {}
                }
            }
        }
    }
    workbook.save(&path).expect("保存 Excel 失败");
    path
}

/// 已登录会话
pub fn logged_in() -> Arc<dyn CredentialProvider> {
    Arc::new(test_session())
}

/// 未登录
pub fn logged_out() -> Arc<dyn CredentialProvider> {
    Arc::new(None::<SessionContext>)
}

pub fn test_session() -> SessionContext {
    SessionContext::new(TEST_TOKEN)
        .expect("令牌非空")
        .with_user(SessionUser {
            email: TEST_ACTOR.to_string(),
            id: None,
            role: Some("EXPERIENCE_MANAGER".to_string()),
        })
}

/// 指向 mock 后端的应用状态（数据库与会话文件位于临时目录）
pub fn create_test_state(dir: &TempDir, backend_url: &str, signed_in: bool) -> AppState {
    let config = AppConfig {
        backend_url: backend_url.to_string(),
        db_path: Some(dir.path().join("action_log.db")),
        session_path: Some(dir.path().join("session.json")),
        ..AppConfig::default()
    };
    let state = AppState::new(ConfigManager::from_config(config).expect("配置有效"))
        .expect("初始化AppState失败");
    if signed_in {
        state
            .session_store
            .save(&test_session())
            .expect("保存会话失败");
    }
    state
}
