//! 本地文件命名

use regex::Regex;
use uuid::Uuid;

/// 清理文件名：只保留 `[A-Za-z0-9._-]`，空白转为下划线，去掉开头的点
pub fn secure_filename(name: &str) -> String {
    // 只取最后一段，防止路径穿越
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let spaced = base.split_whitespace().collect::<Vec<_>>().join("_");

    let cleaned = match Regex::new(r"[^A-Za-z0-9_.-]") {
        Ok(re) => re.replace_all(&spaced, "").to_string(),
        Err(_) => spaced,
    };

    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// 8 位十六进制前缀，避免同名文件互相覆盖
pub fn unique_prefix() -> String {
    let mut prefix = Uuid::new_v4().simple().to_string();
    prefix.truncate(8);
    prefix
}

/// 从标注图地址中取出文件名
pub fn annotated_file_name(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let name = secure_filename(path.rsplit('/').next().unwrap_or_default());
    if name.is_empty() {
        "annotated.jpg".to_string()
    } else {
        name
    }
}
