use serde::{Deserialize, Serialize};

/// 批改出的单个问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// 序号（从 1 开始，仅用于显示）
    pub number: u32,
    /// 问题描述
    #[serde(rename = "error")]
    pub description: String,
}

/// `GET /api/results/{jobId}` 的响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingResult {
    /// 总评等级，如 "A"、"B+"
    pub total_grade: String,
    /// 按后端返回顺序排列
    #[serde(rename = "sections", default)]
    pub issues: Vec<Issue>,
    /// 标注图地址（相对于服务地址）
    #[serde(rename = "pdfAnnotatedUrl")]
    pub annotated_image: String,
}

impl GradingResult {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_results_payload() {
        let result: GradingResult = serde_json::from_str(
            r#"{
                "total_grade": "B+",
                "sections": [
                    {"number": 2, "error": "induction step skips k+1"},
                    {"number": 1, "error": "missing base case"}
                ],
                "pdfAnnotatedUrl": "/static/annotated/x.jpg"
            }"#,
        )
        .unwrap();

        assert_eq!(result.total_grade, "B+");
        assert_eq!(result.issues.len(), 2);
        // 保持后端顺序
        assert_eq!(result.issues[0].number, 2);
        assert_eq!(result.issues[1].description, "missing base case");
        assert_eq!(result.annotated_image, "/static/annotated/x.jpg");
    }

    #[test]
    fn test_missing_sections_means_no_issues() {
        let result: GradingResult =
            serde_json::from_str(r#"{"total_grade":"A","pdfAnnotatedUrl":"/a.jpg"}"#).unwrap();
        assert!(!result.has_issues());
    }
}
