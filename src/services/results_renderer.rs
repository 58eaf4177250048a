//! 批改结果渲染
//!
//! 纯函数：GradingResult → 显示模型，不持有状态

use std::fmt;

use reqwest::Url;

use crate::error::{GradeError, Result};
use crate::models::{GradingResult, Issue};

/// 没有问题时的提示
pub const NO_ERRORS_MESSAGE: &str = "No errors found! Great job!";

/// 等级档位（按首字母划分）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradeTier {
    /// A*
    Excellent,
    /// B*
    Good,
    /// C*
    Fair,
    /// 其他
    Poor,
}

impl GradeTier {
    /// 按首字母前缀匹配，不做数值比较
    pub fn from_grade(grade: &str) -> Self {
        let grade = grade.trim_start();
        if grade.starts_with('A') {
            GradeTier::Excellent
        } else if grade.starts_with('B') {
            GradeTier::Good
        } else if grade.starts_with('C') {
            GradeTier::Fair
        } else {
            GradeTier::Poor
        }
    }

    pub fn color_name(self) -> &'static str {
        match self {
            GradeTier::Excellent => "green",
            GradeTier::Good => "blue",
            GradeTier::Fair => "yellow",
            GradeTier::Poor => "red",
        }
    }

    /// 终端前景色
    pub fn ansi_color(self) -> &'static str {
        match self {
            GradeTier::Excellent => "\x1b[32m",
            GradeTier::Good => "\x1b[34m",
            GradeTier::Fair => "\x1b[33m",
            GradeTier::Poor => "\x1b[31m",
        }
    }
}

/// 问题区域
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuesView {
    /// 没有问题，显示成功提示
    NoErrors(&'static str),
    /// 按原顺序列出
    Issues(Vec<Issue>),
}

/// 渲染结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResults {
    pub grade: String,
    pub tier: GradeTier,
    pub annotated_image_url: String,
    pub issues: IssuesView,
}

impl RenderedResults {
    pub fn issue_count(&self) -> usize {
        match &self.issues {
            IssuesView::NoErrors(_) => 0,
            IssuesView::Issues(issues) => issues.len(),
        }
    }
}

/// 把标注图路径解析为基于服务地址的完整地址
///
/// 以 `/` 开头的路径替换掉服务地址中的路径部分；本身就是完整地址的原样返回
pub fn resolve_image_url(base_url: &str, image_path: &str) -> Result<String> {
    let base = Url::parse(base_url).map_err(|e| invalid_url(base_url, e))?;
    let resolved = base.join(image_path).map_err(|e| invalid_url(image_path, e))?;
    Ok(resolved.to_string())
}

fn invalid_url(input: &str, reason: impl fmt::Display) -> GradeError {
    GradeError::InvalidImageUrl {
        url: input.to_string(),
        reason: reason.to_string(),
    }
}

/// 渲染批改结果
pub fn render(result: &GradingResult, base_url: &str) -> Result<RenderedResults> {
    let issues = if result.issues.is_empty() {
        IssuesView::NoErrors(NO_ERRORS_MESSAGE)
    } else {
        IssuesView::Issues(result.issues.clone())
    };

    Ok(RenderedResults {
        grade: result.total_grade.clone(),
        tier: GradeTier::from_grade(&result.total_grade),
        annotated_image_url: resolve_image_url(base_url, &result.annotated_image)?,
        issues,
    })
}

impl fmt::Display for RenderedResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RESET: &str = "\x1b[0m";

        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(
            f,
            "Overall Grade: {}{}{}",
            self.tier.ansi_color(),
            self.grade,
            RESET
        )?;
        writeln!(f, "{}", "-".repeat(60))?;

        match &self.issues {
            IssuesView::NoErrors(message) => writeln!(f, "✅ {}", message)?,
            IssuesView::Issues(issues) => {
                writeln!(f, "Issues Found ({}):", issues.len())?;
                for issue in issues {
                    writeln!(f, "  {}. {}", issue.number, issue.description)?;
                }
            }
        }

        writeln!(f, "{}", "-".repeat(60))?;
        writeln!(f, "Annotated image: {}", self.annotated_image_url)?;
        write!(f, "{}", "=".repeat(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(grade: &str, issues: Vec<Issue>) -> GradingResult {
        GradingResult {
            total_grade: grade.to_string(),
            issues,
            annotated_image: "/static/annotated/x.jpg".to_string(),
        }
    }

    #[test]
    fn test_grade_tier_prefix_buckets() {
        assert_eq!(GradeTier::from_grade("A-"), GradeTier::from_grade("A+"));
        assert_eq!(GradeTier::from_grade("A"), GradeTier::Excellent);
        assert_eq!(GradeTier::from_grade("B"), GradeTier::from_grade("B-"));
        assert_eq!(GradeTier::from_grade("B+"), GradeTier::Good);
        assert_eq!(GradeTier::from_grade("C+"), GradeTier::Fair);

        for grade in ["D", "F", "E+", "", "a", "Pass", "90"] {
            assert_eq!(GradeTier::from_grade(grade), GradeTier::Poor, "grade {:?}", grade);
        }
    }

    #[test]
    fn test_tiers_have_distinct_colors() {
        let colors: std::collections::HashSet<_> = [
            GradeTier::Excellent,
            GradeTier::Good,
            GradeTier::Fair,
            GradeTier::Poor,
        ]
        .iter()
        .map(|t| t.color_name())
        .collect();
        assert_eq!(colors.len(), 4);
    }

    #[test]
    fn test_empty_issues_render_success_message() {
        let rendered = render(&result("A", vec![]), "http://127.0.0.1:5000").unwrap();
        assert_eq!(rendered.issues, IssuesView::NoErrors(NO_ERRORS_MESSAGE));
        assert_eq!(rendered.issue_count(), 0);

        let text = rendered.to_string();
        assert!(text.contains(NO_ERRORS_MESSAGE));
        assert!(!text.contains("Issues Found"));
    }

    #[test]
    fn test_issues_keep_received_order() {
        let issues = vec![
            Issue {
                number: 3,
                description: "unjustified step".to_string(),
            },
            Issue {
                number: 1,
                description: "missing base case".to_string(),
            },
        ];
        let rendered = render(&result("C", issues.clone()), "http://127.0.0.1:5000").unwrap();
        assert_eq!(rendered.issues, IssuesView::Issues(issues));
        assert_eq!(rendered.tier, GradeTier::Fair);

        let text = rendered.to_string();
        let first = text.find("3. unjustified step").unwrap();
        let second = text.find("1. missing base case").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_image_url_resolves_against_origin() {
        assert_eq!(
            resolve_image_url("http://127.0.0.1:5000", "/static/annotated/x.jpg").unwrap(),
            "http://127.0.0.1:5000/static/annotated/x.jpg"
        );
        assert_eq!(
            resolve_image_url("http://grader.local/app/", "/static/annotated/x.jpg").unwrap(),
            "http://grader.local/static/annotated/x.jpg"
        );
        assert_eq!(
            resolve_image_url("http://127.0.0.1:5000", "https://cdn.example.com/x.jpg").unwrap(),
            "https://cdn.example.com/x.jpg"
        );
        assert!(resolve_image_url("not a url", "/x.jpg").is_err());
    }
}
