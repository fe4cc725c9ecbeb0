//! 筛选状态 - 流程层
//!
//! 四个维度（年级、学科、分类、主题）的已选值和候选值。
//! 候选值随最新一页结果收敛；已选值始终是候选值的子集。

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::models::catalog;
use crate::models::QuestionSummary;

/// 筛选维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetDimension {
    Grade,
    Subject,
    Category,
    Topic,
}

impl FacetDimension {
    pub const ALL: [FacetDimension; 4] = [
        FacetDimension::Grade,
        FacetDimension::Subject,
        FacetDimension::Category,
        FacetDimension::Topic,
    ];

    /// 取出一条结果在该维度上的值
    fn value_of(self, item: &QuestionSummary) -> Option<&str> {
        let value = match self {
            FacetDimension::Grade => item.grade.as_deref(),
            FacetDimension::Subject => item.subject.as_deref(),
            FacetDimension::Category => item.category.as_deref(),
            FacetDimension::Topic => item.topic.as_deref(),
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    fn catalogue(self) -> &'static [&'static str] {
        match self {
            FacetDimension::Grade => catalog::GRADES,
            FacetDimension::Subject => catalog::SUBJECTS,
            FacetDimension::Category => catalog::CATEGORIES,
            FacetDimension::Topic => catalog::TOPICS,
        }
    }
}

/// 一个维度：有序候选 + 已选集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Facet {
    candidates: Vec<String>,
    selected: HashSet<String>,
}

impl Facet {
    fn from_catalogue(values: &[&str]) -> Self {
        Self {
            candidates: values.iter().map(|v| v.to_string()).collect(),
            selected: HashSet::new(),
        }
    }

    /// 按候选顺序输出已选值
    fn selected_in_order(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .filter(|c| self.selected.contains(*c))
            .map(String::as_str)
            .collect()
    }
}

/// 全部维度的筛选状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetState {
    grade: Facet,
    subject: Facet,
    category: Facet,
    topic: Facet,
}

impl Default for FacetState {
    fn default() -> Self {
        Self::new()
    }
}

impl FacetState {
    /// 候选值初始化为全量目录，没有任何已选值
    pub fn new() -> Self {
        Self {
            grade: Facet::from_catalogue(FacetDimension::Grade.catalogue()),
            subject: Facet::from_catalogue(FacetDimension::Subject.catalogue()),
            category: Facet::from_catalogue(FacetDimension::Category.catalogue()),
            topic: Facet::from_catalogue(FacetDimension::Topic.catalogue()),
        }
    }

    fn facet(&self, dim: FacetDimension) -> &Facet {
        match dim {
            FacetDimension::Grade => &self.grade,
            FacetDimension::Subject => &self.subject,
            FacetDimension::Category => &self.category,
            FacetDimension::Topic => &self.topic,
        }
    }

    fn facet_mut(&mut self, dim: FacetDimension) -> &mut Facet {
        match dim {
            FacetDimension::Grade => &mut self.grade,
            FacetDimension::Subject => &mut self.subject,
            FacetDimension::Category => &mut self.category,
            FacetDimension::Topic => &mut self.topic,
        }
    }

    /// 勾选或取消一个值
    ///
    /// 不在候选中的值无法被勾选，返回 false
    pub fn apply_selection(&mut self, dim: FacetDimension, value: &str, selected: bool) -> bool {
        let facet = self.facet_mut(dim);
        if selected {
            if !facet.candidates.iter().any(|c| c == value) {
                return false;
            }
            facet.selected.insert(value.to_string());
        } else {
            facet.selected.remove(value);
        }
        true
    }

    /// 清空一个维度的已选值
    pub fn clear(&mut self, dim: FacetDimension) {
        self.facet_mut(dim).selected.clear();
    }

    pub fn candidates(&self, dim: FacetDimension) -> &[String] {
        &self.facet(dim).candidates
    }

    /// 已选值，按候选顺序
    pub fn selected(&self, dim: FacetDimension) -> Vec<&str> {
        self.facet(dim).selected_in_order()
    }

    pub fn is_selected(&self, dim: FacetDimension, value: &str) -> bool {
        self.facet(dim).selected.contains(value)
    }

    pub fn has_selection(&self) -> bool {
        FacetDimension::ALL
            .iter()
            .any(|&d| !self.facet(d).selected.is_empty())
    }

    /// 用最新一页结果重算候选值，并剔除不再出现的已选值
    ///
    /// 某维度在结果中没有任何值时保留原候选（可能已过时，但仍可用）
    pub fn recompute(&mut self, results: &[QuestionSummary]) {
        for dim in FacetDimension::ALL {
            let observed: BTreeSet<&str> = results.iter().filter_map(|r| dim.value_of(r)).collect();
            if observed.is_empty() {
                continue;
            }

            let facet = self.facet_mut(dim);
            facet.candidates = observed.into_iter().map(str::to_string).collect();

            let before = facet.selected.len();
            let candidates = &facet.candidates;
            facet.selected.retain(|s| candidates.contains(s));
            let pruned = before - facet.selected.len();
            if pruned > 0 {
                debug!("🧹 {:?} 维度剔除了 {} 个失效的已选值", dim, pruned);
            }
        }
    }

    /// 已选值的逗号拼接形式，用作请求参数
    pub fn wire_value(&self, dim: FacetDimension) -> String {
        self.selected(dim).join(",")
    }
}
