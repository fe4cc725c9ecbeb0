use serde::{Deserialize, Serialize};

use super::timestamp;

/// 已加入的班级（viewClass 返回）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentClass {
    pub class_id: i64,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// 班级公告（selectAnnouncement 返回）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// `[yyyy, M, d, HH, mm]`
    #[serde(default)]
    pub create_time: Vec<i32>,
    /// 所属班级，拉取时由客户端补上
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub class_name: Option<String>,
}

impl Announcement {
    pub fn display_time(&self) -> String {
        timestamp::display(&self.create_time)
    }

    /// 打上所属班级
    pub fn tagged(mut self, class: &StudentClass) -> Self {
        self.class_id = Some(class.class_id);
        self.class_name = Some(class.class_name.clone());
        self
    }
}

/// 加入班级的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinMode {
    /// 按班级名称
    ByName,
    /// 按邀请链接中的 token
    ByLink,
}

impl JoinMode {
    /// 后端 accessType 参数
    pub fn access_type(self) -> &'static str {
        match self {
            JoinMode::ByName => "byName",
            JoinMode::ByLink => "byLink",
        }
    }
}

/// 加入班级的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined { message: String },
    AlreadyMember { message: String },
}
