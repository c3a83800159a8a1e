use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::errors::{BiolinkError, Result};
use crate::utils::color::is_valid_css_color;
use crate::utils::url_validator::validate_link_url;

/// 邀请页商品目录最多条目数
pub const MAX_CATALOGUE_ITEMS: usize = 5;

/// 个人主页上的一个外链
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileLink {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub icon: String,
}

/// 用户资料，id 即身份服务中的用户 id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
    pub bio: String,
    pub avatar: Option<String>,
    pub links: Vec<ProfileLink>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country_code: Option<String>,
    pub premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// 首次登录时创建的空资料
    pub fn empty(id: impl Into<String>, email: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            username: None,
            bio: String::new(),
            avatar: None,
            links: Vec::new(),
            email,
            phone: None,
            country_code: None,
            premium: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 邀请页上的一个外链
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteLink {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// 主题字体（固定集合）
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FontChoice {
    #[default]
    SansSerif,
    Serif,
    Monospace,
    Cursive,
}

/// 邀请页主题（仅 premium）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default)]
    pub font: FontChoice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

fn default_primary_color() -> String {
    "#f59e42".to_string()
}

fn default_background_color() -> String {
    "#1e293b".to_string()
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: default_primary_color(),
            background_color: default_background_color(),
            font: FontChoice::default(),
            logo: None,
        }
    }
}

impl Theme {
    /// 校验颜色与 logo，空 logo 归一化为 None
    pub fn validated(mut self) -> Result<Self> {
        for (field, value) in [
            ("theme.primary_color", &self.primary_color),
            ("theme.background_color", &self.background_color),
        ] {
            if !is_valid_css_color(value) {
                return Err(BiolinkError::validation(format!(
                    "{}: invalid color '{}'",
                    field, value
                )));
            }
        }

        self.logo = match self.logo.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(logo) => Some(validate_link_url("theme.logo", logo)?),
        };
        Ok(self)
    }
}

/// 商品目录条目（仅 premium）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueItem {
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// 邀请页
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub links: Vec<InviteLink>,
    pub theme: Option<Theme>,
    pub catalogue: Vec<CatalogueItem>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Invitation {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at < now)
    }

    /// 对外分享链接 `{base}/invite/{id}`
    pub fn invite_url(&self, public_base_url: &str) -> String {
        format!("{}/invite/{}", public_base_url.trim_end_matches('/'), self.id)
    }

    pub fn find_link(&self, link_id: &str) -> Option<&InviteLink> {
        self.links.iter().find(|link| link.id == link_id)
    }
}
